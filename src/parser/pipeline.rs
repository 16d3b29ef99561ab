use std::time::Instant;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{Campo, DashboardConfig};
use crate::error::AppError;
use crate::parser::deserializers::{normalizar_texto, parse_data_hora_texto};
use crate::parser::types::{DataHoraBruta, ParseWarning, Registro, RegistroRaw};

/// Saída de `normalizar_payload`: registros normalizados mais a
/// contabilidade da carga (avisos por registro, linhas descartadas, duração).
#[derive(Debug)]
pub struct NormalizeOutput {
    pub registros: Vec<Registro>,
    pub warnings: Vec<ParseWarning>,
    pub total_processados: usize,
    pub ignorados: usize,
    pub duracao_ms: u64,
}

/// Normaliza o payload `{ "registros": [...] }`.
///
/// Um payload sem o array `registros` é um erro de carga (o estado anterior
/// do dashboard deve ser preservado pelo chamador). Registros individuais
/// malformados são descartados com aviso; carimbos ilegíveis viram
/// `data_hora = None` com aviso, mantendo o registro.
pub fn normalizar_payload(
    payload: &Value,
    config: &DashboardConfig,
) -> Result<NormalizeOutput, AppError> {
    let start = Instant::now();

    let brutos = payload
        .get("registros")
        .and_then(Value::as_array)
        .ok_or(AppError::MissingRecords)?;

    let mut registros: Vec<Registro> = Vec::with_capacity(brutos.len());
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut ignorados = 0usize;

    for (indice, bruto) in brutos.iter().enumerate() {
        match serde_json::from_value::<RegistroRaw>(bruto.clone()) {
            Ok(raw) => {
                let (registro, aviso) = normalizar_registro(&raw, indice, config);
                if let Some(a) = aviso {
                    warn!(indice = a.indice, mensagem = %a.mensagem, "registro com data/hora ilegível");
                    warnings.push(a);
                }
                registros.push(registro);
            }
            Err(err) => {
                warn!(indice, erro = %err, "registro malformado descartado");
                warnings.push(ParseWarning {
                    indice,
                    mensagem: err.to_string(),
                });
                ignorados += 1;
            }
        }
    }

    debug!(
        total = brutos.len(),
        aceitos = registros.len(),
        ignorados,
        "payload normalizado"
    );

    Ok(NormalizeOutput {
        registros,
        warnings,
        total_processados: brutos.len(),
        ignorados,
        duracao_ms: start.elapsed().as_millis() as u64,
    })
}

fn normalizar_registro(
    raw: &RegistroRaw,
    indice: usize,
    config: &DashboardConfig,
) -> (Registro, Option<ParseWarning>) {
    let mut aviso = None;

    let data_hora = match &raw.data_hora {
        Some(DataHoraBruta::Inteiro(ms)) => Some(*ms),
        Some(DataHoraBruta::Decimal(ms)) => Some(*ms as i64),
        Some(DataHoraBruta::Texto(s)) => {
            let parsed = parse_data_hora_texto(s, config.timezone);
            if parsed.is_none() && !s.trim().is_empty() {
                aviso = Some(ParseWarning {
                    indice,
                    mensagem: format!("Data/hora inválida: {:?}", s),
                });
            }
            parsed
        }
        None => None,
    };

    let texto = |valor: &Option<String>, campo: Campo| {
        normalizar_texto(valor.as_deref(), sentinela(config, campo))
    };

    let registro = Registro {
        data_hora,
        funcionario: texto(&raw.funcionario, Campo::Funcionario),
        cliente: texto(&raw.cliente, Campo::Cliente),
        solicitante: texto(&raw.solicitante, Campo::Solicitante),
        status_atendimento: texto(&raw.status_atendimento, Campo::StatusAtendimento),
        tipo_atendimento: texto(&raw.tipo_atendimento, Campo::TipoAtendimento),
        sistema: texto(&raw.sistema, Campo::Sistema),
        canal_atendimento: texto(&raw.canal_atendimento, Campo::CanalAtendimento),
        solicitacao_cliente: texto(&raw.solicitacao_cliente, Campo::SolicitacaoCliente),
        relato_detalhado: texto(&raw.relato_detalhado, Campo::RelatoDetalhado),
        origem_problema: texto(&raw.origem_problema, Campo::OrigemProblema),
    };

    (registro, aviso)
}

/// Sentinela default do campo na tabela de dimensões. Campos sem entrada
/// própria caem no genérico "Não informado".
fn sentinela(config: &DashboardConfig, campo: Campo) -> &str {
    config
        .dimensoes
        .iter()
        .find(|d| d.campo == campo)
        .map(|d| d.valor_default.as_str())
        .unwrap_or("Não informado")
}

// ─── Tests ────────────────────────────────────────────────────────────────────
