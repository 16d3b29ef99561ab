use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::parser::pipeline::normalizar_payload;
use crate::parser::types::{ParseWarning, Registro};

/// Contabilidade de uma carga aceita, devolvida ao chamador junto com a
/// substituição do conjunto canônico.
#[derive(Debug, Clone, Serialize)]
pub struct CargaResumo {
    pub aceitos: usize,
    pub ignorados: usize,
    pub total_processados: usize,
    pub warnings: Vec<ParseWarning>,
    pub duracao_ms: u64,
}

/// Dono exclusivo da lista canônica de registros. A lista muda apenas por
/// substituição integral; nenhuma referência mutável escapa daqui, e os
/// consumidores recebem ou o resultado agregado ou uma cópia filtrada.
#[derive(Default)]
pub struct RecordStore {
    registros: Vec<Registro>,
    carregado: bool,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore {
            registros: Vec::new(),
            carregado: false,
        }
    }

    /// Visão imutável do conjunto canônico.
    pub fn registros(&self) -> &[Registro] {
        &self.registros
    }

    pub fn total(&self) -> usize {
        self.registros.len()
    }

    /// Já recebeu ao menos uma carga bem-sucedida?
    pub fn carregado(&self) -> bool {
        self.carregado
    }

    /// Normaliza o payload e substitui o conjunto canônico por inteiro.
    /// Payload malformado deixa o estado anterior intacto e o dashboard
    /// continua mostrando o último estado bom.
    pub fn substituir(
        &mut self,
        payload: &Value,
        config: &DashboardConfig,
    ) -> Result<CargaResumo, AppError> {
        let saida = normalizar_payload(payload, config)?;
        let resumo = CargaResumo {
            aceitos: saida.registros.len(),
            ignorados: saida.ignorados,
            total_processados: saida.total_processados,
            warnings: saida.warnings,
            duracao_ms: saida.duracao_ms,
        };

        info!(
            antes = self.registros.len(),
            depois = resumo.aceitos,
            ignorados = resumo.ignorados,
            "conjunto canônico substituído"
        );
        self.registros = saida.registros;
        self.carregado = true;
        Ok(resumo)
    }
}
