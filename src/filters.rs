use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::config::{DashboardConfig, DIM_PERIODO};
use crate::error::AppError;
use crate::parser::deserializers::local_para_ms;

/// Intervalo inclusivo em epoch-ms. O fim é sempre normalizado para
/// 23:59:59.999 do seu dia no fuso do dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Periodo {
    pub inicio: i64,
    pub fim: i64,
}

/// Descrição imutável dos filtros ativos num dado instante, pronta para o
/// agregador e para o cálculo de fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSnapshot {
    pub periodo: Periodo,
    pub dimensoes: BTreeMap<String, Vec<String>>,
}

impl FilterSnapshot {
    /// Serialização determinística: BTreeMap ordena as chaves e cada conjunto
    /// de valores já sai ordenado do `FilterSet`. Estados efetivamente iguais
    /// produzem sempre a mesma string.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// O conjunto de filtros ativos: período obrigatório mais zero ou mais
/// dimensões categóricas. Dimensão com conjunto vazio é removida, de modo
/// que "sem filtro" e "filtro vazio" significam ambos "aceita tudo".
pub struct FilterSet {
    timezone: Tz,
    dimensoes_validas: Vec<String>,
    periodo: Periodo,
    dimensoes: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSet {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::new_at(config, Utc::now())
    }

    pub fn new_at(config: &DashboardConfig, agora: DateTime<Utc>) -> Self {
        FilterSet {
            timezone: config.timezone,
            dimensoes_validas: config.dimensoes.iter().map(|d| d.chave.clone()).collect(),
            periodo: periodo_padrao(config.timezone, agora),
            dimensoes: BTreeMap::new(),
        }
    }

    pub fn periodo(&self) -> Periodo {
        self.periodo
    }

    /// Alterna a presença de `valor` na dimensão categórica. No-op para a
    /// dimensão de período (só muda via `set_period`). Dimensões fora da
    /// tabela configurada são rejeitadas.
    pub fn toggle(&mut self, dimensao: &str, valor: &str) -> Result<(), AppError> {
        if dimensao == DIM_PERIODO {
            debug!("toggle ignorado para a dimensão de período");
            return Ok(());
        }
        if !self.dimensoes_validas.iter().any(|d| d == dimensao) {
            return Err(AppError::UnknownDimension(dimensao.to_string()));
        }

        let valores = self.dimensoes.entry(dimensao.to_string()).or_default();
        if !valores.remove(valor) {
            valores.insert(valor.to_string());
        }
        if valores.is_empty() {
            self.dimensoes.remove(dimensao);
        }
        debug!(dimensao, valor, ativos = self.dimensoes.len(), "filtro alternado");
        Ok(())
    }

    pub fn set_period(&mut self, inicio: NaiveDate, fim: NaiveDate) -> Result<(), AppError> {
        self.set_period_at(inicio, fim, Utc::now())
    }

    /// Valida e aplica o período. Em caso de rejeição o período anterior é
    /// mantido intacto.
    pub fn set_period_at(
        &mut self,
        inicio: NaiveDate,
        fim: NaiveDate,
        agora: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if inicio > fim {
            return Err(AppError::InvalidRange(
                "data inicial não pode ser maior que a data final".to_string(),
            ));
        }
        let hoje = agora.with_timezone(&self.timezone).date_naive();
        if fim > hoje {
            return Err(AppError::InvalidRange(
                "não é possível selecionar datas futuras".to_string(),
            ));
        }
        self.periodo = Periodo {
            inicio: dia_para_ms(inicio, false, self.timezone),
            fim: dia_para_ms(fim, true, self.timezone),
        };
        Ok(())
    }

    /// Remove todas as dimensões categóricas e reaplica o período padrão.
    /// O período nunca fica vazio.
    pub fn clear(&mut self) {
        self.clear_at(Utc::now());
    }

    pub fn clear_at(&mut self, agora: DateTime<Utc>) {
        self.dimensoes.clear();
        self.periodo = periodo_padrao(self.timezone, agora);
        debug!("filtros categóricos limpos, período padrão reaplicado");
    }

    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            periodo: self.periodo,
            dimensoes: self
                .dimensoes
                .iter()
                .map(|(chave, valores)| (chave.clone(), valores.iter().cloned().collect()))
                .collect(),
        }
    }
}

/// Período padrão: o dia corrente no fuso do dashboard.
pub fn periodo_padrao(tz: Tz, agora: DateTime<Utc>) -> Periodo {
    let hoje = agora.with_timezone(&tz).date_naive();
    Periodo {
        inicio: dia_para_ms(hoje, false, tz),
        fim: dia_para_ms(hoje, true, tz),
    }
}

/// Fronteira de um dia-calendário em epoch-ms. Dias cuja meia-noite local não
/// existe (transições históricas de horário de verão) resolvem uma hora à
/// frente.
fn dia_para_ms(dia: NaiveDate, fim_do_dia: bool, tz: Tz) -> i64 {
    let naive: NaiveDateTime = if fim_do_dia {
        dia.and_hms_milli_opt(23, 59, 59, 999).unwrap()
    } else {
        dia.and_hms_opt(0, 0, 0).unwrap()
    };
    local_para_ms(naive, tz)
        .or_else(|| local_para_ms(naive + Duration::hours(1), tz))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).timestamp_millis())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    fn agora() -> DateTime<Utc> {
        // 2024-03-15 15:00:00 UTC = 12:00 em São Paulo
        Utc.with_ymd_and_hms(2024, 3, 15, 15, 0, 0).unwrap()
    }

    fn filtros() -> FilterSet {
        FilterSet::new_at(&DashboardConfig::default(), agora())
    }

    fn dia(ano: i32, mes: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, d).unwrap()
    }

    #[test]
    fn test_periodo_padrao_cobre_o_dia_corrente() {
        let f = filtros();
        let p = f.periodo();
        // dia completo: 24h menos 1ms
        assert_eq!(p.fim - p.inicio, 86_399_999);
        // meia-noite de 15/03/2024 em São Paulo = 03:00 UTC
        assert_eq!(p.inicio, 1_710_471_600_000);
    }

    #[test]
    fn test_toggle_adiciona_e_remove() {
        let mut f = filtros();
        f.toggle("status", "Concluído").unwrap();
        assert_eq!(
            f.snapshot().dimensoes.get("status"),
            Some(&vec!["Concluído".to_string()])
        );

        f.toggle("status", "Pendente").unwrap();
        assert_eq!(f.snapshot().dimensoes["status"].len(), 2);

        f.toggle("status", "Concluído").unwrap();
        f.toggle("status", "Pendente").unwrap();
        // conjunto esvaziado → dimensão some do snapshot
        assert!(f.snapshot().dimensoes.is_empty());
    }

    #[test]
    fn test_toggle_periodo_e_noop() {
        let mut f = filtros();
        let antes = f.snapshot();
        f.toggle(DIM_PERIODO, "qualquer").unwrap();
        assert_eq!(f.snapshot(), antes);
    }

    #[test]
    fn test_toggle_dimensao_desconhecida() {
        let mut f = filtros();
        match f.toggle("prioridade", "Alta") {
            Err(AppError::UnknownDimension(d)) => assert_eq!(d, "prioridade"),
            other => panic!("Esperava UnknownDimension, obteve {:?}", other),
        }
    }

    #[test]
    fn test_set_period_normaliza_fim_do_dia() {
        let mut f = filtros();
        f.set_period_at(dia(2024, 3, 1), dia(2024, 3, 10), agora())
            .unwrap();
        let p = f.periodo();
        // 10 dias corridos: do início de 01/03 ao fim de 10/03
        assert_eq!(p.fim - p.inicio, 10 * 86_400_000 - 1);
    }

    #[test]
    fn test_set_period_rejeita_inicio_depois_do_fim() {
        let mut f = filtros();
        let antes = f.periodo();
        let err = f
            .set_period_at(dia(2024, 3, 10), dia(2024, 3, 1), agora())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));
        assert_eq!(f.periodo(), antes);
    }

    #[test]
    fn test_set_period_rejeita_data_futura() {
        let mut f = filtros();
        let antes = f.periodo();
        let err = f
            .set_period_at(dia(2024, 3, 1), dia(2024, 3, 16), agora())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));
        assert_eq!(f.periodo(), antes);
    }

    #[test]
    fn test_set_period_aceita_o_dia_de_hoje() {
        let mut f = filtros();
        assert!(f.set_period_at(dia(2024, 3, 15), dia(2024, 3, 15), agora()).is_ok());
    }

    #[test]
    fn test_clear_remove_categoricos_e_restaura_periodo() {
        let mut f = filtros();
        f.toggle("status", "Concluído").unwrap();
        f.toggle("cliente", "ACME").unwrap();
        f.set_period_at(dia(2024, 3, 1), dia(2024, 3, 10), agora())
            .unwrap();

        f.clear_at(agora());
        let snap = f.snapshot();
        assert!(snap.dimensoes.is_empty());
        assert_eq!(snap.periodo, periodo_padrao(chrono_tz::America::Sao_Paulo, agora()));
    }

    #[test]
    fn test_fingerprint_deterministico_e_ordenado() {
        let mut a = filtros();
        a.toggle("status", "Concluído").unwrap();
        a.toggle("cliente", "ACME").unwrap();

        let mut b = filtros();
        b.toggle("cliente", "ACME").unwrap();
        b.toggle("status", "Concluído").unwrap();

        // ordem de aplicação não muda a identidade
        assert_eq!(a.snapshot().fingerprint(), b.snapshot().fingerprint());
    }

    #[test]
    fn test_fingerprint_distingue_estados() {
        let mut f = filtros();
        let vazio = f.snapshot().fingerprint();
        f.toggle("status", "Concluído").unwrap();
        let com_status = f.snapshot().fingerprint();
        assert_ne!(vazio, com_status);

        // desfaz → volta à identidade anterior
        f.toggle("status", "Concluído").unwrap();
        assert_eq!(f.snapshot().fingerprint(), vazio);
    }
}
