use serde::Serialize;

use crate::config::DashboardConfig;
use crate::parser::types::Registro;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_registros: usize,
    pub total_concluidos: usize,
    pub total_pendentes: usize,
    pub taxa_conclusao: f64,
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// KPIs do conjunto filtrado: total, concluídos, pendentes e taxa de
/// conclusão em porcentagem com uma casa decimal (0.0 quando não há
/// registros).
pub fn calcular_kpis(registros: &[Registro], config: &DashboardConfig) -> Kpis {
    let total = registros.len();
    let concluidos = registros
        .iter()
        .filter(|r| r.status_atendimento == config.status_concluido)
        .count();
    let pendentes = registros
        .iter()
        .filter(|r| r.status_atendimento == config.status_pendente)
        .count();
    let taxa_conclusao = if total == 0 {
        0.0
    } else {
        round1(concluidos as f64 / total as f64 * 100.0)
    };

    Kpis {
        total_registros: total,
        total_concluidos: concluidos,
        total_pendentes: pendentes,
        taxa_conclusao,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(status: &str) -> Registro {
        Registro {
            data_hora: Some(1_710_509_400_000),
            funcionario: "Alice".to_string(),
            cliente: "ACME".to_string(),
            solicitante: "Não informado".to_string(),
            status_atendimento: status.to_string(),
            tipo_atendimento: "Suporte".to_string(),
            sistema: "ERP".to_string(),
            canal_atendimento: "E-mail".to_string(),
            solicitacao_cliente: "Sem relato".to_string(),
            relato_detalhado: "Sem descrição detalhada".to_string(),
            origem_problema: "Não informado".to_string(),
        }
    }

    #[test]
    fn test_kpis_vazio() {
        let kpis = calcular_kpis(&[], &DashboardConfig::default());
        assert_eq!(kpis.total_registros, 0);
        assert_eq!(kpis.total_concluidos, 0);
        assert_eq!(kpis.total_pendentes, 0);
        assert_eq!(kpis.taxa_conclusao, 0.0);
    }

    #[test]
    fn test_kpis_contagem_e_taxa() {
        let registros = vec![
            reg("Concluído"),
            reg("Concluído"),
            reg("Pendente"),
            reg("Em Andamento"),
        ];
        let kpis = calcular_kpis(&registros, &DashboardConfig::default());
        assert_eq!(kpis.total_registros, 4);
        assert_eq!(kpis.total_concluidos, 2);
        assert_eq!(kpis.total_pendentes, 1);
        assert_eq!(kpis.taxa_conclusao, 50.0);
    }

    #[test]
    fn test_taxa_uma_casa_decimal() {
        // 1/3 → 33.333...% → 33.3
        let registros = vec![reg("Concluído"), reg("Pendente"), reg("Cancelado")];
        let kpis = calcular_kpis(&registros, &DashboardConfig::default());
        assert_eq!(kpis.taxa_conclusao, 33.3);
    }

    #[test]
    fn test_concluidos_mais_pendentes_nunca_excede_total() {
        let registros = vec![reg("Concluído"), reg("Pendente"), reg("Cancelado")];
        let kpis = calcular_kpis(&registros, &DashboardConfig::default());
        assert!(kpis.total_concluidos + kpis.total_pendentes <= kpis.total_registros);
    }
}
