use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::parser::types::Registro;

/// Chave reservada para o filtro de período (sempre presente, nunca categórico).
pub const DIM_PERIODO: &str = "period";

/// Campo de um `Registro` endereçável pela tabela de dimensões.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Campo {
    Funcionario,
    Cliente,
    Solicitante,
    StatusAtendimento,
    TipoAtendimento,
    Sistema,
    CanalAtendimento,
    SolicitacaoCliente,
    RelatoDetalhado,
    OrigemProblema,
}

impl Campo {
    pub fn valor<'a>(&self, registro: &'a Registro) -> &'a str {
        match self {
            Campo::Funcionario => &registro.funcionario,
            Campo::Cliente => &registro.cliente,
            Campo::Solicitante => &registro.solicitante,
            Campo::StatusAtendimento => &registro.status_atendimento,
            Campo::TipoAtendimento => &registro.tipo_atendimento,
            Campo::Sistema => &registro.sistema,
            Campo::CanalAtendimento => &registro.canal_atendimento,
            Campo::SolicitacaoCliente => &registro.solicitacao_cliente,
            Campo::RelatoDetalhado => &registro.relato_detalhado,
            Campo::OrigemProblema => &registro.origem_problema,
        }
    }
}

/// Uma dimensão categórica: chave pública do filtro, campo mapeado,
/// valor default aplicado na normalização e flag de presença nos gráficos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensaoConfig {
    pub chave: String,
    pub campo: Campo,
    pub valor_default: String,
    pub grafico: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub timezone: Tz,
    pub status_concluido: String,
    pub status_pendente: String,
    pub dimensoes: Vec<DimensaoConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        fn dim(chave: &str, campo: Campo, valor_default: &str, grafico: bool) -> DimensaoConfig {
            DimensaoConfig {
                chave: chave.to_string(),
                campo,
                valor_default: valor_default.to_string(),
                grafico,
            }
        }

        DashboardConfig {
            timezone: chrono_tz::America::Sao_Paulo,
            status_concluido: "Concluído".to_string(),
            status_pendente: "Pendente".to_string(),
            dimensoes: vec![
                dim("status", Campo::StatusAtendimento, "Pendente", true),
                dim("tipo", Campo::TipoAtendimento, "Não categorizado", true),
                dim("funcionario", Campo::Funcionario, "Não informado", true),
                dim("cliente", Campo::Cliente, "Não informado", true),
                dim("sistema", Campo::Sistema, "Não especificado", true),
                dim("canal", Campo::CanalAtendimento, "Não especificado", true),
                dim("solicitante", Campo::Solicitante, "Não informado", false),
                dim("solicitacao", Campo::SolicitacaoCliente, "Sem relato", false),
                dim("relato", Campo::RelatoDetalhado, "Sem descrição detalhada", false),
                dim("origemProblema", Campo::OrigemProblema, "Não informado", false),
            ],
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Valida a tabela de dimensões uma única vez, na inicialização.
    /// Depois disso o lookup por chave é infalível para dimensões conhecidas.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.dimensoes.is_empty() {
            return Err(AppError::InvalidConfig(
                "nenhuma dimensão configurada".to_string(),
            ));
        }
        let mut vistas: Vec<&str> = Vec::new();
        for dim in &self.dimensoes {
            if dim.chave.trim().is_empty() {
                return Err(AppError::InvalidConfig(
                    "dimensão com chave vazia".to_string(),
                ));
            }
            if dim.chave == DIM_PERIODO {
                return Err(AppError::InvalidConfig(format!(
                    "a chave '{}' é reservada ao filtro de período",
                    DIM_PERIODO
                )));
            }
            if vistas.contains(&dim.chave.as_str()) {
                return Err(AppError::InvalidConfig(format!(
                    "dimensão duplicada: {}",
                    dim.chave
                )));
            }
            vistas.push(&dim.chave);
        }
        if !self.dimensoes.iter().any(|d| d.grafico) {
            return Err(AppError::InvalidConfig(
                "nenhuma dimensão marcada para gráficos".to_string(),
            ));
        }
        Ok(())
    }

    pub fn dimensao(&self, chave: &str) -> Option<&DimensaoConfig> {
        self.dimensoes.iter().find(|d| d.chave == chave)
    }

    pub fn dimensoes_grafico(&self) -> impl Iterator<Item = &DimensaoConfig> {
        self.dimensoes.iter().filter(|d| d.grafico)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timezone, chrono_tz::America::Sao_Paulo);
        assert_eq!(config.status_concluido, "Concluído");
        assert_eq!(config.dimensoes_grafico().count(), 6);
    }

    #[test]
    fn test_lookup_by_chave() {
        let config = DashboardConfig::default();
        let dim = config.dimensao("canal").unwrap();
        assert_eq!(dim.campo, Campo::CanalAtendimento);
        assert_eq!(dim.valor_default, "Não especificado");
        assert!(config.dimensao("inexistente").is_none());
    }

    #[test]
    fn test_duplicate_dimension_rejected() {
        let mut config = DashboardConfig::default();
        let clone = config.dimensoes[0].clone();
        config.dimensoes.push(clone);
        match config.validate() {
            Err(AppError::InvalidConfig(msg)) => assert!(msg.contains("duplicada")),
            other => panic!("Esperava InvalidConfig, obteve {:?}", other),
        }
    }

    #[test]
    fn test_period_key_reserved() {
        let mut config = DashboardConfig::default();
        config.dimensoes[0].chave = DIM_PERIODO.to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_roundtrip() {
        let config = DashboardConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let reparsed = DashboardConfig::from_json(&json).unwrap();
        assert_eq!(reparsed.dimensoes.len(), config.dimensoes.len());
        assert_eq!(reparsed.timezone, config.timezone);
    }
}
