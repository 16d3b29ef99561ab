use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de serialização: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Payload sem o campo 'registros'")]
    MissingRecords,

    #[error("Período inválido: {0}")]
    InvalidRange(String),

    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("Dimensão desconhecida: {0}")]
    UnknownDimension(String),

    #[error("{0}")]
    Custom(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
