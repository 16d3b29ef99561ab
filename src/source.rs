use serde_json::Value;

use crate::error::AppError;

/// Colaborador de obtenção de dados (fetch HTTP, arquivo local, global
/// injetado pelo host). O transporte fica fora do núcleo; o contrato é
/// apenas o payload `{ "registros": [...] }`.
pub trait DataSource {
    fn fetch(&mut self) -> Result<Value, AppError>;
}

/// Fonte fixa em memória: dados injetados pelo host e fixtures de teste.
pub struct StaticSource {
    payload: Value,
}

impl StaticSource {
    pub fn new(payload: Value) -> Self {
        StaticSource { payload }
    }
}

impl DataSource for StaticSource {
    fn fetch(&mut self) -> Result<Value, AppError> {
        Ok(self.payload.clone())
    }
}
