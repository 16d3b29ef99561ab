use serde::{Deserialize, Serialize};

/// Valor bruto do carimbo de data/hora. O payload pode trazer epoch-ms
/// numérico ou texto (`DD/MM/YYYY HH:MM:SS`, ISO-8601).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DataHoraBruta {
    Inteiro(i64),
    Decimal(f64),
    Texto(String),
}

/// Um registro como chega no payload `{ "registros": [...] }`, antes da
/// normalização. Todos os campos são opcionais; defaults são aplicados
/// pela pipeline conforme a tabela de dimensões.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistroRaw {
    pub data_hora: Option<DataHoraBruta>,
    pub funcionario: Option<String>,
    pub cliente: Option<String>,
    pub solicitante: Option<String>,
    pub status_atendimento: Option<String>,
    pub tipo_atendimento: Option<String>,
    pub sistema: Option<String>,
    pub canal_atendimento: Option<String>,
    pub solicitacao_cliente: Option<String>,
    pub relato_detalhado: Option<String>,
    pub origem_problema: Option<String>,
}

/// Registro normalizado: carimbo em epoch-ms (`None` quando a data bruta
/// não pôde ser interpretada) e campos categóricos já com sentinelas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registro {
    pub data_hora: Option<i64>,
    pub funcionario: String,
    pub cliente: String,
    pub solicitante: String,
    pub status_atendimento: String,
    pub tipo_atendimento: String,
    pub sistema: String,
    pub canal_atendimento: String,
    pub solicitacao_cliente: String,
    pub relato_detalhado: String,
    pub origem_problema: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseWarning {
    pub indice: usize,
    pub mensagem: String,
}
