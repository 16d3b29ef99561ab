use std::collections::BTreeMap;

use chrono::{TimeZone, Timelike};
use chrono_tz::Tz;
use serde::Serialize;

use crate::parser::types::Registro;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PontoDiario {
    pub dia: String,
    pub total: usize,
}

/// Contagem por dia-calendário (meia-noite alinhada ao fuso do dashboard),
/// ascendente. Registros sem carimbo legível são excluídos apenas desta
/// série.
pub fn serie_diaria(registros: &[Registro], tz: Tz) -> Vec<PontoDiario> {
    let mut por_dia: BTreeMap<String, usize> = BTreeMap::new();
    for registro in registros {
        if let Some(ms) = registro.data_hora {
            if let Some(dt) = tz.timestamp_millis_opt(ms).single() {
                *por_dia.entry(dt.format("%Y-%m-%d").to_string()).or_default() += 1;
            }
        }
    }
    por_dia
        .into_iter()
        .map(|(dia, total)| PontoDiario { dia, total })
        .collect()
}

/// 24 posições fixas indexadas pela hora local do dashboard.
/// Mesma regra de exclusão de carimbos ilegíveis da série diária.
pub fn serie_horaria(registros: &[Registro], tz: Tz) -> [usize; 24] {
    let mut horas = [0usize; 24];
    for registro in registros {
        if let Some(ms) = registro.data_hora {
            if let Some(dt) = tz.timestamp_millis_opt(ms).single() {
                horas[dt.hour() as usize] += 1;
            }
        }
    }
    horas
}
