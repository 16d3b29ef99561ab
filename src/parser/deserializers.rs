use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

const BR_DATETIME_FMT: &str = "%d/%m/%Y %H:%M:%S";
const BR_DATETIME_CURTO_FMT: &str = "%d/%m/%Y %H:%M";
const BR_DATE_FMT: &str = "%d/%m/%Y";

/// Parse de texto de data/hora para epoch-ms no fuso do dashboard.
/// Aceita epoch-ms em dígitos, ISO-8601 com offset, `DD/MM/YYYY[ HH:MM[:SS]]`
/// e os formatos ISO sem offset. Retorna None para texto vazio ou inválido
/// (ex.: "31/02/2024" é rejeitado pelo calendário).
pub fn parse_data_hora_texto(s: &str, tz: Tz) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    // epoch-ms serializado como texto
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse::<i64>().ok();
    }

    // ISO-8601 com offset explícito: o offset do texto prevalece
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis());
    }

    let naive = NaiveDateTime::parse_from_str(trimmed, BR_DATETIME_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, BR_DATETIME_CURTO_FMT))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, BR_DATE_FMT)
                .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    local_para_ms(naive, tz)
}

/// Data/hora local do dashboard → epoch-ms. Horários ambíguos (transição de
/// horário de verão em dados históricos) resolvem para a primeira ocorrência.
pub fn local_para_ms(naive: NaiveDateTime, tz: Tz) -> Option<i64> {
    use chrono::offset::LocalResult;
    use chrono::TimeZone;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.timestamp_millis()),
        LocalResult::Ambiguous(primeira, _) => Some(primeira.timestamp_millis()),
        LocalResult::None => None,
    }
}

/// Campo categórico bruto → valor com sentinela aplicada.
/// Vazio, "nan" e "null" contam como ausente (herdado da planilha de origem).
pub fn normalizar_texto(valor: Option<&str>, valor_default: &str) -> String {
    match valor {
        Some(s) => {
            let t = s.trim();
            if t.is_empty() || t.eq_ignore_ascii_case("nan") || t.eq_ignore_ascii_case("null") {
                valor_default.to_string()
            } else {
                t.to_string()
            }
        }
        None => valor_default.to_string(),
    }
}
