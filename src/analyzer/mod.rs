//! Agregação pura do dashboard: `(registros, snapshot) -> DashboardUpdate`.
//! Nenhuma função deste módulo retém estado entre chamadas; o resultado é
//! sempre reconstruído do zero.

pub mod kpi;
pub mod series;
pub mod temporal;

pub use kpi::{calcular_kpis, Kpis};
pub use series::{aplicar_filtros, serie_por_dimensao, SerieGrafico};
pub use temporal::{serie_diaria, serie_horaria, PontoDiario};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::filters::FilterSnapshot;
use crate::parser::types::Registro;

/// Resultado completo de uma agregação: tudo que os renderizadores precisam
/// para redesenhar. Contém uma cópia defensiva do subconjunto filtrado; o
/// conjunto canônico nunca sai do Record Store.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardUpdate {
    pub registros: Vec<Registro>,
    pub kpis: Kpis,
    pub graficos: BTreeMap<String, SerieGrafico>,
    pub serie_diaria: Vec<PontoDiario>,
    pub serie_horaria: [usize; 24],
    pub ultima_atualizacao: i64,
}

/// Monta o `DashboardUpdate` para um par (registros, snapshot).
/// `computado_em_ms` é o relógio de parede do momento do cálculo, fornecido
/// pelo chamador para manter a agregação determinística.
pub fn agregar(
    registros: &[Registro],
    snapshot: &FilterSnapshot,
    config: &DashboardConfig,
    computado_em_ms: i64,
) -> DashboardUpdate {
    let filtrados = aplicar_filtros(registros, snapshot, config);

    let kpis = calcular_kpis(&filtrados, config);
    let graficos: BTreeMap<String, SerieGrafico> = config
        .dimensoes_grafico()
        .map(|dim| (dim.chave.clone(), serie_por_dimensao(&filtrados, dim)))
        .collect();
    let diaria = serie_diaria(&filtrados, config.timezone);
    let horaria = serie_horaria(&filtrados, config.timezone);

    DashboardUpdate {
        registros: filtrados,
        kpis,
        graficos,
        serie_diaria: diaria,
        serie_horaria: horaria,
        ultima_atualizacao: computado_em_ms,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
