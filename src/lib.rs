//! Núcleo de agregação e propagação de filtros do dashboard de atendimentos.
//!
//! O host (camada de renderização) entrega um payload `{ "registros": [...] }`
//! e interações de filtro; este crate mantém o conjunto canônico de
//! registros, aplica o predicado composto de filtros e difunde KPIs e séries
//! prontas para gráfico a todos os colaboradores inscritos.

pub mod analyzer;
pub mod broadcast;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod parser;
pub mod source;
pub mod store;

pub use analyzer::{agregar, DashboardUpdate, Kpis, PontoDiario, SerieGrafico};
pub use broadcast::{Broadcaster, DashboardObserver, ErrorKind};
pub use config::{Campo, DashboardConfig, DimensaoConfig, DIM_PERIODO};
pub use dashboard::Dashboard;
pub use error::AppError;
pub use filters::{FilterSet, FilterSnapshot, Periodo};
pub use parser::{normalizar_payload, ParseWarning, Registro};
pub use source::{DataSource, StaticSource};
pub use store::{CargaResumo, RecordStore};

/// Inicializa o logging do processo host: formato compacto, nível via
/// `RUST_LOG` (default `info`). Chamar uma única vez na subida.
pub fn init_logging() {
    let filtro = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filtro)
        .compact()
        .init();
}

// ─── E2E Integration Tests ──────────────────────────────────────────────────
