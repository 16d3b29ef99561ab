use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, error};

use crate::analyzer::DashboardUpdate;

/// Notificação de erro recuperável, distinta de uma atualização de dados:
/// o renderizador pode exibir um aviso transitório sem descartar o que já
/// desenhou.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DataLoad,
    InvalidRange,
}

/// Colaborador de renderização: recebe a mesma agregação que todos os outros
/// e redesenha de forma independente.
pub trait DashboardObserver {
    fn on_update(&self, update: &DashboardUpdate);
    fn on_error(&self, kind: ErrorKind, mensagem: &str);
}

/// Canal único entre o Record Store e os renderizadores. Entrega síncrona em
/// ordem de inscrição, sem fila nem replay: quem se inscrever depois de um
/// `publish` deve pedir um snapshot novo ao dashboard.
#[derive(Default)]
pub struct Broadcaster {
    observers: Vec<(String, Box<dyn DashboardObserver>)>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Broadcaster {
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, nome: impl Into<String>, observer: Box<dyn DashboardObserver>) {
        let nome = nome.into();
        debug!(observer = %nome, "colaborador inscrito");
        self.observers.push((nome, observer));
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Entrega a atualização a todos os inscritos. Um colaborador que entra
    /// em pânico é isolado e registrado; os demais continuam recebendo.
    pub fn publish(&self, update: &DashboardUpdate) {
        for (nome, observer) in &self.observers {
            if catch_unwind(AssertUnwindSafe(|| observer.on_update(update))).is_err() {
                error!(observer = %nome, "colaborador falhou ao renderizar a atualização");
            }
        }
    }

    /// Entrega de erro recuperável, com o mesmo isolamento por colaborador.
    pub fn publish_error(&self, kind: ErrorKind, mensagem: &str) {
        for (nome, observer) in &self.observers {
            if catch_unwind(AssertUnwindSafe(|| observer.on_error(kind, mensagem))).is_err() {
                error!(observer = %nome, "colaborador falhou ao tratar o erro");
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
