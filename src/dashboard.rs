use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::debug;

use crate::analyzer::{agregar, DashboardUpdate};
use crate::broadcast::{Broadcaster, DashboardObserver, ErrorKind};
use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::filters::{FilterSet, FilterSnapshot};
use crate::source::DataSource;
use crate::store::{CargaResumo, RecordStore};

/// Contexto do dashboard, construído uma única vez na inicialização e
/// passado por referência aos colaboradores; não há estado global.
///
/// Reúne a configuração validada, o Record Store, o conjunto de filtros e o
/// broadcaster, e cuida de duas políticas transversais: a supressão de
/// broadcasts redundantes por fingerprint e a coalescência de refreshes
/// concorrentes (um refresh pedido enquanto outro está em voo é ignorado,
/// não enfileirado).
pub struct Dashboard {
    config: DashboardConfig,
    store: RecordStore,
    filtros: FilterSet,
    broadcaster: Broadcaster,
    atualizacao_pendente: bool,
    ultimo_fingerprint: Option<String>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Self, AppError> {
        config.validate()?;
        let filtros = FilterSet::new(&config);
        Ok(Dashboard {
            config,
            store: RecordStore::new(),
            filtros,
            broadcaster: Broadcaster::new(),
            atualizacao_pendente: false,
            ultimo_fingerprint: None,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn filtros(&self) -> FilterSnapshot {
        self.filtros.snapshot()
    }

    pub fn total_registros(&self) -> usize {
        self.store.total()
    }

    pub fn subscribe(&mut self, nome: impl Into<String>, observer: Box<dyn DashboardObserver>) {
        self.broadcaster.subscribe(nome, observer);
    }

    /// Carga inicial ou substituição integral do conjunto canônico.
    /// Payload malformado preserva o estado anterior e vira uma notificação
    /// de erro no canal dos renderizadores.
    pub fn carregar(&mut self, payload: &Value) -> Result<CargaResumo, AppError> {
        match self.store.substituir(payload, &self.config) {
            Ok(resumo) => {
                self.recomputar_e_publicar();
                Ok(resumo)
            }
            Err(err) => {
                self.broadcaster
                    .publish_error(ErrorKind::DataLoad, &err.to_string());
                Err(err)
            }
        }
    }

    /// Marca o início de um refresh. Retorna `false` quando já existe um em
    /// andamento: o pedido é coalescido, nunca enfileirado.
    pub fn begin_refresh(&mut self) -> bool {
        if self.atualizacao_pendente {
            debug!("refresh coalescido: já existe um em andamento");
            return false;
        }
        self.atualizacao_pendente = true;
        true
    }

    /// Conclui o refresh iniciado por `begin_refresh`: exatamente um publish
    /// por fetch concluído com sucesso; falha de fetch preserva o último
    /// estado bom e notifica os renderizadores.
    pub fn finish_refresh(
        &mut self,
        resultado: Result<Value, AppError>,
    ) -> Result<CargaResumo, AppError> {
        self.atualizacao_pendente = false;
        match resultado {
            Ok(payload) => self.carregar(&payload),
            Err(err) => {
                self.broadcaster
                    .publish_error(ErrorKind::DataLoad, &err.to_string());
                Err(err)
            }
        }
    }

    /// Conveniência para fontes síncronas: begin + fetch + finish.
    /// `Ok(None)` significa pedido coalescido.
    pub fn refresh(
        &mut self,
        source: &mut dyn DataSource,
    ) -> Result<Option<CargaResumo>, AppError> {
        if !self.begin_refresh() {
            return Ok(None);
        }
        let resultado = source.fetch();
        self.finish_refresh(resultado).map(Some)
    }

    /// Alterna um valor categórico. Retorna `true` quando houve recomputação
    /// e broadcast (o fingerprint mudou em relação ao último publicado).
    pub fn toggle_filtro(&mut self, dimensao: &str, valor: &str) -> Result<bool, AppError> {
        self.filtros.toggle(dimensao, valor)?;
        Ok(self.publicar_se_mudou())
    }

    /// Troca o período (granularidade de dia, inclusivo). Rejeição mantém o
    /// período anterior e notifica os renderizadores.
    pub fn set_periodo(&mut self, inicio: NaiveDate, fim: NaiveDate) -> Result<bool, AppError> {
        if let Err(err) = self.filtros.set_period(inicio, fim) {
            self.broadcaster
                .publish_error(ErrorKind::InvalidRange, &err.to_string());
            return Err(err);
        }
        Ok(self.publicar_se_mudou())
    }

    /// Remove os filtros categóricos e reaplica o período padrão.
    pub fn limpar_filtros(&mut self) -> bool {
        self.filtros.clear();
        self.publicar_se_mudou()
    }

    /// Snapshot fresco para um colaborador que se inscreveu depois do último
    /// publish (o broadcaster não faz replay).
    pub fn atual(&self) -> DashboardUpdate {
        agregar(
            self.store.registros(),
            &self.filtros.snapshot(),
            &self.config,
            Utc::now().timestamp_millis(),
        )
    }

    fn publicar_se_mudou(&mut self) -> bool {
        let fingerprint = self.filtros.snapshot().fingerprint();
        if self.ultimo_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            debug!("estado de filtros idêntico ao publicado; broadcast suprimido");
            return false;
        }
        self.recomputar_e_publicar();
        true
    }

    fn recomputar_e_publicar(&mut self) {
        let snapshot = self.filtros.snapshot();
        let fingerprint = snapshot.fingerprint();
        let update = agregar(
            self.store.registros(),
            &snapshot,
            &self.config,
            Utc::now().timestamp_millis(),
        );
        self.broadcaster.publish(&update);
        self.ultimo_fingerprint = Some(fingerprint);
    }
}
