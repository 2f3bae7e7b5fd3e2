// src/state.rs

use axum::extract::FromRef;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config, engine::AssessmentEngine, placeholder::PlaceholderClient,
    results::ResultStore, session::SessionManager, store::Store,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub sessions: SessionManager,
    pub engine: AssessmentEngine,
    pub results: ResultStore,
    pub placeholder: PlaceholderClient,

    /// Cancelled on shutdown; every deferred timer selects against it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(store: Store, config: Config, shutdown: CancellationToken) -> Self {
        let sessions = SessionManager::new(store.clone());
        let results = ResultStore::new(store.clone());
        let engine = AssessmentEngine::new(results.clone());
        let placeholder = PlaceholderClient::new(config.placeholder_api_base.clone());

        Self {
            store,
            config,
            sessions,
            engine,
            results,
            placeholder,
            shutdown,
        }
    }
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for AssessmentEngine {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

impl FromRef<AppState> for ResultStore {
    fn from_ref(state: &AppState) -> Self {
        state.results.clone()
    }
}

impl FromRef<AppState> for PlaceholderClient {
    fn from_ref(state: &AppState) -> Self {
        state.placeholder.clone()
    }
}

impl FromRef<AppState> for CancellationToken {
    fn from_ref(state: &AppState) -> Self {
        state.shutdown.clone()
    }
}
