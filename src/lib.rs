pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

use std::sync::Arc;

use crate::{config::Config, services::reconciliation::ReconciliationService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReconciliationService>,
    pub config: Arc<Config>,
}
