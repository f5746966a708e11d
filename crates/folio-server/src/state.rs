//! Shared state handed to every request handler.

use std::sync::Arc;

use tokio::sync::Mutex;

use folio_core::rate_limit::RequestLimiter;
use folio_gateway::GenerationClient;

use crate::config::RelayConfig;

/// Everything a handler needs, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn GenerationClient>,
    pub limiter: Arc<Mutex<RequestLimiter>>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn GenerationClient>, config: RelayConfig) -> Self {
        let limiter = RequestLimiter::new(config.rate_limit.per_minute, config.rate_limit.per_day);
        Self {
            gateway,
            limiter: Arc::new(Mutex::new(limiter)),
            config: Arc::new(config),
        }
    }
}
