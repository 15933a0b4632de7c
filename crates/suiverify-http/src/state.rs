use crate::config::HTTPConfig;
use std::sync::Arc;
use suiverify_core::ledger::LedgerClient;
use suiverify_core::Orchestrator;
use suiverify_sui::SuiContext;

/// A shared app state for handlers.
pub struct AppState {
    pub config: HTTPConfig,
    pub orchestrator: Orchestrator,
    /// Ledger client used to submit pre-signed transactions.
    pub ledger: Arc<dyn LedgerClient>,
}

impl AppState {
    pub fn new(
        config: HTTPConfig,
        orchestrator: Orchestrator,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            ledger,
        }
    }

    pub fn from_context(config: HTTPConfig, context: &SuiContext) -> Self {
        Self::new(config, context.orchestrator(), context.ledger())
    }
}
