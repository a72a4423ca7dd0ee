//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever talk to domain
//! services, so tests can wire in-memory adapters and stub ports.

use crate::domain::assistant::AssistantService;
use crate::domain::{AccountService, HistoryService};

/// Domain services used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub assistant: AssistantService,
    pub history: HistoryService,
}

impl HttpState {
    pub fn new(
        accounts: AccountService,
        assistant: AssistantService,
        history: HistoryService,
    ) -> Self {
        Self {
            accounts,
            assistant,
            history,
        }
    }
}
