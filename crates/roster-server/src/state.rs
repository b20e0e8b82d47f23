use roster_core::Roster;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<Roster>,
    /// Messages authored by this id are the bot's own and get no reply.
    pub bot_id: Option<String>,
}

impl AppState {
    pub fn new(roster: Arc<Roster>, bot_id: Option<String>) -> Self {
        Self { roster, bot_id }
    }

    pub fn is_own_message(&self, author: Option<&str>) -> bool {
        matches!((self.bot_id.as_deref(), author), (Some(bot), Some(a)) if bot == a)
    }
}
