use std::sync::Arc;

use crate::engine::TournamentEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TournamentEngine>,
}
