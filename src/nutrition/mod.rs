pub mod aggregate;
mod dto;
pub mod handlers;
pub mod parser;
mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
