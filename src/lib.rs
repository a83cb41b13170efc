// Library root - exports for testing

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;
pub mod websocket;

pub use config::Config;
pub use handlers::*;

use std::sync::Arc;

use database::DatabasePool;
use services::chatbot::ChatClient;
use services::rates::RateClient;

// Re-export AppState for tests (matches main.rs)
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabasePool,
    pub config: Arc<Config>,
    pub rates: RateClient,
    pub chat: ChatClient,
    pub broadcast_tx: websocket::BroadcastChannel,
}
