//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use ancient_eats_core::catalog::Catalog;
use ancient_eats_core::ports::{ImageGenerator, PaymentService};
use ancient_eats_core::session::Session;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The shared application state, created once at startup and passed to all
/// handlers. The session is the single process-wide holder of the current
/// user and purchase history; handlers take the write lock for mutations so
/// each operation runs as one critical section.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub session: Arc<RwLock<Session>>,
    pub payments: Arc<dyn PaymentService>,
    pub images: Arc<dyn ImageGenerator>,
    pub config: Arc<Config>,
}
