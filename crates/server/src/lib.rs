//! # Prism API Server
//!
//! Axum-based HTTP API for the Prism 360° feedback service.
//!
//! ## Modules
//!
//! - [`dto`]: Request/response data transfer objects
//! - [`events`]: Live feedback updates over server-sent events
//! - [`handlers`]: Endpoint logic, one module per resource
//! - [`middleware`]: Request context resolution
//! - [`router`]: API route configuration
//! - [`store`]: Database-backed [`evaluation::FeedbackStore`]

pub mod dto;
pub mod events;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod store;
pub mod utils;

pub use events::{EventBus, FeedbackEvent};
pub use router::create_app_router;
pub use store::SeaOrmFeedbackStore;

/// Capacity of the feedback event channel; slower subscribers drop events.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Application state shared across request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db:         sea_orm::DbConn,
    /// Feedback change fan-out for SSE subscribers
    pub events:     EventBus,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(db: sea_orm::DbConn) -> Self {
        Self {
            db,
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
            start_time: std::time::Instant::now(),
        }
    }

    /// Feedback store over this state's connection.
    pub fn store(&self) -> SeaOrmFeedbackStore<'_> { SeaOrmFeedbackStore::new(&self.db) }
}

/// Server initialization result
#[derive(Debug)]
pub struct ServerResult {
    /// The address the server is bound to
    pub address:    String,
    /// Server start timestamp for logging
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl ServerResult {
    /// Creates a new server result
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            address:    address.to_string(),
            started_at: chrono::Utc::now(),
        }
    }
}
