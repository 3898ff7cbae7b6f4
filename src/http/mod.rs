//! HTTP API server (thin wrapper over the core)
//!
//! - POST /sessions/start - create a session and begin the call
//! - POST /sessions/:id/stop - end the call, run the post-call hand-off
//! - GET /sessions/:id - observable state
//! - POST /feedback - run one feedback cycle directly (re-scoring)
//! - POST /interviews/generate - one-shot question-set generation
//! - GET /interviews, /interviews/latest, /interviews/:id,
//!   /interviews/:id/feedback - read-side queries
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, SessionDefaults};
