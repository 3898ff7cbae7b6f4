//! Call session management
//!
//! One `CallSession` per live call:
//! - lifecycle state machine (`Idle -> Connecting -> Active -> Finished`)
//! - provider event consumption on a single ordered channel
//! - append-only transcript accumulation
//! - end-of-call hand-off to the feedback pipeline

mod config;
mod session;
mod transcript;

pub use config::SessionConfig;
pub use session::{CallSession, EndOutcome, SessionState};
pub use transcript::{Speaker, TranscriptBuffer, TurnRecord};
