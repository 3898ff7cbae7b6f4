//! External collaborator interfaces
//!
//! The core never talks to a vendor SDK directly. Each external service is an
//! explicitly constructed, passed-in trait object:
//! - `VoiceProvider` - live call control plus a push stream of call events
//! - `TextGenerator` - free-text and schema-constrained model invocations
//! - `DocumentStore` - the persisted document collections
//!
//! `InMemoryStore` implements `DocumentStore` for local runs and tests.

pub mod generation;
pub mod memory;
pub mod store;
pub mod voice;

pub use generation::{GenerationError, TextGenerator};
pub use memory::InMemoryStore;
pub use store::{Document, DocumentStore, Filter, FilterOp, SortOrder};
pub use voice::{CallEvent, CallMode, StartCallRequest, VoiceProvider};
