//! Orchestration layer: the Voice Interaction Orchestrator, the Task-Flow
//! Compiler, the Vision Orchestrator, and notification/event ingest. All
//! four operate on the shared [`AppState`] and report failures through
//! [`CoreError`]; the HTTP boundary crate maps those onto status codes.

pub mod error;
pub use error::CoreError;

pub mod state;
pub use state::AppState;

pub mod events;
pub mod heuristics;
pub mod prompts;
pub mod taskflow;
pub mod vision;
pub mod vocabulary;
pub mod voice;

pub type Result<T> = std::result::Result<T, CoreError>;
