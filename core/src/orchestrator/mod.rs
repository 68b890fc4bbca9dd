//! Conversation turn orchestration

pub mod answer;
pub mod turn;

pub use answer::ComposedAnswer;
pub use turn::Orchestrator;
