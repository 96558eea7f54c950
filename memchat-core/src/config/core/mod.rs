pub mod agent;
pub mod compaction;
pub mod session;

pub use agent::AgentConfig;
pub use compaction::CompactionConfig;
pub use session::{SessionConfig, StoreKind};
