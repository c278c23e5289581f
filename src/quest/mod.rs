//! Quest System
//!
//! Data model, per-session quest pool, and the template catalog backing
//! the mock generator.

pub mod catalog;
pub mod definition;
pub mod pool;

pub use catalog::QuestCatalog;
pub use definition::{Difficulty, Quest, QuestSpec};
pub use pool::QuestPool;
