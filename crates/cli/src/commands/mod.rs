//! CLI command implementations.

mod ask;
mod chat;

pub use ask::AskCommand;
pub use chat::ChatCommand;
