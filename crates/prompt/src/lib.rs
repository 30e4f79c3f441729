//! Prompt assembly crate for paperchat.
//!
//! Turns retrieved chunk texts and a user question into the prompt string
//! sent to the generation model. Assembly is deterministic and side-effect
//! free.

pub mod assembler;

pub use assembler::{assemble_grounded, assemble_ungrounded};
