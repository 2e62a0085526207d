//! Command line parsing and dispatch.
//!
//! A raw line is split into tokens, matched against the registered grammars
//! in order, and handed to the first handler whose grammar accepts it.

pub mod definitions;
pub mod grammar;
pub mod handlers;
pub mod help;
pub mod output;
pub mod registry;
pub mod tokenizer;

pub use definitions::camera_commands;
pub use grammar::{ArgSpec, BoundArgs, Grammar, Validation};
pub use handlers::{CommandContext, CommandHandler, Invocation};
pub use output::CommandOutput;
pub use registry::{
    Attempt, CommandEntry, DegradedCommand, Dispatch, Registry, RegistryBuilder,
    UNMATCHED_MESSAGE,
};
pub use tokenizer::{tokenize, TokenVector};
