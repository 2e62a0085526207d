//! Command handlers.
//!
//! Each handler receives the grammar it matched, the values bound from the
//! line, and a context giving access to the console output and the camera.
//! Handlers report failure by returning an error; the dispatcher turns it into
//! console text.

pub mod camera;
pub mod system;

use super::grammar::{BoundArgs, Grammar};
use super::output::CommandOutput;
use super::registry::Registry;
use crate::camera::CameraDevice;
use crate::error::Result;
use crate::retry::RetryPolicy;

/// Context provided to command handlers.
pub struct CommandContext<'a> {
    /// Console output.
    pub out: CommandOutput<'a>,
    /// The camera driver.
    pub camera: &'a mut dyn CameraDevice,
    /// The registry being dispatched from, for listing commands.
    pub registry: &'a Registry,
    /// Retry policy for camera configuration.
    pub retry: RetryPolicy,
}

/// A matched command line.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// The grammar that matched.
    pub grammar: &'a Grammar,
    /// Values bound by the grammar.
    pub args: &'a BoundArgs,
}

impl Invocation<'_> {
    /// The matched command keyword.
    pub fn command(&self) -> &'static str {
        self.grammar.keyword()
    }
}

/// Trait implemented by every command.
pub trait CommandHandler {
    /// Runs the command.
    fn run(&self, call: &Invocation<'_>, ctx: &mut CommandContext<'_>) -> Result<()>;
}

impl<F> CommandHandler for F
where
    F: Fn(&Invocation<'_>, &mut CommandContext<'_>) -> Result<()>,
{
    fn run(&self, call: &Invocation<'_>, ctx: &mut CommandContext<'_>) -> Result<()> {
        self(call, ctx)
    }
}
