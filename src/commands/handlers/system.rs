//! The `help` command.

use super::{CommandContext, CommandHandler, Invocation};
use crate::commands::help::command_list;
use crate::error::Result;

/// Lists every registered command with its syntax and description.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpCommand;

impl CommandHandler for HelpCommand {
    fn run(&self, _call: &Invocation<'_>, ctx: &mut CommandContext<'_>) -> Result<()> {
        let lines = command_list(ctx.registry.grammars());
        ctx.out.lines(lines)?;
        Ok(())
    }
}
