//! Camera command handlers (setResolution, setFormat, getCameraSettings, takePhoto).
//!
//! Range checks live here, not in the grammar: the grammar only guarantees
//! that a value is an unsigned integer.

use tracing::info;

use super::{CommandContext, CommandHandler, Invocation};
use crate::camera::{PixelFormat, Resolution};
use crate::commands::help::usage;
use crate::error::{ConsoleError, Result};

/// Prints the command's usage and returns true if `--help` was given.
fn print_help(
    call: &Invocation<'_>,
    ctx: &mut CommandContext<'_>,
    details: &[String],
) -> Result<bool> {
    if !call.args.wants_help() {
        return Ok(false);
    }
    ctx.out.lines(usage(call.grammar, details))?;
    Ok(true)
}

fn resolution_details() -> Vec<String> {
    let mut lines = vec!["<resolution> is a unsigned integer with possible values:".to_string()];
    lines.extend(
        Resolution::ALL
            .iter()
            .enumerate()
            .map(|(i, r)| format!("\t{i} -> {r}.")),
    );
    lines
}

fn format_details() -> Vec<String> {
    let mut lines = vec!["<format> is a unsigned integer with possible values:".to_string()];
    lines.extend(
        PixelFormat::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| format!("\t{i} -> {f}.")),
    );
    lines
}

/// `setResolution <resolution>`
#[derive(Debug, Clone, Copy, Default)]
pub struct SetResolutionCommand;

impl CommandHandler for SetResolutionCommand {
    fn run(&self, call: &Invocation<'_>, ctx: &mut CommandContext<'_>) -> Result<()> {
        if print_help(call, ctx, &resolution_details())? {
            return Ok(());
        }

        let argument = "<resolution>";
        let value = call
            .args
            .int("resolution")
            .ok_or(ConsoleError::MissingArgument {
                command: call.command(),
                argument,
            })?;
        let resolution = Resolution::from_index(value).ok_or(ConsoleError::DomainInvalid {
            command: call.command(),
            argument,
            value,
        })?;

        ctx.out
            .line(format!("Configuring camera resolution to: {resolution}."))?;
        let settings = ctx.camera.settings().with_resolution(resolution);
        ctx.camera.configure(settings, &ctx.retry)?;

        info!("Resolution set to {resolution}");
        ctx.out.line("Camera resolution applied correctly.")?;
        Ok(())
    }
}

/// `setFormat <format>`
#[derive(Debug, Clone, Copy, Default)]
pub struct SetFormatCommand;

impl CommandHandler for SetFormatCommand {
    fn run(&self, call: &Invocation<'_>, ctx: &mut CommandContext<'_>) -> Result<()> {
        if print_help(call, ctx, &format_details())? {
            return Ok(());
        }

        let argument = "<format>";
        let value = call
            .args
            .int("format")
            .ok_or(ConsoleError::MissingArgument {
                command: call.command(),
                argument,
            })?;
        let format = PixelFormat::from_index(value).ok_or(ConsoleError::DomainInvalid {
            command: call.command(),
            argument,
            value,
        })?;

        ctx.out
            .line(format!("Configuring camera format to: {format}."))?;
        let settings = ctx.camera.settings().with_format(format);
        ctx.camera.configure(settings, &ctx.retry)?;

        info!(driver_code = format.driver_code(), "Format set to {format}");
        ctx.out.line("Camera format applied correctly.")?;
        Ok(())
    }
}

/// `getCameraSettings`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCameraSettingsCommand;

impl CommandHandler for GetCameraSettingsCommand {
    fn run(&self, call: &Invocation<'_>, ctx: &mut CommandContext<'_>) -> Result<()> {
        if print_help(call, ctx, &[])? {
            return Ok(());
        }
        let report = ctx.camera.settings().report();
        ctx.out.lines(report)?;
        Ok(())
    }
}

/// `takePhoto`
///
/// Sends the raw frame followed by CRLF. The frame length is implied by the
/// current resolution and format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakePhotoCommand;

impl CommandHandler for TakePhotoCommand {
    fn run(&self, call: &Invocation<'_>, ctx: &mut CommandContext<'_>) -> Result<()> {
        if print_help(call, ctx, &[])? {
            return Ok(());
        }

        let frame = ctx.camera.capture()?;
        info!(bytes = frame.len(), "Sending frame");
        ctx.out.payload(&frame.data)?;
        Ok(())
    }
}
