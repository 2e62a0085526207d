//! Declarative definitions of the console commands.
//!
//! Each command is a grammar plus the handler it dispatches to. Registration
//! order is dispatch order, and `help` lists commands in the same order.

use super::grammar::Grammar;
use super::handlers::camera::{
    GetCameraSettingsCommand, SetFormatCommand, SetResolutionCommand, TakePhotoCommand,
};
use super::handlers::system::HelpCommand;
use super::registry::{CommandEntry, Registry, RegistryBuilder};
use crate::retry::RetryPolicy;

/// `help`
pub fn help_grammar() -> Grammar {
    Grammar::command("help").describe("Shows a list of commands.")
}

/// `setResolution [<resolution>] [--help]`
pub fn set_resolution_grammar() -> Grammar {
    Grammar::command("setResolution")
        .optional_int("resolution", "Camera resolution")
        .help_flag()
        .describe("Sets the camera resolution.")
}

/// `setFormat [<format>] [--help]`
pub fn set_format_grammar() -> Grammar {
    Grammar::command("setFormat")
        .optional_int("format", "Camera format")
        .help_flag()
        .describe("Sets the camera format.")
}

/// `getCameraSettings [--help]`
pub fn get_camera_settings_grammar() -> Grammar {
    Grammar::command("getCameraSettings")
        .help_flag()
        .describe("Shows the camera current settings.")
}

/// `takePhoto [--help]`
pub fn take_photo_grammar() -> Grammar {
    Grammar::command("takePhoto")
        .help_flag()
        .describe("Take a photo and send it.")
}

/// Registers the built-in commands in dispatch order.
pub fn camera_commands(policy: RetryPolicy) -> RegistryBuilder {
    Registry::builder(policy)
        .register(|| CommandEntry::new(help_grammar(), HelpCommand))
        .register(|| CommandEntry::new(set_resolution_grammar(), SetResolutionCommand))
        .register(|| CommandEntry::new(set_format_grammar(), SetFormatCommand))
        .register(|| CommandEntry::new(get_camera_settings_grammar(), GetCameraSettingsCommand))
        .register(|| CommandEntry::new(take_photo_grammar(), TakePhotoCommand))
}
