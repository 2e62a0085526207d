//! Error types for the camera console.
//!
//! Defines the main error enum used throughout the crate. Handler-level
//! variants also know how to render themselves as console text.

use thiserror::Error;

/// Main error type for console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// A quote was opened on the command line and never closed.
    #[error("Unterminated {quote} quote in command line")]
    TokenizeMalformed { quote: char },

    /// A command was invoked without a value it needs.
    #[error("Missing {argument} value for {command}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// A value parsed correctly but lies outside the accepted range.
    #[error("Invalid {argument} value {value} for {command}")]
    DomainInvalid {
        command: &'static str,
        argument: &'static str,
        value: u32,
    },

    /// The camera rejected a configuration after all retries.
    #[error("Device configuration error: {0}")]
    DeviceConfig(String),

    /// The camera could not produce a frame.
    #[error("Capture error: {0}")]
    Capture(String),

    /// A frame buffer could not be allocated.
    #[error("Frame buffer of {requested} bytes exceeds the {limit} byte budget")]
    ResourceExhaustion { requested: usize, limit: usize },

    /// A command grammar failed its consistency check.
    #[error("Grammar error: {0}")]
    Grammar(String),

    /// Configuration errors (invalid config file, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Host-side protocol errors (short frames, unparseable replies, etc.)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Transport errors on the byte stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Creates a device configuration error with the given message.
    pub fn device_config(msg: impl Into<String>) -> Self {
        Self::DeviceConfig(msg.into())
    }

    /// Creates a capture error with the given message.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Creates a grammar error with the given message.
    pub fn grammar(msg: impl Into<String>) -> Self {
        Self::Grammar(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a protocol error with the given message.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::TokenizeMalformed { .. } => "Tokenize Error",
            Self::MissingArgument { .. } | Self::DomainInvalid { .. } => "Argument Error",
            Self::DeviceConfig(_) => "Device Error",
            Self::Capture(_) | Self::ResourceExhaustion { .. } => "Capture Error",
            Self::Grammar(_) => "Grammar Error",
            Self::Config(_) => "Configuration Error",
            Self::Protocol(_) => "Protocol Error",
            Self::Io(_) => "I/O Error",
        }
    }

    /// Returns true if the error should be shown to the console user and the
    /// session should carry on.
    ///
    /// Transport failures are the only errors that end a dispatch cycle
    /// abnormally.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    /// Renders the text sent back over the console for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::TokenizeMalformed { .. } => {
                "Unterminated quote in command line, check the syntax and try again.".to_string()
            }
            Self::MissingArgument { command, argument } => format!(
                "Missing {argument} value, use \"{command} --help\" for more details."
            ),
            Self::DomainInvalid {
                command, argument, ..
            } => format!("Invalid {argument} value, use \"{command} --help\" for more details."),
            Self::DeviceConfig(_) => {
                "Unexpected error, check syntax with the flag \"--help\" and try again.".to_string()
            }
            Self::Capture(_) => "Failed to take photo.".to_string(),
            Self::ResourceExhaustion { requested, .. } => format!(
                "No enough memory for frame buffer, requested: {requested} bytes. \
                 Try to downgrade the camera resolution and format.\nFailed to take photo."
            ),
            other => other.to_string(),
        }
    }
}

/// Result type alias using ConsoleError.
pub type Result<T> = std::result::Result<T, ConsoleError>;
