//! Command-line argument parsing for camconsole.

use cam_console::logging::{self, LogTarget};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Text command console for a camera sensor, plus a host-side client.
#[derive(Parser, Debug)]
#[command(name = "camconsole")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to a file instead of stderr (default location if no PATH)
    #[arg(long, value_name = "PATH", global = true, num_args = 0..=1)]
    pub log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the console
    Serve(ServeArgs),

    /// Talk to a running console over TCP
    Client(ClientArgs),
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct ServeArgs {
    /// Serve on stdin/stdout
    #[arg(long, conflicts_with = "listen")]
    pub stdio: bool,

    /// Listen address (overrides config)
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct ClientArgs {
    /// Console address
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:7070")]
    pub addr: String,

    /// Seconds of silence that end a text reply
    #[arg(long, value_name = "SECS", default_value = "3")]
    pub timeout: u64,

    #[command(subcommand)]
    pub action: ClientAction,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ClientAction {
    /// Send one command line and print the reply
    Send {
        /// The command line
        line: String,
    },

    /// Print the camera resolution and format
    Settings,

    /// Take a photo and save it as a PPM image
    Photo {
        /// Output file
        #[arg(long, short, value_name = "PATH")]
        output: PathBuf,

        /// Do not swap the two low bits of each byte
        #[arg(long)]
        no_bit_shuffle: bool,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(cam_console::config::Config::default_path)
    }

    /// Returns where logs should go.
    pub fn log_target(&self) -> LogTarget {
        match &self.log_file {
            None => LogTarget::Stderr,
            Some(None) => LogTarget::File(logging::default_log_path()),
            Some(Some(path)) => LogTarget::File(path.clone()),
        }
    }
}
