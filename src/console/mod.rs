//! The console session: read a line, dispatch it, repeat.
//!
//! One cycle handles exactly one line. The session ends when the input
//! stream does; everything a user can get wrong is reported on the console
//! and the loop carries on.

mod line;

pub use line::{LineReader, RawLine};

use std::io::{Read, Write};

use tracing::{debug, info, warn};

use crate::camera::CameraDevice;
use crate::commands::output::CommandOutput;
use crate::commands::registry::{Dispatch, Registry};
use crate::commands::{camera_commands, tokenize};
use crate::config::{Config, ConsoleConfig};
use crate::error::{ConsoleError, Result};
use crate::retry::RetryPolicy;

/// Outcome of one dispatch cycle.
#[derive(Debug)]
pub enum Cycle {
    /// The line reached the registry.
    Dispatched(Dispatch),
    /// The line was refused before dispatch.
    Rejected(ConsoleError),
}

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub lines: usize,
    pub invoked: usize,
    pub failed: usize,
    pub unmatched: usize,
    pub rejected: usize,
}

impl SessionStats {
    fn record(&mut self, cycle: &Cycle) {
        self.lines += 1;
        match cycle {
            Cycle::Dispatched(dispatch @ Dispatch::Invoked { .. }) => {
                self.invoked += 1;
                if !dispatch.succeeded() {
                    self.failed += 1;
                }
            }
            Cycle::Dispatched(Dispatch::Unmatched { .. }) => self.unmatched += 1,
            Cycle::Rejected(_) => self.rejected += 1,
        }
    }
}

/// A command console bound to one camera.
pub struct Console<C> {
    registry: Registry,
    camera: C,
    config: ConsoleConfig,
    retry: RetryPolicy,
}

impl<C: CameraDevice> Console<C> {
    /// Creates a console. `retry` governs camera reconfiguration by commands.
    pub fn new(registry: Registry, camera: C, config: ConsoleConfig, retry: RetryPolicy) -> Self {
        Self {
            registry,
            camera,
            config,
            retry,
        }
    }

    /// Creates a console with the built-in command set.
    pub fn from_config(config: &Config, camera: C) -> Self {
        let registry = camera_commands(config.registry.retry_policy()).build();
        Self::new(
            registry,
            camera,
            config.console.clone(),
            config.camera.configure_policy(),
        )
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs one dispatch cycle for a raw line.
    pub fn handle_line(&mut self, raw: &[u8], out: &mut dyn Write) -> Result<Cycle> {
        let tokens = tokenize(raw, self.config.line_width, self.config.inject_placeholder);

        if self.config.reject_unterminated_quotes {
            if let Some(quote) = tokens.unterminated_quote() {
                let err = ConsoleError::TokenizeMalformed { quote };
                warn!("{}: {}", err.category(), err);
                CommandOutput::new(out).line(err.user_message())?;
                return Ok(Cycle::Rejected(err));
            }
        }

        let dispatch = self
            .registry
            .dispatch(&tokens, &mut self.camera, out, self.retry)?;
        Ok(Cycle::Dispatched(dispatch))
    }

    /// Serves lines from `input` until it ends.
    pub fn run<R: Read, W: Write>(&mut self, input: R, mut output: W) -> Result<SessionStats> {
        let mut reader = LineReader::new(input, self.config.lf_terminates);
        let mut line = RawLine::new(self.config.line_width);
        let mut stats = SessionStats::default();

        info!(commands = self.registry.len(), "Console ready");
        while reader.read_line(&mut line)?.is_some() {
            let cycle = self.handle_line(line.as_bytes(), &mut output)?;
            output.flush()?;
            debug!(?cycle, "cycle done");
            stats.record(&cycle);
        }

        info!(
            lines = stats.lines,
            invoked = stats.invoked,
            unmatched = stats.unmatched,
            rejected = stats.rejected,
            "Console input closed"
        );
        Ok(stats)
    }
}
