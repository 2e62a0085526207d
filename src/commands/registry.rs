//! Command registry and dispatcher.
//!
//! The registry is an ordered list of (grammar, handler) entries built once at
//! startup. Dispatch tries each grammar in registration order and invokes the
//! first one that validates with zero errors; later entries are never looked
//! at, even if they would match too.

use std::fmt;
use std::io::Write;

use tracing::{debug, error, info, warn};

use super::grammar::{Grammar, Validation};
use super::handlers::{CommandContext, CommandHandler, Invocation};
use super::output::CommandOutput;
use super::tokenizer::TokenVector;
use crate::camera::CameraDevice;
use crate::error::Result;
use crate::retry::RetryPolicy;

/// Diagnostic printed when no command matches a line.
pub const UNMATCHED_MESSAGE: &str =
    "Invalid command, use the command \"help\" to get a list of commands.";

/// A grammar paired with the handler it dispatches to.
pub struct CommandEntry {
    grammar: Grammar,
    handler: Box<dyn CommandHandler>,
}

impl CommandEntry {
    /// Creates an entry.
    pub fn new(grammar: Grammar, handler: impl CommandHandler + 'static) -> Self {
        Self {
            grammar,
            handler: Box::new(handler),
        }
    }

    /// The entry's grammar.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("grammar", &self.grammar)
            .finish_non_exhaustive()
    }
}

/// A command that never passed its readiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedCommand {
    /// 1-based registration position.
    pub position: usize,
    /// The last consistency error.
    pub reason: String,
}

/// One grammar tried during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub command: &'static str,
    pub errors: usize,
}

/// Result of one dispatch.
#[derive(Debug)]
pub enum Dispatch {
    /// A handler ran. A failed `result` has already been reported on the console.
    Invoked {
        command: &'static str,
        result: Result<()>,
    },
    /// No grammar matched.
    Unmatched { attempts: Vec<Attempt> },
}

impl Dispatch {
    /// The invoked command, if any.
    pub fn command(&self) -> Option<&'static str> {
        match self {
            Self::Invoked { command, .. } => Some(*command),
            Self::Unmatched { .. } => None,
        }
    }

    /// Returns true if a handler ran and succeeded.
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Invoked { result: Ok(()), .. })
    }
}

/// Ordered, read-only command table.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<CommandEntry>,
    degraded: Vec<DegradedCommand>,
}

impl Registry {
    /// Starts building a registry whose readiness checks retry per `policy`.
    pub fn builder(policy: RetryPolicy) -> RegistryBuilder {
        RegistryBuilder {
            factories: Vec::new(),
            policy,
        }
    }

    /// Registered grammars in dispatch order.
    pub fn grammars(&self) -> impl Iterator<Item = &Grammar> + '_ {
        self.entries.iter().map(CommandEntry::grammar)
    }

    /// Commands left out because their grammar never became consistent.
    pub fn degraded(&self) -> &[DegradedCommand] {
        &self.degraded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the first-match search without invoking anything.
    ///
    /// Returns the index of the winning entry and its validation, plus the
    /// attempts that failed before it.
    pub fn find_match(
        &self,
        tokens: &TokenVector,
    ) -> (Option<(usize, Validation)>, Vec<Attempt>) {
        let mut attempts = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let validation = entry.grammar.validate(tokens);
            if validation.is_match() {
                return (Some((index, validation)), attempts);
            }
            debug!(
                command = entry.grammar.keyword(),
                errors = validation.error_count(),
                "grammar rejected line"
            );
            attempts.push(Attempt {
                command: entry.grammar.keyword(),
                errors: validation.error_count(),
            });
        }
        (None, attempts)
    }

    /// Dispatches one tokenized line.
    ///
    /// Handler errors are written to `out` and returned inside
    /// [`Dispatch::Invoked`]; only transport errors come back as `Err`.
    pub fn dispatch(
        &self,
        tokens: &TokenVector,
        camera: &mut dyn CameraDevice,
        out: &mut dyn Write,
        retry: RetryPolicy,
    ) -> Result<Dispatch> {
        let (found, attempts) = self.find_match(tokens);

        let Some((index, validation)) = found else {
            info!(tried = attempts.len(), "no command matched");
            CommandOutput::new(out).line(UNMATCHED_MESSAGE)?;
            return Ok(Dispatch::Unmatched { attempts });
        };

        let entry = &self.entries[index];
        let command = entry.grammar.keyword();
        let call = Invocation {
            grammar: &entry.grammar,
            args: &validation.args,
        };
        let mut ctx = CommandContext {
            out: CommandOutput::new(out),
            camera,
            registry: self,
            retry,
        };

        debug!(command, "invoking handler");
        let result = match entry.handler.run(&call, &mut ctx) {
            Err(e) if !e.is_reportable() => return Err(e),
            other => other,
        };

        if let Err(e) = &result {
            warn!(command, "{}: {}", e.category(), e);
            ctx.out.line(e.user_message())?;
        }

        Ok(Dispatch::Invoked { command, result })
    }
}

type EntryFactory = Box<dyn Fn() -> CommandEntry>;

/// Builds a [`Registry`] from entry factories.
///
/// Each factory is called until the entry's grammar passes its readiness
/// check, or the retry policy gives up. A command that never passes is left
/// out and recorded as degraded; the rest of the registry is unaffected.
pub struct RegistryBuilder {
    factories: Vec<EntryFactory>,
    policy: RetryPolicy,
}

impl RegistryBuilder {
    /// Appends a command. Registration order is dispatch order.
    pub fn register<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> CommandEntry + 'static,
    {
        self.factories.push(Box::new(factory));
        self
    }

    /// Constructs every entry.
    pub fn build(self) -> Registry {
        let total = self.factories.len();
        let mut registry = Registry::default();

        for (i, factory) in self.factories.iter().enumerate() {
            let position = i + 1;
            let built = self.policy.run("command registration", |_| {
                let entry = factory();
                entry.grammar.check().map(|()| entry)
            });

            match built {
                Ok(entry) => {
                    info!(
                        command = entry.grammar.keyword(),
                        "Command {position}/{total} registered successfully"
                    );
                    registry.entries.push(entry);
                }
                Err(e) => {
                    error!("Command {position}/{total} failed register: {e}");
                    registry.degraded.push(DegradedCommand {
                        position,
                        reason: e.to_string(),
                    });
                }
            }
        }

        registry
    }
}
