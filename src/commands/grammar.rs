//! Declarative command grammars and argument validation.
//!
//! A grammar is an ordered list of argument specifications: a literal command
//! keyword first, then optional or required unsigned integer positionals, and
//! boolean `--flag` options. Validation only checks the *shape* of a token
//! vector; range checks belong to the command handlers.

use std::collections::HashSet;
use std::fmt;

use super::tokenizer::TokenVector;
use crate::error::{ConsoleError, Result};

/// One element of a command grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSpec {
    /// The command keyword, matched case-insensitively. Exactly one occurrence.
    Literal { keyword: &'static str },
    /// An unsigned integer positional, zero or one occurrence.
    Int {
        name: &'static str,
        glossary: &'static str,
        required: bool,
    },
    /// A boolean `--name` option, zero or one occurrence.
    Flag {
        name: &'static str,
        glossary: &'static str,
    },
}

impl ArgSpec {
    /// Returns the placeholder shown in usage text, e.g. `<resolution>`.
    pub fn datatype(&self) -> String {
        match self {
            Self::Literal { keyword } => (*keyword).to_string(),
            Self::Int { name, .. } => format!("<{name}>"),
            Self::Flag { name, .. } => format!("--{name}"),
        }
    }

    /// Returns the glossary line text, if this argument is documented.
    pub fn glossary(&self) -> Option<&'static str> {
        match self {
            Self::Literal { .. } => None,
            Self::Int { glossary, .. } | Self::Flag { glossary, .. } => Some(*glossary),
        }
    }

    fn is_positional(&self) -> bool {
        !matches!(self, Self::Flag { .. })
    }
}

/// A single reason a token vector does not fit a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// The line has no tokens to match the keyword against.
    MissingKeyword,
    /// The first token is a different command.
    KeywordMismatch { found: String },
    /// A required positional was absent.
    MissingArgument { name: &'static str },
    /// A positional integer did not parse.
    NotANumber { name: &'static str, token: String },
    /// More positionals than the grammar declares.
    UnexpectedArgument { token: String },
    /// An option the grammar does not declare.
    UnknownOption { token: String },
    /// A flag given more than once.
    DuplicateOption { name: &'static str },
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKeyword => write!(f, "missing command"),
            Self::KeywordMismatch { found } => write!(f, "unexpected command \"{found}\""),
            Self::MissingArgument { name } => write!(f, "missing <{name}>"),
            Self::NotANumber { name, token } => {
                write!(f, "invalid argument \"{token}\" to <{name}>")
            }
            Self::UnexpectedArgument { token } => write!(f, "unexpected argument \"{token}\""),
            Self::UnknownOption { token } => write!(f, "invalid option \"{token}\""),
            Self::DuplicateOption { name } => write!(f, "option \"--{name}\" given twice"),
        }
    }
}

/// A value bound from the token vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Int(u32),
    Flag,
}

/// Values copied out of a successful (or partial) validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs {
    values: Vec<(&'static str, Bound)>,
}

impl BoundArgs {
    fn bind(&mut self, name: &'static str, value: Bound) {
        self.values.push((name, value));
    }

    /// Returns the integer bound to `name`.
    pub fn int(&self, name: &str) -> Option<u32> {
        self.values.iter().find_map(|(n, v)| match v {
            Bound::Int(i) if *n == name => Some(*i),
            _ => None,
        })
    }

    /// Returns true if the flag `name` was present.
    pub fn flag(&self, name: &str) -> bool {
        self.values
            .iter()
            .any(|(n, v)| *n == name && matches!(v, Bound::Flag))
    }

    /// Returns true if the `--help` flag was present.
    pub fn wants_help(&self) -> bool {
        self.flag("help")
    }
}

/// Outcome of validating a token vector against one grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Bound values.
    pub args: BoundArgs,
    /// Recorded issues, at most the grammar's error budget.
    pub issues: Vec<ParseIssue>,
}

impl Validation {
    /// Number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.issues.len()
    }

    /// A grammar matches only with zero errors.
    pub fn is_match(&self) -> bool {
        self.issues.is_empty()
    }
}

/// The declarative shape of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    specs: Vec<ArgSpec>,
    description: &'static str,
    max_errors: usize,
}

impl Grammar {
    /// Starts a grammar for the given command keyword.
    pub fn command(keyword: &'static str) -> Self {
        Self {
            specs: vec![ArgSpec::Literal { keyword }],
            description: "",
            max_errors: 1,
        }
    }

    /// Builds a grammar from raw specs, e.g. when the table comes from
    /// somewhere other than the builder. Run [`Grammar::check`] before use.
    pub fn from_specs(specs: Vec<ArgSpec>, description: &'static str) -> Self {
        let max_errors = specs.len().max(1);
        Self {
            specs,
            description,
            max_errors,
        }
    }

    /// Adds an optional unsigned integer positional.
    pub fn optional_int(self, name: &'static str, glossary: &'static str) -> Self {
        self.with_spec(ArgSpec::Int {
            name,
            glossary,
            required: false,
        })
    }

    /// Adds a required unsigned integer positional.
    pub fn required_int(self, name: &'static str, glossary: &'static str) -> Self {
        self.with_spec(ArgSpec::Int {
            name,
            glossary,
            required: true,
        })
    }

    /// Adds a boolean `--name` flag.
    pub fn flag(self, name: &'static str, glossary: &'static str) -> Self {
        self.with_spec(ArgSpec::Flag { name, glossary })
    }

    /// Adds the conventional `--help` flag.
    pub fn help_flag(self) -> Self {
        self.flag("help", "Show help")
    }

    /// Sets the one-line description shown by `help`.
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Overrides the error budget (the terminator's capacity).
    pub fn max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    fn with_spec(mut self, spec: ArgSpec) -> Self {
        self.specs.push(spec);
        // One error slot per spec, as the terminator is sized by default.
        self.max_errors = self.specs.len();
        self
    }

    /// The command keyword.
    pub fn keyword(&self) -> &'static str {
        match self.specs.first() {
            Some(ArgSpec::Literal { keyword }) => *keyword,
            _ => "",
        }
    }

    /// The one-line description.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// All argument specifications, keyword first.
    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    /// Readiness check run at registration time.
    pub fn check(&self) -> Result<()> {
        let keyword = match self.specs.first() {
            Some(ArgSpec::Literal { keyword }) => *keyword,
            _ => {
                return Err(ConsoleError::grammar(
                    "first specification must be the command keyword",
                ))
            }
        };

        if keyword.is_empty() || keyword.contains(' ') || keyword.starts_with('-') {
            return Err(ConsoleError::grammar(format!(
                "invalid command keyword \"{keyword}\""
            )));
        }

        if self.max_errors == 0 {
            return Err(ConsoleError::grammar(format!(
                "{keyword}: error budget must be at least one"
            )));
        }

        let mut names = HashSet::new();
        let mut seen_optional = false;
        for spec in &self.specs[1..] {
            match spec {
                ArgSpec::Literal { keyword: extra } => {
                    return Err(ConsoleError::grammar(format!(
                        "{keyword}: second keyword \"{extra}\""
                    )));
                }
                ArgSpec::Int { name, required, .. } => {
                    if *required && seen_optional {
                        return Err(ConsoleError::grammar(format!(
                            "{keyword}: required <{name}> follows an optional argument"
                        )));
                    }
                    seen_optional |= !required;
                    if name.is_empty() || !names.insert(*name) {
                        return Err(ConsoleError::grammar(format!(
                            "{keyword}: duplicate or empty argument name \"{name}\""
                        )));
                    }
                }
                ArgSpec::Flag { name, .. } => {
                    if name.is_empty() || name.starts_with('-') || name.contains(' ') {
                        return Err(ConsoleError::grammar(format!(
                            "{keyword}: invalid flag name \"{name}\""
                        )));
                    }
                    if !names.insert(*name) {
                        return Err(ConsoleError::grammar(format!(
                            "{keyword}: duplicate argument name \"{name}\""
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Validates a token vector against this grammar.
    ///
    /// The placeholder token, when present, is skipped. The keyword is checked
    /// first and a mismatch rejects the command immediately with one error.
    pub fn validate(&self, tokens: &TokenVector) -> Validation {
        let mut args = BoundArgs::default();
        let mut issues = Vec::new();

        let mut positionals = self.specs.iter().filter(|s| s.is_positional());
        let mut line = tokens.args();

        // Position 0 is always the keyword.
        match line.next() {
            None => {
                issues.push(ParseIssue::MissingKeyword);
                return Validation { args, issues };
            }
            Some(first) if !first.eq_ignore_ascii_case(self.keyword()) => {
                issues.push(ParseIssue::KeywordMismatch {
                    found: first.to_string(),
                });
                return Validation { args, issues };
            }
            Some(_) => {
                positionals.next();
            }
        }

        for token in line {
            if is_option(token) {
                // Flags are long-only; a single-dash spelling is unknown.
                match token.strip_prefix("--").and_then(|long| self.find_flag(long)) {
                    Some(name) if args.flag(name) => {
                        issues.push(ParseIssue::DuplicateOption { name });
                    }
                    Some(name) => args.bind(name, Bound::Flag),
                    None => issues.push(ParseIssue::UnknownOption {
                        token: token.to_string(),
                    }),
                }
                continue;
            }

            match positionals.next() {
                Some(ArgSpec::Int { name, .. }) => match parse_unsigned(token) {
                    Some(value) => args.bind(*name, Bound::Int(value)),
                    None => issues.push(ParseIssue::NotANumber {
                        name: *name,
                        token: token.to_string(),
                    }),
                },
                _ => issues.push(ParseIssue::UnexpectedArgument {
                    token: token.to_string(),
                }),
            }
        }

        for spec in positionals {
            if let ArgSpec::Int {
                name,
                required: true,
                ..
            } = spec
            {
                issues.push(ParseIssue::MissingArgument { name: *name });
            }
        }

        issues.truncate(self.max_errors);
        Validation { args, issues }
    }

    fn find_flag(&self, option: &str) -> Option<&'static str> {
        self.specs.iter().find_map(|spec| match spec {
            ArgSpec::Flag { name, .. } if *name == option => Some(*name),
            _ => None,
        })
    }
}

/// Whether `token` is an option (`--name` or `-x`). A lone `-` is positional.
fn is_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Parses an unsigned integer in decimal, or with a `0x`, `0o` or `0b` prefix.
pub fn parse_unsigned(token: &str) -> Option<u32> {
    let lower = token.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else {
        (lower.as_str(), 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
