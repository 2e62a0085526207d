//! Usage and glossary text generated from command grammars.

use super::grammar::{ArgSpec, Grammar};

/// Renders the one-line syntax of a grammar, e.g.
/// `setResolution [<resolution>] [--help]`.
pub fn syntax(grammar: &Grammar) -> String {
    let mut out = String::from(grammar.keyword());
    for spec in grammar.specs().iter().skip(1) {
        out.push(' ');
        match spec {
            ArgSpec::Int { required: true, .. } => out.push_str(&spec.datatype()),
            _ => {
                out.push('[');
                out.push_str(&spec.datatype());
                out.push(']');
            }
        }
    }
    out
}

/// Renders one glossary line per documented argument.
pub fn glossary(grammar: &Grammar) -> Vec<String> {
    grammar
        .specs()
        .iter()
        .filter_map(|spec| {
            spec.glossary()
                .map(|text| format!("      {:<20} {}", spec.datatype(), text))
        })
        .collect()
}

/// Renders the `--help` text of one command, followed by `details`.
pub fn usage(grammar: &Grammar, details: &[String]) -> Vec<String> {
    let mut lines = vec!["Usage: ".to_string(), syntax(grammar)];
    lines.extend(glossary(grammar));
    lines.push(String::new());
    lines.push("Details: ".to_string());
    lines.push(grammar.description().to_string());
    lines.extend(details.iter().cloned());
    lines
}

/// Renders the command list printed by `help`.
pub fn command_list<'a>(grammars: impl IntoIterator<Item = &'a Grammar>) -> Vec<String> {
    let mut lines = vec!["List of commands:".to_string()];
    lines.extend(
        grammars
            .into_iter()
            .map(|g| format!("\t{}\t\t{}", syntax(g), g.description())),
    );
    lines
}
