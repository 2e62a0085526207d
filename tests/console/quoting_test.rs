//! Tokenizer behavior as seen through the public API.

use super::common::{console, session_text};
use cam_console::camera::{CameraDevice, Resolution};
use cam_console::commands::tokenizer::count_tokens;
use cam_console::commands::tokenize;
use pretty_assertions::assert_eq;

fn args(line: &str) -> Vec<String> {
    tokenize(line.as_bytes(), 128, true)
        .args()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_quoted_and_bare_values_agree() {
    assert_eq!(args("setResolution \"2\""), vec!["setResolution", "2"]);
    assert_eq!(args("setResolution '2'"), args("setResolution 2"));
}

#[test]
fn test_quoted_value_dispatches() {
    let mut console = console();
    let out = session_text(&mut console, "setResolution \"3\"\r");
    assert!(out.ends_with("Camera resolution applied correctly.\r\n"));
    assert_eq!(console.camera().settings().resolution, Resolution::Qcif);
}

#[test]
fn test_escaped_quote_is_literal() {
    assert_eq!(args(r"a\'b"), vec![r"a\'b"]);
    assert_eq!(tokenize(br"a\'b", 128, true).unterminated_quote(), None);
}

#[test]
fn test_quoted_space_stays_in_token() {
    assert_eq!(args("say 'hello world' now"), vec!["say", "hello world", "now"]);
}

#[test]
fn test_tokenizing_is_idempotent() {
    let line = br#"setFormat "1" 'x y' \"z"#;
    assert_eq!(tokenize(line, 128, true), tokenize(line, 128, true));
}

#[test]
fn test_count_matches_split() {
    for line in [
        "",
        "   ",
        "help",
        "  setResolution   2  ",
        "a 'b c' \"d e\" f",
        r#"x\"y z"#,
        "'' \"\" q",
        "'unterminated",
    ] {
        let tokens = tokenize(line.as_bytes(), 128, false);
        assert_eq!(count_tokens(line), tokens.len(), "line: {line:?}");
    }
}

#[test]
fn test_quote_flags_are_independent() {
    // The double quote opens inside the single-quoted region and is still
    // open when the single quote closes.
    let tokens = tokenize(br#"'a"b' c"#, 128, false);
    assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["ab c"]);
    let state = tokens.quote_state();
    assert!(!state.single);
    assert!(state.double);
    assert_eq!(tokens.unterminated_quote(), Some('"'));
}

#[test]
fn test_unterminated_quote_is_reported() {
    let mut console = console();
    let out = session_text(&mut console, "setResolution '1\r");
    assert_eq!(
        out,
        "Unterminated quote in command line, check the syntax and try again.\r\n"
    );
    assert!(console.camera().applied.borrow().is_empty());
}

#[test]
fn test_line_width_clips_input() {
    let long = format!("help {}", "x".repeat(200));
    let tokens = tokenize(long.as_bytes(), 128, false);
    let total: usize = tokens.iter().map(str::len).sum();
    assert_eq!(total, 4 + 123);
}
