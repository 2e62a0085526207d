//! Tokenizer for console command lines.
//!
//! Splits a raw line buffer into positional tokens with a two-pass scan:
//! the first pass counts tokens, the second copies them into one shared
//! allocation and records where each token starts and ends. Both passes are
//! driven by the same quote state machine, so they always agree.
//!
//! Rules:
//! - Tokens are separated by spaces outside of quotes.
//! - `'` and `"` toggle independent "inside quote" flags and are removed from
//!   the token text: `"2"` → `2`.
//! - A backslash directly before a quote stops that quote from toggling. The
//!   backslash is kept: `a\'b` → `a\'b`. Nothing else can be escaped.
//! - A run made only of toggling quotes (`""`) yields no token.

use std::ops::Range;

const SPACE: char = ' ';
const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';
const BACKSLASH: char = '\\';

/// What one character means to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// An unquoted space between tokens.
    Separator,
    /// A quote that toggled a quote flag.
    Delimiter,
    /// Part of the current token.
    Content,
}

/// Quote tracking shared by the count and split passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteState {
    /// Inside a single-quoted region.
    pub single: bool,
    /// Inside a double-quoted region.
    pub double: bool,
    prev: Option<char>,
}

impl QuoteState {
    fn step(&mut self, c: char) -> Step {
        let escaped = self.prev == Some(BACKSLASH);
        self.prev = Some(c);

        match c {
            SPACE if !self.single && !self.double => Step::Separator,
            SINGLE_QUOTE if !escaped => {
                self.single = !self.single;
                Step::Delimiter
            }
            DOUBLE_QUOTE if !escaped => {
                self.double = !self.double;
                Step::Delimiter
            }
            _ => Step::Content,
        }
    }

    /// Returns the quote character left open at the end of the line, if any.
    ///
    /// A dangling double quote is reported before a dangling single quote.
    pub fn unterminated(&self) -> Option<char> {
        if self.double {
            Some(DOUBLE_QUOTE)
        } else if self.single {
            Some(SINGLE_QUOTE)
        } else {
            None
        }
    }
}

/// An ordered sequence of tokens backed by a single owned buffer.
///
/// When a placeholder was requested, index 0 holds an empty "program name"
/// token and the line's own tokens start at index 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenVector {
    storage: String,
    spans: Vec<Range<usize>>,
    placeholder: bool,
    quotes: QuoteState,
}

impl TokenVector {
    /// Number of tokens, placeholder included.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if there are no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns true if the line held no tokens of its own.
    pub fn is_blank(&self) -> bool {
        self.spans.len() == usize::from(self.placeholder)
    }

    /// Returns true if index 0 is the injected placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Returns the token at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.spans
            .get(index)
            .map(|span| &self.storage[span.clone()])
    }

    /// Iterates over every token, placeholder included.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans.iter().map(|span| &self.storage[span.clone()])
    }

    /// Iterates over the line's own tokens, skipping the placeholder.
    pub fn args(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().skip(usize::from(self.placeholder))
    }

    /// Quote state at the end of the line.
    pub fn quote_state(&self) -> QuoteState {
        self.quotes
    }

    /// Returns the quote left open at the end of the line, if any.
    pub fn unterminated_quote(&self) -> Option<char> {
        self.quotes.unterminated()
    }
}

/// Clips a raw buffer to its meaningful text: at most `max_width` bytes,
/// stopping at the first zero byte.
fn meaningful_text(raw: &[u8], max_width: usize) -> String {
    let clipped = &raw[..raw.len().min(max_width)];
    let end = clipped
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(clipped.len());
    String::from_utf8_lossy(&clipped[..end]).into_owned()
}

/// Counts the tokens in `text` without splitting it.
pub fn count_tokens(text: &str) -> usize {
    let mut state = QuoteState::default();
    let mut count = 0;
    let mut in_token = false;

    for c in text.chars() {
        match state.step(c) {
            Step::Separator => {
                if in_token {
                    count += 1;
                    in_token = false;
                }
            }
            Step::Delimiter => {}
            Step::Content => in_token = true,
        }
    }

    if in_token {
        count += 1;
    }
    count
}

/// Tokenizes a raw line buffer.
///
/// `max_width` bounds how many bytes of `raw` are considered; a zero byte ends
/// the line early. With `inject_placeholder`, an empty token is inserted at
/// index 0 so that matching can treat it as the program name.
pub fn tokenize(raw: &[u8], max_width: usize, inject_placeholder: bool) -> TokenVector {
    let text = meaningful_text(raw, max_width);

    let count = count_tokens(&text) + usize::from(inject_placeholder);
    let mut spans = Vec::with_capacity(count);
    let mut storage = String::with_capacity(max_width + 1);

    if inject_placeholder {
        spans.push(0..0);
    }

    let mut state = QuoteState::default();
    let mut start = 0;
    let mut in_token = false;

    for c in text.chars() {
        match state.step(c) {
            Step::Separator => {
                if in_token {
                    spans.push(start..storage.len());
                    in_token = false;
                }
            }
            Step::Delimiter => {}
            Step::Content => {
                if !in_token {
                    start = storage.len();
                    in_token = true;
                }
                storage.push(c);
            }
        }
    }

    if in_token {
        spans.push(start..storage.len());
    }

    debug_assert_eq!(spans.len(), count, "token passes disagree");

    TokenVector {
        storage,
        spans,
        placeholder: inject_placeholder,
        quotes: state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(line: &str) -> Vec<String> {
        tokenize(line.as_bytes(), 128, false)
            .iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(words("setResolution 2"), vec!["setResolution", "2"]);
    }

    #[test]
    fn test_quoted_value_matches_bare_value() {
        assert_eq!(words("setResolution \"2\""), words("setResolution 2"));
        assert_eq!(words("setResolution '2'"), words("setResolution 2"));
    }

    #[test]
    fn test_quoted_spaces_do_not_split() {
        assert_eq!(
            words("say \"hello world\" now"),
            vec!["say", "hello world", "now"]
        );
        assert_eq!(words("say 'a b c'"), vec!["say", "a b c"]);
    }

    #[test]
    fn test_escaped_quote_is_literal() {
        let tokens = tokenize(br"a\'b", 128, false);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.get(0), Some(r"a\'b"));
        assert!(tokens.get(0).is_some_and(|t| t.contains('\'')));
        assert_eq!(tokens.unterminated_quote(), None);
    }

    #[test]
    fn test_backslash_does_not_escape_space() {
        assert_eq!(words(r"a\ b"), vec![r"a\", "b"]);
    }

    #[test]
    fn test_repeated_spaces_collapse() {
        assert_eq!(words("  help   --help  "), vec!["help", "--help"]);
    }

    #[test]
    fn test_only_spaces_yields_no_tokens() {
        let tokens = tokenize(b"     ", 128, false);
        assert!(tokens.is_empty());
        assert!(tokens.is_blank());
    }

    #[test]
    fn test_only_spaces_with_placeholder() {
        let tokens = tokenize(b"     ", 128, true);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.get(0), Some(""));
        assert!(tokens.is_blank());
    }

    #[test]
    fn test_placeholder_shifts_tokens() {
        let tokens = tokenize(b"takePhoto --help", 128, true);
        assert!(tokens.has_placeholder());
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["", "takePhoto", "--help"]);
        assert_eq!(tokens.args().collect::<Vec<_>>(), vec!["takePhoto", "--help"]);
    }

    #[test]
    fn test_empty_quotes_yield_no_token() {
        assert_eq!(words("help \"\" x"), vec!["help", "x"]);
    }

    #[test]
    fn test_stops_at_zero_byte() {
        let mut raw = [0u8; 16];
        raw[..4].copy_from_slice(b"help");
        raw[6] = b'x';
        assert_eq!(tokenize(&raw, 16, false).len(), 1);
    }

    #[test]
    fn test_clips_to_max_width() {
        let tokens = tokenize(b"help extra", 4, false);
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["help"]);
    }

    #[test]
    fn test_unterminated_double_quote_swallows_rest_of_line() {
        let tokens = tokenize(b"setFormat \"2 --help", 128, false);
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["setFormat", "2 --help"]);
        assert_eq!(tokens.unterminated_quote(), Some('"'));
        assert!(tokens.quote_state().double);
    }

    #[test]
    fn test_unterminated_single_quote() {
        let tokens = tokenize(b"it's fine", 128, false);
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["its fine"]);
        assert_eq!(tokens.unterminated_quote(), Some('\''));
    }

    #[test]
    fn test_quote_flags_are_independent() {
        // The apostrophe opens a single-quoted region inside the double quotes.
        let tokens = tokenize(b"say \"it's a\" b", 128, false);
        let state = tokens.quote_state();
        assert!(state.single);
        assert!(!state.double);
        assert_eq!(tokens.iter().collect::<Vec<_>>(), vec!["say", "its a b"]);
    }

    #[test]
    fn test_both_flags_open_at_once() {
        let state = tokenize(b"\"'", 128, false).quote_state();
        assert!(state.single && state.double);
        assert_eq!(tokenize(b"\"'", 128, false).unterminated_quote(), Some('"'));
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let line = b"setResolution \"3\" --help 'x y'";
        assert_eq!(tokenize(line, 128, true), tokenize(line, 128, true));
    }

    #[test]
    fn test_count_agrees_with_split() {
        let lines = [
            "",
            " ",
            "help",
            "a b c",
            "  a   b  ",
            "\"a b\" c",
            "'' \"\" x",
            r#"a\'b c\"d"#,
            "\"unterminated here",
            "it's \"mixed' up\" text",
            "trailing ",
        ];
        for line in lines {
            let tokens = tokenize(line.as_bytes(), 128, false);
            assert_eq!(count_tokens(line), tokens.len(), "line: {line:?}");
            assert!(tokens.iter().all(|t| !t.is_empty()), "line: {line:?}");
        }
    }
}
