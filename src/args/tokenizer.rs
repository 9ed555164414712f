//! Tokenizer: raw command line → argument tokens.
//!
//! The grammar is purpose-built and much narrower than shell quoting:
//!
//! - space and tab separate arguments;
//! - `"` always delimits an argument, even without surrounding whitespace;
//! - `="` opens an inline value (`-settingsDir="c:\my dir"`), so the
//!   flag and its spaced value stay one token;
//! - a standalone `-z` arms passthrough; once a quoted argument opens
//!   after it, the next token start keeps the rest of the line verbatim
//!   as one final token. Unquoted arguments after `-z` split as usual.
//!
//! There are no escapes, no nesting and no error path: unbalanced quotes
//! simply leave their mode engaged until the end of the line.

/// Standalone token that triggers raw passthrough of the rest of the line.
pub const PASSTHROUGH_FLAG: &str = "-z";

/// Where the scanner currently is. The open token buffer lives inside the
/// state, so "inside a quoted argument and between tokens" cannot happen.
#[derive(Debug, Default)]
enum ScanState {
    /// Between tokens.
    #[default]
    Whitespace,
    /// Inside an unquoted token.
    Unquoted(String),
    /// Inside a `"`-delimited argument.
    Quoted(String),
    /// Inside a `="..."` value. `None` when no token was open to attach to.
    InlineValue(Option<String>),
    /// Just after a closing argument quote: text here belongs to no token.
    Detached,
}

/// Progress of the `-z` passthrough rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Passthrough {
    /// No `-z` seen yet.
    Idle,
    /// `-z` seen; waiting for a quoted argument.
    Armed,
    /// A quoted argument opened; the next token start swallows the rest.
    Latched,
}

struct Scanner {
    tokens: Vec<String>,
    state: ScanState,
    passthrough: Passthrough,
}

impl Scanner {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            state: ScanState::Whitespace,
            passthrough: Passthrough::Idle,
        }
    }

    fn quote(&mut self, after_equals: bool) {
        self.state = match std::mem::take(&mut self.state) {
            ScanState::InlineValue(Some(buf)) => ScanState::Unquoted(buf),
            ScanState::InlineValue(None) => ScanState::Detached,
            ScanState::Quoted(buf) => {
                // Empty quoted arguments are kept as zero-length tokens.
                self.tokens.push(buf);
                ScanState::Detached
            }
            ScanState::Unquoted(buf) if after_equals => ScanState::InlineValue(Some(buf)),
            ScanState::Whitespace | ScanState::Detached if after_equals => {
                ScanState::InlineValue(None)
            }
            open => {
                if let ScanState::Unquoted(buf) = open {
                    self.tokens.push(buf);
                }
                if self.passthrough == Passthrough::Armed {
                    self.passthrough = Passthrough::Latched;
                }
                ScanState::Quoted(String::new())
            }
        };
    }

    fn whitespace(&mut self, ch: char) {
        self.state = match std::mem::take(&mut self.state) {
            ScanState::Quoted(mut buf) => {
                buf.push(ch);
                ScanState::Quoted(buf)
            }
            ScanState::InlineValue(Some(mut buf)) => {
                buf.push(ch);
                ScanState::InlineValue(Some(buf))
            }
            ScanState::InlineValue(None) => ScanState::InlineValue(None),
            ScanState::Unquoted(buf) => {
                self.tokens.push(buf);
                self.advance_passthrough();
                ScanState::Whitespace
            }
            ScanState::Detached => {
                self.advance_passthrough();
                ScanState::Whitespace
            }
            ScanState::Whitespace => ScanState::Whitespace,
        };
    }

    /// Returns `true` when the scan must halt: `rest` became the final token.
    fn other(&mut self, ch: char, rest: &str) -> bool {
        self.state = match std::mem::take(&mut self.state) {
            ScanState::Whitespace => {
                if self.passthrough == Passthrough::Latched {
                    self.tokens.push(rest.to_string());
                    return true;
                }
                ScanState::Unquoted(ch.to_string())
            }
            ScanState::Unquoted(mut buf) => {
                buf.push(ch);
                ScanState::Unquoted(buf)
            }
            ScanState::Quoted(mut buf) => {
                buf.push(ch);
                ScanState::Quoted(buf)
            }
            ScanState::InlineValue(Some(mut buf)) => {
                buf.push(ch);
                ScanState::InlineValue(Some(buf))
            }
            ScanState::InlineValue(None) => ScanState::InlineValue(None),
            ScanState::Detached => ScanState::Detached,
        };
        false
    }

    /// Called whenever an argument has just ended at whitespace. Only arms;
    /// latching happens in [`quote`](Self::quote).
    fn advance_passthrough(&mut self) {
        self.passthrough = match self.passthrough {
            Passthrough::Idle
                if self
                    .tokens
                    .last()
                    .is_some_and(|token| token == PASSTHROUGH_FLAG) =>
            {
                Passthrough::Armed
            }
            other => other,
        };
    }

    fn finish(mut self) -> Vec<String> {
        match self.state {
            ScanState::Unquoted(buf)
            | ScanState::Quoted(buf)
            | ScanState::InlineValue(Some(buf)) => self.tokens.push(buf),
            ScanState::InlineValue(None) | ScanState::Detached | ScanState::Whitespace => {}
        }
        self.tokens
    }
}

/// Split a raw command line into unquoted argument tokens.
///
/// See the module docs for the grammar. Never fails.
pub fn tokenize(raw: &str) -> Vec<String> {
    let mut scanner = Scanner::new();
    let mut prev = None;

    for (offset, ch) in raw.char_indices() {
        match ch {
            '"' => scanner.quote(prev == Some('=')),
            ' ' | '\t' => scanner.whitespace(ch),
            _ => {
                if scanner.other(ch, &raw[offset..]) {
                    tracing::trace!(offset, "passthrough latched, keeping rest of line verbatim");
                    return scanner.tokens;
                }
            }
        }
        prev = Some(ch);
    }

    scanner.finish()
}
