//! ParamStore: destructive, order-independent flag lookups.

/// Owns the token sequence and hands flags out one at a time.
///
/// Every successful `take_*` removes exactly one token, so a flag can only
/// ever be consumed once. Whatever is left at the end is the list of files
/// to open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamStore {
    tokens: Vec<String>,
}

impl ParamStore {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Remove and report the first token exactly equal to `literal`.
    pub fn contains_flag(&mut self, literal: &str) -> bool {
        match self.tokens.iter().position(|token| token == literal) {
            Some(index) => {
                self.tokens.remove(index);
                true
            }
            None => false,
        }
    }

    /// Same as [`contains_flag`](Self::contains_flag) but leaves the token in place.
    pub fn peek_flag(&self, literal: &str) -> bool {
        self.tokens.iter().any(|token| token == literal)
    }

    /// Take the first `-<short><value>` token and return `<value>`.
    ///
    /// `Some("")` means the flag was given without a value.
    pub fn take_value(&mut self, short: char) -> Option<String> {
        let index = self.tokens.iter().position(|token| {
            let mut chars = token.chars();
            chars.next() == Some('-') && chars.next() == Some(short)
        })?;
        let token = self.tokens.remove(index);
        let skip = '-'.len_utf8() + short.len_utf8();
        Some(token[skip..].to_string())
    }

    /// Take the first token starting with `prefix` and return the remainder.
    pub fn take_value_by_prefix(&mut self, prefix: &str) -> Option<String> {
        let index = self
            .tokens
            .iter()
            .position(|token| token.starts_with(prefix))?;
        let token = self.tokens.remove(index);
        Some(token[prefix.len()..].to_string())
    }

    /// Take `-<short><number>`. Unparsable text is absent, but the token is
    /// still consumed.
    pub fn take_numeric(&mut self, short: char) -> Option<i64> {
        let value = self.take_value(short)?;
        match value.trim().parse::<i64>() {
            Ok(number) => Some(number),
            Err(_) => {
                tracing::debug!(flag = %short, value = %value, "ignoring non-numeric flag value");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Unconsumed tokens, in their original order.
    pub fn into_remaining(self) -> Vec<String> {
        self.tokens
    }
}

impl From<Vec<String>> for ParamStore {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}
