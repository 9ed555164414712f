//! Notepad-compatible command line handling.
//!
//! The editor can be registered as a drop-in replacement for the stock
//! notepad, which means accepting its conventions: `/p` to print and the
//! `-z <original exe>` argument the OS hook injects.

use crate::args::registry::FLAG_QUICK_PRINT;
use crate::args::PASSTHROUGH_FLAG;

/// Rewrite a leading `/p` or `/P` to `-quickPrint`. Later positions are left alone.
pub fn rewrite_first_param(params: &mut [String]) {
    if let Some(first) = params.first_mut() {
        if first == "/p" || first == "/P" {
            *first = FLAG_QUICK_PRINT.to_string();
        }
    }
}

/// Drop every standalone `-z` together with the argument that follows it.
pub fn strip_ignored_params(params: &mut Vec<String>) {
    let mut index = 0;
    while index < params.len() {
        if params[index] == PASSTHROUGH_FLAG {
            let end = (index + 2).min(params.len());
            let ignored: Vec<String> = params.drain(index..end).collect();
            tracing::debug!(?ignored, "dropping passthrough arguments");
        } else {
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrites_leading_print_switch() {
        let mut p = params(&["/p", "a.txt"]);
        rewrite_first_param(&mut p);
        assert_eq!(p, params(&["-quickPrint", "a.txt"]));

        let mut p = params(&["/P"]);
        rewrite_first_param(&mut p);
        assert_eq!(p, params(&["-quickPrint"]));
    }

    #[test]
    fn print_switch_elsewhere_is_untouched() {
        let mut p = params(&["a.txt", "/p", "b.txt"]);
        rewrite_first_param(&mut p);
        assert_eq!(p, params(&["a.txt", "/p", "b.txt"]));

        let mut empty: Vec<String> = Vec::new();
        rewrite_first_param(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn strips_passthrough_and_next() {
        let mut p = params(&["-notepadStyleCmdline", "-z", "NOTEPAD.EXE", r"C:\a\b c.txt"]);
        strip_ignored_params(&mut p);
        assert_eq!(p, params(&["-notepadStyleCmdline", r"C:\a\b c.txt"]));
    }

    #[test]
    fn strips_repeated_and_trailing_passthrough() {
        let mut p = params(&["-z", "x", "a", "-z", "-z", "b", "-z"]);
        strip_ignored_params(&mut p);
        assert_eq!(p, params(&["a", "b"]));
    }
}
