//! Lookup: name → identifier/path resolution used by the extractors.

use std::path::{Path, PathBuf};

use crate::launch::Language;

/// Resolves the raw text of valued flags into things the editor can use.
pub trait Lookup {
    /// Map a `-l` value to a language.
    fn language(&self, name: &str) -> Language;
    /// Map a normalized locale (`pt-br`) to its localization file.
    fn localization(&self, locale: &str) -> Option<PathBuf>;
    /// Make a path given on the command line absolute.
    fn absolute_path(&self, path: &str) -> PathBuf;
}

/// Languages `-l` understands. Matching is case-insensitive.
pub const KNOWN_LANGUAGES: &[&str] = &[
    "normal", "ada", "asm", "bash", "batch", "c", "cmake", "cpp", "cs", "css", "d", "diff",
    "erlang", "fortran", "go", "haskell", "html", "ini", "java", "javascript", "json",
    "kotlin", "latex", "lisp", "lua", "makefile", "markdown", "matlab", "nim", "objc",
    "pascal", "perl", "php", "powershell", "props", "python", "r", "ruby", "rust", "scheme",
    "sql", "swift", "tcl", "toml", "typescript", "vb", "verilog", "vhdl", "xml", "yaml",
];

/// Filesystem-backed lookup.
#[derive(Debug, Clone)]
pub struct DefaultLookup {
    localization_dir: PathBuf,
    base_dir: PathBuf,
}

impl DefaultLookup {
    /// Relative paths resolve against the current directory.
    pub fn new(localization_dir: impl Into<PathBuf>) -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_base_dir(localization_dir, base_dir)
    }

    pub fn with_base_dir(localization_dir: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            localization_dir: localization_dir.into(),
            base_dir: base_dir.into(),
        }
    }
}

impl Lookup for DefaultLookup {
    fn language(&self, name: &str) -> Language {
        match KNOWN_LANGUAGES
            .iter()
            .find(|known| known.eq_ignore_ascii_case(name))
        {
            Some(known) => Language::Named((*known).to_string()),
            None => {
                tracing::warn!(language = %name, "unknown language, falling back to detection");
                Language::Unspecified
            }
        }
    }

    fn localization(&self, locale: &str) -> Option<PathBuf> {
        if locale.is_empty() {
            return None;
        }
        let path = self.localization_dir.join(format!("{locale}.xml"));
        if path.is_file() {
            Some(path)
        } else {
            tracing::warn!(path = %path.display(), "localization file not found");
            None
        }
    }

    fn absolute_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
