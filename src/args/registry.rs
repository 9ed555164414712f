//! Flag registry: single source of truth for all flags.

use std::fmt::Write as _;

pub const FLAG_MULTI_INSTANCE: &str = "-multiInst";
pub const FLAG_NO_PLUGIN: &str = "-noPlugin";
pub const FLAG_READONLY: &str = "-ro";
pub const FLAG_NOSESSION: &str = "-nosession";
pub const FLAG_NOTABBAR: &str = "-notabbar";
pub const FLAG_SYSTRAY: &str = "-systemtray";
pub const FLAG_LOADINGTIME: &str = "-loadingTime";
pub const FLAG_HELP: &str = "--help";
pub const FLAG_ALWAYS_ON_TOP: &str = "-alwaysOnTop";
pub const FLAG_OPEN_SESSION_FILE: &str = "-openSession";
pub const FLAG_RECURSIVE: &str = "-r";
pub const FLAG_FUNCLIST_EXPORT: &str = "-export=functionList";
pub const FLAG_QUICK_PRINT: &str = "-quickPrint";
pub const FLAG_NOTEPAD_COMPATIBILITY: &str = "-notepadStyleCmdline";
pub const FLAG_OPEN_FOLDERS_AS_WORKSPACE: &str = "-openFoldersAsWorkspace";
pub const FLAG_MONITOR_FILES: &str = "-monitor";

pub const FLAG_SETTINGS_DIR: &str = "-settingsDir=";
pub const FLAG_TITLEBAR_ADD: &str = "-titleAdd=";
pub const FLAG_APPLY_UDL: &str = "-udl=";
pub const FLAG_PLUGIN_MESSAGE: &str = "-pluginMessage=";
pub const FLAG_EASTER_EGG_NAME: &str = "-qn=";
pub const FLAG_EASTER_EGG_TEXT: &str = "-qt=";
pub const FLAG_EASTER_EGG_FILE: &str = "-qf=";
pub const FLAG_TYPING_SPEED: &str = "-qSpeed";

pub const SHORT_LANGUAGE: char = 'l';
pub const SHORT_LOCALIZATION: char = 'L';
pub const SHORT_LINE: char = 'n';
pub const SHORT_COLUMN: char = 'c';
pub const SHORT_POSITION: char = 'p';
pub const SHORT_WINDOW_X: char = 'x';
pub const SHORT_WINDOW_Y: char = 'y';

/// How a flag is matched and what it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Exact token, no value (e.g., `-ro`).
    Presence,
    /// `-<letter><value>` (e.g., `-lcpp`).
    Value,
    /// `-<letter><integer>` (e.g., `-n42`).
    Numeric,
    /// Literal prefix followed by the value (e.g., `-titleAdd=dev`).
    Prefix,
    /// `-z`: skip the next argument and keep the rest of the line verbatim.
    Passthrough,
}

/// A single flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// What the user types, up to where the value starts.
    pub literal: String,
    pub kind: FlagKind,
    /// Placeholder shown in help for valued flags.
    pub value_name: Option<&'static str>,
    /// Human-readable description (for help text).
    pub description: &'static str,
}

fn def(
    literal: impl Into<String>,
    kind: FlagKind,
    value_name: Option<&'static str>,
    description: &'static str,
) -> FlagDef {
    FlagDef {
        literal: literal.into(),
        kind,
        value_name,
        description,
    }
}

fn short(letter: char) -> String {
    format!("-{letter}")
}

/// Build the complete flag registry, in help order.
pub fn flag_registry() -> Vec<FlagDef> {
    use FlagKind::*;

    vec![
        // === Instance and session ===
        def(FLAG_MULTI_INSTANCE, Presence, None, "Allow a new instance even if one is running"),
        def(FLAG_NOSESSION, Presence, None, "Do not restore or save the previous session"),
        def(FLAG_OPEN_SESSION_FILE, Presence, None, "Open the given file as a session"),
        def(FLAG_NO_PLUGIN, Presence, None, "Start without loading plugins"),
        def(FLAG_SETTINGS_DIR, Prefix, Some("DIR"), "Read settings from DIR"),
        // === Files ===
        def(FLAG_READONLY, Presence, None, "Open files read-only"),
        def(FLAG_RECURSIVE, Presence, None, "Open files matching a wildcard recursively"),
        def(FLAG_OPEN_FOLDERS_AS_WORKSPACE, Presence, None, "Open folders as workspace"),
        def(FLAG_MONITOR_FILES, Presence, None, "Monitor opened files for changes"),
        def(short(SHORT_LANGUAGE), Value, Some("LANG"), "Apply language LANG to opened files"),
        def(FLAG_APPLY_UDL, Prefix, Some("NAME"), "Apply user defined language NAME"),
        def(short(SHORT_LINE), Numeric, Some("LINE"), "Scroll to LINE"),
        def(short(SHORT_COLUMN), Numeric, Some("COL"), "Move caret to column COL"),
        def(short(SHORT_POSITION), Numeric, Some("POS"), "Move caret to absolute position POS"),
        // === Window ===
        def(short(SHORT_WINDOW_X), Numeric, Some("X"), "Main window left edge"),
        def(short(SHORT_WINDOW_Y), Numeric, Some("Y"), "Main window top edge"),
        def(FLAG_NOTABBAR, Presence, None, "Hide the tab bar"),
        def(FLAG_SYSTRAY, Presence, None, "Start minimized to the system tray"),
        def(FLAG_ALWAYS_ON_TOP, Presence, None, "Keep the main window on top"),
        def(FLAG_TITLEBAR_ADD, Prefix, Some("TEXT"), "Append TEXT to the title bar"),
        def(short(SHORT_LOCALIZATION), Value, Some("LOCALE"), "Use localization LOCALE"),
        // === Batch modes ===
        def(FLAG_QUICK_PRINT, Presence, None, "Print the files and quit (also /p)"),
        def(FLAG_FUNCLIST_EXPORT, Presence, None, "Export the function list and quit"),
        def(FLAG_PLUGIN_MESSAGE, Prefix, Some("MSG"), "Send MSG to plugins"),
        def(FLAG_LOADINGTIME, Presence, None, "Report startup time"),
        // === Compatibility ===
        def(FLAG_NOTEPAD_COMPATIBILITY, Presence, None, "Notepad-compatible command line"),
        def(crate::args::PASSTHROUGH_FLAG, Passthrough, Some("ARG"), "Ignore ARG, keep the rest of the line as one path"),
        // === Fun ===
        def(FLAG_EASTER_EGG_NAME, Prefix, Some("NAME"), "Type a built-in quote"),
        def(FLAG_EASTER_EGG_TEXT, Prefix, Some("TEXT"), "Type TEXT as a quote"),
        def(FLAG_EASTER_EGG_FILE, Prefix, Some("FILE"), "Type the contents of FILE as a quote"),
        def(FLAG_TYPING_SPEED, Prefix, Some("1-3"), "Quote typing speed"),
        def(FLAG_HELP, Presence, None, "Show this help"),
    ]
}

impl FlagDef {
    /// Check if this definition would consume the given token.
    pub fn matches(&self, token: &str) -> bool {
        match self.kind {
            FlagKind::Presence | FlagKind::Passthrough => token == self.literal,
            FlagKind::Value | FlagKind::Numeric | FlagKind::Prefix => {
                token.starts_with(&self.literal)
            }
        }
    }

    fn usage(&self) -> String {
        match (self.kind, self.value_name) {
            (FlagKind::Passthrough, Some(value)) => format!("{} {value}", self.literal),
            (_, Some(value)) if self.literal.ends_with('=') => {
                format!("{}\"{value}\"", self.literal)
            }
            (_, Some(value)) => format!("{}{value}", self.literal),
            (_, None) => self.literal.clone(),
        }
    }
}

/// Usage text printed for `--help`.
pub fn help_text() -> String {
    let registry = flag_registry();
    let rows: Vec<(String, &str)> = registry
        .iter()
        .map(|flag| (flag.usage(), flag.description))
        .collect();
    let width = rows.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);

    let mut text = format!(
        "Usage: {} [flags] [file ...]\n\n",
        env!("CARGO_PKG_NAME")
    );
    for (usage, description) in rows {
        let _ = writeln!(text, "  {usage:<width$}  {description}");
    }
    text
}
