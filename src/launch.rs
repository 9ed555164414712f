//! Launch configuration: what the rest of the editor is told to do.
//!
//! A [`LaunchConfig`] is assembled once all flags have been extracted. It
//! goes to the local [`Dispatcher`] on the primary path, or over IPC to the
//! running instance on the secondary path, so it is serializable.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Language forced on opened files via `-l`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Language {
    /// No `-l`, or a name nobody recognized: detect per file.
    #[default]
    Unspecified,
    /// Canonical language name.
    Named(String),
}

/// Content typed out by the "ghost typing" easter egg.
///
/// The variant records which flag supplied it, since each is played
/// differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EasterEgg {
    /// `-qn=`: one of the built-in quotes, by name.
    Named(String),
    /// `-qt=`: the text itself.
    Literal(String),
    /// `-qf=`: text read from a file.
    FromFile(PathBuf),
}

/// Ghost typing speed, `-qSpeed1` (slow) to `-qSpeed3` (fast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TypingSpeed(u8);

impl TypingSpeed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for TypingSpeed {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(value)
        }
    }
}

impl TryFrom<u8> for TypingSpeed {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
            .map_err(|value| format!("typing speed {value} is outside 1-3"))
    }
}

impl From<TypingSpeed> for u8 {
    fn from(speed: TypingSpeed) -> Self {
        speed.0
    }
}

/// Everything the command line asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    // Instance and session
    pub multi_instance: bool,
    pub no_plugins: bool,
    pub no_session: bool,
    pub open_session: bool,
    pub settings_dir: Option<PathBuf>,

    // Files
    pub read_only: bool,
    pub recursive: bool,
    pub open_folders_as_workspace: bool,
    pub monitor_files: bool,
    pub language: Language,
    pub udl_name: Option<String>,
    pub line: Option<i64>,
    pub column: Option<i64>,
    pub position: Option<i64>,

    // Window
    pub window_x: Option<i64>,
    pub window_y: Option<i64>,
    pub no_tabbar: bool,
    pub system_tray: bool,
    pub always_on_top: bool,
    pub title_suffix: Option<String>,
    pub localization: Option<PathBuf>,

    // Batch modes
    pub quick_print: bool,
    pub export_function_list: bool,
    pub plugin_message: Option<String>,
    pub show_loading_time: bool,

    pub notepad_style: bool,
    pub show_help: bool,

    pub easter_egg: Option<EasterEgg>,
    pub typing_speed: Option<TypingSpeed>,

    /// Unconsumed tokens: paths to open, in command-line order.
    pub files: Vec<String>,
}

impl LaunchConfig {
    /// With `-openSession`, the first file is a session to load rather than
    /// a document.
    pub fn session_file(&self) -> Option<&str> {
        if self.open_session {
            self.files.first().map(String::as_str)
        } else {
            None
        }
    }

    /// Batch modes run to completion on their own and never hand off.
    pub fn is_batch(&self) -> bool {
        self.quick_print || self.export_function_list
    }
}

/// Receives the finished launch configuration on the primary path.
///
/// This is where window creation and the main loop take over.
pub trait Dispatcher {
    type Error;

    fn dispatch(&mut self, launch: LaunchConfig) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_speed_range() {
        assert!(TypingSpeed::try_from(0i64).is_err());
        assert_eq!(TypingSpeed::try_from(1i64).map(TypingSpeed::get), Ok(1));
        assert_eq!(TypingSpeed::try_from(3i64).map(TypingSpeed::get), Ok(3));
        assert!(TypingSpeed::try_from(4i64).is_err());
        assert!(TypingSpeed::try_from(-2i64).is_err());
    }

    #[test]
    fn session_file_only_with_open_session() {
        let mut launch = LaunchConfig {
            files: vec!["work.session".into(), "a.txt".into()],
            ..Default::default()
        };
        assert_eq!(launch.session_file(), None);
        launch.open_session = true;
        assert_eq!(launch.session_file(), Some("work.session"));
    }

    #[test]
    fn launch_config_survives_json() {
        let launch = LaunchConfig {
            read_only: true,
            language: Language::Named("cpp".into()),
            easter_egg: Some(EasterEgg::FromFile(PathBuf::from("/tmp/q.txt"))),
            typing_speed: TypingSpeed::try_from(2i64).ok(),
            files: vec!["a b.txt".into()],
            ..Default::default()
        };
        let json = serde_json::to_string(&launch).unwrap();
        assert!(json.contains(r#""easter_egg":{"kind":"from_file","value":"/tmp/q.txt"}"#));
        let back: LaunchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, launch);
    }

    #[test]
    fn out_of_range_speed_is_rejected_on_decode() {
        let json = serde_json::to_string(&LaunchConfig::default())
            .unwrap()
            .replace(r#""typing_speed":null"#, r#""typing_speed":7"#);
        assert!(serde_json::from_str::<LaunchConfig>(&json).is_err());
    }
}
