//! Command-line handling for padlaunch.
//!
//! The raw command line goes through a fixed sequence of stages:
//!
//! ```text
//! Raw line → Tokenize → Notepad rewrites → ParamStore → Extract → LaunchConfig
//! ```
//!
//! Extraction is destructive: each flag is removed from the store as it is
//! read, and whatever survives is the list of files to open.

mod extract;
mod lookup;
mod notepad;
mod pipeline;
mod registry;
mod store;
mod tokenizer;

pub use extract::{
    easter_egg, language, localization, normalize_locale, strip_one_quote_layer, typing_speed,
};
pub use lookup::{DefaultLookup, Lookup, KNOWN_LANGUAGES};
pub use notepad::{rewrite_first_param, strip_ignored_params};
pub use pipeline::{
    command_line_from_args, extract_launch_config, parse_command_line, prepare_params,
    take_settings_dir,
};
pub use registry::*;
pub use store::ParamStore;
pub use tokenizer::{tokenize, PASSTHROUGH_FLAG};
