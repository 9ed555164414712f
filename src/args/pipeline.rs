//! Pipeline: ties all argument processing stages together.

use std::path::PathBuf;

use crate::args::extract;
use crate::args::lookup::Lookup;
use crate::args::notepad::{rewrite_first_param, strip_ignored_params};
use crate::args::registry::*;
use crate::args::store::ParamStore;
use crate::args::tokenizer::tokenize;
use crate::launch::LaunchConfig;

/// Stages 1-3: tokenize, apply notepad conventions, wrap in a store.
pub fn prepare_params(raw: &str) -> ParamStore {
    let mut tokens = tokenize(raw);
    tracing::debug!(?tokens, "tokenized command line");
    rewrite_first_param(&mut tokens);
    strip_ignored_params(&mut tokens);
    ParamStore::new(tokens)
}

/// Take `-settingsDir=` ahead of everything else, since the settings it
/// points at decide how the remaining flags are resolved.
pub fn take_settings_dir(params: &mut ParamStore) -> Option<PathBuf> {
    params
        .take_value_by_prefix(FLAG_SETTINGS_DIR)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

/// Stage 4: consume every known flag and keep the rest as files.
///
/// Single-letter flags match by prefix (`-n` would happily eat
/// `-noPlugin`), so every exact and `=`-style flag is taken first.
pub fn extract_launch_config(
    mut params: ParamStore,
    settings_dir: Option<PathBuf>,
    lookup: &impl Lookup,
) -> LaunchConfig {
    let show_help = params.contains_flag(FLAG_HELP);
    let multi_instance = params.contains_flag(FLAG_MULTI_INSTANCE);
    let notepad_style = params.contains_flag(FLAG_NOTEPAD_COMPATIBILITY);
    let no_plugins = params.contains_flag(FLAG_NO_PLUGIN);
    let read_only = params.contains_flag(FLAG_READONLY);
    let no_session = params.contains_flag(FLAG_NOSESSION);
    let no_tabbar = params.contains_flag(FLAG_NOTABBAR);
    let system_tray = params.contains_flag(FLAG_SYSTRAY);
    let show_loading_time = params.contains_flag(FLAG_LOADINGTIME);
    let always_on_top = params.contains_flag(FLAG_ALWAYS_ON_TOP);
    let open_session = params.contains_flag(FLAG_OPEN_SESSION_FILE);
    let recursive = params.contains_flag(FLAG_RECURSIVE);
    let export_function_list = params.contains_flag(FLAG_FUNCLIST_EXPORT);
    let quick_print = params.contains_flag(FLAG_QUICK_PRINT);
    let open_folders_as_workspace = params.contains_flag(FLAG_OPEN_FOLDERS_AS_WORKSPACE);
    let monitor_files = params.contains_flag(FLAG_MONITOR_FILES);

    let title_suffix = params.take_value_by_prefix(FLAG_TITLEBAR_ADD);
    let udl_name = params.take_value_by_prefix(FLAG_APPLY_UDL);
    let plugin_message = params.take_value_by_prefix(FLAG_PLUGIN_MESSAGE);
    let easter_egg = extract::easter_egg(&mut params, lookup);
    let typing_speed = extract::typing_speed(&mut params);

    let language = extract::language(&mut params, lookup);
    let localization = extract::localization(&mut params, lookup);
    let line = params.take_numeric(SHORT_LINE);
    let column = params.take_numeric(SHORT_COLUMN);
    let position = params.take_numeric(SHORT_POSITION);
    let window_x = params.take_numeric(SHORT_WINDOW_X);
    let window_y = params.take_numeric(SHORT_WINDOW_Y);

    let files = params.into_remaining();
    report_leftover_flags(&files);

    let mut launch = LaunchConfig {
        multi_instance,
        no_plugins,
        no_session,
        open_session,
        settings_dir,
        read_only,
        recursive,
        open_folders_as_workspace,
        monitor_files,
        language,
        udl_name,
        line,
        column,
        position,
        window_x,
        window_y,
        no_tabbar,
        system_tray,
        always_on_top,
        title_suffix,
        localization,
        quick_print,
        export_function_list,
        plugin_message,
        show_loading_time,
        notepad_style,
        show_help,
        easter_egg,
        typing_speed,
        files,
    };

    // Batch modes run in their own process and must not disturb the
    // user's session.
    if launch.is_batch() {
        launch.multi_instance = true;
        launch.no_session = true;
    }

    launch
}

/// Run the full pipeline on a raw command line.
pub fn parse_command_line(raw: &str, lookup: &impl Lookup) -> LaunchConfig {
    let mut params = prepare_params(raw);
    let settings_dir = take_settings_dir(&mut params);
    extract_launch_config(params, settings_dir, lookup)
}

fn report_leftover_flags(files: &[String]) {
    let registry = flag_registry();
    for file in files.iter().filter(|file| file.starts_with('-')) {
        if registry.iter().any(|flag| flag.matches(file)) {
            tracing::debug!(token = %file, "flag repeated, treating extra copy as a file");
        } else {
            tracing::debug!(token = %file, "unknown flag, treating as a file");
        }
    }
}

/// Rebuild a single raw command line from already-split process arguments.
///
/// Arguments that would not survive [`tokenize`] on their own (empty, or
/// containing whitespace) are wrapped in quotes.
pub fn command_line_from_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.is_empty() || arg.contains([' ', '\t']) {
                format!("\"{arg}\"")
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
