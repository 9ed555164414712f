//! Special-value extractors: compound flags built on top of [`ParamStore`].

use crate::args::lookup::Lookup;
use crate::args::registry::{
    FLAG_EASTER_EGG_FILE, FLAG_EASTER_EGG_NAME, FLAG_EASTER_EGG_TEXT, FLAG_TYPING_SPEED,
    SHORT_LANGUAGE, SHORT_LOCALIZATION,
};
use crate::args::store::ParamStore;
use crate::launch::{EasterEgg, Language, TypingSpeed};

/// `-l<name>`; absent means [`Language::Unspecified`].
pub fn language(params: &mut ParamStore, lookup: &impl Lookup) -> Language {
    match params.take_value(SHORT_LANGUAGE) {
        Some(name) => lookup.language(&name),
        None => Language::Unspecified,
    }
}

/// `-L<locale>`, normalized to lower case with `-` separators (`pt_BR` → `pt-br`).
pub fn localization(params: &mut ParamStore, lookup: &impl Lookup) -> Option<std::path::PathBuf> {
    let locale = params.take_value(SHORT_LOCALIZATION)?;
    let locale = normalize_locale(&locale);
    lookup.localization(&locale)
}

pub fn normalize_locale(raw: &str) -> String {
    raw.replace('_', "-").to_lowercase()
}

/// `-qn=`, `-qt=` or `-qf=`, checked in that order; only the winner is consumed.
pub fn easter_egg(params: &mut ParamStore, lookup: &impl Lookup) -> Option<EasterEgg> {
    if let Some(name) = params.take_value_by_prefix(FLAG_EASTER_EGG_NAME) {
        return Some(EasterEgg::Named(strip_one_quote_layer(&name).to_string()));
    }
    if let Some(text) = params.take_value_by_prefix(FLAG_EASTER_EGG_TEXT) {
        return Some(EasterEgg::Literal(strip_one_quote_layer(&text).to_string()));
    }
    let file = params.take_value_by_prefix(FLAG_EASTER_EGG_FILE)?;
    Some(EasterEgg::FromFile(
        lookup.absolute_path(strip_one_quote_layer(&file)),
    ))
}

/// `"abc"` → `abc`; anything else is returned untouched.
pub fn strip_one_quote_layer(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// `-qSpeed<1-3>`; out of range or unparsable is absent.
pub fn typing_speed(params: &mut ParamStore) -> Option<TypingSpeed> {
    let raw = params.take_value_by_prefix(FLAG_TYPING_SPEED)?;
    let speed = raw.trim().parse::<i64>().ok()?;
    match TypingSpeed::try_from(speed) {
        Ok(speed) => Some(speed),
        Err(value) => {
            tracing::debug!(value, "typing speed out of range, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct StubLookup;

    impl Lookup for StubLookup {
        fn language(&self, name: &str) -> Language {
            Language::Named(format!("lang:{name}"))
        }

        fn localization(&self, locale: &str) -> Option<PathBuf> {
            Some(PathBuf::from(format!("/loc/{locale}.xml")))
        }

        fn absolute_path(&self, path: &str) -> PathBuf {
            PathBuf::from("/cwd").join(path)
        }
    }

    fn store(tokens: &[&str]) -> ParamStore {
        ParamStore::new(tokens.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn language_absent_is_unspecified() {
        let mut params = store(&["a.txt"]);
        assert_eq!(language(&mut params, &StubLookup), Language::Unspecified);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn language_goes_through_lookup() {
        let mut params = store(&["-lcpp"]);
        assert_eq!(
            language(&mut params, &StubLookup),
            Language::Named("lang:cpp".into())
        );
        assert!(params.is_empty());
    }

    #[test]
    fn localization_is_normalized() {
        let mut params = store(&["-Lpt_BR"]);
        assert_eq!(
            localization(&mut params, &StubLookup),
            Some(PathBuf::from("/loc/pt-br.xml"))
        );
        assert_eq!(localization(&mut params, &StubLookup), None);
    }

    #[test]
    fn easter_egg_priority_consumes_only_winner() {
        let mut params = store(&["-qf=q.txt", "-qt=hello", "-qn=Wiki"]);
        assert_eq!(
            easter_egg(&mut params, &StubLookup),
            Some(EasterEgg::Named("Wiki".into()))
        );
        assert_eq!(params.len(), 2);
        assert_eq!(
            easter_egg(&mut params, &StubLookup),
            Some(EasterEgg::Literal("hello".into()))
        );
        assert_eq!(
            easter_egg(&mut params, &StubLookup),
            Some(EasterEgg::FromFile(PathBuf::from("/cwd/q.txt")))
        );
        assert_eq!(easter_egg(&mut params, &StubLookup), None);
    }

    #[test]
    fn easter_egg_strips_exactly_one_quote_layer() {
        let mut params = store(&[r#"-qt=""deep"""#]);
        assert_eq!(
            easter_egg(&mut params, &StubLookup),
            Some(EasterEgg::Literal(r#""deep""#.into()))
        );
    }

    #[test]
    fn strip_quote_edge_cases() {
        assert_eq!(strip_one_quote_layer(r#"""#), r#"""#);
        assert_eq!(strip_one_quote_layer(r#""""#), "");
        assert_eq!(strip_one_quote_layer(r#""half"#), r#""half"#);
        assert_eq!(strip_one_quote_layer("plain"), "plain");
    }

    #[test]
    fn typing_speed_range_and_parse() {
        assert_eq!(typing_speed(&mut store(&["-qSpeed2"])).map(TypingSpeed::get), Some(2));
        assert_eq!(typing_speed(&mut store(&["-qSpeed5"])), None);
        assert_eq!(typing_speed(&mut store(&["-qSpeed0"])), None);
        assert_eq!(typing_speed(&mut store(&["-qSpeedX"])), None);
        assert_eq!(typing_speed(&mut store(&["-qSpeed"])), None);
    }

    #[test]
    fn typing_speed_consumes_even_when_invalid() {
        let mut params = store(&["-qSpeed9", "a.txt"]);
        assert_eq!(typing_speed(&mut params), None);
        assert_eq!(params.into_remaining(), vec!["a.txt"]);
    }
}
