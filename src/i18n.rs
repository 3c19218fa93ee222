//! Internationalization (i18n) support
//!
//! Translations live in `locales/*.yml` and are looked up with the
//! `rust_i18n::t!` macro. The `i18n!` macro is initialized at the crate
//! root (lib.rs).

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Language {
    #[default]
    English,
    SimplifiedChinese,
}

impl Language {
    /// Get the locale code for this language
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::SimplifiedChinese => "zh-CN",
        }
    }

    /// Get the display name for this language (in its native script)
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::SimplifiedChinese => "简体中文",
        }
    }

    /// Number formatting locale matching this language
    pub fn number_locale(&self) -> num_format::Locale {
        match self {
            Language::English => num_format::Locale::en,
            Language::SimplifiedChinese => num_format::Locale::zh,
        }
    }

    /// Get all available languages
    pub fn all() -> &'static [Language] {
        &[Language::English, Language::SimplifiedChinese]
    }

    /// Parse a language from a locale code.
    ///
    /// Accepts POSIX-style tags such as `zh_CN.UTF-8` as well as `zh-CN`.
    pub fn from_code(code: &str) -> Option<Self> {
        let tag = code.split('.').next().unwrap_or(code).replace('_', "-");
        let primary = tag.split('-').next().unwrap_or("");
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Language::English),
            "zh" => Some(Language::SimplifiedChinese),
            _ => None,
        }
    }
}

/// Set the current language
pub fn set_language(lang: Language) {
    rust_i18n::set_locale(lang.code());
    tracing::debug!("Locale set to {}", lang.code());
}

/// Window title in the current language
pub fn window_title() -> String {
    rust_i18n::t!("app.title").to_string()
}

/// Get the current language
pub fn current_language() -> Language {
    let locale = rust_i18n::locale();
    Language::from_code(&locale).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_from_code_variants() {
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code("en_US.UTF-8"), Some(Language::English));
        assert_eq!(Language::from_code("zh-CN"), Some(Language::SimplifiedChinese));
        assert_eq!(Language::from_code("zh_CN.UTF-8"), Some(Language::SimplifiedChinese));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_code_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), Some(*lang));
        }
    }

    #[test]
    #[serial]
    fn test_set_language_switches_translations() {
        set_language(Language::SimplifiedChinese);
        assert_eq!(current_language(), Language::SimplifiedChinese);
        assert_eq!(rust_i18n::t!("table.name"), "名称");

        set_language(Language::English);
        assert_eq!(current_language(), Language::English);
        assert_eq!(rust_i18n::t!("table.name"), "Name");
    }

    #[test]
    #[serial]
    fn test_window_title_follows_language() {
        set_language(Language::SimplifiedChinese);
        assert_eq!(window_title(), "节点流量");

        set_language(Language::English);
        assert_eq!(window_title(), "Node Traffic");
    }
}
