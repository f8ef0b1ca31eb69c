//! Language table and lookups.
//!
//! Maps ISO 639-1 codes to hreflang tags, Open Graph locales, display names
//! and text direction. All lookups are case-insensitive on the input code.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Language used when a code cannot be resolved.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Priority reported for codes missing from the table.
pub const UNKNOWN_PRIORITY: u32 = 999;

/// A single language record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// ISO 639-1 code, optionally region-suffixed (e.g. `zh-tw`).
    #[serde(alias = "iso6391")]
    pub iso_code: String,

    /// ISO 639-3 code.
    #[serde(default)]
    pub iso6393: String,

    /// Hreflang tag (e.g. `zh-CN`).
    #[serde(rename = "hreflang", alias = "hreflangTag")]
    pub hreflang: String,

    /// Open Graph locale (e.g. `zh_CN`).
    pub og_locale: String,

    /// English display name.
    pub name: String,

    /// Display name in the language itself.
    pub native_name: String,

    /// Region code (e.g. `CN`).
    #[serde(default)]
    pub region: Option<String>,

    /// Right-to-left script.
    #[serde(default)]
    pub rtl: bool,

    /// Whether the language is served.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Sort order for enabled listings, lower first.
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_priority() -> u32 {
    UNKNOWN_PRIORITY
}

// (iso, iso6393, hreflang, og_locale, name, native_name, region, rtl, enabled)
type BuiltinRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    bool,
    bool,
);

const BUILTIN: &[BuiltinRow] = &[
    ("en", "eng", "en", "en_US", "English", "English", "US", false, true),
    ("zh", "zho", "zh-CN", "zh_CN", "Chinese (Simplified)", "简体中文", "CN", false, true),
    ("zh-tw", "zho", "zh-TW", "zh_TW", "Chinese (Traditional)", "繁體中文", "TW", false, true),
    ("ja", "jpn", "ja-JP", "ja_JP", "Japanese", "日本語", "JP", false, true),
    ("ko", "kor", "ko-KR", "ko_KR", "Korean", "한국어", "KR", false, true),
    ("es", "spa", "es-ES", "es_ES", "Spanish", "Español", "ES", false, true),
    ("fr", "fra", "fr-FR", "fr_FR", "French", "Français", "FR", false, true),
    ("de", "deu", "de-DE", "de_DE", "German", "Deutsch", "DE", false, true),
    ("pt", "por", "pt-BR", "pt_BR", "Portuguese", "Português", "BR", false, true),
    ("it", "ita", "it-IT", "it_IT", "Italian", "Italiano", "IT", false, true),
    ("ru", "rus", "ru-RU", "ru_RU", "Russian", "Русский", "RU", false, true),
    ("ar", "ara", "ar-SA", "ar_AR", "Arabic", "العربية", "SA", true, true),
    ("he", "heb", "he-IL", "he_IL", "Hebrew", "עברית", "IL", true, false),
    ("hi", "hin", "hi-IN", "hi_IN", "Hindi", "हिन्दी", "IN", false, true),
    ("vi", "vie", "vi-VN", "vi_VN", "Vietnamese", "Tiếng Việt", "VN", false, true),
    ("th", "tha", "th-TH", "th_TH", "Thai", "ไทย", "TH", false, true),
    ("id", "ind", "id-ID", "id_ID", "Indonesian", "Bahasa Indonesia", "ID", false, true),
    ("tr", "tur", "tr-TR", "tr_TR", "Turkish", "Türkçe", "TR", false, false),
    ("nl", "nld", "nl-NL", "nl_NL", "Dutch", "Nederlands", "NL", false, false),
    ("pl", "pol", "pl-PL", "pl_PL", "Polish", "Polski", "PL", false, false),
];

/// Lookup table over a list of languages.
#[derive(Debug, Clone)]
pub struct LanguageMapper {
    languages: Vec<Language>,
    by_iso: HashMap<String, usize>,
    by_hreflang: HashMap<String, usize>,
}

impl Default for LanguageMapper {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageMapper {
    /// Create a mapper over the given records.
    ///
    /// Later records with a duplicate ISO code shadow earlier ones in lookups.
    pub fn new(languages: Vec<Language>) -> Self {
        let mut by_iso = HashMap::with_capacity(languages.len());
        let mut by_hreflang = HashMap::with_capacity(languages.len());

        for (idx, lang) in languages.iter().enumerate() {
            if !lang.iso_code.is_empty() {
                by_iso.insert(lang.iso_code.to_lowercase(), idx);
            }
            if !lang.hreflang.is_empty() {
                by_hreflang.insert(lang.hreflang.to_lowercase(), idx);
            }
        }

        Self {
            languages,
            by_iso,
            by_hreflang,
        }
    }

    /// Mapper over the built-in table.
    pub fn builtin() -> Self {
        let languages = BUILTIN
            .iter()
            .enumerate()
            .map(
                |(idx, &(iso, iso6393, hreflang, og_locale, name, native, region, rtl, enabled))| {
                    Language {
                        iso_code: iso.to_string(),
                        iso6393: iso6393.to_string(),
                        hreflang: hreflang.to_string(),
                        og_locale: og_locale.to_string(),
                        name: name.to_string(),
                        native_name: native.to_string(),
                        region: Some(region.to_string()),
                        rtl,
                        enabled,
                        priority: idx as u32 + 1,
                    }
                },
            )
            .collect();

        Self::new(languages)
    }

    /// Load a JSON language table (an array of language records).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let languages: Vec<Language> = serde_json::from_str(&content)
            .map_err(|e| CoreError::data_file(path, e.to_string()))?;

        if languages.is_empty() {
            return Err(CoreError::data_file(path, "language table is empty"));
        }

        tracing::debug!(path = %path.display(), count = languages.len(), "loaded language table");
        Ok(Self::new(languages))
    }

    /// Load the table at `path`, or the built-in table when no path is given.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// All records in table order.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Look up a record by ISO code.
    pub fn get_by_iso(&self, code: &str) -> Option<&Language> {
        if code.is_empty() {
            return None;
        }
        self.by_iso
            .get(&code.to_lowercase())
            .map(|&idx| &self.languages[idx])
    }

    fn get_by_hreflang(&self, tag: &str) -> Option<&Language> {
        self.by_hreflang
            .get(&tag.to_lowercase())
            .map(|&idx| &self.languages[idx])
    }

    /// Hreflang tag for a code, or the code itself when unknown.
    pub fn hreflang(&self, code: &str) -> String {
        self.get_by_iso(code)
            .map_or_else(|| code.to_string(), |lang| lang.hreflang.clone())
    }

    /// Open Graph locale for a code.
    ///
    /// Unknown codes have their first `-` replaced with `_`.
    pub fn og_locale(&self, code: &str) -> String {
        self.get_by_iso(code)
            .map_or_else(|| code.replacen('-', "_", 1), |lang| lang.og_locale.clone())
    }

    /// English or native display name; the code itself when unknown.
    pub fn display_name(&self, code: &str, native: bool) -> String {
        match self.get_by_iso(code) {
            Some(lang) if native => lang.native_name.clone(),
            Some(lang) => lang.name.clone(),
            None => code.to_string(),
        }
    }

    pub fn is_rtl(&self, code: &str) -> bool {
        self.get_by_iso(code).is_some_and(|lang| lang.rtl)
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_iso(code).is_some_and(|lang| lang.enabled)
    }

    pub fn iso6393(&self, code: &str) -> Option<&str> {
        self.get_by_iso(code).map(|lang| lang.iso6393.as_str())
    }

    pub fn region(&self, code: &str) -> Option<&str> {
        self.get_by_iso(code).and_then(|lang| lang.region.as_deref())
    }

    /// Sort priority, lower first. Unknown codes get [`UNKNOWN_PRIORITY`].
    pub fn priority(&self, code: &str) -> u32 {
        self.get_by_iso(code)
            .map_or(UNKNOWN_PRIORITY, |lang| lang.priority)
    }

    /// Enabled languages, stable-sorted by ascending priority.
    pub fn all_enabled(&self) -> Vec<&Language> {
        let mut enabled: Vec<&Language> = self.languages.iter().filter(|l| l.enabled).collect();
        enabled.sort_by_key(|l| l.priority);
        enabled
    }

    /// Resolve any language code or tag to a known ISO code.
    ///
    /// Tries the ISO code, then the hreflang tag, then the base language
    /// before the first `-`, and finally falls back to `en`.
    pub fn normalize(&self, code: &str) -> String {
        if code.is_empty() {
            return FALLBACK_LANGUAGE.to_string();
        }

        let base = code.split('-').next().unwrap_or(code);

        self.get_by_iso(code)
            .or_else(|| self.get_by_hreflang(code))
            .or_else(|| self.get_by_iso(base))
            .map_or_else(
                || FALLBACK_LANGUAGE.to_string(),
                |lang| lang.iso_code.clone(),
            )
    }

    /// Resolve a URL path segment such as `zh` or `zh-cn`.
    pub fn from_url_segment(&self, segment: &str) -> String {
        self.normalize(segment.trim_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_iso() {
        let mapper = LanguageMapper::builtin();
        let lang = mapper.get_by_iso("en").expect("en exists");
        assert_eq!(lang.iso_code, "en");
        assert_eq!(lang.name, "English");

        assert!(mapper.get_by_iso("invalid").is_none());
        assert!(mapper.get_by_iso("").is_none());
    }

    #[test]
    fn test_get_by_iso_case_insensitive() {
        let mapper = LanguageMapper::builtin();
        assert_eq!(mapper.get_by_iso("EN").map(|l| l.iso_code.as_str()), Some("en"));
        assert_eq!(
            mapper.get_by_iso("ZH-TW").map(|l| l.iso_code.as_str()),
            Some("zh-tw")
        );
    }

    #[test]
    fn test_hreflang() {
        let mapper = LanguageMapper::builtin();
        assert_eq!(mapper.hreflang("en"), "en");
        assert_eq!(mapper.hreflang("zh"), "zh-CN");
        assert_eq!(mapper.hreflang("ja"), "ja-JP");
        assert_eq!(mapper.hreflang("invalid"), "invalid");
    }

    #[test]
    fn test_og_locale() {
        let mapper = LanguageMapper::builtin();
        assert_eq!(mapper.og_locale("en"), "en_US");
        assert_eq!(mapper.og_locale("zh"), "zh_CN");
        assert_eq!(mapper.og_locale("ja"), "ja_JP");
        assert_eq!(mapper.og_locale("xx-YY-zz"), "xx_YY-zz");
    }

    #[test]
    fn test_display_name() {
        let mapper = LanguageMapper::builtin();
        assert_eq!(mapper.display_name("zh", false), "Chinese (Simplified)");
        assert_eq!(mapper.display_name("zh", true), "简体中文");
        assert_eq!(mapper.display_name("ja", true), "日本語");
        assert_eq!(mapper.display_name("qq", true), "qq");
    }

    #[test]
    fn test_is_rtl() {
        let mapper = LanguageMapper::builtin();
        assert!(mapper.is_rtl("ar"));
        assert!(mapper.is_rtl("he"));
        assert!(!mapper.is_rtl("en"));
        assert!(!mapper.is_rtl("zh"));
        assert!(!mapper.is_rtl("unknown"));
    }

    #[test]
    fn test_normalize() {
        let mapper = LanguageMapper::builtin();
        assert_eq!(mapper.normalize("en"), "en");
        assert_eq!(mapper.normalize("EN"), "en");
        assert_eq!(mapper.normalize("zh-CN"), "zh");
        assert_eq!(mapper.normalize("zh-TW"), "zh-tw");
        assert_eq!(mapper.normalize("en-US"), "en");
        assert_eq!(mapper.normalize("pt-PT"), "pt");
        assert_eq!(mapper.normalize("bogus"), "en");
        assert_eq!(mapper.normalize(""), "en");
        assert_eq!(mapper.from_url_segment("/ja/"), "ja");
    }

    #[test]
    fn test_all_enabled_sorted_by_priority() {
        let mapper = LanguageMapper::builtin();
        let enabled = mapper.all_enabled();
        assert!(!enabled.is_empty());
        assert!(enabled.iter().all(|l| l.enabled));
        assert!(enabled.windows(2).all(|w| w[0].priority <= w[1].priority));
        assert!(enabled.iter().all(|l| l.iso_code != "he"));
    }

    #[test]
    fn test_all_enabled_stable_on_ties() {
        let lang = |code: &str, priority: u32| Language {
            iso_code: code.to_string(),
            iso6393: String::new(),
            hreflang: code.to_string(),
            og_locale: code.to_string(),
            name: code.to_string(),
            native_name: code.to_string(),
            region: None,
            rtl: false,
            enabled: true,
            priority,
        };
        let mapper = LanguageMapper::new(vec![lang("b", 2), lang("a", 1), lang("c", 2)]);
        let codes: Vec<_> = mapper
            .all_enabled()
            .iter()
            .map(|l| l.iso_code.as_str())
            .collect();
        assert_eq!(codes, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_accessors() {
        let mapper = LanguageMapper::builtin();
        assert_eq!(mapper.iso6393("ja"), Some("jpn"));
        assert_eq!(mapper.region("zh"), Some("CN"));
        assert_eq!(mapper.priority("en"), 1);
        assert_eq!(mapper.priority("unknown"), UNKNOWN_PRIORITY);
        assert!(mapper.is_enabled("en"));
        assert!(!mapper.is_enabled("unknown"));
    }

    #[test]
    fn test_load_json_table() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("languages.json");
        std::fs::write(
            &path,
            r#"[
                {"iso6391": "en", "iso6393": "eng", "hreflang": "en", "ogLocale": "en_US",
                 "name": "English", "nativeName": "English", "region": "US",
                 "rtl": false, "enabled": true, "priority": 1},
                {"isoCode": "fr", "hreflang": "fr-FR", "ogLocale": "fr_FR",
                 "name": "French", "nativeName": "Français", "priority": 2}
            ]"#,
        )
        .expect("write");

        let mapper = LanguageMapper::load(&path).expect("load table");
        assert_eq!(mapper.languages().len(), 2);
        assert_eq!(mapper.hreflang("fr"), "fr-FR");
        assert!(mapper.is_enabled("fr"));
        assert_eq!(mapper.normalize("ja"), "en");
    }

    #[test]
    fn test_load_malformed_json_is_data_file_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("languages.json");
        std::fs::write(&path, "{not json").expect("write");

        let err = LanguageMapper::load(&path).expect_err("malformed json");
        assert!(matches!(err, CoreError::DataFile { .. }));
        assert!(err.to_string().contains("languages.json"));
    }

    #[test]
    fn test_load_empty_table_fails() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("languages.json");
        std::fs::write(&path, "[]").expect("write");
        assert!(LanguageMapper::load(&path).is_err());
    }
}
