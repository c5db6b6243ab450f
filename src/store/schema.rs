use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A candidate restaurant/meal entry.
///
/// `id` and `created_at` are assigned by the store at creation and never
/// change afterwards. `name` is the value history records refer back to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LunchOption {
    pub id: String,
    pub name: String,
    /// Free-text category ("type" on disk; `type` is reserved in Rust).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One completed draw. History records are name-based snapshots: they are
/// not updated or invalidated when the originating option is renamed or
/// deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    /// Calendar date of the draw (YYYY-MM-DD). The recency filter compares
    /// against this field, not `timestamp`.
    pub date: NaiveDate,
    pub selected: String,
    /// Milliseconds since epoch at creation.
    pub timestamp: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn asset_name(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub fn locale(self) -> &'static str {
        match self {
            Language::ZhTw => "zh-TW",
            Language::ZhCn => "zh-CN",
            Language::En => "en",
        }
    }

    /// Native-script label, shown in the settings panel.
    pub fn label(self) -> &'static str {
        match self {
            Language::ZhTw => "繁體中文",
            Language::ZhCn => "简体中文",
            Language::En => "English",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Language::ZhTw => Language::ZhCn,
            Language::ZhCn => Language::En,
            Language::En => Language::ZhTw,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Language::ZhTw => Language::En,
            Language::ZhCn => Language::ZhTw,
            Language::En => Language::ZhCn,
        }
    }

    pub fn from_locale(locale: &str) -> Option<Self> {
        match locale {
            "zh-TW" => Some(Language::ZhTw),
            "zh-CN" => Some(Language::ZhCn),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// Global preferences, stored inside the aggregate. Per-field serde
/// defaults let a record written by an older build (or missing the
/// settings object entirely) deserialize into usable values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_theme")]
    pub theme: ThemeMode,
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default = "default_exclude_recent")]
    pub exclude_recent: bool,
    #[serde(default = "default_exclude_days")]
    pub exclude_days: i64,
}

fn default_theme() -> ThemeMode {
    ThemeMode::Dark
}
fn default_language() -> Language {
    Language::ZhTw
}
fn default_exclude_recent() -> bool {
    true
}
fn default_exclude_days() -> i64 {
    1
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language(),
            exclude_recent: default_exclude_recent(),
            exclude_days: default_exclude_days(),
        }
    }
}

/// The aggregate root: the sole unit of persistence. Every mutation loads
/// the full aggregate, changes one part, and writes the whole thing back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub lunch_options: Vec<LunchOption>,
    /// Newest-first.
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    #[serde(default)]
    pub settings: AppSettings,
}

/// Fields for a new option; id and created_at are assigned by the store.
#[derive(Clone, Debug)]
pub struct NewOption {
    pub name: String,
    pub kind: String,
    pub location: Option<String>,
    pub liked: bool,
}

/// Partial update for an option. `None` leaves the field untouched;
/// `location` is doubly optional so `Some(None)` can clear it.
#[derive(Clone, Debug, Default)]
pub struct OptionPatch {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub location: Option<Option<String>>,
    pub liked: Option<bool>,
}

impl OptionPatch {
    pub fn apply(&self, option: &mut LunchOption) {
        if let Some(ref name) = self.name {
            option.name = name.clone();
        }
        if let Some(ref kind) = self.kind {
            option.kind = kind.clone();
        }
        if let Some(ref location) = self.location {
            option.location = location.clone();
        }
        if let Some(liked) = self.liked {
            option.liked = liked;
        }
    }
}

/// Partial settings merge.
#[derive(Clone, Debug, Default)]
pub struct SettingsPatch {
    pub theme: Option<ThemeMode>,
    pub language: Option<Language>,
    pub exclude_recent: Option<bool>,
    pub exclude_days: Option<i64>,
}

impl SettingsPatch {
    pub fn apply(&self, settings: &mut AppSettings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(exclude_recent) = self.exclude_recent {
            settings.exclude_recent = exclude_recent;
        }
        if let Some(exclude_days) = self.exclude_days {
            settings.exclude_days = exclude_days;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_fills_all_defaults() {
        let data: AppData = serde_json::from_str("{}").unwrap();
        assert!(data.lunch_options.is_empty());
        assert!(data.history.is_empty());
        assert_eq!(data.settings, AppSettings::default());
    }

    #[test]
    fn partial_settings_fill_missing_fields() {
        // A record written before excludeDays existed still loads.
        let json = r#"{"settings": {"theme": "light", "language": "en"}}"#;
        let data: AppData = serde_json::from_str(json).unwrap();
        assert_eq!(data.settings.theme, ThemeMode::Light);
        assert_eq!(data.settings.language, Language::En);
        assert!(data.settings.exclude_recent);
        assert_eq!(data.settings.exclude_days, 1);
    }

    #[test]
    fn option_serializes_with_original_field_names() {
        let option = LunchOption {
            id: "1700000000000-0a0a0a0a".to_string(),
            name: "Ramen-ya".to_string(),
            kind: "noodles".to_string(),
            liked: true,
            location: None,
            created_at: "2026-08-01T12:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["type"], "noodles");
        assert!(json["createdAt"].is_string());
        // Absent location is omitted, not null
        assert!(json.get("location").is_none());
    }

    #[test]
    fn history_date_round_trips_as_plain_date() {
        let record = HistoryRecord {
            id: "x".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            selected: "Ramen-ya".to_string(),
            timestamp: 1_786_000_000_000,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2026-08-06");
        let back: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn aggregate_uses_camel_case_container_keys() {
        let data = AppData::default();
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("lunchOptions").is_some());
        assert!(json.get("history").is_some());
        assert_eq!(json["settings"]["excludeRecent"], true);
        assert_eq!(json["settings"]["language"], "zh-TW");
    }

    #[test]
    fn option_patch_is_field_scoped() {
        let mut option = LunchOption {
            id: "1".to_string(),
            name: "Curry House".to_string(),
            kind: "curry".to_string(),
            liked: false,
            location: Some("2F".to_string()),
            created_at: Utc::now(),
        };
        let before = option.clone();
        OptionPatch {
            liked: Some(true),
            ..OptionPatch::default()
        }
        .apply(&mut option);
        assert!(option.liked);
        assert_eq!(option.name, before.name);
        assert_eq!(option.kind, before.kind);
        assert_eq!(option.location, before.location);
    }

    #[test]
    fn option_patch_can_clear_location() {
        let mut option = LunchOption {
            id: "1".to_string(),
            name: "Curry House".to_string(),
            kind: String::new(),
            liked: false,
            location: Some("2F".to_string()),
            created_at: Utc::now(),
        };
        OptionPatch {
            location: Some(None),
            ..OptionPatch::default()
        }
        .apply(&mut option);
        assert_eq!(option.location, None);
    }

    #[test]
    fn settings_patch_merges_partially() {
        let mut settings = AppSettings::default();
        SettingsPatch {
            theme: Some(ThemeMode::Light),
            ..SettingsPatch::default()
        }
        .apply(&mut settings);
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.language, Language::ZhTw);
        assert!(settings.exclude_recent);
        assert_eq!(settings.exclude_days, 1);
    }
}
