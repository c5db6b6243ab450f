use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use crate::store::schema::{
    AppData, HistoryRecord, LunchOption, NewOption, OptionPatch, SettingsPatch,
};

const DATA_FILE: &str = "data.json";

/// Durable storage for the [`AppData`] aggregate: one JSON file under the
/// platform data dir. Every mutation helper performs a full
/// load, modify, save cycle. There is no internal locking: single
/// process, one operation at a time, by caller discipline.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lunchpick");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn data_path(&self) -> PathBuf {
        self.base_dir.join(DATA_FILE)
    }

    /// Read the aggregate. A missing file, an unreadable file, and a
    /// corrupt record all degrade to the default aggregate; loading
    /// never fails outward. Records missing fields are filled from
    /// defaults during deserialization.
    pub fn load(&self) -> AppData {
        let path = self.data_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => AppData::default(),
            }
        } else {
            AppData::default()
        }
    }

    /// Serialize and write the full aggregate. Write failures surface to
    /// the caller so the UI can warn that a change may not persist.
    pub fn save(&self, data: &AppData) -> Result<()> {
        let path = self.data_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Unique across the process lifetime: millisecond timestamp plus a
    /// random suffix, so creations within the same millisecond cannot
    /// collide.
    fn fresh_id() -> String {
        format!("{}-{:08x}", Utc::now().timestamp_millis(), rand::random::<u32>())
    }

    pub fn add_option(&self, option: NewOption) -> Result<AppData> {
        let mut data = self.load();
        data.lunch_options.push(LunchOption {
            id: Self::fresh_id(),
            name: option.name,
            kind: option.kind,
            liked: option.liked,
            location: option.location,
            created_at: Utc::now(),
        });
        self.save(&data)?;
        Ok(data)
    }

    /// Shallow-merge `patch` into the option with `id`. An unknown id is a
    /// no-op and skips the write entirely.
    pub fn update_option(&self, id: &str, patch: &OptionPatch) -> Result<AppData> {
        let mut data = self.load();
        if let Some(option) = data.lunch_options.iter_mut().find(|o| o.id == id) {
            patch.apply(option);
            self.save(&data)?;
        }
        Ok(data)
    }

    /// Remove the option with `id`. Saves unconditionally; an absent id is
    /// not an error.
    pub fn delete_option(&self, id: &str) -> Result<AppData> {
        let mut data = self.load();
        data.lunch_options.retain(|o| o.id != id);
        self.save(&data)?;
        Ok(data)
    }

    /// Record one completed draw, newest-first. `selected` is a snapshot
    /// of the chosen option's name, not a reference.
    pub fn add_history(&self, selected: &str) -> Result<AppData> {
        let mut data = self.load();
        let now = Utc::now();
        data.history.insert(
            0,
            HistoryRecord {
                id: Self::fresh_id(),
                date: now.date_naive(),
                selected: selected.to_string(),
                timestamp: now.timestamp_millis(),
            },
        );
        self.save(&data)?;
        Ok(data)
    }

    pub fn update_settings(&self, patch: &SettingsPatch) -> Result<AppData> {
        let mut data = self.load();
        patch.apply(&mut data.settings);
        self.save(&data)?;
        Ok(data)
    }

    pub fn clear_favorites(&self) -> Result<AppData> {
        let mut data = self.load();
        data.lunch_options.clear();
        self.save(&data)?;
        Ok(data)
    }

    pub fn clear_history(&self) -> Result<AppData> {
        let mut data = self.load();
        data.history.clear();
        self.save(&data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{Language, ThemeMode};
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn new_option(name: &str) -> NewOption {
        NewOption {
            name: name.to_string(),
            kind: "noodles".to_string(),
            location: None,
            liked: false,
        }
    }

    #[test]
    fn load_on_empty_storage_yields_defaults() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load(), AppData::default());
        // Loading twice is idempotent and still writes nothing
        assert_eq!(store.load(), AppData::default());
        assert!(!store.data_path().exists());
    }

    #[test]
    fn corrupt_record_degrades_to_defaults() {
        let (_dir, store) = make_test_store();
        fs::write(store.data_path(), "{not json").unwrap();
        assert_eq!(store.load(), AppData::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = make_test_store();
        let data = store.add_option(new_option("Ramen-ya")).unwrap();
        assert_eq!(store.load(), data);
    }

    #[test]
    fn add_appends_one_with_fresh_id() {
        let (_dir, store) = make_test_store();
        store.add_option(new_option("Ramen-ya")).unwrap();
        let data = store.add_option(new_option("Curry House")).unwrap();

        assert_eq!(data.lunch_options.len(), 2);
        let added = &data.lunch_options[1];
        assert_eq!(added.name, "Curry House");
        assert_eq!(added.kind, "noodles");
        assert!(!added.id.is_empty());
        assert_ne!(data.lunch_options[0].id, added.id);
    }

    #[test]
    fn fresh_ids_do_not_collide_in_rapid_succession() {
        let ids: Vec<String> = (0..100).map(|_| JsonStore::fresh_id()).collect();
        let unique: std::collections::HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn update_changes_only_the_named_field() {
        let (_dir, store) = make_test_store();
        store.add_option(new_option("Ramen-ya")).unwrap();
        let before = store.add_option(new_option("Curry House")).unwrap();
        let id = before.lunch_options[0].id.clone();

        let after = store
            .update_option(
                &id,
                &OptionPatch {
                    liked: Some(true),
                    ..OptionPatch::default()
                },
            )
            .unwrap();

        assert!(after.lunch_options[0].liked);
        let mut expected = before.lunch_options[0].clone();
        expected.liked = true;
        assert_eq!(after.lunch_options[0], expected);
        // The other record is untouched
        assert_eq!(after.lunch_options[1], before.lunch_options[1]);
    }

    #[test]
    fn update_unknown_id_is_a_no_op_without_a_write() {
        let (_dir, store) = make_test_store();
        let before = store.add_option(new_option("Ramen-ya")).unwrap();
        let mtime = fs::metadata(store.data_path()).unwrap().modified().unwrap();

        let after = store
            .update_option(
                "no-such-id",
                &OptionPatch {
                    liked: Some(true),
                    ..OptionPatch::default()
                },
            )
            .unwrap();

        assert_eq!(after, before);
        let mtime_after = fs::metadata(store.data_path()).unwrap().modified().unwrap();
        assert_eq!(mtime, mtime_after);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let (_dir, store) = make_test_store();
        store.add_option(new_option("Ramen-ya")).unwrap();
        let before = store.add_option(new_option("Curry House")).unwrap();
        let id = before.lunch_options[0].id.clone();

        let after = store.delete_option(&id).unwrap();
        assert_eq!(after.lunch_options.len(), 1);
        assert_eq!(after.lunch_options[0], before.lunch_options[1]);
    }

    #[test]
    fn delete_unknown_id_leaves_records_intact() {
        let (_dir, store) = make_test_store();
        let before = store.add_option(new_option("Ramen-ya")).unwrap();
        let after = store.delete_option("no-such-id").unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn history_is_newest_first() {
        let (_dir, store) = make_test_store();
        store.add_history("Ramen-ya").unwrap();
        store.add_history("Curry House").unwrap();
        let data = store.add_history("Taco Stand").unwrap();

        let names: Vec<&str> = data.history.iter().map(|r| r.selected.as_str()).collect();
        assert_eq!(names, ["Taco Stand", "Curry House", "Ramen-ya"]);
    }

    #[test]
    fn history_survives_option_deletion() {
        let (_dir, store) = make_test_store();
        let data = store.add_option(new_option("Ramen-ya")).unwrap();
        let id = data.lunch_options[0].id.clone();
        store.add_history("Ramen-ya").unwrap();

        let after = store.delete_option(&id).unwrap();
        assert!(after.lunch_options.is_empty());
        assert_eq!(after.history.len(), 1);
        assert_eq!(after.history[0].selected, "Ramen-ya");
    }

    #[test]
    fn settings_merge_is_partial() {
        let (_dir, store) = make_test_store();
        let data = store
            .update_settings(&SettingsPatch {
                theme: Some(ThemeMode::Light),
                ..SettingsPatch::default()
            })
            .unwrap();

        assert_eq!(data.settings.theme, ThemeMode::Light);
        assert_eq!(data.settings.language, Language::ZhTw);
        assert!(data.settings.exclude_recent);
        assert_eq!(data.settings.exclude_days, 1);
    }

    #[test]
    fn clear_operations_are_total_and_scoped() {
        let (_dir, store) = make_test_store();
        store.add_option(new_option("Ramen-ya")).unwrap();
        store.add_history("Ramen-ya").unwrap();
        store
            .update_settings(&SettingsPatch {
                exclude_days: Some(7),
                ..SettingsPatch::default()
            })
            .unwrap();

        let data = store.clear_favorites().unwrap();
        assert!(data.lunch_options.is_empty());
        assert_eq!(data.history.len(), 1);
        assert_eq!(data.settings.exclude_days, 7);

        let data = store.clear_history().unwrap();
        assert!(data.history.is_empty());
        assert_eq!(data.settings.exclude_days, 7);
    }

    #[test]
    fn save_failure_surfaces_to_the_caller() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore {
            base_dir: dir.path().join("nonexistent_subdir"),
        };
        assert!(store.save(&AppData::default()).is_err());
        assert!(store.add_history("Ramen-ya").is_err());
    }
}
