//! End-to-end walk over the persistence and selection properties, through
//! the public library surface against a temp-dir store.

use chrono::{Duration, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use lunchpick::engine::selection::{self, SelectionError};
use lunchpick::store::json_store::JsonStore;
use lunchpick::store::schema::{
    AppData, Language, NewOption, OptionPatch, SettingsPatch, ThemeMode,
};

fn make_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

fn option(name: &str) -> NewOption {
    NewOption {
        name: name.to_string(),
        kind: "noodles".to_string(),
        location: Some("B1 food court".to_string()),
        liked: false,
    }
}

#[test]
fn fresh_store_loads_the_default_aggregate() {
    let (_dir, store) = make_store();
    let data = store.load();
    assert_eq!(data, AppData::default());
    assert_eq!(data.settings.theme, ThemeMode::Dark);
    assert_eq!(data.settings.language, Language::ZhTw);
    assert!(data.settings.exclude_recent);
    assert_eq!(data.settings.exclude_days, 1);
}

#[test]
fn aggregate_survives_a_process_restart() {
    let dir = TempDir::new().unwrap();
    {
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        store.add_option(option("Ramen-ya")).unwrap();
        store.add_history("Ramen-ya").unwrap();
        store
            .update_settings(&SettingsPatch {
                language: Some(Language::En),
                ..SettingsPatch::default()
            })
            .unwrap();
    }

    // A fresh store over the same directory sees everything
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let data = store.load();
    assert_eq!(data.lunch_options.len(), 1);
    assert_eq!(data.lunch_options[0].name, "Ramen-ya");
    assert_eq!(data.history.len(), 1);
    assert_eq!(data.settings.language, Language::En);
}

#[test]
fn full_user_journey() {
    let (_dir, store) = make_store();
    let mut rng = SmallRng::seed_from_u64(99);
    let today = Utc::now().date_naive();

    // Add two options, like one of them
    let data = store.add_option(option("Ramen-ya")).unwrap();
    let data2 = store.add_option(option("Curry House")).unwrap();
    assert_eq!(data2.lunch_options.len(), data.lunch_options.len() + 1);

    let ramen_id = data2.lunch_options[0].id.clone();
    let data3 = store
        .update_option(
            &ramen_id,
            &OptionPatch {
                liked: Some(true),
                ..OptionPatch::default()
            },
        )
        .unwrap();
    assert!(data3.lunch_options[0].liked);
    assert_eq!(data3.lunch_options[1], data2.lunch_options[1]);

    // Draw and record; the drawn name lands at the head of history
    let drawn = selection::draw(
        &mut rng,
        &data3.lunch_options,
        &data3.history,
        &data3.settings,
        today,
    )
    .unwrap();
    let drawn_name = drawn.option.name.clone();
    let data4 = store.add_history(&drawn_name).unwrap();
    assert_eq!(data4.history[0].selected, drawn_name);
    assert_eq!(data4.history[0].date, today);

    // With the default one-day window, today's pick is now ineligible
    let pool = selection::eligible(&data4.lunch_options, &data4.history, &data4.settings, today);
    assert_eq!(pool.len(), 1);
    assert_ne!(pool[0].name, drawn_name);

    // Draw the remaining one; now nothing is eligible
    let second_name = pool[0].name.clone();
    let data5 = store.add_history(&second_name).unwrap();
    assert_eq!(
        data5.history.iter().map(|r| r.selected.as_str()).collect::<Vec<_>>(),
        [second_name.as_str(), drawn_name.as_str()]
    );
    let blocked = selection::draw(
        &mut rng,
        &data5.lunch_options,
        &data5.history,
        &data5.settings,
        today,
    );
    assert_eq!(blocked.unwrap_err(), SelectionError::NoEligibleOptions);
    // A blocked draw writes nothing
    assert_eq!(store.load().history.len(), 2);

    // Widening the window changes nothing today; disabling the filter does
    let data6 = store
        .update_settings(&SettingsPatch {
            exclude_recent: Some(false),
            ..SettingsPatch::default()
        })
        .unwrap();
    let pool = selection::eligible(&data6.lunch_options, &data6.history, &data6.settings, today);
    assert_eq!(pool.len(), 2);

    // Deleting the drawn option leaves its history record behind
    let drawn_id = data6
        .lunch_options
        .iter()
        .find(|o| o.name == drawn_name)
        .map(|o| o.id.clone())
        .unwrap();
    let data7 = store.delete_option(&drawn_id).unwrap();
    assert_eq!(data7.lunch_options.len(), 1);
    assert!(data7.history.iter().any(|r| r.selected == drawn_name));

    // Clears are total and scoped
    let data8 = store.clear_history().unwrap();
    assert!(data8.history.is_empty());
    assert_eq!(data8.lunch_options.len(), 1);
    let data9 = store.clear_favorites().unwrap();
    assert!(data9.lunch_options.is_empty());
    assert!(!data9.settings.exclude_recent);
}

#[test]
fn yesterdays_draw_no_longer_blocks_today() {
    let (_dir, store) = make_store();
    let today = Utc::now().date_naive();

    let data = store.add_option(option("Ramen-ya")).unwrap();
    store.add_history("Ramen-ya").unwrap();

    // Pretend the draw happened yesterday by rewriting the record date
    let mut aged = store.load();
    aged.history[0].date = today - Duration::days(1);
    store.save(&aged).unwrap();

    let data_now = store.load();
    let pool = selection::eligible(&data_now.lunch_options, &data_now.history, &data_now.settings, today);
    assert_eq!(pool.len(), data.lunch_options.len());

    // A two-day window still blocks it
    let wide = store
        .update_settings(&SettingsPatch {
            exclude_days: Some(2),
            ..SettingsPatch::default()
        })
        .unwrap();
    let pool = selection::eligible(&wide.lunch_options, &wide.history, &wide.settings, today);
    assert!(pool.is_empty());
}

#[test]
fn hand_edited_partial_record_still_loads() {
    let (dir, store) = make_store();
    std::fs::write(
        dir.path().join("data.json"),
        r#"{"lunchOptions": [{"id": "1", "name": "Ramen-ya", "type": "noodles", "liked": true, "createdAt": "2026-08-01T03:00:00Z"}]}"#,
    )
    .unwrap();

    let data = store.load();
    assert_eq!(data.lunch_options.len(), 1);
    assert_eq!(data.lunch_options[0].kind, "noodles");
    assert_eq!(data.lunch_options[0].location, None);
    assert!(data.history.is_empty());
    assert_eq!(data.settings.exclude_days, 1);
}
