use chrono::{Duration, NaiveDate};
use rand::Rng;
use thiserror::Error;

use crate::store::schema::{AppSettings, HistoryRecord, LunchOption};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no eligible options to draw from")]
    NoEligibleOptions,
}

/// A completed draw: the chosen option plus its index into the eligible
/// set, so the reel animation can land on it.
#[derive(Clone, Copy, Debug)]
pub struct Drawn<'a> {
    pub index: usize,
    pub option: &'a LunchOption,
}

/// The subset of options the recency filter allows, in list order.
///
/// With `exclude_recent` off this is every option. Otherwise an option is
/// excluded when its name appears in a history record dated strictly after
/// `today - exclude_days`. The comparison is calendar-day granularity
/// against the record's `date` field: with `exclude_days = 1`, a record
/// dated today excludes its name, yesterday's does not.
pub fn eligible<'a>(
    options: &'a [LunchOption],
    history: &[HistoryRecord],
    settings: &AppSettings,
    today: NaiveDate,
) -> Vec<&'a LunchOption> {
    if !settings.exclude_recent {
        return options.iter().collect();
    }

    let cutoff = today - Duration::days(settings.exclude_days);
    let recent: Vec<&str> = history
        .iter()
        .filter(|record| record.date > cutoff)
        .map(|record| record.selected.as_str())
        .collect();

    options
        .iter()
        .filter(|option| !recent.contains(&option.name.as_str()))
        .collect()
}

/// One uniform random draw over the eligible set. The engine never writes
/// history itself; the caller records the drawn name, so the persisted
/// record always equals the value shown as final.
pub fn draw<'a, R: Rng>(
    rng: &mut R,
    options: &'a [LunchOption],
    history: &[HistoryRecord],
    settings: &AppSettings,
    today: NaiveDate,
) -> Result<Drawn<'a>, SelectionError> {
    let pool = eligible(options, history, settings, today);
    if pool.is_empty() {
        return Err(SelectionError::NoEligibleOptions);
    }
    let index = rng.gen_range(0..pool.len());
    Ok(Drawn {
        index,
        option: pool[index],
    })
}
