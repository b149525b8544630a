//! 槽位生成
//!
//! 从营业时段枚举候选槽位开始时间。纯函数、确定性、无状态，
//! 不过滤容量也不过滤过去的时间 — 那是台账的职责，
//! 所以生成器可以脱离持久化数据单测。

use chrono::{Duration, NaiveDate, NaiveTime};
use sqlx::SqlitePool;

use super::{ScheduleResult, calendar};
use super::calendar::OperatingWindow;
use shared::models::StoreScheduleConfig;

/// Enumerate slot start times for one operating window.
///
/// Start-inclusive, end-exclusive: stepping stops before any slot that
/// would start at or after `end`, which also drops a partial trailing
/// slot when the interval does not divide the window evenly.
pub fn slot_times(window: &OperatingWindow) -> Vec<NaiveTime> {
    // a non-positive interval would never terminate; config writes
    // reject it, so an empty grid is the only sane answer here
    if window.interval_minutes <= 0 {
        return Vec::new();
    }
    let step = Duration::minutes(window.interval_minutes);
    let mut times = Vec::new();
    let mut t = window.start;
    while t < window.end {
        times.push(t);
        // NaiveTime arithmetic wraps at midnight; a wrap means the next
        // step left the day, so the window is exhausted
        let (next, wrapped) = t.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        t = next;
    }
    times
}

/// Candidate slots for a config on a date; empty when the store does not
/// operate that weekday.
pub fn slots_for_config(
    config: &StoreScheduleConfig,
    date: NaiveDate,
) -> ScheduleResult<Vec<NaiveTime>> {
    if !calendar::operates_on(config, date) {
        return Ok(Vec::new());
    }
    let window = calendar::operating_window(config)?;
    Ok(slot_times(&window))
}

/// `generateSlots` contract: load config, then enumerate.
pub async fn generate_slots(
    pool: &SqlitePool,
    store_id: i64,
    date: NaiveDate,
) -> ScheduleResult<Vec<NaiveTime>> {
    let config = calendar::load_config(pool, store_id).await?;
    slots_for_config(&config, date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OperatingDays;

    fn window(start: &str, end: &str, interval: i64) -> OperatingWindow {
        OperatingWindow {
            start: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
            interval_minutes: interval,
        }
    }

    fn fmt(times: &[NaiveTime]) -> Vec<String> {
        times.iter().map(|t| t.format("%H:%M").to_string()).collect()
    }

    #[test]
    fn steps_from_start_exclusive_of_end() {
        let times = slot_times(&window("08:00", "10:00", 60));
        assert_eq!(fmt(&times), vec!["08:00", "09:00"]);
    }

    #[test]
    fn drops_partial_trailing_slot() {
        // 45-minute steps over a 2h window: 09:30 would run past 10:00
        // but still starts before it, so it is kept; 10:15 is not
        let times = slot_times(&window("08:00", "10:00", 45));
        assert_eq!(fmt(&times), vec!["08:00", "08:45", "09:30"]);
    }

    #[test]
    fn interval_spacing_is_exact() {
        let times = slot_times(&window("08:00", "18:00", 90));
        for pair in times.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::minutes(90));
        }
        assert_eq!(times.first().map(|t| fmt(&[*t])), Some(vec!["08:00".to_string()]));
        assert!(times.iter().all(|t| *t < window("08:00", "18:00", 90).end));
    }

    #[test]
    fn window_ending_at_midnight_terminates() {
        let times = slot_times(&window("22:00", "23:59", 60));
        assert_eq!(fmt(&times), vec!["22:00", "23:00"]);
    }

    #[test]
    fn non_operating_day_yields_empty() {
        let config = StoreScheduleConfig {
            store_id: 1,
            start_time: "08:00".into(),
            end_time: "10:00".into(),
            slot_interval_minutes: 60,
            capacity_per_slot: 2,
            operating_days: OperatingDays::from_weekdays(&[1, 2, 3, 4, 5, 6]),
            created_at: 0,
            updated_at: 0,
        };
        // 2026-08-09 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        assert!(slots_for_config(&config, sunday).unwrap().is_empty());

        // generator is timeless: a past operating date still enumerates
        let past_tuesday = NaiveDate::from_ymd_opt(2020, 8, 11).unwrap();
        assert_eq!(slots_for_config(&config, past_tuesday).unwrap().len(), 2);
    }
}
