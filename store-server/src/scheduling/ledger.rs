//! 容量台账
//!
//! 把生成器的候选槽位和已预约计数合并成可用性列表。
//! 计数来自持久化的 appointment 行（cancelado 除外），
//! 一条 GROUP BY 查询搞定整天，避免 N+1。
//!
//! 台账是时间敏感的：过去的槽位不出现在可用性列表里。
//! 生成器保持无时间性，两者的差异由这里负责。

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use sqlx::SqlitePool;

use super::{ScheduleResult, calendar, slots};
use crate::db::repository::appointment;
use crate::utils::time::{format_date, format_time, store_local_now};
use shared::models::AvailableSlot;

/// Remaining capacity for one slot, clamped at zero.
///
/// Advisory read: not synchronized against concurrent bookings. The
/// coordinator re-checks under its atomic path before committing.
pub async fn remaining_capacity(
    pool: &SqlitePool,
    store_id: i64,
    date: NaiveDate,
    time: NaiveTime,
) -> ScheduleResult<i64> {
    let config = calendar::load_config(pool, store_id).await?;
    let booked = appointment::count_active_for_slot(
        pool,
        store_id,
        &format_date(date),
        &format_time(time),
    )
    .await?;
    Ok((config.capacity_per_slot - booked).max(0))
}

/// Availability listing for one date: slots with remaining capacity,
/// past slots excluded in store-local time.
pub async fn list_available_slots(
    pool: &SqlitePool,
    store_id: i64,
    date: NaiveDate,
    tz: Tz,
) -> ScheduleResult<Vec<AvailableSlot>> {
    let config = calendar::load_config(pool, store_id).await?;
    let times = slots::slots_for_config(&config, date)?;
    if times.is_empty() {
        return Ok(Vec::new());
    }

    let (today, now_time) = store_local_now(tz);
    if date < today {
        return Ok(Vec::new());
    }
    let cutoff = (date == today).then_some(now_time);

    let counts = appointment::booked_counts_for_date(pool, store_id, &format_date(date)).await?;
    Ok(merge_availability(
        &times,
        &counts,
        config.capacity_per_slot,
        cutoff,
    ))
}

/// Pure merge step: join candidate times with booked counts, drop slots
/// before the cutoff and slots with nothing remaining.
fn merge_availability(
    times: &[NaiveTime],
    counts: &HashMap<String, i64>,
    capacity_per_slot: i64,
    cutoff: Option<NaiveTime>,
) -> Vec<AvailableSlot> {
    times
        .iter()
        .filter(|t| cutoff.is_none_or(|c| **t >= c))
        .map(|t| {
            let time = format_time(*t);
            let booked = counts.get(&time).copied().unwrap_or(0);
            AvailableSlot {
                time,
                remaining: (capacity_per_slot - booked).max(0),
            }
        })
        .filter(|slot| slot.remaining > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn merges_counts_against_capacity() {
        let times = vec![t("08:00"), t("09:00"), t("10:00")];
        let counts = HashMap::from([("08:00".to_string(), 2), ("09:00".to_string(), 1)]);

        let slots = merge_availability(&times, &counts, 2, None);
        assert_eq!(
            slots,
            vec![
                AvailableSlot { time: "09:00".into(), remaining: 1 },
                AvailableSlot { time: "10:00".into(), remaining: 2 },
            ]
        );
    }

    #[test]
    fn overbooked_slot_clamps_to_zero_and_disappears() {
        let times = vec![t("08:00")];
        let counts = HashMap::from([("08:00".to_string(), 5)]);
        assert!(merge_availability(&times, &counts, 2, None).is_empty());
    }

    #[test]
    fn cutoff_drops_earlier_slots_only() {
        let times = vec![t("08:00"), t("09:00"), t("10:00")];
        let counts = HashMap::new();

        // a slot starting exactly at the cutoff is still bookable
        let slots = merge_availability(&times, &counts, 1, Some(t("09:00")));
        let remaining: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(remaining, vec!["09:00", "10:00"]);
    }
}
