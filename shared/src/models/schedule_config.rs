//! Store Schedule Configuration Model (排班配置)

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Weekday set, stored as a 7-bit mask (bit 0 = Sunday … bit 6 = Saturday).
///
/// On the wire this is a list of weekday numbers 0–6, e.g. `[1,2,3,4,5]`
/// for Monday through Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(transparent))]
pub struct OperatingDays(i64);

impl OperatingDays {
    /// Every day of the week
    pub const ALL: OperatingDays = OperatingDays(0b0111_1111);

    /// Build from weekday numbers (0 = Sunday … 6 = Saturday).
    ///
    /// Numbers outside 0–6 are ignored; deserialization rejects them instead.
    pub fn from_weekdays(days: &[u8]) -> Self {
        let mut mask = 0i64;
        for &d in days {
            if d <= 6 {
                mask |= 1 << d;
            }
        }
        Self(mask)
    }

    /// Whether the given weekday number (0 = Sunday) is in the set
    pub fn contains(&self, weekday: u8) -> bool {
        weekday <= 6 && self.0 & (1 << weekday) != 0
    }

    /// Weekday numbers in ascending order
    pub fn weekdays(&self) -> Vec<u8> {
        (0u8..=6).filter(|d| self.contains(*d)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0 & 0b0111_1111 == 0
    }
}

impl Serialize for OperatingDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.weekdays().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OperatingDays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = Vec::<u8>::deserialize(deserializer)?;
        if let Some(bad) = days.iter().find(|d| **d > 6) {
            return Err(serde::de::Error::custom(format!(
                "weekday number out of range 0-6: {bad}"
            )));
        }
        Ok(Self::from_weekdays(&days))
    }
}

/// Per-store schedule configuration (one row per store)
///
/// Drives slot generation: operating weekdays, daily window and slot
/// interval, plus the per-slot booking capacity. Never deleted, only
/// updated by store administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StoreScheduleConfig {
    pub store_id: i64,
    /// Daily opening time ("HH:MM")
    pub start_time: String,
    /// Daily closing time ("HH:MM"), must be after start_time
    pub end_time: String,
    /// Minutes between slot starts (e.g. 60)
    pub slot_interval_minutes: i64,
    /// Max concurrent non-cancelled appointments per slot
    pub capacity_per_slot: i64,
    /// Operating weekdays
    pub operating_days: OperatingDays,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert schedule configuration payload (admin settings page)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreScheduleConfigUpsert {
    pub start_time: String,
    pub end_time: String,
    pub slot_interval_minutes: i64,
    pub capacity_per_slot: i64,
    pub operating_days: OperatingDays,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_mask_round_trip() {
        let days = OperatingDays::from_weekdays(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(days.weekdays(), vec![1, 2, 3, 4, 5, 6]);
        assert!(days.contains(2));
        assert!(!days.contains(0));
        assert!(!days.is_empty());
    }

    #[test]
    fn out_of_range_weekday_rejected_on_deserialize() {
        let err = serde_json::from_str::<OperatingDays>("[1,7]");
        assert!(err.is_err());
    }

    #[test]
    fn serializes_as_weekday_list() {
        let days = OperatingDays::from_weekdays(&[0, 6]);
        assert_eq!(serde_json::to_string(&days).unwrap(), "[0,6]");
    }
}
