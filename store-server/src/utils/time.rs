//! 时间工具函数 — 门店时区转换
//!
//! 所有日期/时间解析统一在 API handler 与调度层完成，
//! repository 层只接收 `"YYYY-MM-DD"` / `"HH:MM"` 文本和 `i64` millis。

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 格式化槽位时间 (HH:MM)
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// 格式化日期 (YYYY-MM-DD)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 门店时区的当前日期和时间
pub fn store_local_now(tz: Tz) -> (NaiveDate, NaiveTime) {
    let now = chrono::Utc::now().with_timezone(&tz);
    (now.date_naive(), now.time())
}

/// 槽位是否已经过去 (严格早于门店本地 now)
///
/// 正好从 now 开始的槽位仍可预约。
pub fn slot_in_past(date: NaiveDate, time: NaiveTime, tz: Tz) -> bool {
    let (today, now_time) = store_local_now(tz);
    date < today || (date == today && time < now_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_date_and_time() {
        assert_eq!(
            parse_date("2026-08-11").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 11).unwrap()
        );
        assert_eq!(
            parse_time("08:00").unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_date("11/08/2026").is_err());
        assert!(parse_time("8am").is_err());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn format_round_trips() {
        let t = parse_time("09:30").unwrap();
        assert_eq!(format_time(t), "09:30");
        let d = parse_date("2026-01-05").unwrap();
        assert_eq!(format_date(d), "2026-01-05");
    }
}
