//! 时间工具函数 — 设施时区转换
//!
//! 所有日期判断（会籍是否过期、当日活动统计）统一使用设施本地
//! 日历日，不使用 wall-clock instant。存储层只保存 `i64` Unix
//! millis 和 `%Y-%m-%d` 日期字符串。

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 当前设施本地时间
pub fn local_now(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// 当前设施本地日历日
pub fn local_today(tz: Tz) -> NaiveDate {
    local_now(tz).date_naive()
}

/// Unix millis → 设施本地日历日
///
/// Out-of-range millis fall back to the unix epoch date rather than
/// panicking; such timestamps only arise from corrupt records.
pub fn millis_to_local_date(millis: i64, tz: Tz) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .with_timezone(&tz)
        .date_naive()
}

/// 日期 → "YYYY-MM-DD" (activity_per_day 的 key)
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 日期 → "YYYY-MM" (monthly_revenue 的 key)
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format: {}", date)))
}
