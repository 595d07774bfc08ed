use crate::types::Timestamp;
use chrono::{DateTime, Local, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Format a Unix millis timestamp in local time for receipts and prompts.
///
/// Out-of-range values fall back to the raw number.
pub fn format_millis(millis: Timestamp) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => millis.to_string(),
    }
}
