//! 时间类型模块
//!
//! `Timestamp` 是审计日志使用的时间点，序列化为 RFC 3339 字符串。
//! 后端给出的时间格式并不统一，解析时尽量宽容。缺失的时间取当前时间，
//! 存在但无法解析的值回落到 Unix 纪元。

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// UTC 时间点
///
/// `Default` 为 Unix 纪元，用作无法解析时的安全默认值
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    #[inline]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// 从毫秒时间戳创建，超出范围返回 None
    pub fn from_millis(ms: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(ms).map(Self)
    }

    /// 解析后端可能给出的几种字符串格式
    ///
    /// 依次尝试：RFC 3339、`YYYY-MM-DD HH:MM:SS`、`YYYY-MM-DDTHH:MM:SS`、`YYYY-MM-DD`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Self(naive.and_utc()));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// 从 JSON 字段容错解析：字符串或毫秒数字
    ///
    /// 字段缺失、为 `null`、空字符串或 `0` 时取当前时间；
    /// 有值但认不出来时回落到 Unix 纪元，这类记录排在最后。
    pub fn from_json(value: Option<&Value>) -> Self {
        let parsed = match value {
            None | Some(Value::Null) => return Self::now(),
            Some(Value::String(s)) if s.trim().is_empty() => return Self::now(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Self::now(),
            Some(Value::String(s)) => Self::parse(s),
            Some(Value::Number(n)) => n.as_i64().and_then(Self::from_millis),
            _ => None,
        };
        parsed.unwrap_or_default()
    }

    #[inline]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// ISO 8601 字符串（毫秒精度，`Z` 结尾）
    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// 表格中展示用的格式
    pub fn display(&self) -> String {
        self.0.format("%d/%m/%Y %H:%M").to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rfc3339_and_plain_formats() {
        let a = Timestamp::parse("2024-05-01T10:30:00Z").unwrap();
        let b = Timestamp::parse("2024-05-01 10:30:00").unwrap();
        let c = Timestamp::parse("2024-05-01T12:30:00+02:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.to_iso(), "2024-05-01T10:30:00.000Z");
    }

    #[test]
    fn json_number_is_epoch_millis() {
        let ts = Timestamp::from_json(Some(&json!(1_700_000_000_000i64)));
        assert_eq!(ts.as_millis(), 1_700_000_000_000);
    }

    #[test]
    fn garbage_falls_back_to_epoch() {
        assert_eq!(Timestamp::from_json(Some(&json!("yesterday"))), Timestamp::default());
        assert_eq!(Timestamp::from_json(Some(&json!({"x": 1}))), Timestamp::default());
    }

    #[test]
    fn missing_value_is_now() {
        let before = Timestamp::now();
        for value in [None, Some(json!(null)), Some(json!("")), Some(json!(0))] {
            let ts = Timestamp::from_json(value.as_ref());
            assert!(ts >= before);
            assert!(ts <= Timestamp::now());
        }
    }
}
