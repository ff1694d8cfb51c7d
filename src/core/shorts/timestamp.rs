//! 时间戳校验 - 严格的 "HH:MM:SS" 格式与数值范围检查

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static TIMESTAMP_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("时间戳格式正则非法"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    Hours,
    Minutes,
    Seconds,
}

impl std::fmt::Display for TimestampField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimestampField::Hours => "小时",
            TimestampField::Minutes => "分钟",
            TimestampField::Seconds => "秒",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// 不满足两位数、冒号分隔的严格格式
    #[error("时间戳格式错误: {0:?}，要求 HH:MM:SS")]
    Format(String),
    /// 格式正确但数值越界
    #[error("时间戳 {token:?} 的{field}超出范围: {value}")]
    Range {
        token: String,
        field: TimestampField,
        value: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("结束时间必须晚于开始时间: startTime={start:?}, endTime={end:?}")]
pub struct OrderingError {
    pub start: String,
    pub end: String,
}

/// 时间戳格式匹配器，校验器通过它判断 token 是否形如 HH:MM:SS。
/// 默认用正则实现，测试中可注入替身。
pub trait FormatMatcher {
    fn is_match(&self, token: &str) -> bool;
}

pub struct RegexFormatMatcher;

impl FormatMatcher for RegexFormatMatcher {
    fn is_match(&self, token: &str) -> bool {
        TIMESTAMP_FORMAT.is_match(token)
    }
}

pub struct TimestampValidator {
    matcher: Box<dyn FormatMatcher + Send + Sync>,
}

impl TimestampValidator {
    pub fn new() -> Self {
        Self::with_matcher(Box::new(RegexFormatMatcher))
    }

    pub fn with_matcher(matcher: Box<dyn FormatMatcher + Send + Sync>) -> Self {
        Self { matcher }
    }

    /// 校验单个时间戳 token。
    ///
    /// 负数或单位数的分量（如 "-1:00:00"、"1:23:45"）在格式阶段就会被
    /// 拒绝，不会进入范围检查。
    pub fn validate(&self, token: &str) -> Result<(), TimestampError> {
        if !self.matcher.is_match(token) {
            return Err(TimestampError::Format(token.to_string()));
        }
        let (hours, minutes, seconds) = field_values(token);
        if hours > 23 {
            return Err(TimestampError::Range {
                token: token.to_string(),
                field: TimestampField::Hours,
                value: hours,
            });
        }
        if minutes > 59 {
            return Err(TimestampError::Range {
                token: token.to_string(),
                field: TimestampField::Minutes,
                value: minutes,
            });
        }
        if seconds > 59 {
            return Err(TimestampError::Range {
                token: token.to_string(),
                field: TimestampField::Seconds,
                value: seconds,
            });
        }
        Ok(())
    }

    /// 要求 `end` 严格晚于 `start`（按总秒数比较，相等视为错误）。
    /// 只对已通过 [`validate`](Self::validate) 的 token 有意义。
    pub fn compare_after(&self, start: &str, end: &str) -> Result<(), OrderingError> {
        if total_seconds(end) > total_seconds(start) {
            Ok(())
        } else {
            Err(OrderingError {
                start: start.to_string(),
                end: end.to_string(),
            })
        }
    }
}

impl Default for TimestampValidator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn total_seconds(token: &str) -> u32 {
    let (hours, minutes, seconds) = field_values(token);
    hours * 3600 + minutes * 60 + seconds
}

fn field_values(token: &str) -> (u32, u32, u32) {
    let mut parts = token.splitn(3, ':').map(|p| p.parse::<u32>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}
