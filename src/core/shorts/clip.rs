//! 剪辑候选校验 - 必填字段与时间顺序

use crate::core::shorts::timestamp::TimestampValidator;
use crate::core::shorts::ParseError;
use crate::models::shorts::ClipCandidate;

pub struct ClipValidator {
    timestamps: TimestampValidator,
}

impl ClipValidator {
    pub fn new() -> Self {
        Self {
            timestamps: TimestampValidator::new(),
        }
    }

    pub fn with_timestamp_validator(timestamps: TimestampValidator) -> Self {
        Self { timestamps }
    }

    /// 依次检查：title / startTime / endTime 非空，两个时间戳合法，
    /// 且 endTime 严格晚于 startTime。其余字段不做校验。
    pub fn validate(&self, clip: &ClipCandidate) -> Result<(), ParseError> {
        if clip.title.trim().is_empty() {
            return Err(ParseError::MissingField("title"));
        }
        if clip.start_time.trim().is_empty() {
            return Err(ParseError::MissingField("startTime"));
        }
        if clip.end_time.trim().is_empty() {
            return Err(ParseError::MissingField("endTime"));
        }
        self.timestamps
            .validate(&clip.start_time)
            .map_err(ParseError::InvalidStartTime)?;
        self.timestamps
            .validate(&clip.end_time)
            .map_err(ParseError::InvalidEndTime)?;
        self.timestamps
            .compare_after(&clip.start_time, &clip.end_time)?;
        Ok(())
    }
}

impl Default for ClipValidator {
    fn default() -> Self {
        Self::new()
    }
}
