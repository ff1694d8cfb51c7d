//! 剪辑建议解析 - 从 LLM 响应文本中恢复结构化的剪辑列表
//!
//! 模型的返回形态并不稳定：干净 YAML、代码围栏包裹的 YAML、缩进错乱的
//! YAML、JSON 数组、松散的 key:value 行、甚至只有成对的时间戳。
//! 解析按策略级联：结构化解码 → 行扫描 → 时间戳对扫描，
//! 任一策略产出候选后立即全量校验。

use log::{debug, warn};
use thiserror::Error;

use crate::models::shorts::{ClipCandidate, ParseResult, ShortsDocument, Strategy};

mod clip;
mod heuristic;
mod pairs;
mod structured;
mod timestamp;

pub use clip::ClipValidator;
pub use timestamp::{
    total_seconds, FormatMatcher, OrderingError, RegexFormatMatcher, TimestampError,
    TimestampField, TimestampValidator,
};

/// 错误信息里保留的响应预览长度（字符数）
const PREVIEW_LIMIT: usize = 500;
const PREVIEW_MARKER: &str = "…(已截断)";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("缺少必填字段: {0}")]
    MissingField(&'static str),
    #[error("startTime 无效: {0}")]
    InvalidStartTime(TimestampError),
    #[error("endTime 无效: {0}")]
    InvalidEndTime(TimestampError),
    #[error(transparent)]
    Ordering(#[from] OrderingError),
    #[error("未能从模型响应中解析出任何剪辑候选，响应预览: {preview}")]
    EmptyResult { preview: String },
    #[error("生成 YAML 输出失败: {0}")]
    Encode(#[from] serde_yaml::Error),
}

/// 解析入口。对一次模型响应依次尝试三种策略，
/// 取第一个产出非空候选列表的策略。
///
/// 注意：只要某个策略产出了候选，其中任何一条校验失败都会让
/// 整个解析以该错误终止，不会丢弃单条候选继续，也不会降级到
/// 更宽松的策略。宁可让上游整体重试，也不输出可疑的部分结果。
pub struct ShortsParser {
    validator: ClipValidator,
}

impl ShortsParser {
    pub fn new() -> Self {
        Self::with_validator(ClipValidator::new())
    }

    pub fn with_validator(validator: ClipValidator) -> Self {
        Self { validator }
    }

    pub fn parse(&self, response: &str) -> Result<ParseResult, ParseError> {
        if let Some(clips) = structured::extract_clips(response) {
            return self.accept(clips, Strategy::Structured);
        }
        debug!("结构化解码未命中，降级到行扫描");

        let clips = heuristic::scan_lines(response);
        if !clips.is_empty() {
            return self.accept(clips, Strategy::HeuristicLines);
        }
        debug!("行扫描未命中，降级到时间戳对扫描");

        let clips = pairs::scan_timestamp_pairs(response);
        if !clips.is_empty() {
            return self.accept(clips, Strategy::TimestampPairs);
        }

        warn!("全部策略落空，响应共 {} 字符", response.chars().count());
        Err(ParseError::EmptyResult {
            preview: preview(response),
        })
    }

    /// 解析后直接渲染成下游落盘用的 YAML 文档
    pub fn parse_to_yaml(&self, response: &str, source_video: &str) -> Result<String, ParseError> {
        let result = self.parse(response)?;
        let document = ShortsDocument {
            source_video: source_video.to_string(),
            shorts: result.clips,
        };
        Ok(serde_yaml::to_string(&document)?)
    }

    fn accept(
        &self,
        clips: Vec<ClipCandidate>,
        strategy: Strategy,
    ) -> Result<ParseResult, ParseError> {
        for clip in &clips {
            self.validator.validate(clip)?;
        }
        debug!("{:?} 策略解析出 {} 个剪辑候选", strategy, clips.len());
        Ok(ParseResult { clips, strategy })
    }
}

impl Default for ShortsParser {
    fn default() -> Self {
        Self::new()
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_LIMIT).collect();
    if text.chars().count() > PREVIEW_LIMIT {
        out.push_str(PREVIEW_MARKER);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_yaml_document() {
        let text = "sourceVideo: ${video}\n\
                    shorts:\n  \
                    - title: \"A\"\n    \
                    startTime: \"00:00:00\"\n    \
                    endTime: \"00:01:00\"\n";
        let result = ShortsParser::new().parse(text).expect("解析失败");
        assert_eq!(result.strategy, Strategy::Structured);
        assert_eq!(result.clips.len(), 1);
        assert_eq!(result.clips[0].title, "A");
        assert_eq!(result.clips[0].start_time, "00:00:00");
        assert_eq!(result.clips[0].end_time, "00:01:00");
    }

    #[test]
    fn test_parse_fenced_yaml_with_surrounding_prose() {
        let text = "好的，下面是建议：\n\
                    ```yaml\n\
                    sourceVideo: video.mp4\n\
                    shorts:\n  \
                    - title: \"A\"\n    \
                    startTime: \"00:00:00\"\n    \
                    endTime: \"00:01:00\"\n\
                    ```\n\
                    以上就是全部内容。\n";
        let result = ShortsParser::new().parse(text).expect("解析失败");
        assert_eq!(result.strategy, Strategy::Structured);
        assert_eq!(result.clips.len(), 1);
    }

    #[test]
    fn test_parse_json_array_response() {
        let text = "[{\"title\": \"A\", \"startTime\": \"00:00:00\", \"endTime\": \"00:01:00\"}]";
        let result = ShortsParser::new().parse(text).expect("解析失败");
        assert_eq!(result.strategy, Strategy::Structured);
        assert_eq!(result.clips[0].title, "A");
    }

    #[test]
    fn test_parse_loose_labelled_lines() {
        let text = "- title: \"A\"\n\
                    startTime: \"00:00:00\"\n\
                    endTime: \"00:01:00\"\n";
        let result = ShortsParser::new().parse(text).expect("解析失败");
        assert_eq!(result.strategy, Strategy::HeuristicLines);
        assert_eq!(result.clips[0].title, "A");
    }

    #[test]
    fn test_parse_bare_timestamp_pairs() {
        let text = "第一段标题\n\
                    00:00:10 - 00:01:10\n\
                    第二段标题\n\
                    00:02:00 - 00:03:00\n";
        let result = ShortsParser::new().parse(text).expect("解析失败");
        assert_eq!(result.strategy, Strategy::TimestampPairs);
        assert_eq!(result.clips.len(), 2);
        assert_eq!(result.clips[0].title, "第一段标题");
        assert_eq!(result.clips[1].title, "第二段标题");
    }

    #[test]
    fn test_validation_failure_is_fatal_not_a_fallback() {
        // 行扫描命中但小时越界：直接报错，不再尝试时间戳对扫描
        let text = "- title: \"A\"\n\
                    startTime: \"24:00:00\"\n\
                    endTime: \"00:01:00\"\n";
        match ShortsParser::new().parse(text) {
            Err(ParseError::InvalidStartTime(TimestampError::Range {
                field: TimestampField::Hours,
                value: 24,
                ..
            })) => {}
            other => panic!("期望 startTime 范围错误: {:?}", other),
        }
    }

    #[test]
    fn test_structured_validation_failure_skips_later_stages() {
        // 结构化解码成功但顺序颠倒：即便行扫描也能解出同样的内容，
        // 解析也必须就地失败
        let text = "sourceVideo: v\n\
                    shorts:\n  \
                    - title: \"A\"\n    \
                    startTime: \"00:02:00\"\n    \
                    endTime: \"00:01:00\"\n";
        match ShortsParser::new().parse(text) {
            Err(ParseError::Ordering(err)) => {
                assert_eq!(err.start, "00:02:00");
                assert_eq!(err.end, "00:01:00");
            }
            other => panic!("期望顺序错误: {:?}", other),
        }
    }

    #[test]
    fn test_empty_result_embeds_short_input_verbatim() {
        let text = "模型这次没有给出任何可用的内容。";
        match ShortsParser::new().parse(text) {
            Err(ParseError::EmptyResult { preview }) => assert_eq!(preview, text),
            other => panic!("期望空结果错误: {:?}", other),
        }
    }

    #[test]
    fn test_empty_result_preview_is_capped_with_marker() {
        let text = "x".repeat(800);
        let err = ShortsParser::new().parse(&text).expect_err("应当报错");
        let message = err.to_string();
        assert!(message.contains(&"x".repeat(500)));
        assert!(!message.contains(&"x".repeat(501)));
        assert!(message.contains(PREVIEW_MARKER));
    }

    #[test]
    fn test_parse_to_yaml_renders_wire_document() {
        let text = "- title: \"A\"\n\
                    startTime: \"00:00:00\"\n\
                    endTime: \"00:01:00\"\n";
        let yaml = ShortsParser::new()
            .parse_to_yaml(text, "${source}")
            .expect("渲染失败");
        assert!(yaml.contains("sourceVideo:"));
        assert!(yaml.contains("${source}"));
        assert!(yaml.contains("shorts:"));
        assert!(yaml.contains("startTime:"));
        assert!(yaml.contains("00:00:00"));
    }

    #[test]
    fn test_parser_with_injected_matcher() {
        struct RejectAllMatcher;
        impl FormatMatcher for RejectAllMatcher {
            fn is_match(&self, _token: &str) -> bool {
                false
            }
        }
        let parser = ShortsParser::with_validator(ClipValidator::with_timestamp_validator(
            TimestampValidator::with_matcher(Box::new(RejectAllMatcher)),
        ));
        let text = "- title: \"A\"\n\
                    startTime: \"00:00:00\"\n\
                    endTime: \"00:01:00\"\n";
        match parser.parse(text) {
            Err(ParseError::InvalidStartTime(TimestampError::Format(_))) => {}
            other => panic!("期望格式错误: {:?}", other),
        }
    }
}
