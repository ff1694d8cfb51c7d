use serde::{Deserialize, Serialize};

/// 剪辑候选 - 模型建议从原视频中剪出的一段短视频
///
/// 所有字段都带 `default`：结构化解码时缺字段不算解码失败，
/// 而是留给校验层报出更可读的缺字段错误。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipCandidate {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "startTime", default)]
    pub start_time: String,
    #[serde(rename = "endTime", default)]
    pub end_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    #[serde(rename = "shortTitle", alias = "short_title", default)]
    pub short_title: String,
}

/// 输出文档，同时也是 YAML 解码的目标结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortsDocument {
    #[serde(rename = "sourceVideo", default)]
    pub source_video: String,
    #[serde(default)]
    pub shorts: Vec<ClipCandidate>,
}

/// 产出候选的策略，仅用于诊断日志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// YAML / JSON 结构化解码
    Structured,
    /// 按行扫描 key:value 标记
    HeuristicLines,
    /// 成对时间戳兜底扫描
    TimestampPairs,
}

/// 解析产物：按出现顺序排列的候选列表 + 产出它的策略
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub clips: Vec<ClipCandidate>,
    pub strategy: Strategy,
}
