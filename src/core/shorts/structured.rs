//! 结构化解码 - 从响应中定位并解码 YAML / JSON 载荷
//!
//! 四次嵌套尝试，先成功者胜出：
//! 1. 对定位出的切片直接做 YAML 文档解码
//! 2. 取代码围栏内的正文再解码，必要时补上缺失的根键
//! 3. 按行重建缩进后再解码
//! 4. 提取方括号包裹的序列按 JSON 数组解码

use log::debug;

use crate::models::shorts::{ClipCandidate, ShortsDocument};

const ROOT_KEY: &str = "sourceVideo:";
const LIST_KEY: &str = "shorts:";
const FENCE: &str = "```";

/// 结构化解析入口；`None` 表示没有任何一种结构化形态命中，
/// 由上层降级到启发式策略。
pub fn extract_clips(text: &str) -> Option<Vec<ClipCandidate>> {
    if let Some(block) = extract_block(text) {
        if let Some(clips) = decode_document(block) {
            return Some(clips);
        }
        if let Some(clips) = decode_fenced_block(block) {
            return Some(clips);
        }
        if let Some(clips) = decode_reindented(block) {
            return Some(clips);
        }
    }
    decode_json_array(text)
}

/// 定位最可能是载荷的子串：同时出现根键和列表键时，
/// 从根键首次出现处切到结尾；若其后只有一个围栏标记，
/// 视为闭合围栏，截掉围栏及其后的附言。
fn extract_block(text: &str) -> Option<&str> {
    if !text.contains(LIST_KEY) {
        return None;
    }
    let start = text.find(ROOT_KEY)?;
    let slice = &text[start..];
    match slice.find(FENCE) {
        // 还有第二个围栏，说明切片里是一个完整代码块，保留
        Some(first) if slice[first + FENCE.len()..].contains(FENCE) => Some(slice),
        Some(first) => Some(&slice[..first]),
        None => Some(slice),
    }
}

fn decode_document(block: &str) -> Option<Vec<ClipCandidate>> {
    match serde_yaml::from_str::<ShortsDocument>(block) {
        Ok(doc) if !doc.shorts.is_empty() => Some(doc.shorts),
        Ok(_) => None,
        Err(e) => {
            debug!("YAML 直接解码失败: {}", e);
            None
        }
    }
}

fn decode_fenced_block(block: &str) -> Option<Vec<ClipCandidate>> {
    let body = fenced_body(block)?;
    let document = if body.contains(LIST_KEY) {
        body
    } else {
        // 围栏里只有列表项时补上最小文档骨架
        format!("{}\n{}", LIST_KEY, body)
    };
    decode_document(&document)
}

/// 取第一个围栏的正文，跳过围栏首行可选的语言标记（```yaml）
fn fenced_body(text: &str) -> Option<String> {
    let open = text.find(FENCE)?;
    let after = &text[open + FENCE.len()..];
    let body_start = after.find('\n')? + 1;
    let rest = &after[body_start..];
    let body = match rest.find(FENCE) {
        Some(close) => &rest[..close],
        None => rest,
    };
    Some(body.trim_end().to_string())
}

const FIELD_KEYS: [&str; 6] = [
    "startTime:",
    "endTime:",
    "description:",
    "tags:",
    "shortTitle:",
    "short_title:",
];

/// 按行重建缩进：根键回到零列，列表项起始行缩进两格，
/// 字段行缩进四格，其余行（解说、围栏）丢弃。
fn decode_reindented(block: &str) -> Option<Vec<ClipCandidate>> {
    let mut document = String::new();
    let mut has_item = false;
    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(ROOT_KEY) || trimmed.starts_with(LIST_KEY) {
            document.push_str(trimmed);
            document.push('\n');
        } else if trimmed.starts_with("- title:") {
            has_item = true;
            document.push_str("  ");
            document.push_str(trimmed);
            document.push('\n');
        } else if FIELD_KEYS.iter().any(|key| trimmed.starts_with(key)) {
            document.push_str("    ");
            document.push_str(trimmed);
            document.push('\n');
        }
    }
    if !has_item {
        return None;
    }
    if !document.contains(LIST_KEY) {
        document = format!("{}\n{}", LIST_KEY, document);
    }
    decode_document(&document)
}

/// 从首个 `[` 到最后一个 `]` 按 JSON 数组解码
fn decode_json_array(text: &str) -> Option<Vec<ClipCandidate>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Vec<ClipCandidate>>(&text[start..=end]) {
        Ok(clips) if !clips.is_empty() => Some(clips),
        Ok(_) => None,
        Err(e) => {
            debug!("JSON 数组解码失败: {}", e);
            None
        }
    }
}
