//! 行扫描兜底 - 结构化解码全部落空后按行抓取 key:value 标记

use crate::models::shorts::ClipCandidate;

/// 向后探查的最大行数
const LOOKAHEAD: usize = 9;

/// 以 `- title:` / `title:` 开头的行开启一个候选，在其后至多
/// [`LOOKAHEAD`] 行内收集字段标记；无标记且不含冒号的行并入
/// description；遇到下一个标题行停止。只保留同时拿到
/// startTime 和 endTime 的候选，按出现顺序返回。
pub fn scan_lines(text: &str) -> Vec<ClipCandidate> {
    let lines: Vec<&str> = text.lines().collect();
    let mut clips = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(title) = title_marker(line) else {
            continue;
        };
        let mut clip = ClipCandidate {
            title,
            ..Default::default()
        };
        let mut found_start = false;
        let mut found_end = false;

        for next in lines.iter().skip(index + 1).take(LOOKAHEAD) {
            if title_marker(next).is_some() {
                break;
            }
            let trimmed = next.trim();
            if let Some(value) = marker_value(trimmed, "startTime:") {
                clip.start_time = value;
                found_start = true;
            } else if let Some(value) = marker_value(trimmed, "endTime:") {
                clip.end_time = value;
                found_end = true;
            } else if let Some(value) = marker_value(trimmed, "description:") {
                clip.description = value;
            } else if let Some(value) = marker_value(trimmed, "tags:") {
                clip.tags = value;
            } else if let Some(value) = marker_value(trimmed, "shortTitle:")
                .or_else(|| marker_value(trimmed, "short_title:"))
            {
                clip.short_title = value;
            } else if !trimmed.is_empty() && !trimmed.contains(':') {
                // 续行并入描述，单空格连接
                if clip.description.is_empty() {
                    clip.description = trimmed.to_string();
                } else {
                    clip.description.push(' ');
                    clip.description.push_str(trimmed);
                }
            }
        }

        if found_start && found_end {
            clips.push(clip);
        }
    }

    clips
}

fn title_marker(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let rest = trimmed
        .strip_prefix("- title:")
        .or_else(|| trimmed.strip_prefix("title:"))?;
    Some(strip_quotes(rest).to_string())
}

fn marker_value(trimmed: &str, key: &str) -> Option<String> {
    let rest = trimmed.strip_prefix(key)?;
    Some(strip_quotes(rest).to_string())
}

/// 去掉值两侧成对的引号
fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
