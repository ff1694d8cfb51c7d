//! 成对时间戳兜底 - 最后一道防线，只认行内成对出现的 HH:MM:SS

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::shorts::ClipCandidate;

static TIMESTAMP_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}:\d{2}:\d{2}").expect("时间戳扫描正则非法"));

/// 逐行找 `HH:MM:SS` 形态的子串；一行里出现两个以上时，
/// 前两个作为 start/end。标题优先取上一行，其次下一行
/// （都要求非空且不含时间戳），否则合成 "Clip at <startTime>"。
pub fn scan_timestamp_pairs(text: &str) -> Vec<ClipCandidate> {
    let lines: Vec<&str> = text.lines().collect();
    let mut clips = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let tokens: Vec<&str> = TIMESTAMP_TOKEN
            .find_iter(line)
            .map(|m| m.as_str())
            .collect();
        if tokens.len() < 2 {
            continue;
        }
        let start = tokens[0];
        let end = tokens[1];
        let title =
            infer_title(&lines, index).unwrap_or_else(|| format!("Clip at {}", start));
        clips.push(ClipCandidate {
            title,
            start_time: start.to_string(),
            end_time: end.to_string(),
            ..Default::default()
        });
    }

    clips
}

fn infer_title(lines: &[&str], index: usize) -> Option<String> {
    if index > 0 {
        if let Some(previous) = lines.get(index - 1) {
            if looks_like_title(previous) {
                return Some(previous.trim().to_string());
            }
        }
    }
    if let Some(following) = lines.get(index + 1) {
        if looks_like_title(following) {
            return Some(following.trim().to_string());
        }
    }
    None
}

fn looks_like_title(line: &str) -> bool {
    !line.trim().is_empty() && !TIMESTAMP_TOKEN.is_match(line)
}
