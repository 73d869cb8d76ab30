//! Reduce a description to at most six numbered top-level action points.
//!
//! Rules:
//! - a top-level point looks like `N. text` with N in 1..=6
//! - nested numbering (`1.1`, `2.3 ...`) is dropped
//! - points are renumbered from 1 in encounter order
//!
//! When nothing looks like a top-level point we fall back to the first six
//! non-heading lines, stripped of bullets and renumbered.

use regex::Regex;
use std::sync::LazyLock;

use crate::text_clean::clean_markdown;

pub const MAX_POINTS: usize = 6;

/// Longest line (in chars) still treated as a heading by the fallback.
const HEADING_MAX_CHARS: usize = 60;

static TOP_LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.+)$").unwrap());

static NESTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d").unwrap());

static LEADING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•–—+]\s*|\d+[.)](?:\s+|$))+").unwrap());

/// Extract numbered top-level points from already-cleaned text.
pub fn extract_points(cleaned: &str) -> String {
    let points = top_level_points(cleaned);
    let points = if points.is_empty() {
        fallback_points(cleaned)
    } else {
        points
    };
    render(&points)
}

/// Clean markdown, then extract points. What the assembler runs over AI text.
pub fn format_description(raw: &str) -> String {
    extract_points(&clean_markdown(raw))
}

fn top_level_points(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || !line.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        if NESTED_RE.is_match(line) {
            continue;
        }
        let Some(caps) = TOP_LEVEL_RE.captures(line) else {
            continue;
        };
        let in_range = caps[1]
            .parse::<u32>()
            .is_ok_and(|n| (1..=MAX_POINTS as u32).contains(&n));
        if !in_range {
            continue;
        }
        out.push(caps[2].trim().to_string());
        if out.len() == MAX_POINTS {
            break;
        }
    }
    out
}

fn fallback_points(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !looks_like_heading(l))
        .map(|l| LEADING_MARKER_RE.replace(l, "").trim().to_string())
        .filter(|l| !l.is_empty())
        .take(MAX_POINTS)
        .collect()
}

/// Entirely upper-case, short, and not ending in sentence punctuation.
fn looks_like_heading(line: &str) -> bool {
    let has_letters = line.chars().any(char::is_alphabetic);
    let all_upper = line
        .chars()
        .filter(|c| c.is_alphabetic())
        .all(char::is_uppercase);
    let terminal = line.ends_with(['.', '!', '?']);
    has_letters && all_upper && !terminal && line.chars().count() <= HEADING_MAX_CHARS
}

fn render(points: &[String]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}", i + 1, p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split rendered points back into their texts.
pub fn point_texts(rendered: &str) -> Vec<String> {
    rendered
        .lines()
        .filter_map(|l| TOP_LEVEL_RE.captures(l.trim()).map(|c| c[2].trim().to_string()))
        .collect()
}
