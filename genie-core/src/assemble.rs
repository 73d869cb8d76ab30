//! Build schema-valid tasks from user input or AI output.

use thiserror::Error;

use crate::ai_json::ParsedTask;
use crate::dates::normalize_due_date;
use crate::inference::KeywordRules;
use crate::points::format_description;
use crate::task::{Task, TaskStatus};
use crate::text_clean::clean_markdown;

/// Number of words of the raw input used when nothing else yields a title.
const FALLBACK_TITLE_WORDS: usize = 6;

pub const UNTITLED: &str = "Untitled task";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("title is required")]
    MissingTitle,
}

/// Raw form input. Enum fields stay strings so the same normalization applies
/// to typed and AI-supplied values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskAssembler {
    rules: KeywordRules,
}

impl TaskAssembler {
    pub fn new(rules: KeywordRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &KeywordRules {
        &self.rules
    }

    /// Normalize user input. The description is kept as typed.
    pub fn from_draft(&self, draft: TaskDraft) -> Result<Task, DraftError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        let description = draft.description.trim().to_string();
        let texts = [title.as_str(), description.as_str()];

        Ok(Task {
            id: None,
            category: self.rules.infer_category(draft.category.as_deref(), &texts),
            priority: self.rules.infer_priority(draft.priority.as_deref(), &texts),
            status: normalize_status(draft.status.as_deref()),
            due_date: draft.due_date.as_deref().and_then(normalize_due_date),
            title,
            description,
        })
    }

    /// Turn parse-task output into a complete task. Never fails: every missing
    /// or invalid field has a fallback.
    ///
    /// The raw user input joins title and description in the keyword scan, so
    /// an "urgent" the model dropped still counts.
    pub fn from_parsed(&self, parsed: ParsedTask, raw_input: &str) -> Task {
        let description = parsed
            .description
            .as_deref()
            .map(|d| format_description(&unescape_newlines(d)))
            .unwrap_or_default();

        let title = parsed
            .title
            .as_deref()
            .map(|t| single_line(&clean_markdown(t)))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| fallback_title(&description, raw_input));

        let texts = [title.as_str(), description.as_str(), raw_input];

        Task {
            id: None,
            category: self.rules.infer_category(parsed.category.as_deref(), &texts),
            priority: self.rules.infer_priority(parsed.priority.as_deref(), &texts),
            status: normalize_status(parsed.status.as_deref()),
            due_date: parsed.due_date.as_deref().and_then(normalize_due_date),
            title,
            description,
        }
    }

    /// Clean and number a generated description.
    pub fn format_generated(&self, raw: &str) -> String {
        format_description(&unescape_newlines(raw))
    }
}

/// Exact status members (any casing / separator style) survive; the rest become Pending.
pub fn normalize_status(supplied: Option<&str>) -> TaskStatus {
    supplied
        .and_then(|s| s.parse::<TaskStatus>().ok())
        .unwrap_or_default()
}

/// First non-empty description line (numbering stripped), else the first few
/// words of the raw input, else a placeholder.
pub fn fallback_title(description: &str, raw_input: &str) -> String {
    let from_description = description
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(strip_numbering)
        .filter(|l| !l.is_empty());
    if let Some(t) = from_description {
        return t.to_string();
    }

    let words: Vec<&str> = raw_input.split_whitespace().take(FALLBACK_TITLE_WORDS).collect();
    if words.is_empty() {
        UNTITLED.to_string()
    } else {
        words.join(" ")
    }
}

fn strip_numbering(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    match rest.strip_prefix('.') {
        Some(r) if rest.len() < line.len() => r.trim(),
        _ => line,
    }
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Models sometimes double-escape newlines inside JSON strings.
fn unescape_newlines(s: &str) -> String {
    s.replace("\\r\\n", "\n").replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Category, Priority};
    use chrono::NaiveDate;

    fn assembler() -> TaskAssembler {
        TaskAssembler::default()
    }

    #[test]
    fn test_draft_requires_title() {
        let draft = TaskDraft {
            title: "   ".to_string(),
            description: "something".to_string(),
            ..Default::default()
        };
        assert_eq!(assembler().from_draft(draft), Err(DraftError::MissingTitle));
    }

    #[test]
    fn test_draft_keeps_valid_fields() {
        let draft = TaskDraft {
            title: "Quarterly report".to_string(),
            description: "gym later".to_string(),
            category: Some("Personal".to_string()),
            priority: Some("high".to_string()),
            status: Some("In Progress".to_string()),
            due_date: Some("2025-04-01".to_string()),
        };
        let t = assembler().from_draft(draft).unwrap();
        assert_eq!(t.category, Category::Personal);
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.status, TaskStatus::InProgress);
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2025, 4, 1));
    }

    #[test]
    fn test_parsed_without_priority_or_category() {
        let input = "Call Sarah tomorrow at 3pm about the project - urgent";
        let parsed = ParsedTask {
            title: Some("Call Sarah".to_string()),
            description: Some("1. Call Sarah at 3pm\n2. Discuss the project".to_string()),
            due_date: Some("null".to_string()),
            ..Default::default()
        };
        let t = assembler().from_parsed(parsed, input);
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.category, Category::Work);
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.due_date, None);
    }

    #[test]
    fn test_parsed_cleans_description_and_bad_enums() {
        let parsed = ParsedTask {
            title: Some("**Plan** the trip".to_string()),
            description: Some("1. **Book** flights\\n1.1 compare prices\\n2. Pack bags".to_string()),
            category: Some("Travel".to_string()),
            priority: Some("super".to_string()),
            status: Some("Done".to_string()),
            due_date: Some("2025-07-04T09:00:00Z".to_string()),
        };
        let t = assembler().from_parsed(parsed, "plan the trip");
        assert_eq!(t.title, "Plan the trip");
        assert_eq!(t.description, "1. Book flights\n2. Pack bags");
        assert_eq!(t.category, Category::Personal);
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2025, 7, 4));
    }

    #[test]
    fn test_fallback_title_from_description() {
        let parsed = ParsedTask {
            title: Some("  ".to_string()),
            description: Some("1. Renew passport\n2. Print form".to_string()),
            ..Default::default()
        };
        let t = assembler().from_parsed(parsed, "passport stuff");
        assert_eq!(t.title, "Renew passport");
    }

    #[test]
    fn test_fallback_title_from_input_words() {
        let t = assembler().from_parsed(
            ParsedTask::default(),
            "remember to water the plants on the balcony every morning",
        );
        assert_eq!(t.title, "remember to water the plants on");
        assert_eq!(t.description, "");
    }

    #[test]
    fn test_fallback_title_placeholder() {
        assert_eq!(fallback_title("", "   "), UNTITLED);
    }

    #[test]
    fn test_format_generated() {
        let raw = "# Steps\n**1.** Outline the talk\n2. Make slides\n2.1 pick a theme";
        assert_eq!(
            assembler().format_generated(raw),
            "1. Outline the talk\n2. Make slides"
        );
    }
}
