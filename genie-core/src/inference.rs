//! Deterministic keyword rules for filling in priority and category when the
//! AI leaves them out or returns something outside the closed sets.
//!
//! Group order is significant: Work, Personal, Health, Education, then the
//! Others default. Extra keywords from config are appended to a group, never
//! reorder it.

use serde::{Deserialize, Serialize};

use crate::task::{Category, Priority};

const HIGH_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "important",
    "critical",
    "emergency",
    "deadline soon",
    "must do",
    "high priority",
    "top priority",
    "immediately",
    "now",
    "today",
    "rush",
    "pressing",
];

const LOW_KEYWORDS: &[&str] = &[
    "low priority",
    "optional",
    "whenever",
    "later",
    "not urgent",
    "can wait",
    "someday",
    "no rush",
];

const WORK_KEYWORDS: &[&str] = &[
    "work",
    "business",
    "meeting",
    "project",
    "office",
    "job",
    "professional",
    "client",
    "team",
    "deadline",
    "presentation",
    "conference",
];

const PERSONAL_KEYWORDS: &[&str] = &[
    "personal",
    "family",
    "friends",
    "home",
    "household",
    "shopping",
    "vacation",
    "trip",
];

const HEALTH_KEYWORDS: &[&str] = &[
    "health",
    "fitness",
    "doctor",
    "medical",
    "exercise",
    "gym",
    "workout",
    "appointment",
    "checkup",
    "hospital",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "study",
    "learn",
    "course",
    "class",
    "exam",
    "homework",
    "assignment",
    "school",
    "university",
    "education",
    "research",
];

/// Additional keywords loaded from the `[keywords]` table of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraKeywords {
    pub high: Vec<String>,
    pub low: Vec<String>,
    pub work: Vec<String>,
    pub personal: Vec<String>,
    pub health: Vec<String>,
    pub education: Vec<String>,
}

impl ExtraKeywords {
    pub fn is_empty(&self) -> bool {
        self.high.is_empty()
            && self.low.is_empty()
            && self.work.is_empty()
            && self.personal.is_empty()
            && self.health.is_empty()
            && self.education.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRules {
    high: Vec<String>,
    low: Vec<String>,
    groups: Vec<(Category, Vec<String>)>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            high: owned(HIGH_KEYWORDS),
            low: owned(LOW_KEYWORDS),
            groups: vec![
                (Category::Work, owned(WORK_KEYWORDS)),
                (Category::Personal, owned(PERSONAL_KEYWORDS)),
                (Category::Health, owned(HEALTH_KEYWORDS)),
                (Category::Education, owned(EDUCATION_KEYWORDS)),
            ],
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn append(dst: &mut Vec<String>, extra: &[String]) {
    for w in extra {
        let w = w.trim().to_lowercase();
        if !w.is_empty() && !dst.contains(&w) {
            dst.push(w);
        }
    }
}

impl KeywordRules {
    pub fn with_extra(mut self, extra: &ExtraKeywords) -> Self {
        append(&mut self.high, &extra.high);
        append(&mut self.low, &extra.low);
        for (category, words) in &mut self.groups {
            let more = match category {
                Category::Work => &extra.work,
                Category::Personal => &extra.personal,
                Category::Health => &extra.health,
                Category::Education => &extra.education,
                Category::Others => continue,
            };
            append(words, more);
        }
        self
    }

    /// Category groups in check order.
    pub fn groups(&self) -> &[(Category, Vec<String>)] {
        &self.groups
    }

    /// Supplied value if it Title-Cases to High/Medium/Low, otherwise the keyword scan.
    pub fn infer_priority(&self, supplied: Option<&str>, texts: &[&str]) -> Priority {
        if let Some(p) = supplied.and_then(Priority::from_title_case) {
            return p;
        }
        self.scan_priority(&haystack(texts))
    }

    /// Supplied value if it is exactly one of the five categories, otherwise the keyword scan.
    pub fn infer_category(&self, supplied: Option<&str>, texts: &[&str]) -> Category {
        if let Some(c) = supplied.map(str::trim).and_then(Category::from_exact) {
            return c;
        }
        self.scan_category(&haystack(texts))
    }

    fn scan_priority(&self, hay: &str) -> Priority {
        // "not urgent" would otherwise trip the "urgent" High keyword.
        let negated = self
            .low
            .iter()
            .filter(|l| self.high.iter().any(|h| contains_word(l, h)))
            .any(|l| contains_word(hay, l));
        if negated {
            return Priority::Low;
        }
        if self.high.iter().any(|k| contains_word(hay, k)) {
            return Priority::High;
        }
        if self.low.iter().any(|k| contains_word(hay, k)) {
            return Priority::Low;
        }
        Priority::Medium
    }

    fn scan_category(&self, hay: &str) -> Category {
        self.groups
            .iter()
            .find(|(_, words)| words.iter().any(|k| contains_word(hay, k)))
            .map(|(c, _)| *c)
            .unwrap_or(Category::Others)
    }
}

fn haystack(texts: &[&str]) -> String {
    texts.join(" ").to_lowercase()
}

/// `needle` occurs in `hay` as a whole word, optionally followed by a plural
/// `s` or `es`. Nothing alphanumeric may touch the start of the match.
fn contains_word(hay: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    hay.match_indices(needle).any(|(start, m)| {
        if hay[..start].chars().next_back().is_some_and(char::is_alphanumeric) {
            return false;
        }
        let rest = &hay[start + m.len()..];
        ["", "s", "es"].into_iter().any(|suffix| {
            rest.strip_prefix(suffix)
                .is_some_and(|r| !r.chars().next().is_some_and(char::is_alphanumeric))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> KeywordRules {
        KeywordRules::default()
    }

    #[test]
    fn test_supplied_priority_title_cased() {
        assert_eq!(rules().infer_priority(Some("low"), &["urgent!"]), Priority::Low);
        assert_eq!(rules().infer_priority(Some(" HIGH "), &[]), Priority::High);
    }

    #[test]
    fn test_priority_keywords() {
        let r = rules();
        assert_eq!(
            r.infer_priority(None, &["Call Sarah tomorrow at 3pm about the project - urgent"]),
            Priority::High
        );
        assert_eq!(r.infer_priority(Some("P1"), &["do it ASAP"]), Priority::High);
        assert_eq!(r.infer_priority(None, &["water plants whenever"]), Priority::Low);
        assert_eq!(r.infer_priority(None, &["this is not urgent"]), Priority::Low);
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        let r = rules();
        assert_eq!(r.infer_priority(None, &["Buy milk", ""]), Priority::Medium);
        assert_eq!(r.infer_priority(Some("whatever"), &["translate the memo"]), Priority::Medium);
    }

    #[test]
    fn test_category_group_order() {
        let r = rules();
        // Work beats Health when both appear.
        assert_eq!(r.infer_category(None, &["doctor", "project review"]), Category::Work);
        assert_eq!(r.infer_category(None, &["Family dinner at home"]), Category::Personal);
        assert_eq!(r.infer_category(None, &["Gym session"]), Category::Health);
        assert_eq!(r.infer_category(None, &["Revise for exam"]), Category::Education);
        assert_eq!(r.infer_category(None, &["Water the plants"]), Category::Others);
    }

    #[test]
    fn test_category_exact_match_only() {
        let r = rules();
        assert_eq!(r.infer_category(Some("Health"), &["project"]), Category::Health);
        // Lowercase is not a member, so the scan decides.
        assert_eq!(r.infer_category(Some("health"), &["project"]), Category::Work);
        assert_eq!(r.infer_category(Some("Errands"), &["nothing here"]), Category::Others);
    }

    #[test]
    fn test_word_boundaries() {
        let r = rules();
        assert_eq!(r.infer_category(None, &["fix the network"]), Category::Others);
        assert_eq!(r.infer_category(None, &["homework"]), Category::Education);
    }

    #[test]
    fn test_plural_forms() {
        let r = rules();
        assert_eq!(r.infer_category(None, &["Review the projects"]), Category::Work);
        assert_eq!(r.infer_category(None, &["Schedule meetings"]), Category::Work);
        assert_eq!(r.infer_category(None, &["Prepare for exams"]), Category::Education);
        assert_eq!(r.infer_category(None, &["Finish assignments"]), Category::Education);
        assert_eq!(r.infer_category(None, &["Extra classes on Friday"]), Category::Education);
        assert_eq!(r.infer_category(None, &["Morning workouts"]), Category::Health);
        // A suffix is not a prefix: "workshop" stays out of Work.
        assert_eq!(r.infer_category(None, &["pottery workshop"]), Category::Others);
    }

    #[test]
    fn test_now_is_high_but_know_is_not() {
        let r = rules();
        assert_eq!(r.infer_priority(None, &["Pay the bill now"]), Priority::High);
        assert_eq!(r.infer_priority(None, &["Let Sam know about snow tires"]), Priority::Medium);
    }

    #[test]
    fn test_deterministic() {
        let r = rules();
        let text = ["Prepare slides for the team meeting and study notes"];
        let first = r.infer_category(Some("??"), &text);
        for _ in 0..10 {
            assert_eq!(r.infer_category(Some("??"), &text), first);
        }
    }

    #[test]
    fn test_extra_keywords_appended() {
        let extra = ExtraKeywords {
            health: vec!["Dentist".to_string()],
            low: vec!["eventually".to_string()],
            ..Default::default()
        };
        let r = rules().with_extra(&extra);
        assert_eq!(r.infer_category(None, &["dentist at 4"]), Category::Health);
        assert_eq!(r.infer_priority(None, &["eventually tidy up"]), Priority::Low);
        assert_eq!(r.groups()[0].0, Category::Work);
    }
}
