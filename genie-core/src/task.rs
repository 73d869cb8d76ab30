//! Task model shared by the client and the CLI.
//!
//! Field names follow the backend's JSON (camelCase). Enum values travel as
//! their display strings, e.g. `"In Progress"`.

use anyhow::bail;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dates::normalize_due_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Category {
    Work,
    Personal,
    Health,
    Education,
    #[default]
    Others,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Education,
        Category::Others,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Others => "Others",
        }
    }

    /// Case-sensitive match against the display names.
    pub fn from_exact(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Accepts `"high"`, `" HIGH "`, `"High"`; rejects anything else.
    pub fn from_title_case(s: &str) -> Option<Self> {
        let t = title_case(s.trim());
        Self::ALL.into_iter().find(|p| p.as_str() == t)
    }
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Completed flips to Pending, everything else to Completed.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Completed => TaskStatus::Pending,
            _ => TaskStatus::Completed,
        }
    }
}

fn title_case(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase and drop separators so "In Progress", "in_progress" and
/// "inprogress" compare equal.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! display_and_parse {
    ($ty:ty, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> anyhow::Result<Self> {
                let wanted = squash(s);
                match <$ty>::ALL.into_iter().find(|v| squash(v.as_str()) == wanted) {
                    Some(v) => Ok(v),
                    None => {
                        let allowed: Vec<&str> = <$ty>::ALL.iter().map(|v| v.as_str()).collect();
                        bail!("invalid {} '{}' (expected one of: {})", $label, s, allowed.join(", "))
                    }
                }
            }
        }
    };
}

display_and_parse!(Category, "category");
display_and_parse!(Priority, "priority");
display_and_parse!(TaskStatus, "status");

/// A task as stored by the backend. `id` is absent until the server assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_id")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_enum")]
    pub category: Category,

    #[serde(default, deserialize_with = "lenient_enum")]
    pub priority: Priority,

    #[serde(default, deserialize_with = "lenient_enum")]
    pub status: TaskStatus,

    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            category: Category::default(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Due strictly before `today` and not yet completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|d| d < today)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// The backend hands out UUID strings, but tolerate numeric ids.
fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Stored rows may predate the closed enumerations; unknown values fall back
/// to the default member instead of failing the whole list.
fn lenient_enum<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let s = Option::<String>::deserialize(d)?;
    Ok(s.and_then(|s| s.parse().ok()).unwrap_or_default())
}

fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let s = Option::<String>::deserialize(d)?;
    Ok(s.as_deref().and_then(normalize_due_date))
}
