//! genie-core: task model and the normalization pipeline that turns raw
//! AI output or form input into schema-valid tasks.

pub mod ai_json;
pub mod assemble;
pub mod dates;
pub mod inference;
pub mod points;
pub mod stats;
pub mod task;
pub mod text_clean;
pub mod time;

pub use ai_json::{ParsedTask, find_json_object, parse_task_response, snippet};
pub use assemble::{DraftError, TaskAssembler, TaskDraft, fallback_title, normalize_status};
pub use dates::{normalize_due_date, normalize_due_date_str};
pub use inference::{ExtraKeywords, KeywordRules};
pub use points::{MAX_POINTS, extract_points, format_description};
pub use stats::DashboardStats;
pub use task::{Category, Priority, Task, TaskStatus};
pub use text_clean::clean_markdown;
