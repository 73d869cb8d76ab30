//! Interactive task creation: `Idle -> Generating -> Idle`.
//!
//! While an AI call is in flight, a second trigger is refused with
//! [`ApiError::Busy`] and issues no request. Success and failure both return
//! to `Idle`.

use genie_core::{Task, TaskAssembler, TaskDraft, parse_task_response, snippet};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::api::TaskApi;
use crate::error::ApiError;

/// Longest chunk of a malformed AI response shown back to the user.
const MALFORMED_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Generating,
}

pub struct CreationFlow<'a, A: TaskApi + ?Sized> {
    api: &'a A,
    assembler: TaskAssembler,
    generating: AtomicBool,
}

/// Puts the flow back to `Idle` however the generation ends.
struct GeneratingGuard<'g>(&'g AtomicBool);

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<'a, A: TaskApi + ?Sized> CreationFlow<'a, A> {
    pub fn new(api: &'a A, assembler: TaskAssembler) -> Self {
        Self {
            api,
            assembler,
            generating: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> FlowState {
        if self.generating.load(Ordering::Acquire) {
            FlowState::Generating
        } else {
            FlowState::Idle
        }
    }

    fn begin(&self) -> Result<GeneratingGuard<'_>, ApiError> {
        self.generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ApiError::Busy)?;
        Ok(GeneratingGuard(&self.generating))
    }

    /// Validate form input and create it with exactly one call. A missing
    /// title issues no request at all.
    pub async fn submit(&self, draft: TaskDraft) -> Result<Task, ApiError> {
        let task = self.assembler.from_draft(draft)?;
        self.api.create_task(&task).await
    }

    /// Ask the AI for a description of `title`, cleaned and numbered.
    pub async fn generate_description(&self, title: &str) -> Result<String, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("title is required to generate a description".to_string()));
        }
        let _guard = self.begin()?;
        let raw = self.api.generate_description(title).await?;
        let formatted = self.assembler.format_generated(&raw);
        debug!(points = formatted.lines().count(), "description generated");
        Ok(formatted)
    }

    /// Parse natural language into a normalized task without creating it.
    pub async fn preview_from_text(&self, text: &str) -> Result<Task, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::Validation("describe the task to parse".to_string()));
        }
        let _guard = self.begin()?;
        self.parse(text).await
    }

    /// Parse natural language, normalize, and create the task once.
    pub async fn create_from_text(&self, text: &str) -> Result<Task, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::Validation("describe the task to parse".to_string()));
        }
        let _guard = self.begin()?;
        let task = self.parse(text).await?;
        self.api.create_task(&task).await
    }

    async fn parse(&self, text: &str) -> Result<Task, ApiError> {
        let raw = self.api.parse_task(text).await?;
        let Some(parsed) = parse_task_response(&raw) else {
            warn!("parse-task response had no JSON object");
            return Err(ApiError::MalformedAiResponse {
                snippet: snippet(&raw, MALFORMED_SNIPPET_CHARS),
            });
        };
        Ok(self.assembler.from_parsed(parsed, text))
    }
}
