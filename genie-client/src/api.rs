//! REST client for the TaskGenie backend.

use async_trait::async_trait;
use genie_core::Task;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::session::{Session, SessionStore};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Prefix the backend uses when the upstream model call failed. It comes back
/// with a 200, so we have to look at the body.
const AI_ERROR_PREFIX: &str = "Groq API Error";

/// Longest server body echoed into an error message.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// One row of the AI interaction history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiLogEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub ai_response: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize)]
struct RegisterReq<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginReq<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResp {
    token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// The calls the interactive creation flow depends on.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn create_task(&self, task: &Task) -> Result<Task, ApiError>;
    async fn generate_description(&self, title: &str) -> Result<String, ApiError>;
    async fn parse_task(&self, text: &str) -> Result<String, ApiError>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.store.load()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn require_session(&self) -> Result<Session, ApiError> {
        self.session()?.ok_or(ApiError::NotSignedIn)
    }

    /// Send with the bearer token when one is stored. A 401 clears the session.
    async fn send_authed(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let req = match self.session()? {
            Some(s) => req.header(AUTHORIZATION, format!("Bearer {}", s.token)),
            None => req,
        };
        let resp = req.header(ACCEPT, "application/json").send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            warn!("server answered 401; clearing stored session");
            self.store.clear()?;
            return Err(ApiError::Unauthorized);
        }
        check(resp).await
    }

    /// Unauthenticated calls (login / register): a 401 here is a bad
    /// credential, not an expired session.
    async fn send_anon(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.header(ACCEPT, "application/json").send().await?;
        check(resp).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String, ApiError> {
        for (field, value) in [("name", name), ("email", email), ("password", password)] {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!("{field} is required")));
            }
        }
        debug!(email, "POST /users/register");
        let req = self.http.post(self.url("/users/register")).json(&RegisterReq {
            name: name.trim(),
            email: email.trim(),
            password,
        });
        let resp = self.send_anon(req).await?;
        Ok(resp.text().await?)
    }

    /// Exchange credentials for a token and persist the new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation("email and password are required".to_string()));
        }
        debug!(email, "POST /users/login");
        let req = self.http.post(self.url("/users/login")).json(&LoginReq {
            email: email.trim(),
            password,
        });
        let resp = self.send_anon(req).await?;
        let body: LoginResp = resp.json().await?;
        let token = body
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Server {
                status: StatusCode::OK,
                message: "login succeeded but no token was returned".to_string(),
            })?;
        let session = Session::new(token, Some(email.trim().to_string()));
        self.store.save(&session)?;
        info!(email, "signed in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.store.clear()?;
        info!("signed out");
        Ok(())
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.require_session()?;
        debug!("GET /tasks/");
        let resp = self.send_authed(self.http.get(self.url("/tasks/"))).await?;
        Ok(resp.json().await?)
    }

    pub async fn update_task(&self, id: &str, task: &Task) -> Result<Task, ApiError> {
        self.require_session()?;
        validate_title(task)?;
        debug!(id, "PUT /tasks/{{id}}");
        let req = self.http.put(self.url(&format!("/tasks/{id}"))).json(task);
        let updated: Task = self.send_authed(req).await?.json().await?;
        info!(id, title = %updated.title, "task updated");
        Ok(updated)
    }

    pub async fn delete_task(&self, id: &str) -> Result<String, ApiError> {
        self.require_session()?;
        debug!(id, "DELETE /tasks/{{id}}");
        let req = self.http.delete(self.url(&format!("/tasks/{id}")));
        let text = self.send_authed(req).await?.text().await?;
        info!(id, "task deleted");
        Ok(text)
    }

    pub async fn ai_logs(&self) -> Result<Vec<AiLogEntry>, ApiError> {
        let user_id = self.require_session()?.user_id()?;
        debug!("GET /ai/logs/{{userId}}");
        let req = self.http.get(self.url(&format!("/ai/logs/{user_id}")));
        Ok(self.send_authed(req).await?.json().await?)
    }
}

#[async_trait]
impl TaskApi for ApiClient {
    async fn create_task(&self, task: &Task) -> Result<Task, ApiError> {
        self.require_session()?;
        validate_title(task)?;
        debug!(title = %task.title, "POST /tasks/");
        let req = self.http.post(self.url("/tasks/")).json(task);
        let created: Task = self.send_authed(req).await?.json().await?;
        info!(id = created.id.as_deref().unwrap_or("?"), "task created");
        Ok(created)
    }

    async fn generate_description(&self, title: &str) -> Result<String, ApiError> {
        let user_id = self.require_session()?.user_id()?;
        debug!("POST /ai/generate-description/{{userId}}");
        let req = self
            .http
            .post(self.url(&format!("/ai/generate-description/{user_id}")))
            .query(&[("title", title)]);
        let text = self.send_authed(req).await?.text().await?;
        reject_in_band_error(text)
    }

    async fn parse_task(&self, text: &str) -> Result<String, ApiError> {
        self.require_session()?;
        debug!("POST /ai/parse-task");
        let req = self
            .http
            .post(self.url("/ai/parse-task"))
            .query(&[("text", text)]);
        let raw = self.send_authed(req).await?.text().await?;
        reject_in_band_error(raw)
    }
}

fn validate_title(task: &Task) -> Result<(), ApiError> {
    if task.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    Ok(())
}

fn reject_in_band_error(text: String) -> Result<String, ApiError> {
    if text.trim_start().starts_with(AI_ERROR_PREFIX) {
        return Err(ApiError::Server {
            status: StatusCode::BAD_GATEWAY,
            message: genie_core::snippet(&text, MAX_ERROR_CHARS),
        });
    }
    Ok(text)
}

async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status,
        message: error_message(status, &body),
    })
}

/// Prefer the payload's `message`, then its `error`, then the raw body, then the reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(m) = parsed.message.or(parsed.error).filter(|m| !m.trim().is_empty()) {
            return m;
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return genie_core::snippet(trimmed, MAX_ERROR_CHARS);
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}
