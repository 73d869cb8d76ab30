//! genie-client: async REST client for the TaskGenie backend, the session
//! context, and the interactive creation flow.

pub mod api;
pub mod error;
pub mod flow;
pub mod session;

pub use api::{AiLogEntry, ApiClient, ClientConfig, DEFAULT_BASE_URL, TaskApi};
pub use error::ApiError;
pub use flow::{CreationFlow, FlowState};
pub use session::{Claims, MemorySessionStore, Session, SessionStore};
