use anyhow::{Context, Result, bail};
use genie_client::{ApiClient, Session, SessionStore};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::state::session_path;

/// Session persisted as JSON under the genie home directory.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(session_path()?))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let session = serde_json::from_str(&s)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        let s = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim_end_matches(['\r', '\n']).to_string())
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => prompt_secret("Password"),
    }
}

pub async fn register(client: &ApiClient, name: &str, email: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    client
        .register(name, email, &password)
        .await
        .context("registration failed")?;
    println!("Registered {email}. Next: genie login --email {email}");
    Ok(())
}

pub async fn login(client: &ApiClient, email: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    let session = client
        .login(email, &password)
        .await
        .context("login failed")?;
    match session.user_id() {
        Ok(id) => println!("Signed in as {email} (user {id})"),
        Err(_) => println!("Signed in as {email}"),
    }
    Ok(())
}

pub fn logout(client: &ApiClient) -> Result<()> {
    client.logout()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(client: &ApiClient) -> Result<()> {
    let Some(session) = client.session()? else {
        bail!("not signed in; run: genie login --email <email>");
    };
    let claims = session.claims().context("stored token is unreadable")?;
    let email = claims.email.or(session.email.clone()).unwrap_or_else(|| "?".to_string());
    println!("user:    {}", claims.sub);
    println!("email:   {email}");
    if session.is_expired(chrono::Utc::now()) {
        println!("status:  expired (run genie login)");
    } else {
        println!("status:  active");
    }
    println!("server:  {}", client.base_url());
    Ok(())
}
