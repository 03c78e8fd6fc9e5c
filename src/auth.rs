use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl AuthUser {
    /// First word of the full name, for the welcome line.
    pub fn welcome_name(&self) -> &str {
        self.full_name
            .as_deref()
            .and_then(|n| n.split_whitespace().next())
            .unwrap_or("Job Seeker")
    }

    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Signed in")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProvider {
    Google,
    GitHub,
}

impl AuthProvider {
    pub fn name(&self) -> &'static str {
        match self {
            AuthProvider::Google => "Google",
            AuthProvider::GitHub => "GitHub",
        }
    }
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_in(&self, provider: AuthProvider) -> AuthResponse;

    async fn sign_in_with_google(&self) -> AuthResponse {
        self.sign_in(AuthProvider::Google).await
    }

    async fn sign_in_with_github(&self) -> AuthResponse {
        self.sign_in(AuthProvider::GitHub).await
    }

    async fn sign_out(&self);

    fn current_user(&self) -> Option<AuthUser>;
}

/// Signs in as a user configured up front (see `PREPWISE_USER_ID`).
pub struct ConfiguredAuth {
    account: Option<AuthUser>,
    current: Mutex<Option<AuthUser>>,
}

impl ConfiguredAuth {
    pub fn new(account: Option<AuthUser>) -> Self {
        Self {
            account,
            current: Mutex::new(None),
        }
    }

    pub fn signed_in(account: AuthUser) -> Self {
        Self {
            current: Mutex::new(Some(account.clone())),
            account: Some(account),
        }
    }
}

#[async_trait]
impl AuthClient for ConfiguredAuth {
    async fn sign_in(&self, provider: AuthProvider) -> AuthResponse {
        match &self.account {
            Some(user) => {
                log::info!("Signed in {} with {}", user.id, provider.name());
                *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
                AuthResponse::ok()
            }
            None => {
                log::warn!("{} sign-in requested but no account is configured", provider.name());
                AuthResponse::failed(format!("Failed to sign in with {}", provider.name()))
            }
        }
    }

    async fn sign_out(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
