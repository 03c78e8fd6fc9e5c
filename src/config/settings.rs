use anyhow::{Context, Result};
use std::env;
use uuid::Uuid;

use crate::auth::AuthUser;

pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub app_base_url: String,
    pub account: Option<AuthUser>,
    pub debug_logs: bool,
}

impl Settings {
    fn get_env_path() -> Option<std::path::PathBuf> {
        std::env::current_dir().ok().map(|dir| dir.join(".env"))
    }

    /// Loads `.env` from the working directory (if present), then reads the process environment.
    pub fn new() -> Result<Self> {
        if let Some(env_path) = Self::get_env_path() {
            dotenvy::from_path(&env_path).ok();
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let account = match non_empty("PREPWISE_USER_ID") {
            Some(raw) => {
                let id = Uuid::parse_str(raw.trim())
                    .with_context(|| format!("PREPWISE_USER_ID is not a UUID: {}", raw))?;
                Some(AuthUser {
                    id,
                    email: non_empty("PREPWISE_USER_EMAIL"),
                    full_name: non_empty("PREPWISE_USER_NAME"),
                })
            }
            None => None,
        };

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            app_base_url: non_empty("PREPWISE_APP_BASE_URL")
                .unwrap_or_else(|| DEFAULT_APP_BASE_URL.to_string()),
            account,
            debug_logs: non_empty("DEBUG_LOGS_ENABLED")
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(false),
        })
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable not set (use --offline to run without a database)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let s = settings(&[]).unwrap();
        assert!(s.database_url.is_none());
        assert!(s.account.is_none());
        assert_eq!(s.app_base_url, DEFAULT_APP_BASE_URL);
        assert!(!s.debug_logs);
        assert!(s.require_database_url().is_err());
    }

    #[test]
    fn test_account_from_environment() {
        let s = settings(&[
            ("PREPWISE_USER_ID", "6f1c0d8e-3c1b-4d7a-9a51-3f0e5a2b9c10"),
            ("PREPWISE_USER_NAME", "Ada Lovelace"),
            ("DEBUG_LOGS_ENABLED", "true"),
        ])
        .unwrap();
        let account = s.account.unwrap();
        assert_eq!(account.welcome_name(), "Ada");
        assert!(account.email.is_none());
        assert!(s.debug_logs);
    }

    #[test]
    fn test_invalid_user_id_is_rejected() {
        assert!(settings(&[("PREPWISE_USER_ID", "not-a-uuid")]).is_err());
    }
}
