use std::io;
use std::process::Stdio;
#[cfg(test)]
use std::sync::{Mutex, PoisonError};
use tokio::process::Command;

pub trait Navigator: Send + Sync {
    /// Transfers control to another in-app route, e.g. `/chat?role=...`.
    fn navigate(&self, href: &str);

    fn open_external(&self, url: &str);
}

/// Navigator backed by the desktop's URL opener.
pub struct SystemNavigator {
    app_base_url: String,
    opener: Vec<String>,
}

fn default_opener() -> Vec<String> {
    #[cfg(target_os = "macos")]
    let opener: &[&str] = &["open"];
    #[cfg(target_os = "windows")]
    let opener: &[&str] = &["cmd", "/C", "start", ""];
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let opener: &[&str] = &["xdg-open"];

    opener.iter().map(|s| s.to_string()).collect()
}

impl SystemNavigator {
    pub fn new(app_base_url: impl Into<String>) -> Self {
        Self {
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
            opener: default_opener(),
        }
    }

    #[cfg(test)]
    fn with_opener(app_base_url: &str, opener: &[&str]) -> Self {
        Self {
            app_base_url: app_base_url.to_string(),
            opener: opener.iter().map(|s| s.to_string()).collect(),
        }
    }

    // The child is awaited on the runtime so it never lingers as a zombie
    fn spawn_opener(&self, url: &str) -> io::Result<()> {
        let (program, args) = self
            .opener
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no URL opener configured"))?;

        let mut child = Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let url = url.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    log::warn!("URL opener exited with {} for {}", status, url)
                }
                Ok(_) => {}
                Err(e) => log::warn!("Failed to wait on URL opener for {}: {}", url, e),
            }
        });
        Ok(())
    }
}

impl Navigator for SystemNavigator {
    fn navigate(&self, href: &str) {
        let target = format!("{}{}", self.app_base_url, href);
        log::info!("Handing off to {}", target);
        if let Err(e) = self.spawn_opener(&target) {
            log::warn!("Failed to open {}: {}", target, e);
        }
    }

    fn open_external(&self, url: &str) {
        log::info!("Opening {}", url);
        if let Err(e) = self.spawn_opener(url) {
            log::warn!("Failed to open {}: {}", url, e);
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct RecordingNavigator {
    navigations: Mutex<Vec<String>>,
    external_opens: Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn external_opens(&self) -> Vec<String> {
        self.external_opens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn navigate(&self, href: &str) {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(href.to_string());
    }

    fn open_external(&self, url: &str) {
        self.external_opens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }
}
