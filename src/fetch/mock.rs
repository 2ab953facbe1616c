use super::Fetcher;
use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// Fetcher that serves fixed content and records every requested URL
pub struct MockFetcher {
    content: Vec<u8>,
    error: Option<String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn with_content(content: Vec<u8>) -> Self {
        Self {
            content,
            error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            content: Vec::new(),
            error: Some(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        if let Some(message) = &self.error {
            anyhow::bail!("{}", message);
        }

        fs::write(destination, &self.content)?;
        Ok(())
    }
}
