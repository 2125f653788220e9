//! INI-style configuration file.
//!
//! ```text
//! # roomlink.conf
//! [Signaling]
//! Url = "wss://signal.example.net/ws"
//! SigKey = "k-123"
//! RoomId = "lobby"
//!
//! [Logging]
//! client_log_path = ~/.roomlink/logs
//! ```

use std::collections::HashMap;
use std::fs;

#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    /// Reads and parses `path`.
    ///
    /// # Errors
    /// Returns a description of the I/O failure when the file cannot be read.
    pub fn load(path: &str) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Error reading file {path}: {e}"))?;
        Ok(Self::parse(&content))
    }

    /// Parses configuration text. Unrecognised lines are skipped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::empty();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current_section = Some(name.trim().to_string());
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_string();
            let value = value.trim().trim_matches('"').to_string();

            match &current_section {
                None => {
                    cfg.globals.insert(key, value);
                }
                Some(sec) => {
                    cfg.sections
                        .entry(sec.clone())
                        .or_default()
                        .insert(key, value);
                }
            }
        }
        cfg
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(String::as_str)
    }

    /// Section value if non-empty, else the non-empty global of the same key.
    #[must_use]
    pub fn get_non_empty_or_global(&self, section: &str, key: &str) -> Option<&str> {
        self.get_non_empty(section, key)
            .or_else(|| self.get_global(key).filter(|s| !s.is_empty()))
    }

    #[must_use]
    pub fn get_non_empty_or_default<'a>(
        &'a self,
        section: &str,
        key: &str,
        default: &'a str,
    ) -> &'a str {
        self.get_non_empty_or_global(section, key)
            .unwrap_or(default)
    }
}
