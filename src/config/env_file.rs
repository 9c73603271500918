use anyhow::{Context, Result};
use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::settings::TOKEN_KEY;
use crate::session::TokenStore;

/// `.env` file used as the persisted config store
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse every key in the file. A missing file holds no values.
    pub fn read_values(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        // Only the file's own values are wanted, not the merged process env.
        #[allow(deprecated)]
        let entries = dotenv::from_path_iter(&self.path)
            .with_context(|| format!("Failed to open env file {}", self.path.display()))?;

        entries
            .collect::<Result<HashMap<_, _>, _>>()
            .with_context(|| format!("Failed to parse env file {}", self.path.display()))
    }

    /// Set `key` to `value`, replacing an existing assignment or appending one
    pub fn set_key(&self, key: &str, value: &str) -> Result<()> {
        let existing = if self.path.exists() {
            fs::read_to_string(&self.path)
                .with_context(|| format!("Failed to read env file {}", self.path.display()))?
        } else {
            String::new()
        };

        let updated = Self::replace_assignment(&existing, key, value);
        fs::write(&self.path, updated)
            .with_context(|| format!("Failed to write env file {}", self.path.display()))?;

        info!("Updated {} in {}", key, self.path.display());
        Ok(())
    }

    // --- Helper Methods ---

    fn replace_assignment(contents: &str, key: &str, value: &str) -> String {
        let assignment = format!("{}={}", key, Self::quote(value));
        let mut replaced = false;

        let mut lines: Vec<String> = contents
            .lines()
            .map(|line| {
                if !replaced && Self::assigns(line, key) {
                    replaced = true;
                    assignment.clone()
                } else {
                    line.to_string()
                }
            })
            .collect();

        if !replaced {
            lines.push(assignment);
        }

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }

    fn assigns(line: &str, key: &str) -> bool {
        let line = line.trim_start();
        let line = line.strip_prefix("export ").unwrap_or(line);
        line.strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    }

    /// Single quotes are literal to dotenv; double quotes need `\\`, `"`, `$` escaped
    fn quote(value: &str) -> String {
        if !value.contains(['\'', '\n']) {
            return format!("'{}'", value);
        }

        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('"');
        for c in value.chars() {
            match c {
                '\\' | '"' | '$' => {
                    quoted.push('\\');
                    quoted.push(c);
                }
                '\n' => quoted.push_str("\\n"),
                _ => quoted.push(c),
            }
        }
        quoted.push('"');
        quoted
    }
}

impl TokenStore for EnvFile {
    fn persist_token(&self, token: &str) -> Result<()> {
        self.set_key(TOKEN_KEY, token)
    }
}
