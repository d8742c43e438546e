use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_questions_per_column")]
    pub questions_per_column: u16,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_questions_per_column() -> u16 {
    25
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            questions_per_column: default_questions_per_column(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("marksheet")
            .join("config.toml")
    }

    /// Clamp values a hand-edited or stale config file may carry out of range.
    pub fn validate(&mut self) {
        self.questions_per_column = self.questions_per_column.clamp(5, 50);
    }
}
