use serde::{Deserialize, Serialize};

use crate::DashError;

/// Backend the renderer draws with.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Canvas,
    Svg,
}

/// Options forwarded verbatim to the embed call.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbedOptions {
    pub actions: bool,
    pub renderer: RendererKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub spec_dir: String,
    pub embed: EmbedOptions,
    pub default_year: f64,
    pub default_region: String,
    pub highlight_default: String,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            spec_dir: "specs".to_string(),
            embed: EmbedOptions::default(),
            default_year: 2022.0,
            default_region: "Australia".to_string(),
            highlight_default: "All".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a (possibly partial) JSON config block; missing keys keep
    /// their defaults.
    pub fn from_json(raw: &str) -> Result<Self, DashError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|err| DashError::Config(err.to_string()))
    }

    pub fn spec_path(&self, file_stem: &str) -> String {
        let dir = self.spec_dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{file_stem}.vg.json")
        } else {
            format!("{dir}/{file_stem}.vg.json")
        }
    }
}
