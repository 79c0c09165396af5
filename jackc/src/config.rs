use crate::error::Error;
use crate::symbols::RUNTIME_CLASSES;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How control-flow labels are numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LabelScheme {
    /// `IF_TRUE0`, `IF_END0`, `WHILE_EXP0`, `WHILE_END0`: counted per class
    #[default]
    Counter,
    /// `IF12`, `FI12`, `WHILE30`, `ELIHW30`: numbered by source line
    Line,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub labels: LabelScheme,
    pub out_dir: Option<PathBuf>,
    pub runtime_classes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            labels: LabelScheme::default(),
            out_dir: None,
            runtime_classes: RUNTIME_CLASSES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, Error> {
        serde_yaml::from_str(text).map_err(|e| Error::Config(origin.to_string(), e))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let origin = path.display().to_string();
        let text =
            std::fs::read_to_string(path).map_err(|e| Error::FileOpen(origin.clone(), e))?;
        let config = Self::from_yaml(&text, &origin)?;
        tracing::info!("loaded config from {origin}");
        Ok(config)
    }
}
