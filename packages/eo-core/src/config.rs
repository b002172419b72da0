//! Object framework configuration.

use std::path::PathBuf;

/// Environment variable holding extra model search paths.
pub const MODEL_PATH_ENV: &str = "EO_MODEL_PATH";

/// Editing context configuration.
#[derive(Debug, Clone)]
pub struct EoConfig {
    /// Directories searched, in order, for model files
    pub model_search_paths: Vec<PathBuf>,
    /// Model file extension (without the dot)
    pub model_file_extension: String,
    /// Validate inserted and updated objects before save
    pub validate_on_save: bool,
}

impl EoConfig {
    /// Builds a configuration whose search paths come from `EO_MODEL_PATH`,
    /// falling back to the defaults when the variable is unset or empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(paths) = std::env::var_os(MODEL_PATH_ENV) {
            let paths: Vec<PathBuf> = std::env::split_paths(&paths)
                .filter(|path| !path.as_os_str().is_empty())
                .collect();
            if !paths.is_empty() {
                config.model_search_paths = paths;
            }
        }
        config
    }

    /// Returns a copy with `path` searched before the existing paths.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_search_paths.insert(0, path.into());
        self
    }

    /// Candidate file paths for a model name, in search order.
    pub fn model_file_candidates(&self, model_name: &str) -> Vec<PathBuf> {
        self.model_search_paths
            .iter()
            .map(|dir| dir.join(format!("{}.{}", model_name, self.model_file_extension)))
            .collect()
    }
}

impl Default for EoConfig {
    fn default() -> Self {
        Self {
            model_search_paths: vec![PathBuf::from("./models")],
            model_file_extension: "json".to_string(),
            validate_on_save: true,
        }
    }
}
