//! Environment configuration for the catalog renderer.
//!
//! Values come from the process environment, with a `.env` file loaded first
//! when one is present.

use std::path::PathBuf;

use crate::{error::CatalogError, operations::CatalogSort};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for the catalog renderer loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file with the scraped model records
    pub catalog_path: PathBuf,
    /// Ordering applied to every level of the tree
    pub sort: CatalogSort,
    /// Where to write the serialized tree, if anywhere
    pub output_path: Option<PathBuf>,
    /// Whether family containers start closed
    pub collapsed: bool,
    pub log_format: LogFormat,
    /// Directory for a log file in addition to stderr
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config instance by loading values from the environment,
    /// after reading a `.env` file if one is present.
    pub fn from_env() -> Result<Self, CatalogError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, or `None` when unset
    ///
    /// # Returns
    /// * `Result<Self, CatalogError>` - The configuration, or an error naming the
    ///   missing or malformed variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CatalogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_path = lookup("CATALOG_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| CatalogError::EnvVarNotFound("CATALOG_PATH".to_string()))?;

        let sort = match lookup("CATALOG_SORT") {
            Some(value) => value.parse().map_err(|e| {
                CatalogError::InvalidEnvVar(format!("CATALOG_SORT: {}", e))
            })?,
            None => CatalogSort::default(),
        };

        let output_path = lookup("CATALOG_OUTPUT")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let collapsed = match lookup("CATALOG_COLLAPSED") {
            Some(value) => parse_flag(&value).ok_or_else(|| {
                CatalogError::InvalidEnvVar(
                    "CATALOG_COLLAPSED must be true or false".to_string(),
                )
            })?,
            None => false,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(_) => {
                return Err(CatalogError::InvalidEnvVar(
                    "LOG_FORMAT must be text or json".to_string(),
                ))
            }
        };

        let log_dir = lookup("LOG_DIR")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            catalog_path,
            sort,
            output_path,
            collapsed,
            log_format,
            log_dir,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}
