use std::path::PathBuf;

use crate::hacklab::hub::i18n::Language;
use crate::hacklab::hub::loader::DataSource;

pub const DEFAULT_DATA_DIR: &str = "data";
const APP_DIR: &str = "hacklab-hub";
const PROGRESS_FILE: &str = "progress.json";

/// Default location of the progress file in the platform local data directory.
pub fn default_progress_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(PROGRESS_FILE)
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    pub data: DataSource,
    pub progress_file: PathBuf,
    pub language: Language,
    /// Catalog page linked from the share text; empty omits the link.
    pub page_url: String,
}

impl HubConfig {
    /// Builds the configuration; a data URL takes precedence over the data directory.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        data_url: Option<String>,
        progress_file: Option<PathBuf>,
        language: Language,
        page_url: Option<String>,
    ) -> Self {
        let data = match data_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => DataSource::Remote(url),
            None => DataSource::Directory(
                data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            ),
        };

        Self {
            data,
            progress_file: progress_file.unwrap_or_else(default_progress_path),
            language,
            page_url: page_url.unwrap_or_default(),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::resolve(None, None, None, Language::default(), None)
    }
}
