use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::hacklab::hub::error::{HubError, Result};
use crate::hacklab::hub::model::{Category, Tool, ToolsDocument};

pub const CATEGORIES_FILE: &str = "categories.json";
pub const TOOLS_FILE: &str = "tools.json";

/// Where the two catalog documents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A directory containing `categories.json` and `tools.json`.
    Directory(PathBuf),
    /// A base URL under which both documents are served.
    Remote(String),
}

impl DataSource {
    fn describe(&self, file: &str) -> String {
        match self {
            DataSource::Directory(dir) => dir.join(file).display().to_string(),
            DataSource::Remote(base) => remote_url(base, file),
        }
    }
}

/// In-memory catalog populated once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub tools: Vec<Tool>,
    pub generated_at: String,
    pub schema_version: Option<u32>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, document: ToolsDocument) -> Self {
        Self {
            categories,
            tools: document.tools,
            generated_at: document.generated_at,
            schema_version: document.schema_version,
        }
    }

    /// Tools shown in the catalog and counted by the dashboard.
    pub fn visible_tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter().filter(|tool| tool.is_visible())
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn tool(&self, slug: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.slug == slug)
    }
}

/// Loads both catalog documents. The catalog is returned only when both
/// documents were fetched and decoded; there is no partial result.
#[instrument(level = "info", skip_all, fields(source = ?source))]
pub fn load_catalog(source: &DataSource) -> Result<Catalog> {
    let (categories, document): (Vec<Category>, ToolsDocument) = match source {
        DataSource::Directory(dir) => (
            read_json_file(&dir.join(CATEGORIES_FILE))?,
            read_json_file(&dir.join(TOOLS_FILE))?,
        ),
        DataSource::Remote(base) => {
            let client = reqwest::blocking::Client::new();
            (
                fetch_json(&client, &remote_url(base, CATEGORIES_FILE))?,
                fetch_json(&client, &remote_url(base, TOOLS_FILE))?,
            )
        }
    };

    info!(
        category_count = categories.len(),
        tool_count = document.tools.len(),
        generated_at = %document.generated_at,
        "catalog loaded from {}",
        source.describe(TOOLS_FILE)
    );
    Ok(Catalog::new(categories, document))
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(HubError::DataLoad {
            resource: path.display().to_string(),
            reason: "file not found".to_string(),
        });
    }
    let source = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = source.len(), "read catalog document");
    Ok(serde_json::from_str(&source)?)
}

fn fetch_json<T: DeserializeOwned>(client: &reqwest::blocking::Client, url: &str) -> Result<T> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(HubError::DataLoad {
            resource: url.to_string(),
            reason: format!("HTTP status {status}"),
        });
    }
    let body = response.text()?;
    debug!(url, bytes = body.len(), "fetched catalog document");
    Ok(serde_json::from_str(&body)?)
}

fn remote_url(base: &str, file: &str) -> String {
    format!("{}/{file}", base.trim_end_matches('/'))
}
