//! Regenerates `tools.json` from a repository list.
//!
//! Each repository README carries its catalog entry as YAML front matter
//! wrapped in the first HTML comment:
//!
//! ```text
//! <!--
//! ---
//! id: day102
//! slug: qrcrashtest
//! title: "QRCrashTest"
//! category_ja: ["QRコード"]
//! difficulty: 2
//! hub: true
//! ---
//! -->
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::hacklab::hub::error::Result;
use crate::hacklab::hub::model::{Category, Tool, ToolsDocument};

pub const SCHEMA_VERSION: u32 = 1;
const DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];
const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";

static HTTPS_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/([^/]+)/([^/]+?)(\.git)?$").expect("valid regex")
});
static SSH_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@github\.com:([^/]+)/([^/]+?)(\.git)?$").expect("valid regex")
});
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("valid regex"));
static YAML_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)---(.*?)---").expect("valid regex"));

/// A GitHub repository named in the repository list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn default_repo_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    pub fn default_demo_url(&self) -> String {
        format!("https://{}.github.io/{}/", self.owner, self.repo)
    }
}

/// Reads the repository list: one URL per line, `#` comments and blank lines skipped.
/// A missing list yields no repositories.
pub fn read_repo_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        warn!(path = %path.display(), "repository list not found");
        return Ok(Vec::new());
    }
    let source = fs::read_to_string(path)?;
    Ok(source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Splits an HTTPS or SSH GitHub URL into owner and repository name.
pub fn parse_repo_url(url: &str) -> Option<RepoRef> {
    let url = url.trim();
    let captures = HTTPS_REPO
        .captures(url)
        .or_else(|| SSH_REPO.captures(url));
    match captures {
        Some(captures) => Some(RepoRef {
            owner: captures[1].to_string(),
            repo: captures[2].to_string(),
        }),
        None => {
            warn!(url, "not a GitHub repository URL");
            None
        }
    }
}

/// Fetches the README of a repository.
pub trait ReadmeSource {
    fn fetch(&self, repo: &RepoRef) -> Option<String>;
}

/// Reads READMEs straight from `raw.githubusercontent.com`.
pub struct GithubReadmeSource {
    client: reqwest::blocking::Client,
    branches: Vec<String>,
}

impl GithubReadmeSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            client,
            branches: DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect(),
        })
    }
}

impl ReadmeSource for GithubReadmeSource {
    fn fetch(&self, repo: &RepoRef) -> Option<String> {
        for branch in &self.branches {
            let url = format!(
                "{RAW_CONTENT_BASE}/{}/{}/{branch}/README.md",
                repo.owner, repo.repo
            );
            let response = match self.client.get(&url).send() {
                Ok(response) => response,
                Err(error) => {
                    warn!(%url, %error, "README request failed");
                    return None;
                }
            };
            if !response.status().is_success() {
                debug!(%url, status = %response.status(), "README not on branch");
                continue;
            }
            return match response.text() {
                Ok(text) => Some(text),
                Err(error) => {
                    warn!(%url, %error, "README body unreadable");
                    None
                }
            };
        }
        warn!(owner = %repo.owner, repo = %repo.repo, "README not found on any branch");
        None
    }
}

/// Reads READMEs from local checkouts, laid out as `<root>/<owner>/<repo>`
/// or `<root>/<repo>`.
pub struct LocalReadmeSource {
    root: PathBuf,
}

impl LocalReadmeSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ReadmeSource for LocalReadmeSource {
    fn fetch(&self, repo: &RepoRef) -> Option<String> {
        let candidates = [
            self.root.join(&repo.owner).join(&repo.repo).join("README.md"),
            self.root.join(&repo.repo).join("README.md"),
        ];
        for candidate in &candidates {
            match fs::read_to_string(candidate) {
                Ok(text) => return Some(text),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => continue,
                Err(error) => {
                    warn!(path = %candidate.display(), %error, "README unreadable");
                    return None;
                }
            }
        }
        warn!(owner = %repo.owner, repo = %repo.repo, "README not found locally");
        None
    }
}

/// Maps localized category names (and aliases) to category ids.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    ja_to_id: HashMap<String, String>,
    en_to_id: HashMap<String, String>,
}

impl CategoryIndex {
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut index = Self::default();
        for category in categories.iter().filter(|category| !category.id.is_empty()) {
            let names_ja = std::iter::once(&category.ja).chain(&category.aliases_ja);
            for name in names_ja.filter(|name| !name.is_empty()) {
                index.ja_to_id.insert(name.clone(), category.id.clone());
            }
            let names_en = std::iter::once(&category.en).chain(&category.aliases_en);
            for name in names_en.filter(|name| !name.is_empty()) {
                index.en_to_id.insert(name.clone(), category.id.clone());
            }
        }
        index
    }

    /// Loads the index from `categories.json`; a missing or broken file gives an empty index.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "categories file not found; using no categories");
            return Self::default();
        }
        match read_categories(path) {
            Ok(categories) => Self::from_categories(&categories),
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to read categories");
                Self::default()
            }
        }
    }

    pub fn ja(&self, name: &str) -> Option<&str> {
        self.ja_to_id.get(name).map(String::as_str)
    }

    pub fn en(&self, name: &str) -> Option<&str> {
        self.en_to_id.get(name).map(String::as_str)
    }
}

fn read_categories(path: &Path) -> Result<Vec<Category>> {
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Catalog entry as written in README front matter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub subtitle_ja: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub subtitle_en: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub description_ja: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub description_en: Option<String>,
    pub category_ja: Option<Vec<String>>,
    pub category_en: Option<Vec<String>>,
    pub difficulty: Option<Value>,
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "scalar_text")]
    pub repo_url: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub demo_url: Option<String>,
    pub hub: Option<Value>,
}

/// Reads a YAML scalar as text, so `id: 102` becomes `"102"`.
fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    };
    Ok(text)
}

/// Finds the first HTML comment and parses the `--- ... ---` block inside it.
pub fn extract_front_matter(readme: &str) -> Option<Mapping> {
    let Some(comment) = HTML_COMMENT.captures(readme) else {
        warn!("README has no HTML comment block");
        return None;
    };
    let Some(block) = YAML_BLOCK.captures(&comment[1]) else {
        warn!("comment block has no front matter");
        return None;
    };
    match serde_yaml::from_str::<Value>(&block[1]) {
        Ok(Value::Mapping(mapping)) => Some(mapping),
        Ok(_) => {
            warn!("front matter is not a mapping");
            None
        }
        Err(error) => {
            warn!(%error, "front matter is not valid YAML");
            None
        }
    }
}

/// Builds the tool entry for one repository.
pub fn build_tool(front: FrontMatter, repo: &RepoRef, index: &CategoryIndex) -> Tool {
    let category_ja = front.category_ja.unwrap_or_default();
    let category_en = front.category_en.unwrap_or_default();

    let mut category_ids = BTreeSet::new();
    for name in &category_ja {
        match index.ja(name) {
            Some(id) => {
                category_ids.insert(id.to_string());
            }
            None => info!(name = %name, "unknown category name (ja)"),
        }
    }
    for name in &category_en {
        match index.en(name) {
            Some(id) => {
                category_ids.insert(id.to_string());
            }
            None => info!(name = %name, "unknown category name (en)"),
        }
    }

    let mut tool = Tool::new(
        front.id.unwrap_or_default(),
        front.slug.unwrap_or_default(),
    );
    tool.title = front.title.unwrap_or_default();
    tool.subtitle_ja = front.subtitle_ja.unwrap_or_default();
    tool.subtitle_en = front.subtitle_en.unwrap_or_default();
    tool.description_ja = front.description_ja.unwrap_or_default();
    tool.description_en = front.description_en.unwrap_or_default();
    tool.category_ja = category_ja;
    tool.category_en = category_en;
    tool.category_ids = category_ids.into_iter().collect();
    tool.difficulty = difficulty(front.difficulty.as_ref());
    tool.tags = front.tags.unwrap_or_default();
    tool.repo_url = front.repo_url.unwrap_or_else(|| repo.default_repo_url());
    tool.demo_url = front.demo_url.unwrap_or_else(|| repo.default_demo_url());
    tool.hub = front.hub.as_ref().is_none_or(truthy);
    tool
}

fn difficulty(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(text)) if !text.trim().is_empty() => {
            let parsed = text.trim().parse::<u32>().ok();
            if parsed.is_none() {
                warn!(difficulty = %text, "difficulty is not a number");
            }
            parsed
        }
        _ => None,
    };
    parsed.filter(|level| *level > 0).unwrap_or(1)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(entries) => !entries.is_empty(),
        Value::Tagged(tagged) => truthy(&tagged.value),
    }
}

/// Collects the entries of every listed repository, sorted by id.
pub fn collect_tools(repos: &[String], index: &CategoryIndex, source: &dyn ReadmeSource) -> Vec<Tool> {
    let mut tools = Vec::new();
    for url in repos {
        let Some(repo) = parse_repo_url(url) else {
            continue;
        };
        info!(owner = %repo.owner, repo = %repo.repo, "processing repository");

        let Some(readme) = source.fetch(&repo) else {
            continue;
        };
        let Some(mapping) = extract_front_matter(&readme) else {
            continue;
        };
        let front: FrontMatter = match serde_yaml::from_value(Value::Mapping(mapping)) {
            Ok(front) => front,
            Err(error) => {
                warn!(owner = %repo.owner, repo = %repo.repo, %error, "unusable front matter");
                continue;
            }
        };

        let tool = build_tool(front, &repo, index);
        if tool.id.is_empty() {
            warn!(owner = %repo.owner, repo = %repo.repo, "skipping entry without id");
            continue;
        }
        tools.push(tool);
    }
    tools.sort_by(|lhs, rhs| lhs.id.cmp(&rhs.id));
    tools
}

/// Current UTC time in the manifest's `generated_at` format.
pub fn generated_at_now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Generates the manifest and writes it to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(repos = %repos.display(), output = %output.display())
)]
pub fn generate_manifest(
    repos: &Path,
    categories: &Path,
    output: &Path,
    source: &dyn ReadmeSource,
) -> Result<ToolsDocument> {
    let repo_urls = read_repo_list(repos)?;
    let index = CategoryIndex::load(categories);
    let tools = collect_tools(&repo_urls, &index, source);

    let document = ToolsDocument {
        schema_version: Some(SCHEMA_VERSION),
        generated_at: generated_at_now(),
        tools,
    };
    write_manifest(output, &document)?;
    info!(tool_count = document.tools.len(), "tools manifest written");
    Ok(document)
}

pub fn write_manifest(path: &Path, document: &ToolsDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    Ok(())
}
