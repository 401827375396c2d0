//! Per-tool progress persistence.
//!
//! Progress is a key → small-integer map. Each tool gets one key,
//! `progress_<slug>`, holding its level as a decimal string. Reads never fail:
//! a missing or corrupted value is reported as [`ProgressLevel::NotStarted`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::hacklab::hub::error::Result;
use crate::hacklab::hub::model::{ProgressLevel, Tool};

const KEY_PREFIX: &str = "progress_";

/// Storage key used for a tool slug.
pub fn storage_key(slug: &str) -> String {
    format!("{KEY_PREFIX}{slug}")
}

/// Durable map from tool slug to progress level.
pub trait ProgressStore {
    /// Returns the stored level, or `NotStarted` when absent or malformed.
    fn get(&self, slug: &str) -> ProgressLevel;

    /// Overwrites the stored level unconditionally.
    fn set(&mut self, slug: &str, level: ProgressLevel) -> Result<()>;
}

/// Sets every visible tool back to [`ProgressLevel::NotStarted`].
pub fn reset_all<S>(store: &mut S, tools: &[Tool]) -> Result<usize>
where
    S: ProgressStore + ?Sized,
{
    let mut reset = 0;
    for tool in tools.iter().filter(|tool| tool.is_visible()) {
        store.set(&tool.slug, ProgressLevel::NotStarted)?;
        reset += 1;
    }
    debug!(reset, "progress reset");
    Ok(reset)
}

/// In-memory store, used by tests and as the fallback when no file is configured.
#[derive(Debug, Default, Clone)]
pub struct MemoryProgressStore {
    entries: HashMap<String, String>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw value under a slug's key, bypassing normalisation.
    pub fn insert_raw(&mut self, slug: &str, raw: impl Into<String>) {
        self.entries.insert(storage_key(slug), raw.into());
    }

    pub fn raw(&self, slug: &str) -> Option<&str> {
        self.entries.get(&storage_key(slug)).map(String::as_str)
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get(&self, slug: &str) -> ProgressLevel {
        self.raw(slug)
            .map(ProgressLevel::from_stored)
            .unwrap_or_default()
    }

    fn set(&mut self, slug: &str, level: ProgressLevel) -> Result<()> {
        self.entries.insert(storage_key(slug), level.to_string());
        Ok(())
    }
}

/// Store persisted as a single JSON object file.
///
/// Every `set` rewrites the file through a temporary sibling and a rename, so
/// a single key update is never observed half-written. A failed write leaves
/// the store unchanged.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl FileProgressStore {
    /// Opens the store at `path`. A missing file starts empty; an unreadable or
    /// corrupted file is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(source) => parse_entries(&path, &source),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(error) => {
                warn!(path = %path.display(), %error, "progress file unreadable; starting empty");
                Map::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "progress store opened");
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl ProgressStore for FileProgressStore {
    fn get(&self, slug: &str) -> ProgressLevel {
        match self.entries.get(&storage_key(slug)) {
            Some(Value::String(raw)) => ProgressLevel::from_stored(raw),
            Some(Value::Number(number)) => ProgressLevel::from_stored(&number.to_string()),
            _ => ProgressLevel::NotStarted,
        }
    }

    fn set(&mut self, slug: &str, level: ProgressLevel) -> Result<()> {
        // The in-memory map only changes once the file write has succeeded.
        let mut entries = self.entries.clone();
        entries.insert(storage_key(slug), Value::String(level.to_string()));
        self.persist(&entries)?;
        self.entries = entries;
        Ok(())
    }
}

fn parse_entries(path: &Path, source: &str) -> Map<String, Value> {
    if source.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(source) {
        Ok(Value::Object(entries)) => entries,
        Ok(_) => {
            warn!(path = %path.display(), "progress file is not a JSON object; starting empty");
            Map::new()
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "progress file is corrupted; starting empty");
            Map::new()
        }
    }
}
