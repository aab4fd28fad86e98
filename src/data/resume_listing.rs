//! Manages the [`ResumeListing`](ResumeListing) object, the marketplace entry shown
//! by a résumé item.
use crate::data::error::ResumeError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A marketplace listing. `resumes` holds server-side paths of the form
/// `<folder>/<filename>`; only the first one is ever displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeListing {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub resumes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One rendered tag with a key that is unique within its listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub key: String,
    pub label: String,
}

impl ResumeListing {
    pub fn new(id: &str, resumes: Vec<String>, tags: Vec<String>) -> ResumeListing {
        ResumeListing {
            id: id.to_owned(),
            resumes,
            tags,
        }
    }

    /// Returns the filename the document service knows the first résumé by,
    /// i.e. the second `/`-delimited segment of `resumes[0]`.
    ///
    /// Both the background fetch and the "open full document" URL go through here.
    pub fn resume_filename(&self) -> Result<String, ResumeError> {
        let path = self.resumes.first().ok_or_else(|| {
            ResumeError::InvalidInput(format!("listing '{}' has no résumé", self.id))
        })?;
        match path.split('/').nth(1) {
            Some(filename) if !filename.is_empty() => Ok(filename.to_owned()),
            _ => Err(ResumeError::InvalidInput(format!(
                "résumé path '{path}' of listing '{}' has no filename segment",
                self.id
            ))),
        }
    }

    /// Tags paired with their render keys (`<id>-<tag>`). A key that was already
    /// handed out gets a `#n` suffix, bumped until it is unused.
    pub fn tag_entries(&self) -> Vec<TagEntry> {
        let mut issued: HashSet<String> = HashSet::new();
        self.tags
            .iter()
            .map(|tag| {
                let base = format!("{}-{}", self.id, tag);
                let mut key = base.clone();
                let mut n = 0;
                while issued.contains(&key) {
                    n += 1;
                    key = format!("{base}#{n}");
                }
                issued.insert(key.clone());
                TagEntry {
                    key,
                    label: tag.clone(),
                }
            })
            .collect()
    }
}

/// Reads a JSON array of listings from disk.
pub fn load_listings(path: &Path) -> Result<Vec<ResumeListing>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Couldn't read listings file '{}'", path.display()))?;
    let listings: Vec<ResumeListing> = serde_json::from_str(&contents)
        .with_context(|| format!("Couldn't parse listings file '{}'", path.display()))?;
    info!("Loaded {} listings from {}", listings.len(), path.display());
    Ok(listings)
}
