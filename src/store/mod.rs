mod document;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::models::FreelancerProfile;

use document::Document;

pub const DEFAULT_FILE_NAME: &str = "freelancer_data.json";

/// Loads and saves the whole profile as one JSON document.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `freelancer_data.json` in the platform data directory.
    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "timecard")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(Self::new(dirs.data_dir().join(DEFAULT_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the profile, falling back to [`FreelancerProfile::default`].
    pub fn load(&self) -> FreelancerProfile {
        self.load_or_else(FreelancerProfile::default)
    }

    /// Load the profile. A missing, empty, unreadable or malformed document
    /// yields `fallback()` instead of an error.
    pub fn load_or_else(&self, fallback: impl FnOnce() -> FreelancerProfile) -> FreelancerProfile {
        match self.try_load() {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::debug!("No profile at {}, starting fresh", self.path.display());
                fallback()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load profile from {}, starting fresh: {}",
                    self.path.display(),
                    e
                );
                fallback()
            }
        }
    }

    /// Read the document. `Ok(None)` when the file is absent or blank.
    pub fn try_load(&self) -> Result<Option<FreelancerProfile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let document: Document = serde_json::from_str(&content)?;
        let mut profile = FreelancerProfile::from(document);
        if profile.repair_active_pointer() {
            tracing::warn!("Active session pointer did not reference an open session; cleared");
        }
        let closed = profile.close_stray_sessions();
        if closed > 0 {
            tracing::warn!(
                "Closed {} open session(s) not referenced by the active pointer",
                closed
            );
        }

        tracing::debug!(
            "Loaded {} companies, {} sessions from {}",
            profile.companies.len(),
            profile.session_count(),
            self.path.display()
        );
        Ok(Some(profile))
    }

    /// Replace the document on disk with `profile`.
    ///
    /// Writes a sibling temp file, syncs it, then renames it over the target,
    /// so readers see either the old document or the new one.
    pub fn save(&self, profile: &FreelancerProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = to_pretty_json(&Document::from(profile))?;

        let tmp_path = self.temp_path();
        let written = write_synced(&tmp_path, content.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!("Saved profile to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.write_all(b"\n")?;
    file.sync_all()
}

/// Serialize with four-space indentation.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
