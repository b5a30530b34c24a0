use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::RepoError;
use super::metadata::{Metadata, RepoKind, is_valid_file_number};
use super::persistence::{
    marker_exists, marker_path, read_marker, read_snapshot, write_marker, write_snapshot,
};
use crate::snapshot::Snapshot;

/// Handle on one tracked repository directory
///
/// Obtained from [`Repository::create`] or [`Repository::load`]; all reads and
/// writes of the marker and snapshot go through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    path: PathBuf,
    meta: Metadata,
}

impl Repository {
    /// Initialize a new repository at `path`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// - [`RepoError::AlreadyExists`] if `path` already holds a marker, whatever the
    ///   requested criteria and kind
    /// - [`RepoError::InvalidCriteria`] if the criteria is empty, spans several lines,
    ///   or is not a case file number for [`RepoKind::ByFileNumber`]
    /// - [`RepoError::Io`] if the directory or marker cannot be written
    pub fn create(path: &Path, criteria: &str, kind: RepoKind) -> Result<Self, RepoError> {
        if marker_exists(path) {
            return Err(RepoError::AlreadyExists(path.to_path_buf()));
        }

        validate_criteria(criteria, kind)?;

        fs::create_dir_all(path).map_err(|e| RepoError::io(path, e))?;

        let repo = Self { path: path.to_path_buf(), meta: Metadata::new(criteria, kind) };
        write_marker(&repo.path, &repo.meta)?;

        info!(path = %path.display(), criteria, kind = %kind, "repository created");
        Ok(repo)
    }

    /// Open the repository at `path`; `Ok(None)` when there is none
    pub fn load(path: &Path) -> Result<Option<Self>, RepoError> {
        let repo = read_marker(path)?.map(|meta| Self { path: path.to_path_buf(), meta });
        if let Some(repo) = &repo {
            debug!(
                path = %path.display(),
                content_version = repo.meta.content_version,
                acknowledged_version = repo.meta.acknowledged_version,
                "repository loaded"
            );
        }
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn criteria(&self) -> &str {
        &self.meta.criteria
    }

    pub fn kind(&self) -> RepoKind {
        self.meta.kind
    }

    pub fn content_version(&self) -> u64 {
        self.meta.content_version
    }

    pub fn acknowledged_version(&self) -> u64 {
        self.meta.acknowledged_version
    }

    /// Stored snapshot, `None` if nothing was fetched yet
    pub fn snapshot(&self) -> Result<Option<Snapshot>, RepoError> {
        if self.meta.content_version == 0 {
            return Ok(None);
        }
        read_snapshot(&self.path).map(Some)
    }

    /// Record the outcome of a fetch; returns whether the content changed
    ///
    /// `fetched` is `None` when the remote service produced nothing, which is
    /// reported as [`RepoError::RemoteUnavailable`] with the repository untouched.
    /// The first successful fetch always counts as a change. After that the new
    /// snapshot is compared structurally with the stored one, and a stored snapshot
    /// that cannot be read is [`RepoError::Corrupt`].
    ///
    /// On change the snapshot is persisted first, then the marker with the bumped
    /// content version; the in-memory state only moves once both writes succeeded.
    pub fn update(&mut self, fetched: Option<Snapshot>) -> Result<bool, RepoError> {
        let fresh = fetched.ok_or(RepoError::RemoteUnavailable)?;

        let changed = match self.snapshot()? {
            None => true,
            Some(stored) => stored != fresh,
        };

        if !changed {
            debug!(path = %self.path.display(), "no change since version {}", self.meta.content_version);
            return Ok(false);
        }

        let content_version = self
            .meta
            .content_version
            .checked_add(1)
            .ok_or_else(|| RepoError::corrupt(marker_path(&self.path), "content version overflow"))?;
        let next = Metadata { content_version, ..self.meta.clone() };
        write_snapshot(&self.path, &fresh)?;
        write_marker(&self.path, &next)?;
        self.meta = next;

        info!(path = %self.path.display(), content_version = self.meta.content_version, "new content stored");
        Ok(true)
    }

    /// Mark everything fetched so far as read; returns whether there was news
    pub fn acknowledge(&mut self) -> Result<bool, RepoError> {
        if !self.has_unread_info() {
            return Ok(false);
        }

        let next = Metadata { acknowledged_version: self.meta.content_version, ..self.meta.clone() };
        write_marker(&self.path, &next)?;
        self.meta = next;

        info!(path = %self.path.display(), acknowledged_version = self.meta.acknowledged_version, "acknowledged");
        Ok(true)
    }

    pub fn has_unread_info(&self) -> bool {
        self.meta.acknowledged_version < self.meta.content_version
    }

    /// Human readable dump of the metadata and the stored snapshot
    pub fn describe(&self) -> Result<String, RepoError> {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "Criteria: {}", self.meta.criteria);
        let _ = writeln!(out, "Kind: {}", self.meta.kind);
        let _ = writeln!(out, "Path: {}", self.path.display());
        let _ = writeln!(out, "Version: {}", self.meta.content_version);
        let _ = writeln!(out, "Acknowledged version: {}", self.meta.acknowledged_version);

        match self.snapshot()? {
            None => out.push_str("No data yet.\n"),
            Some(snapshot) => {
                let _ = write!(out, "Content:\n\n{}", snapshot);
            }
        }

        Ok(out)
    }
}

fn validate_criteria(criteria: &str, kind: RepoKind) -> Result<(), RepoError> {
    if criteria.trim().is_empty() {
        return Err(RepoError::InvalidCriteria("criteria must not be empty".to_string()));
    }
    if criteria.contains(['\n', '\r']) {
        return Err(RepoError::InvalidCriteria("criteria must be a single line".to_string()));
    }
    if kind == RepoKind::ByFileNumber && !is_valid_file_number(criteria) {
        return Err(RepoError::InvalidCriteria(format!("not a case file number: {}", criteria)));
    }
    Ok(())
}
