//! Versioned local mirror of one tracked remote query
//!
//! A repository is a directory holding two files:
//! - `.adrian-repo`: the marker, plain `key=value` metadata (criteria, kind, versions)
//! - `snapshot.json`: the last normalized remote response, present once something
//!   has been fetched
//!
//! Two counters drive everything. The content version increments each time a fetch
//! differs from the stored snapshot; the acknowledged version records the last
//! content version the user marked as read. `acknowledged <= content` always holds,
//! and a repository with unread information is one where the two differ.
//!
//! Writes replace files atomically (temp file + rename) and the snapshot is written
//! before the marker, so an interrupted update can leave the counters behind the
//! data but never pointing at data that is not there.

pub mod error;
pub mod metadata;
pub mod persistence;
pub mod store;

pub use error::RepoError;
pub use metadata::{Metadata, RepoKind, SCHEMA_VERSION, is_valid_file_number};
pub use persistence::{MARKER_FILENAME, SNAPSHOT_FILENAME};
pub use store::Repository;
