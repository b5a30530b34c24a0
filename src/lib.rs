//! Adrian - watch court case files for new information
//!
//! Each tracked query (a case file number, or a search by party name) lives in its
//! own local directory, called a repository. Updating a repository queries the
//! courts portal, normalizes the response into a [`Snapshot`] and compares it with
//! the stored one:
//!
//! - a different snapshot bumps the repository's content version
//! - marking the repository as read moves its acknowledged version up to match
//! - whenever the two versions differ there is unread information to report
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use adrian::remote::{PortalClient, fetch_snapshot};
//! use adrian::{RepoKind, Repository};
//!
//! let path = Path::new("/home/alice/cases/1234");
//! let mut repo = match Repository::load(path)? {
//!     Some(repo) => repo,
//!     None => Repository::create(path, "1234/3/2024", RepoKind::ByFileNumber)?,
//! };
//!
//! let client = PortalClient::new("http://portalquery.just.ro/query.asmx", Duration::from_secs(30))?;
//! let fetched = fetch_snapshot(&client, repo.criteria(), repo.kind());
//! if repo.update(fetched)? && repo.has_unread_info() {
//!     println!("New information for {}", repo.criteria());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod notify;
pub mod remote;
pub mod repository;
pub mod snapshot;
pub mod utils;

// Re-export commonly used types
pub use config::Configuration;
pub use repository::{RepoError, RepoKind, Repository};
pub use snapshot::{Normalize, Snapshot};
