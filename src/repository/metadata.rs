//! Marker file contents and their `key=value` encoding

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::error::RepoError;

/// On-disk format version written to and required from every marker
pub const SCHEMA_VERSION: u32 = 3;

/// Case file numbers look like `1234/3/2024`, possibly followed by a suffix (`/a1`)
static FILE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+/\d+/\d{4}").expect("valid file number pattern"));

const KEY_SCHEMA_VERSION: &str = "schemaVersion";
const KEY_CRITERIA: &str = "criteria";
const KEY_KIND: &str = "kind";
const KEY_CONTENT_VERSION: &str = "contentVersion";
const KEY_ACKNOWLEDGED_VERSION: &str = "acknowledgedVersion";

pub fn is_valid_file_number(criteria: &str) -> bool {
    FILE_NUMBER_PATTERN.is_match(criteria)
}

/// Which remote lookup a repository performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoKind {
    ByFileNumber,
    BySearch,
}

impl RepoKind {
    pub fn code(self) -> u8 {
        match self {
            RepoKind::ByFileNumber => 0,
            RepoKind::BySearch => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(RepoKind::ByFileNumber),
            1 => Some(RepoKind::BySearch),
            _ => None,
        }
    }
}

impl fmt::Display for RepoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoKind::ByFileNumber => write!(f, "case file"),
            RepoKind::BySearch => write!(f, "party search"),
        }
    }
}

/// Contents of the repository marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub criteria: String,
    pub kind: RepoKind,
    pub content_version: u64,
    pub acknowledged_version: u64,
}

impl Metadata {
    pub fn new(criteria: impl Into<String>, kind: RepoKind) -> Self {
        Self { criteria: criteria.into(), kind, content_version: 0, acknowledged_version: 0 }
    }

    /// Render the marker, one newline-terminated `key=value` line per field
    pub fn encode(&self) -> String {
        format!(
            "{}={}\n{}={}\n{}={}\n{}={}\n{}={}\n",
            KEY_SCHEMA_VERSION,
            SCHEMA_VERSION,
            KEY_CRITERIA,
            self.criteria,
            KEY_KIND,
            self.kind.code(),
            KEY_CONTENT_VERSION,
            self.content_version,
            KEY_ACKNOWLEDGED_VERSION,
            self.acknowledged_version,
        )
    }

    /// Parse marker text read from `path`
    ///
    /// The schema version is checked before any other field is interpreted, so an
    /// unsupported marker never yields a partially populated value. Unknown keys are
    /// ignored; a later duplicate key overrides an earlier one.
    pub fn decode(text: &str, path: &Path) -> Result<Self, RepoError> {
        let mut fields = HashMap::new();
        for (line_num, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                RepoError::corrupt(path, format!("line {} is not key=value", line_num + 1))
            })?;
            fields.insert(key, value);
        }

        let lookup = |key: &str| field(&fields, key, path);
        let number = |key: &str| number_field(&fields, key, path);

        let schema = number(KEY_SCHEMA_VERSION)?;
        if schema != u64::from(SCHEMA_VERSION) {
            return Err(RepoError::UnsupportedSchemaVersion {
                found: u32::try_from(schema).unwrap_or(u32::MAX),
                supported: SCHEMA_VERSION,
            });
        }

        let criteria = lookup(KEY_CRITERIA)?.to_string();
        let kind = u8::try_from(number(KEY_KIND)?)
            .ok()
            .and_then(RepoKind::from_code)
            .ok_or_else(|| RepoError::corrupt(path, "unknown repository kind"))?;
        let content_version = number(KEY_CONTENT_VERSION)?;
        let acknowledged_version = number(KEY_ACKNOWLEDGED_VERSION)?;

        if acknowledged_version > content_version {
            return Err(RepoError::corrupt(
                path,
                format!(
                    "acknowledged version {} is ahead of content version {}",
                    acknowledged_version, content_version
                ),
            ));
        }

        Ok(Self { criteria, kind, content_version, acknowledged_version })
    }
}

fn field<'a>(fields: &HashMap<&str, &'a str>, key: &str, path: &Path) -> Result<&'a str, RepoError> {
    fields
        .get(key)
        .copied()
        .ok_or_else(|| RepoError::corrupt(path, format!("missing field '{}'", key)))
}

fn number_field(fields: &HashMap<&str, &str>, key: &str, path: &Path) -> Result<u64, RepoError> {
    let raw = field(fields, key, path)?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| RepoError::corrupt(path, format!("field '{}' is not a number: {:?}", key, raw)))
}
