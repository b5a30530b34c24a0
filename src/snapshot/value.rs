use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

const INDENT: usize = 2;

/// Normalized, comparable representation of remote data
///
/// Mappings are keyed by the remote field names, sequences keep the order in which
/// repeated groups were returned, and every scalar is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Scalar(String),
    Seq(Vec<Snapshot>),
    Map(BTreeMap<String, Snapshot>),
}

impl Snapshot {
    /// Build a mapping from `(field, value)` pairs
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Snapshot)>,
        K: Into<String>,
    {
        Snapshot::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Snapshot::Scalar(value.into())
    }

    /// Look up a field of a mapping
    pub fn get(&self, key: &str) -> Option<&Snapshot> {
        match self {
            Snapshot::Map(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Snapshot::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Snapshot]> {
        match self {
            Snapshot::Seq(items) => Some(items),
            _ => None,
        }
    }

    fn is_inline(&self) -> bool {
        match self {
            Snapshot::Scalar(_) => true,
            Snapshot::Seq(items) => items.is_empty(),
            Snapshot::Map(fields) => fields.is_empty(),
        }
    }

    fn write_inline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Scalar(s) if s.is_empty() => write!(f, "''"),
            Snapshot::Scalar(s) => write!(f, "{}", s.replace('\n', " ")),
            Snapshot::Seq(_) => write!(f, "[]"),
            Snapshot::Map(_) => write!(f, "{{}}"),
        }
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = " ".repeat(depth * INDENT);
        match self {
            Snapshot::Map(fields) => {
                for (key, value) in fields {
                    write!(f, "{}{}:", pad, key)?;
                    value.write_child(f, depth)?;
                }
            }
            Snapshot::Seq(items) => {
                for item in items {
                    write!(f, "{}-", pad)?;
                    item.write_child(f, depth)?;
                }
            }
            Snapshot::Scalar(_) => {
                write!(f, "{}", pad)?;
                self.write_inline(f)?;
                writeln!(f)?;
            }
        }
        Ok(())
    }

    fn write_child(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if self.is_inline() {
            write!(f, " ")?;
            self.write_inline(f)?;
            writeln!(f)
        } else {
            writeln!(f)?;
            self.write_block(f, depth + 1)
        }
    }
}

/// Indented, human readable rendering used by `dump`
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_block(f, 0)
    }
}
