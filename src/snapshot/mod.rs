//! Canonical form of remote query results.
//!
//! Every response from the portal is reduced to a [`Snapshot`] tree before it is
//! compared or stored. Two fetches of the same remote content always produce equal
//! trees, and the tree serializes to JSON and reads back into the identical value,
//! so the stored copy can be compared directly against the next fetch.

pub mod normalize;
pub mod value;

pub use normalize::{Normalize, normalize_text};
pub use value::Snapshot;
