//! Remote lookup against the courts portal query service
//!
//! The portal exposes a single SOAP operation, `CautareDosare`, searching either by
//! case file number or by party name. [`PortalClient`] issues that call and turns the
//! XML reply into typed [`CaseFile`] records. [`fetch`] wraps any [`CaseQuery`]
//! implementation and reports records, no records, or failure; [`fetch_snapshot`]
//! reduces that to "a normalized snapshot" or "nothing retrieved", which is all the
//! repository needs to know.

pub mod client;
pub mod models;
pub mod xml;

pub use client::{CaseQuery, Fetched, PortalClient, RemoteError, fetch, fetch_snapshot};
pub use models::{Appeal, CaseFile, Hearing, Party, QueryResponse};
