use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::{debug, error, info};

use super::models::QueryResponse;
use super::xml::{XmlNode, escape_text, parse_document};
use crate::repository::RepoKind;
use crate::snapshot::{Normalize, Snapshot};

const SOAP_NAMESPACE: &str = "portalquery.just.ro";
const SOAP_ACTION: &str = "\"portalquery.just.ro/CautareDosare\"";
const OPERATION: &str = "CautareDosare";

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed XML in response: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Service fault: {0}")]
    Fault(String),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Lookup of case files by number or by party name
pub trait CaseQuery {
    fn find_cases(&self, criteria: &str, kind: RepoKind) -> Result<QueryResponse, RemoteError>;
}

/// SOAP client for the portal `CautareDosare` operation
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: Client,
    endpoint: String,
}

impl PortalClient {
    /// Build a client for `service_url`; a trailing `?wsdl` is dropped since the
    /// operation is posted to the service itself
    pub fn new(service_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let endpoint = service_url
            .strip_suffix("?wsdl")
            .or_else(|| service_url.strip_suffix("?WSDL"))
            .unwrap_or(service_url)
            .to_string();
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// SOAP 1.1 envelope for one query; the other search parameters are left out
pub fn request_envelope(criteria: &str, kind: RepoKind) -> String {
    let parameter = match kind {
        RepoKind::ByFileNumber => "numarDosar",
        RepoKind::BySearch => "numeParte",
    };
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body><{op} xmlns="{ns}"><{param}>{value}</{param}></{op}></soap:Body>"#,
            r#"</soap:Envelope>"#
        ),
        op = OPERATION,
        ns = SOAP_NAMESPACE,
        param = parameter,
        value = escape_text(criteria),
    )
}

/// Interpret a SOAP response document
pub fn parse_response(xml: &str) -> Result<QueryResponse, RemoteError> {
    let document = parse_document(xml)?;
    let body = document
        .descend(&["Envelope", "Body"])
        .ok_or_else(|| RemoteError::UnexpectedResponse("missing SOAP body".to_string()))?;

    if let Some(fault) = body.child("Fault") {
        return Err(RemoteError::Fault(fault_message(fault)));
    }

    let response = body
        .child("CautareDosareResponse")
        .ok_or_else(|| RemoteError::UnexpectedResponse("missing CautareDosareResponse".to_string()))?;

    // An empty result element may be omitted altogether
    Ok(response.child("CautareDosareResult").map(QueryResponse::from_node).unwrap_or_default())
}

fn fault_message(fault: &XmlNode) -> String {
    fault
        .child_text("faultstring")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unspecified fault".to_string())
}

impl CaseQuery for PortalClient {
    fn find_cases(&self, criteria: &str, kind: RepoKind) -> Result<QueryResponse, RemoteError> {
        debug!(endpoint = %self.endpoint, criteria, kind = %kind, "querying portal");

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(request_envelope(criteria, kind))
            .send()?;

        let status = response.status();
        let text = response.text()?;

        // Faults come back as HTTP 500 with a SOAP body worth reporting
        let parsed = parse_response(&text);
        if status.is_success() {
            return parsed;
        }
        match parsed {
            Err(RemoteError::Fault(message)) => Err(RemoteError::Fault(message)),
            _ => Err(RemoteError::UnexpectedResponse(format!("HTTP status {}", status))),
        }
    }
}

/// What a single query produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Records(Snapshot),
    /// The service answered, but nothing matches the criteria
    NoRecords,
    /// The call failed; the cause has been logged
    Failed,
}

impl Fetched {
    /// The snapshot to store, if any
    pub fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            Fetched::Records(snapshot) => Some(snapshot),
            Fetched::NoRecords | Fetched::Failed => None,
        }
    }
}

/// Run a query and normalize its result
pub fn fetch<Q>(client: &Q, criteria: &str, kind: RepoKind) -> Fetched
where
    Q: CaseQuery + ?Sized,
{
    match client.find_cases(criteria, kind) {
        Ok(response) if response.cases.is_empty() => {
            info!(criteria, "remote service returned no records");
            Fetched::NoRecords
        }
        Ok(response) => {
            debug!(criteria, records = response.cases.len(), "remote records retrieved");
            Fetched::Records(response.normalize())
        }
        Err(e) => {
            error!(criteria, error = %e, "remote query failed");
            Fetched::Failed
        }
    }
}

/// [`fetch`] reduced to what the repository stores
///
/// Returns `None` when nothing was retrieved, either because the call failed or
/// because the service returned no records.
pub fn fetch_snapshot<Q>(client: &Q, criteria: &str, kind: RepoKind) -> Option<Snapshot>
where
    Q: CaseQuery + ?Sized,
{
    fetch(client, criteria, kind).into_snapshot()
}
