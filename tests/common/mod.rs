//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::thread;

use adrian::notify::{MailError, MailTransport};
use adrian::remote::{CaseFile, CaseQuery, Hearing, Party, QueryResponse, RemoteError};
use adrian::repository::RepoKind;
use tempfile::TempDir;

/// Builder for portal case file records
pub struct CaseFileBuilder {
    case: CaseFile,
}

impl CaseFileBuilder {
    pub fn new(number: &str) -> Self {
        Self {
            case: CaseFile {
                number: Some(number.to_string()),
                date: Some("2024-01-15T00:00:00".to_string()),
                court: Some("TribunalulBucuresti".to_string()),
                subject: Some("pretentii".to_string()),
                ..CaseFile::default()
            },
        }
    }

    pub fn party(mut self, name: &str, role: &str) -> Self {
        self.case.parties.push(Party { name: Some(name.to_string()), role: Some(role.to_string()) });
        self
    }

    pub fn hearing(mut self, date: &str, ruling: Option<&str>) -> Self {
        self.case.hearings.push(Hearing {
            panel: Some("C3".to_string()),
            date: Some(date.to_string()),
            time: Some("09:00".to_string()),
            ruling: ruling.map(str::to_string),
            ..Hearing::default()
        });
        self
    }

    pub fn build(self) -> CaseFile {
        self.case
    }
}

/// Query client replaying canned outcomes, one per call
#[derive(Default)]
pub struct ScriptedQuery {
    outcomes: RefCell<VecDeque<Result<QueryResponse, String>>>,
    pub calls: RefCell<Vec<(String, RepoKind)>>,
}

impl ScriptedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_cases(self, cases: Vec<CaseFile>) -> Self {
        self.outcomes.borrow_mut().push_back(Ok(QueryResponse { cases }));
        self
    }

    pub fn then_failure(self, message: &str) -> Self {
        self.outcomes.borrow_mut().push_back(Err(message.to_string()));
        self
    }
}

impl CaseQuery for ScriptedQuery {
    fn find_cases(&self, criteria: &str, kind: RepoKind) -> Result<QueryResponse, RemoteError> {
        self.calls.borrow_mut().push((criteria.to_string(), kind));
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted outcome left".to_string()))
            .map_err(RemoteError::UnexpectedResponse)
    }
}

/// Mail transport that records what would have been sent
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: RefCell<Vec<(String, String)>>,
}

impl MailTransport for &RecordingMailer {
    fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        self.sent.borrow_mut().push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Temporary home directory for running the binary
pub struct TestHome {
    temp_dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self { temp_dir: TempDir::new().expect("Failed to create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory for a repository inside the home
    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join("cases").join(name)
    }

    /// Write ~/.adrian/adrian.toml
    pub fn with_config(self, content: &str) -> Self {
        let app_dir = self.temp_dir.path().join(".adrian");
        fs::create_dir_all(&app_dir).expect("Failed to create app dir");
        fs::write(app_dir.join("adrian.toml"), content).expect("Failed to write config");
        self
    }

    pub fn log_file(&self) -> PathBuf {
        self.temp_dir.path().join(".adrian").join("log").join("adrian.log")
    }
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

/// SOAP response body for the given `<Dosar>` fragments
pub fn soap_response(dosare: &[&str]) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body><CautareDosareResponse xmlns="portalquery.just.ro">"#,
            r#"<CautareDosareResult>{}</CautareDosareResult>"#,
            r#"</CautareDosareResponse></soap:Body></soap:Envelope>"#
        ),
        dosare.join("")
    )
}

pub fn dosar(number: &str, ruling: &str) -> String {
    format!(
        concat!(
            "<Dosar><numar>{}</numar><obiect>pretentii</obiect>",
            "<parti><DosarParte><nume>POPESCU ION</nume><calitateParte>Reclamant</calitateParte></DosarParte></parti>",
            "<sedinte><DosarSedinta><complet>C3</complet><data>2024-03-12T00:00:00</data><solutie>{}</solutie></DosarSedinta></sedinte>",
            "</Dosar>"
        ),
        number, ruling
    )
}

/// Serve each `(status, body)` pair to one incoming connection, in order
///
/// Returns the service URL to configure.
pub fn serve_responses(responses: Vec<(u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read test server address");

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            drain_request(&stream);
            let reply = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: text/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(reply.as_bytes());
        }
    });

    format!("http://{}/query.asmx", addr)
}

fn drain_request(stream: &TcpStream) {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if line == "\r\n" {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0; content_length];
    let _ = reader.read_exact(&mut body);
}
