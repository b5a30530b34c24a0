use tracing::{error, info};

use super::mailer::MailTransport;
use crate::repository::{RepoKind, Repository};
use crate::utils::Console;

pub const NEWS_MESSAGE: &str = "IMPORTANT: There is new information available.";
const TEST_SUBJECT: &str = "Test from adrian";
const TEST_BODY: &str = "It works";

/// Mail subject naming what the repository tracks
pub fn subject_for(repo: &Repository) -> String {
    match repo.kind() {
        RepoKind::ByFileNumber => format!("Case file {}", repo.criteria()),
        RepoKind::BySearch => format!("Case files search for {}", repo.criteria()),
    }
}

pub struct Notifier<'a, M> {
    console: &'a Console,
    mailer: M,
}

impl<'a, M: MailTransport> Notifier<'a, M> {
    pub fn new(console: &'a Console, mailer: M) -> Self {
        Self { console, mailer }
    }

    /// Announce unread information; returns whether an email went out
    pub fn notify(&self, repo: &Repository, send_email: bool) -> bool {
        self.console.say(NEWS_MESSAGE);
        if !send_email {
            return false;
        }

        match self.mailer.send(&subject_for(repo), NEWS_MESSAGE) {
            Ok(()) => {
                info!(path = %repo.path().display(), "notification mailed");
                true
            }
            Err(e) => {
                error!(path = %repo.path().display(), error = %e, "failed to mail notification");
                false
            }
        }
    }

    /// Send the fixed test message; returns whether it was delivered
    pub fn send_test(&self) -> bool {
        match self.mailer.send(TEST_SUBJECT, TEST_BODY) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "test mail failed");
                false
            }
        }
    }
}
