//! Telling the user that a repository has unread information
//!
//! Notification is best effort: the console message is always shown, the email is
//! optional, and a delivery failure is logged without affecting the command that
//! triggered it.

pub mod mailer;
pub mod notifier;

pub use mailer::{MailError, MailTransport, SmtpMailer};
pub use notifier::{NEWS_MESSAGE, Notifier, subject_for};
