//! Settings for the remote service and outgoing mail
//!
//! Read from TOML files on a search path, later files overriding earlier ones:
//! `/etc/adrian.toml`, then `~/.adrian/adrian.toml`. Missing files are skipped,
//! unknown sections and keys are reported back as warnings and otherwise ignored.

pub mod settings;

pub use settings::{ConfigError, Configuration, LoadedConfig, ServiceSettings, SmtpSettings};
