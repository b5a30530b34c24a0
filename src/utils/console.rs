//! User-facing output
//!
//! Commands print through a [`Console`] instead of writing to stdout directly. In
//! quiet mode the same messages are recorded in the log instead.

use std::fmt::Display;

use tracing::info;

#[cfg(test)]
use std::cell::RefCell;

#[derive(Debug)]
enum Sink {
    Stdout,
    Log,
    #[cfg(test)]
    Captured(RefCell<Vec<String>>),
}

#[derive(Debug)]
pub struct Console {
    sink: Sink,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { sink: if quiet { Sink::Log } else { Sink::Stdout } }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.sink, Sink::Log)
    }

    pub fn say(&self, message: impl Display) {
        match &self.sink {
            Sink::Stdout => println!("{}", message),
            Sink::Log => {
                // Blank lines carry nothing in the log
                let text = message.to_string();
                if !text.trim().is_empty() {
                    info!(target: "console", "{}", text.trim_end());
                }
            }
            #[cfg(test)]
            Sink::Captured(lines) => lines.borrow_mut().push(message.to_string()),
        }
    }

    #[cfg(test)]
    pub(crate) fn captured() -> Self {
        Self { sink: Sink::Captured(RefCell::new(Vec::new())) }
    }

    #[cfg(test)]
    pub(crate) fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Captured(lines) => lines.borrow().clone(),
            _ => Vec::new(),
        }
    }
}
