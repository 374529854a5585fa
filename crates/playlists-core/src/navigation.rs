//! Navigation side channel.
//!
//! The session and API layers only report outcomes; whoever owns the screen
//! implements [`Navigator`] and decides what a redirect means there.

use std::sync::Mutex;

/// Where an expired or logged-out session is sent
pub const LOGIN_PATH: &str = "/login";

/// Where an already-authenticated visitor to a public-only page is sent
pub const ROOT_PATH: &str = "/";

pub trait Navigator: Send + Sync {
    /// Leave the current page for `path`
    fn redirect(&self, path: &str);
}

/// Navigator that only remembers where it was asked to go
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path passed to `redirect`, oldest first
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visits().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.visits
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(path.to_string());
    }
}
