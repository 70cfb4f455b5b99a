//! GitHub account lookup through the `gh` CLI.

use std::process::Command;

use tracing::debug;

use jumpstart_core::application::ports::AccountLookup;

use crate::process::capture;

/// Asks `gh api user -q .login` for the authenticated user's login.
///
/// Any failure (gh missing, not logged in, offline) yields `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GhAccountLookup;

impl GhAccountLookup {
    pub fn new() -> Self {
        Self
    }
}

impl AccountLookup for GhAccountLookup {
    fn github_user(&self) -> Option<String> {
        match capture(
            Command::new("gh").args(["api", "user", "-q", ".login"]),
            "gh api user -q .login",
        ) {
            Ok(output) => {
                let login = output.stdout.trim();
                (!login.is_empty()).then(|| login.to_string())
            }
            Err(e) => {
                debug!(error = %e, "GitHub user lookup failed");
                None
            }
        }
    }
}
