//! Cloning the framework template repository

use std::path::Path;
use std::time::{Duration, Instant};

use git2::{FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};

use super::auth::setup_auth_callbacks;
use super::error::interpret_git_error;
use super::url;
use crate::error::{Result, SpeckitError};

/// Knobs for a single clone
#[derive(Debug, Clone, Copy)]
pub struct CloneOptions {
    /// Fetch only the tip commit (ignored for local sources)
    pub shallow: bool,
    /// Abort the transfer once this much time has passed
    pub timeout: Option<Duration>,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            shallow: true,
            timeout: None,
        }
    }
}

/// Clone `url` into `target`
///
/// The deadline is checked from the transfer-progress callback, so a stalled
/// connection that never reports progress is bounded only by libgit2's own
/// network timeouts.
pub fn clone(url: &str, target: &Path, options: CloneOptions) -> Result<Repository> {
    let deadline = options.timeout.map(|timeout| Instant::now() + timeout);

    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);
    callbacks.transfer_progress(move |_| deadline.is_none_or(|at| Instant::now() < at));

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);
    if options.shallow && !url::is_local(url) {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    let location = url::normalize(url);
    tracing::debug!(url = %location, target = %target.display(), "cloning repository");

    builder
        .clone(location.as_ref(), target)
        .map_err(|e| SpeckitError::GitCloneFailed {
            url: url.to_string(),
            reason: interpret_git_error(&e),
        })
}
