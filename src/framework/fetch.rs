//! Fetching the raw framework template

use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::git::{self, CloneOptions};

/// Obtains a checkout of the template repository
pub trait TemplateFetcher {
    fn fetch(&self, url: &str, target: &Path, timeout: Duration) -> Result<()>;
}

/// [`TemplateFetcher`] cloning with libgit2
#[derive(Debug, Clone, Copy, Default)]
pub struct GitFetcher;

impl TemplateFetcher for GitFetcher {
    fn fetch(&self, url: &str, target: &Path, timeout: Duration) -> Result<()> {
        git::clone(
            url,
            target,
            CloneOptions {
                shallow: true,
                timeout: Some(timeout),
            },
        )?;
        Ok(())
    }
}
