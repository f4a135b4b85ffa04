//! Git access for fetching the base framework template
//!
//! Authentication is delegated to git's native mechanisms:
//! - SSH agent and keys from ~/.ssh/
//! - Git credential helpers
//! - Environment variables (`GIT_SSH_COMMAND`, etc.)

pub mod auth;
pub mod clone;
pub mod error;
pub mod url;

pub use clone::{CloneOptions, clone};
pub use error::interpret_git_error;
