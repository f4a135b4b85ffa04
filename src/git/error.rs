//! Turning libgit2 errors into short, readable reasons

use git2::{Error, ErrorClass, ErrorCode};

type Matcher = fn(&str, ErrorClass) -> bool;

/// First match wins, so the specific patterns come first
const REASONS: &[(Matcher, &str)] = &[
    (
        |msg, _| msg.contains("deadline") || msg.contains("timed out") || msg.contains("timeout"),
        "Timed out",
    ),
    (
        |msg, _| {
            msg.contains("not found")
                || msg.contains("404")
                || msg.contains("too many redirects")
                || msg.contains("authentication replays")
                || msg.contains("does not exist")
        },
        "Repository not found",
    ),
    (
        |msg, _| msg.contains("authentication") || msg.contains("credentials"),
        "Authentication failed",
    ),
    (
        |msg, _| msg.contains("permission denied") || msg.contains("access denied"),
        "Permission denied",
    ),
    (
        |msg, _| {
            msg.contains("connection") || msg.contains("network") || msg.contains("resolve")
        },
        "Network error",
    ),
    (
        |msg, class| class == ErrorClass::Http && msg.contains("certificate"),
        "Certificate error",
    ),
    (
        |msg, class| class == ErrorClass::Http && msg.contains("ssl"),
        "SSL error",
    ),
];

/// Short reason for a failed clone
pub fn interpret_git_error(err: &Error) -> String {
    if err.code() == ErrorCode::User {
        return "Timed out".to_string();
    }

    let message = err.message().to_lowercase();
    if let Some((_, reason)) = REASONS.iter().find(|(matches, _)| matches(&message, err.class())) {
        return (*reason).to_string();
    }

    match err.class() {
        ErrorClass::Http => format!("HTTP error: {}", err.message()),
        ErrorClass::Ssh => format!("SSH error: {}", err.message()),
        _ => err.message().to_string(),
    }
}
