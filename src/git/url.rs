//! Repository location normalization
//!
//! libgit2 is picky about two forms users commonly write: SCP-style SSH
//! (`git@host:owner/repo.git`) and `file://` URLs without an absolute path.
//! Both are rewritten before cloning. Plain filesystem paths are accepted too,
//! which lets a framework mirror live on local disk.

use std::borrow::Cow;
use std::path::Path;

/// Rewrite `git@host:path` as `ssh://git@host/path`
pub fn normalize_ssh_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }

    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.strip_prefix('/').unwrap_or(path);
            Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Give `file://` URLs an absolute path component
pub fn normalize_file_url(url: &str) -> Cow<'_, str> {
    let Some(rest) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };

    #[cfg(not(windows))]
    {
        if rest.contains('\\') {
            return Cow::Owned(format!("file:///{}", rest.replace('\\', "/")));
        }
        if !rest.is_empty() && !rest.starts_with('/') {
            return Cow::Owned(format!("file:///{rest}"));
        }
    }
    #[cfg(windows)]
    let _ = rest;

    Cow::Borrowed(url)
}

/// Normalize any supported repository location for libgit2
pub fn normalize(url: &str) -> Cow<'_, str> {
    match normalize_ssh_url(url) {
        Cow::Borrowed(url) => normalize_file_url(url),
        Cow::Owned(url) => Cow::Owned(url),
    }
}

/// Whether the location refers to the local filesystem
///
/// Shallow fetches are not supported by libgit2 for local transports.
pub fn is_local(url: &str) -> bool {
    url.starts_with("file://") || Path::new(url).is_absolute()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scp_style_ssh() {
        assert_eq!(
            normalize("git@github.com:T2C/framework.git"),
            "ssh://git@github.com/T2C/framework.git"
        );
        assert_eq!(
            normalize("git@github.com:/srv/framework.git"),
            "ssh://git@github.com/srv/framework.git"
        );
    }

    #[test]
    fn test_other_urls_untouched() {
        for url in [
            "https://github.com/T2C/framework.git",
            "ssh://git@github.com/T2C/framework.git",
            "/srv/mirrors/framework",
            "file:///srv/mirrors/framework",
        ] {
            assert_eq!(normalize(url), url);
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn test_relative_file_url() {
        assert_eq!(normalize("file://srv/framework"), "file:///srv/framework");
    }

    #[test]
    fn test_is_local() {
        assert!(is_local("file:///srv/framework"));
        assert!(!is_local("https://github.com/T2C/framework.git"));
        assert!(!is_local("git@github.com:T2C/framework.git"));
        #[cfg(not(windows))]
        assert!(is_local("/srv/framework"));
    }
}
