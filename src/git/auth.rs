//! Credential callbacks for private framework repositories
//!
//! Tried in order: default credentials, the SSH agent, key files in
//! `~/.ssh/`, then git credential helpers. Public HTTPS repositories never
//! reach this callback.

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

const SSH_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

fn auth_error(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_key_file(username: &str) -> Result<Cred, Error> {
    let ssh_dir = dirs::home_dir()
        .ok_or_else(|| auth_error("home directory not found"))?
        .join(".ssh");

    SSH_KEY_NAMES
        .iter()
        .map(|name| (ssh_dir.join(name), ssh_dir.join(format!("{name}.pub"))))
        .filter(|(private, _)| private.exists())
        .find_map(|(private, public)| {
            let public = public.exists().then_some(public.as_path());
            Cred::ssh_key(username, public, &private, None).ok()
        })
        .ok_or_else(|| auth_error("no usable SSH key in ~/.ssh"))
}

fn credential_helper(url: &str, username: Option<&str>) -> Result<Cred, Error> {
    let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;
    Cred::credential_helper(&config, url, username)
        .or_else(|_| Cred::userpass_plaintext(username.unwrap_or("git"), ""))
}

/// Install the credential callback on `callbacks`
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks<'_>) {
    callbacks.credentials(|url, username, allowed| {
        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            let username = username.unwrap_or("git");
            return Cred::ssh_key_from_agent(username).or_else(|_| ssh_key_file(username));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return credential_helper(url, username);
        }
        Err(auth_error("authentication failed"))
    });
}
