//! Accessors for the `JGO_*` environment variables recognized per spec §6.5.

/// `JGO_OFFLINE=1` forbids any network access; cache misses become
/// [`crate::errors::JgoError::NotAvailableOffline`].
pub fn offline() -> bool {
    truthy("JGO_OFFLINE")
}

/// `JGO_UPDATE=1` forces re-checking `LATEST`/`RELEASE`/SNAPSHOT metadata
/// even when a cached copy exists.
pub fn force_update() -> bool {
    truthy("JGO_UPDATE")
}

/// `JGO_NO_CACHE=1` bypasses the on-disk repository cache entirely,
/// re-downloading every artifact.
pub fn no_cache() -> bool {
    truthy("JGO_NO_CACHE")
}

/// Credentials for a named repository, read from
/// `JGO_REPO_<NAME>_USERNAME` / `JGO_REPO_<NAME>_PASSWORD`, with `<NAME>`
/// the repository name upper-cased and non-alphanumeric characters
/// replaced with `_`. Repositories carry no credentials in the project
/// file itself (spec §6.2 stores them as plain `name = "url"` pairs).
pub fn repo_credentials(repo_name: &str) -> (Option<String>, Option<String>) {
    let key = repo_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect::<String>();
    let username = std::env::var(format!("JGO_REPO_{key}_USERNAME")).ok();
    let password = std::env::var(format!("JGO_REPO_{key}_PASSWORD")).ok();
    (username, password)
}

fn truthy(var: &str) -> bool {
    match std::env::var(var) {
        Ok(v) => matches!(v.as_str(), "1" | "true" | "TRUE" | "yes"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_reads_truthy_values() {
        std::env::set_var("JGO_OFFLINE", "1");
        assert!(offline());
        std::env::set_var("JGO_OFFLINE", "0");
        assert!(!offline());
        std::env::remove_var("JGO_OFFLINE");
        assert!(!offline());
    }
}
