//! Repository authentication.
//!
//! The project file's `[repositories]` table maps a name to a bare URL
//! (spec §6.2); credentials are never stored there. `MavenRepository`
//! picks them up from `JGO_REPO_<NAME>_USERNAME`/`_PASSWORD` (see
//! [`jgo_util::env::repo_credentials`]) at load time, so this module
//! just applies whatever `MavenRepository` already resolved.

use reqwest::RequestBuilder;

use crate::repository::MavenRepository;

/// Apply authentication to a request if the repository has credentials.
pub fn apply_auth(request: RequestBuilder, repo: &MavenRepository) -> RequestBuilder {
    match (&repo.username, &repo.password) {
        (Some(user), Some(pass)) => request.basic_auth(user, Some(pass)),
        (Some(user), None) => request.basic_auth(user, None::<&str>),
        (None, Some(token)) => request.bearer_auth(token),
        (None, None) => request,
    }
}
