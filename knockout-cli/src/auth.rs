/// Session role resolution against the service's auth endpoint.
///
/// The service knows two kinds of users: admins, whose profile row carries
/// the "admin" role, and everyone else. Mutating commands check the role
/// up front; the bracket engine itself never sees authorization.
use serde::Deserialize;

use crate::store::{Store, StoreError};

/// What the current session is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// May create, edit and archive tournaments.
    Admin,
    /// Read-only access.
    Viewer,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Deserialize)]
struct ProfileRow {
    role: Option<String>,
}

fn role_from_profile(role: Option<&str>) -> Role {
    match role {
        Some("admin") => Role::Admin,
        _ => Role::Viewer,
    }
}

/// Resolve the session's role.
///
/// Without an access token the session is a viewer; no request is made.
/// Otherwise the token identifies a user via `/auth/v1/user`, whose
/// `profiles` row decides the role. A missing profile row or an
/// unrecognized role value also means viewer.
pub async fn fetch_role(store: &Store) -> Result<Role, StoreError> {
    if store.access_token().is_none() {
        return Ok(Role::Viewer);
    }

    let url = store.auth_url("user");
    if store.verbose() {
        eprintln!("GET {url} (resolve session user)");
    }
    let resp = store.get_authed(&url).send().await?;
    let user: AuthUser = Store::check(resp).await?.json().await?;

    let url = store.rest_url("profiles");
    if store.verbose() {
        eprintln!("GET {url} (role of user {})", user.id);
    }
    let filter = format!("eq.{}", user.id);
    let resp = store
        .get_authed(&url)
        .query(&[("select", "role"), ("id", filter.as_str())])
        .send()
        .await?;
    let rows: Vec<ProfileRow> = Store::check(resp).await?.json().await?;

    Ok(role_from_profile(rows.first().and_then(|r| r.role.as_deref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_profile() {
        assert_eq!(role_from_profile(Some("admin")), Role::Admin);
        assert_eq!(role_from_profile(Some("viewer")), Role::Viewer);
        assert_eq!(role_from_profile(Some("superuser")), Role::Viewer);
        assert_eq!(role_from_profile(None), Role::Viewer);
    }

    #[test]
    fn test_decode_profile_rows() {
        let rows: Vec<ProfileRow> =
            serde_json::from_str(r#"[{"role": "admin"}, {"role": null}]"#).unwrap();
        assert_eq!(rows[0].role.as_deref(), Some("admin"));
        assert_eq!(rows[1].role, None);
    }
}
