/// HTTP client for the tournament service's PostgREST interface.
///
/// Tournaments live in a `tournaments` table: one row per tournament with
/// the whole bracket serialized into its `data` column. At most one row has
/// `status = "active"`; archiving flips the status and freezes the row.
use knockout_core::Bracket;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the tournament service.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {status}: {body}")]
    Service {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// The active tournament, as loaded for editing.
#[derive(Debug, Deserialize)]
pub struct TournamentRow {
    pub id: i64,
    pub name: String,
    pub data: Bracket,
}

/// An archived tournament, as listed by `past`.
#[derive(Debug, Deserialize)]
pub struct ArchivedTournament {
    pub name: String,
    pub data: Bracket,
}

pub struct Store {
    client: Client,
    service_url: String,
    service_key: String,
    access_token: Option<String>,
    verbose: bool,
}

impl Store {
    pub fn new(
        service_url: String,
        service_key: String,
        access_token: Option<String>,
        verbose: bool,
    ) -> Store {
        Store {
            client: Client::new(),
            service_url: service_url.trim_end_matches('/').to_string(),
            service_key,
            access_token,
            verbose,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub(crate) fn verbose(&self) -> bool {
        self.verbose
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.service_url, table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.service_url, path)
    }

    /// A GET carrying the service key and bearer auth. The anon key doubles
    /// as the bearer token when no user session is present.
    pub(crate) fn get_authed(&self, url: &str) -> reqwest::RequestBuilder {
        self.authed(self.client.get(url))
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.service_key);
        req.header("apikey", &self.service_key).bearer_auth(bearer)
    }

    /// Turn a non-success response into a `StoreError::Service`.
    pub(crate) async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let body = body.chars().take(200).collect();
        Err(StoreError::Service { status, body })
    }

    /// Fetch the active tournament, if any.
    pub async fn fetch_active(&self) -> Result<Option<TournamentRow>, StoreError> {
        let url = self.rest_url("tournaments");
        if self.verbose {
            eprintln!("GET {url} (active tournament)");
        }
        let resp = self
            .get_authed(&url)
            .query(&[
                ("select", "id,name,data"),
                ("status", "eq.active"),
                ("limit", "1"),
            ])
            .send()
            .await?;
        let rows: Vec<TournamentRow> = Self::check(resp).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    /// Fetch archived tournaments, newest first.
    pub async fn fetch_archived(&self) -> Result<Vec<ArchivedTournament>, StoreError> {
        let url = self.rest_url("tournaments");
        if self.verbose {
            eprintln!("GET {url} (archived tournaments)");
        }
        let resp = self
            .get_authed(&url)
            .query(&[
                ("select", "name,data"),
                ("status", "eq.archived"),
                ("order", "created_at.desc"),
            ])
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Insert a new active tournament.
    pub async fn create(&self, name: &str, size: u32, bracket: &Bracket) -> Result<(), StoreError> {
        let url = self.rest_url("tournaments");
        if self.verbose {
            eprintln!("POST {url} (create \"{name}\")");
        }
        let resp = self
            .authed(self.client.post(&url))
            .json(&serde_json::json!({
                "name": name,
                "size": size,
                "status": "active",
                "data": bracket,
            }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Save the bracket of an existing tournament.
    pub async fn update_data(&self, id: i64, bracket: &Bracket) -> Result<(), StoreError> {
        let url = self.rest_url("tournaments");
        if self.verbose {
            eprintln!("PATCH {url} (bracket of tournament {id})");
        }
        let resp = self
            .authed(self.client.patch(&url))
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({ "data": bracket }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Flip a tournament's status to archived.
    pub async fn archive(&self, id: i64) -> Result<(), StoreError> {
        let url = self.rest_url("tournaments");
        if self.verbose {
            eprintln!("PATCH {url} (archive tournament {id})");
        }
        let resp = self
            .authed(self.client.patch(&url))
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({ "status": "archived" }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}
