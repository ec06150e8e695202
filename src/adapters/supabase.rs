//! PostgREST access for a Supabase project.
//!
//! Only the handful of calls the loader needs: bulk upsert, exact counts,
//! filtered delete and paged reads.

use crate::core::{MemberRow, MemberStore};
use crate::utils::error::{LoaderError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    rest_url: Url,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    details: Option<String>,
}

impl SupabaseClient {
    /// Builds the HTTP client. Nothing is sent until the first request.
    pub fn connect(url: &str, key: &str) -> Result<Self> {
        let base = Url::parse(&format!("{}/", url.trim_end_matches('/'))).map_err(|e| {
            LoaderError::ConnectionError {
                message: format!("invalid project URL '{}': {}", url, e),
            }
        })?;
        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| LoaderError::ConnectionError {
                message: format!("cannot derive REST endpoint: {}", e),
            })?;

        let header = |value: String| {
            HeaderValue::from_str(&value).map_err(|_| LoaderError::ConnectionError {
                message: "access key contains characters not allowed in a header".to_string(),
            })
        };
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header(key.to_string())?);
        headers.insert(AUTHORIZATION, header(format!("Bearer {}", key))?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LoaderError::ConnectionError {
                message: e.to_string(),
            })?;

        tracing::debug!("REST endpoint: {}", rest_url);
        Ok(Self { client, rest_url })
    }

    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        self.rest_url
            .join(table)
            .map_err(|e| LoaderError::InvalidConfigValueError {
                field: "table".to_string(),
                value: table.to_string(),
                reason: e.to_string(),
            })
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(LoaderError::BackendError {
            status: status.as_u16(),
            message: error_message(&body, status.canonical_reason()),
        })
    }
}

fn slug_filter(tree_slug: Option<&str>) -> String {
    match tree_slug {
        Some(slug) => format!("eq.{}", slug),
        None => "is.null".to_string(),
    }
}

/// Pulls `message` (and `details`) out of a PostgREST error body.
fn error_message(body: &str, reason: Option<&str>) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(PostgrestError {
            message: Some(message),
            details: Some(details),
        }) => format!("{} ({})", message, details),
        Ok(PostgrestError {
            message: Some(message),
            ..
        }) => message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => reason.unwrap_or("no response body").to_string(),
    }
}

/// Total from a `Content-Range` value such as `0-24/57` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl MemberStore for SupabaseClient {
    async fn upsert(&self, table: &str, rows: &[MemberRow]) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("POST {} ({} rows)", url, rows.len());

        let response = self
            .client
            .post(url)
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn count(&self, table: &str, tree_slug: Option<&str>) -> Result<u64> {
        let url = self.table_url(table)?;
        let response = self
            .client
            .head(url)
            .query(&[("select", "*".to_string()), ("tree_slug", slug_filter(tree_slug))])
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let response = Self::check(response).await?;
        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        parse_content_range_total(range).ok_or_else(|| LoaderError::BackendError {
            status: response.status().as_u16(),
            message: format!("missing or unreadable Content-Range header '{}'", range),
        })
    }

    async fn delete_tree(&self, table: &str, tree_slug: &str) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("DELETE {} where tree_slug = {}", url, tree_slug);

        let response = self
            .client
            .delete(url)
            .query(&[("tree_slug", slug_filter(Some(tree_slug)))])
            .header("Prefer", "return=minimal")
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_all(&self, table: &str, columns: &str) -> Result<Vec<Map<String, Value>>> {
        let url = self.table_url(table)?;
        let mut rows = Vec::new();

        loop {
            let offset = rows.len();
            let response = self
                .client
                .get(url.clone())
                .query(&[("select", columns), ("order", "id.asc")])
                .query(&[("limit", PAGE_SIZE), ("offset", offset)])
                .send()
                .await?;

            let page: Vec<Map<String, Value>> = Self::check(response).await?.json().await?;
            let page_len = page.len();
            tracing::debug!("Fetched {} rows at offset {}", page_len, offset);
            // The server may cap pages below PAGE_SIZE, so only an empty page ends the scan.
            if page_len == 0 {
                break;
            }
            rows.extend(page);
        }

        Ok(rows)
    }
}
