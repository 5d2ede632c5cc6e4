use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::record::Record;

/// Read-only access to the backend's tables.
pub trait RecordSource: Sync {
    fn fetch(
        &self,
        resource: &str,
        select: Option<&[&str]>,
        limit: Option<u32>,
    ) -> FetchResult<Vec<Record>>;
}

/// Blocking PostgREST client. Credentials are fixed for the lifetime of the client.
pub struct RestClient {
    http: Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL '{}'", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Base URL '{}' cannot carry a path", base_url);
        }

        let http = Client::builder()
            .default_headers(auth_headers(api_key)?)
            .build()
            .context("Failed to build HTTP client")?;

        info!(action = "configure", component = "rest_client", base_url = %base_url, "REST client ready");
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl RecordSource for RestClient {
    fn fetch(
        &self,
        resource: &str,
        select: Option<&[&str]>,
        limit: Option<u32>,
    ) -> FetchResult<Vec<Record>> {
        let start_time = Instant::now();
        let url = request_url(&self.base_url, resource, select, limit);
        debug!(action = "request", component = "rest_client", resource, url = %url, "Issuing GET");

        let response = self.http.get(url).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            warn!(
                action = "response",
                component = "rest_client",
                resource,
                status = status.as_u16(),
                "Request rejected"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        let records: Vec<Record> = serde_json::from_str(&body)?;

        info!(
            action = "complete",
            component = "rest_client",
            resource,
            record_count = records.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Fetched records"
        );
        Ok(records)
    }
}

/// `apikey` plus bearer auth, both carrying the same key.
pub fn auth_headers(api_key: &str) -> Result<HeaderMap> {
    let mut key =
        HeaderValue::from_str(api_key).context("API key is not a valid header value")?;
    key.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
        .context("API key is not a valid header value")?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("apikey", key);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// `<base>/rest/v1/<resource>?select=a,b&limit=n`. Commas in the select list stay literal.
pub fn request_url(
    base: &Url,
    resource: &str,
    select: Option<&[&str]>,
    limit: Option<u32>,
) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["rest", "v1", resource]);
    }

    let mut query = Vec::new();
    if let Some(fields) = select {
        query.push(format!("select={}", fields.join(",")));
    }
    if let Some(limit) = limit {
        query.push(format!("limit={}", limit));
    }
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&query.join("&")));
    }
    url
}
