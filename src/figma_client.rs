use crate::error::{FtsError, Result};
use crate::figma::api_types::{
    FigmaPublishedStyle, FigmaStylesResponse, FigmaVariablesMeta, FigmaVariablesResponse,
};
#[cfg(test)]
use reqwest::header::HeaderMap;
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.figma.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub enum FigmaAuth {
    PersonalAccessToken(String),
    OAuthToken(String),
}

impl FigmaAuth {
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var("FIGMA_TOKEN") {
            if !token.is_empty() {
                return Some(Self::PersonalAccessToken(token));
            }
        }

        if let Ok(token) = std::env::var("FIGMA_OAUTH_TOKEN") {
            if !token.is_empty() {
                return Some(Self::OAuthToken(token));
            }
        }

        None
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            FigmaAuth::PersonalAccessToken(token) => builder.header("X-FIGMA-TOKEN", token),
            FigmaAuth::OAuthToken(token) => builder.bearer_auth(token),
        }
    }

    #[cfg(test)]
    fn apply_to_header_map(&self, headers: &mut HeaderMap) {
        match self {
            FigmaAuth::PersonalAccessToken(token) => {
                headers.insert("X-FIGMA-TOKEN", token.parse().unwrap());
            }
            FigmaAuth::OAuthToken(token) => {
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {token}").parse().unwrap(),
                );
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: Client,
    auth: FigmaAuth,
    base_url: Url,
}

impl FigmaClient {
    pub fn with_base_url_and_timeout(
        auth: FigmaAuth,
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FtsError::Network)?;

        Ok(Self {
            http,
            auth,
            base_url,
        })
    }

    /// `GET /v1/files/:key/nodes?ids=` for one batch of ids. Ids Figma could
    /// not find come back as `null` entries.
    pub async fn fetch_nodes(
        &self,
        file_key: &str,
        node_ids: &[String],
    ) -> Result<FigmaNodesResponse> {
        validate_node_ids(node_ids, "fetching nodes from Figma")?;

        let mut url = self.endpoint(&format!("/v1/files/{file_key}/nodes"))?;
        url.query_pairs_mut().append_pair("ids", &node_ids.join(","));
        let req = self.authed(self.http.get(url));
        self.send_json(req).await
    }

    /// Node documents for every id, fetched sequentially in batches of
    /// `batch_size`. Ids missing from the responses are absent from the map.
    pub async fn fetch_node_documents(
        &self,
        file_key: &str,
        node_ids: &[String],
        batch_size: usize,
    ) -> Result<HashMap<String, Value>> {
        let mut documents = HashMap::with_capacity(node_ids.len());
        for batch in node_id_batches(node_ids, batch_size) {
            debug!(file_key, count = batch.len(), "fetching node batch");
            let response = self.fetch_nodes(file_key, batch).await?;
            for (id, container) in response.nodes {
                if let Some(container) = container {
                    documents.insert(id, container.document);
                }
            }
        }
        Ok(documents)
    }

    /// `GET /v1/files/:key/styles`.
    pub async fn fetch_published_styles(&self, file_key: &str) -> Result<Vec<FigmaPublishedStyle>> {
        let url = self.endpoint(&format!("/v1/files/{file_key}/styles"))?;
        let req = self.authed(self.http.get(url));
        let response: FigmaStylesResponse = self.send_json(req).await?;
        info!(file_key, count = response.meta.styles.len(), "fetched published styles");
        Ok(response.meta.styles)
    }

    /// `GET /v1/files/:key/variables/local`.
    pub async fn fetch_local_variables(&self, file_key: &str) -> Result<FigmaVariablesMeta> {
        let url = self.endpoint(&format!("/v1/files/{file_key}/variables/local"))?;
        let req = self.authed(self.http.get(url));
        let response: FigmaVariablesResponse = self.send_json(req).await?;
        info!(
            file_key,
            variables = response.meta.variables.len(),
            collections = response.meta.variable_collections.len(),
            "fetched local variables"
        );
        Ok(response.meta)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        self.auth.apply(builder)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(FtsError::InvalidUrl)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(FtsError::Network)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        if status.is_success() {
            let body = response.text().await.map_err(FtsError::Network)?;
            return serde_json::from_str(&body).map_err(FtsError::Serialization);
        }

        // An unreadable error body falls back to the status text.
        let body = response.text().await.unwrap_or_default();

        Err(FtsError::figma_api(
            Some(status),
            error_message(status, &body, retry_after.as_deref()),
        ))
    }
}

fn validate_node_ids(node_ids: &[String], context: &str) -> Result<()> {
    if node_ids.is_empty() {
        return Err(FtsError::Config(format!(
            "node_ids cannot be empty when {context}"
        )));
    }
    Ok(())
}

fn node_id_batches(node_ids: &[String], batch_size: usize) -> std::slice::Chunks<'_, String> {
    node_ids.chunks(batch_size.max(1))
}

#[derive(Debug, Deserialize)]
pub struct FigmaNodesResponse {
    #[serde(default)]
    pub nodes: HashMap<String, Option<FigmaNodeContainer>>,
}

#[derive(Debug, Deserialize)]
pub struct FigmaNodeContainer {
    pub document: Value,
    #[serde(default)]
    pub styles: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
}

fn error_message(status: StatusCode, body: &str, retry_after: Option<&str>) -> String {
    let fallback = format!("Figma API returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed
        .as_ref()
        .and_then(|value| {
            value
                .get("err")
                .or_else(|| value.get("error"))
                .or_else(|| value.get("message"))
        })
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (status, retry_after, from_body) {
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), Some(msg)) => {
            format!("{msg} (rate limited, retry after {retry}s)")
        }
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), None) => {
            format!("rate limited by Figma API, retry after {retry}s")
        }
        (_, _, Some(msg)) => msg,
        _ => fallback,
    }
}
