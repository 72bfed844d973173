use crate::utils::error::{Result, StagerError};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Thin client for the geuebt REST API: token login plus bearer-authenticated
/// requests. Responses are returned raw; only `login` treats a non-2xx status
/// as an error.
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // Url::join replaces the last path segment unless the base ends with
        // a slash, so normalize here once.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Ok(Self {
            base_url: Url::parse(&normalized)?,
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Form-encoded login against `<base>/users/token`. Returns the bearer
    /// token on success; any non-2xx response is fatal.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let endpoint = self.base_url.join("users/token")?;
        tracing::debug!("Requesting token from {}", endpoint);

        let response = self
            .client
            .post(endpoint)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StagerError::AuthError {
                message: format!("login returned status {}: {}", status, body),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Issues a request with `Authorization: Bearer <token>` merged into the
    /// caller-supplied headers (Authorization wins on conflict). The response
    /// is handed back as-is: a non-2xx status is NOT an error here, the caller
    /// inspects it.
    pub async fn authenticated_request(
        &self,
        method: Method,
        endpoint: Url,
        token: &str,
        headers: HeaderMap,
        json: Option<&serde_json::Value>,
    ) -> Result<Response> {
        tracing::debug!("{} {}", method, endpoint);
        let mut request = self.client.request(method, endpoint).headers(headers);
        if let Some(body) = json {
            request = request.json(body);
        }
        let response = request.bearer_auth(token).send().await?;
        tracing::debug!("API response status: {}", response.status());
        Ok(response)
    }

    /// PUT `<base>/isolates/<isolate_id>/characterization` with the given
    /// JSON payload.
    pub async fn put_characterization(
        &self,
        token: &str,
        isolate_id: &str,
        payload: &serde_json::Value,
    ) -> Result<Response> {
        let endpoint = self
            .base_url
            .join(&format!("isolates/{}/characterization", isolate_id))?;
        self.authenticated_request(Method::PUT, endpoint, token, HeaderMap::new(), Some(payload))
            .await
    }
}
