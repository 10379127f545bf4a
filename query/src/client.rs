use leptos::*;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::AppError;

/// Shared HTTP client for the configured API root.
///
/// Provide one near the root of the app with [`provide_api_client`]; hooks
/// retrieve it with [`use_api_client`]. All requests speak JSON.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Provides an [`ApiClient`] for the configured API root to the current scope.
pub fn provide_api_client() {
    provide_context(ApiClient::new());
}

/// Provides an [`ApiClient`] built from an explicit configuration.
pub fn provide_api_client_with_config(config: &AppConfig) {
    provide_context(ApiClient::with_base_url(config.api_url.clone()));
}

/// Retrieves the [`ApiClient`] from the current scope.
pub fn use_api_client() -> ApiClient {
    use_context::<ApiClient>().expect("Api Client Missing.")
}

impl ApiClient {
    /// A client rooted at the process-wide configured API URL.
    pub fn new() -> Self {
        Self::with_base_url(AppConfig::global().api_url.clone())
    }

    /// A client rooted at an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON resource.
    pub async fn get_json<T>(&self, path: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.get_json_with_params(path, &[]).await
    }

    /// GET a JSON resource with query parameters. Callers pass only the
    /// pairs that are present and non-default.
    pub async fn get_json_with_params<T>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = compose_url(&self.base_url, path, params)?;
        let response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Issue a write (POST/PUT/PATCH/DELETE) with an optional JSON body.
    ///
    /// DELETE responses carry no body by contract, so the decoded payload is
    /// `None` for them; every other method decodes JSON into `Some(T)`.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, AppError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = compose_url(&self.base_url, path, &[])?;
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }
        if method == Method::DELETE {
            return Ok(None);
        }
        response.json::<T>().await.map(Some).map_err(AppError::from)
    }

    async fn decode<T>(response: reqwest::Response) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }
        response.json::<T>().await.map_err(AppError::from)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Join the base URL and path, appending query pairs when present.
pub(crate) fn compose_url(
    base: &str,
    path: &str,
    params: &[(&str, String)],
) -> Result<Url, AppError> {
    let target = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let url = if params.is_empty() {
        Url::parse(&target)
    } else {
        Url::parse_with_params(&target, params.iter().map(|(key, value)| (*key, value.as_str())))
    };
    url.map_err(AppError::from_unknown)
}
