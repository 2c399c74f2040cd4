use std::str::FromStr;

use crate::{ApiError, ApiResult, Credentials};
use anyhow::Result;
use reqwest::{
    header::{HeaderName, HeaderValue, AUTHORIZATION},
    multipart::Form,
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// HTTP client for the assistant service, carrying the bearer token and the
/// assistants beta header on every request.
#[derive(Clone)]
pub struct ApiClient {
    credentials: Credentials,
    client: Client,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiClient")
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

impl ApiClient {
    pub fn from_env() -> Result<Self> {
        Self::new(Credentials::from_env()?)
    }

    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .default_headers(
                [
                    (
                        AUTHORIZATION,
                        HeaderValue::from_str(&format!("Bearer {}", credentials.api_key))?,
                    ),
                    (
                        HeaderName::from_str("OpenAI-Beta")?,
                        HeaderValue::from_str("assistants=v2")?,
                    ),
                ]
                .into_iter()
                .collect(),
            )
            .build()?;

        Ok(Self {
            credentials,
            client,
        })
    }

    async fn request_inner<S, R>(
        &self,
        method: Method,
        route: R,
        body: Option<S>,
    ) -> Result<Response, reqwest::Error>
    where
        R: Into<String>,
        S: Serialize,
    {
        let url = format!("{}{}", self.credentials.base_url, route.into());
        log::debug!("api request [{method}] {url}");

        let mut request = self.client.request(method.clone(), url.clone());

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;

        log::debug!("api response [{method}] {} {url}", response.status().as_str());
        Ok(response)
    }

    async fn decode<T>(response: Response) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        if response.status().is_success() {
            return Ok(response.json::<T>().await?);
        }
        let body = response.text().await?;
        match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => Err(envelope.error),
            Err(_) => Err(ApiError::new(body, "unknown")),
        }
    }

    pub async fn request<S, R, T>(
        &self,
        method: Method,
        route: R,
        body: Option<S>,
    ) -> ApiResult<T>
    where
        R: Into<String>,
        S: Serialize,
        T: DeserializeOwned,
    {
        let response = self.request_inner(method, route, body).await?;
        Self::decode(response).await
    }

    pub async fn get<R, T>(&self, route: R) -> ApiResult<T>
    where
        R: Into<String>,
        T: DeserializeOwned,
    {
        self.request::<(), R, T>(Method::GET, route, None).await
    }

    pub async fn post<S, R, T>(&self, route: R, body: S) -> ApiResult<T>
    where
        R: Into<String>,
        S: Serialize,
        T: DeserializeOwned,
    {
        self.request(Method::POST, route, Some(body)).await
    }

    pub async fn post_multipart<R, T>(&self, route: R, form: Form) -> ApiResult<T>
    where
        R: Into<String>,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.credentials.base_url, route.into());
        log::debug!("api request [POST multipart] {url}");

        let response = self.client.post(url.clone()).multipart(form).send().await?;

        log::debug!("api response [POST] {} {url}", response.status().as_str());
        Self::decode(response).await
    }
}

/// One page of a list endpoint.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct List<T> {
    pub first_id: Option<String>,
    pub last_id: Option<String>,
    pub data: Vec<T>,
    pub has_more: bool,
}
