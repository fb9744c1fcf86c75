use std::sync::Arc;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_models::error::ClientError;

use crate::session::SessionStore;

const AUTH_EXEMPT_PATHS: [&str; 2] = ["/auth/login", "/auth/register"];

/// Single outbound path for every backend call.
///
/// Attaches `Authorization: Bearer <token>` from the session store to every
/// request except login and registration, and maps failures onto
/// [`ClientError`].
#[derive(Clone)]
pub struct RequestDispatcher {
    client: Client,
    session: Arc<dyn SessionStore>,
}

impl RequestDispatcher {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self::with_client(Client::new(), session)
    }

    pub fn with_client(client: Client, session: Arc<dyn SessionStore>) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn get_headers(&self, url: &str, accept: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(accept));

        if !requires_auth(url) {
            debug!("Skipping token for login/register: {}", url);
            return headers;
        }

        match self.session.get() {
            Some(token) => match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored token is not a valid header value, sending request unauthenticated"),
            },
            None => debug!("No token found for request: {}", url),
        }

        headers
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        accept: &'static str,
    ) -> Result<Response, ClientError> {
        let headers = self.get_headers(url, accept);
        debug!(
            "Dispatching {} {} ({})",
            method,
            url,
            if headers.contains_key(AUTHORIZATION) { "token present" } else { "no token" }
        );

        let mut req = self.client.request(method.clone(), url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Transport error for {} {}: {}", method, url, e);
                return Err(ClientError::from_response(0, ""));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let err = ClientError::from_response(status.as_u16(), &error_text);
            error!("API error ({}) for {} {}: {}", status, method, url, err);
            return Err(err);
        }

        Ok(response)
    }

    pub async fn get_json<T>(&self, url: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send_json(Method::GET, url, None).await
    }

    pub async fn send_json<T>(&self, method: Method, url: &str, body: Option<Value>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(method, url, body, "application/json").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Decode(format!("Failed to read response body: {}", e)))?;

        if bytes.is_empty() {
            return Err(ClientError::Decode(format!("Empty response body from {}", url)));
        }

        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            error!("Failed to decode response from {}: {}", url, e);
            ClientError::Decode(e.to_string())
        })
    }

    /// For endpoints answering with plain text, such as tokens and acknowledgements.
    pub async fn send_for_text(&self, method: Method, url: &str, body: Option<Value>) -> Result<String, ClientError> {
        let response = self.execute(method, url, body, "text/plain").await?;
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Decode(format!("Failed to read response body: {}", e)))?;

        Ok(text.trim().to_string())
    }

    pub async fn send_no_content(&self, method: Method, url: &str, body: Option<Value>) -> Result<(), ClientError> {
        self.execute(method, url, body, "*/*").await?;
        Ok(())
    }
}

pub fn requires_auth(url: &str) -> bool {
    !AUTH_EXEMPT_PATHS.iter().any(|path| url.contains(path))
}

pub fn to_body<T: Serialize>(value: &T) -> Result<Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::Decode(format!("Failed to encode request: {}", e)))
}
