use std::sync::Arc;
use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use url::Url;
use crate::config::Config;
use crate::kick::api::errors::ApiError;
use crate::kick::api::models::TokenResponse;

const FALLBACK_ERROR_MESSAGE: &str = "The request could not be completed";

/// Turns a response into `T`, or into `ApiError::Status` carrying the body's `message`.
pub async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Like `handle_response` for endpoints whose success body is empty or irrelevant.
pub async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    check_status(response).await.map(|_| ())
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
    debug!("Request failed. Status: {}, Body: {}", status, body);
    Err(ApiError::Status { status, message })
}

/// Authenticated client for the Kick REST API.
///
/// Tokens live in the shared `Config` and are written back to disk whenever
/// they change, so a refreshed token survives restarts.
#[derive(Clone)]
pub struct KickAPIClient {
    config: Arc<RwLock<Config>>,
    base_url: Url,
    pub(crate) client: Client,
}

impl KickAPIClient {
    pub async fn new(config: Arc<RwLock<Config>>) -> Result<Self, ApiError> {
        let (base_url, timeout) = {
            let config = config.read().await;
            (normalize_base(&config.api_url)?, config.request_timeout())
        };
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kickwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, base_url, client })
    }

    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn get_token(&self) -> Result<String, ApiError> {
        self.config
            .read()
            .await
            .access_token
            .clone()
            .ok_or(ApiError::MissingCredential("access_token"))
    }

    async fn client_credentials(&self) -> Result<(String, String), ApiError> {
        let config = self.config.read().await;
        let client_id = config.client_id.clone().ok_or(ApiError::MissingCredential("client_id"))?;
        let client_secret = config.client_secret.clone().ok_or(ApiError::MissingCredential("client_secret"))?;
        Ok((client_id, client_secret))
    }

    /// Exchanges an authorization code for tokens and stores them.
    pub async fn exchange_code(&self, code: &str) -> Result<(), ApiError> {
        let (client_id, client_secret) = self.client_credentials().await?;
        let redirect_uri = self.config.read().await.redirect_uri();

        info!("Exchanging authorization code for token...");
        let response = self.client
            .post(self.endpoint("oauth/token")?)
            .json(&json!({
                "grant_type": "authorization_code",
                "client_id": client_id,
                "client_secret": client_secret,
                "code": code,
                "redirect_uri": redirect_uri,
            }))
            .send()
            .await?;

        let token: TokenResponse = handle_response(response).await?;
        debug!("Token expires in: {:?} seconds", token.expires_in);
        self.store_token(token).await
    }

    /// Trades the stored refresh token for a new access token.
    ///
    /// A rejected refresh clears the stored session.
    pub async fn refresh_token(&self) -> Result<String, ApiError> {
        let refresh_token = self.config
            .read()
            .await
            .refresh_token
            .clone()
            .ok_or(ApiError::MissingCredential("refresh_token"))?;
        let (client_id, client_secret) = self.client_credentials().await?;

        let response = self.client
            .post(self.endpoint("oauth/token")?)
            .json(&json!({
                "grant_type": "refresh_token",
                "refresh_token": refresh_token,
                "client_id": client_id,
                "client_secret": client_secret,
            }))
            .send()
            .await?;

        let token: TokenResponse = match handle_response(response).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Token refresh failed, clearing session: {}", e);
                if let Err(save_err) = self.config.write().await.clear_session() {
                    warn!("Failed to save config: {}", save_err);
                }
                return Err(e);
            }
        };

        let access_token = token.access_token.clone();
        self.store_token(token).await?;
        info!("Access token refreshed");
        Ok(access_token)
    }

    async fn store_token(&self, token: TokenResponse) -> Result<(), ApiError> {
        let mut config = self.config.write().await;
        if let Err(e) = config.set_tokens(token.access_token, token.refresh_token) {
            // the in-memory token is still usable for this run
            warn!("Failed to persist tokens: {}", e);
        }
        Ok(())
    }

    /// Sends an authorized request, refreshing the token once on a 401.
    async fn send_authorized<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let token = self.get_token().await?;
        let response = build(&self.client, &token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED || self.config.read().await.refresh_token.is_none() {
            return Ok(response);
        }

        warn!("Access token rejected, refreshing");
        let token = self.refresh_token().await?;
        Ok(build(&self.client, &token).send().await?)
    }

    pub(crate) async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("{} {}", method, url);
        let response = self.send_authorized(|client, token| {
            let builder = client.request(method.clone(), url.clone()).bearer_auth(token);
            match body {
                Some(body) => builder.json(body),
                None => builder,
            }
        }).await?;
        handle_response(response).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<Value, T>(Method::GET, path, None).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);
        let response = self.send_authorized(|client, token| {
            client.get(url.clone()).bearer_auth(token).query(query)
        }).await?;
        handle_response(response).await
    }

    pub(crate) async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!("{} {}", method, url);
        let response = self.send_authorized(|client, token| {
            let builder = client.request(method.clone(), url.clone()).bearer_auth(token);
            match body {
                Some(body) => builder.json(body),
                None => builder,
            }
        }).await?;
        handle_empty_response(response).await
    }
}

/// `Url::join` drops the last segment unless the base ends with `/`.
pub(crate) fn normalize_base(raw: &str) -> Result<Url, ApiError> {
    let mut base = raw.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kick::api::models::Category;

    fn response(status: u16, body: &str) -> Response {
        Response::from(
            http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn success_body_is_decoded() {
        let categories: Vec<Category> = handle_response(response(200, r#"[{"id": 1, "name": "IRL"}]"#))
            .await
            .unwrap();
        assert_eq!(categories[0].id, "1");
        assert_eq!(categories[0].name, "IRL");
    }

    #[tokio::test]
    async fn error_message_comes_from_body() {
        let err = handle_response::<Value>(response(403, r#"{"message": "Missing scope"}"#))
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(message, "Missing scope");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_without_json_uses_fallback() {
        let err = handle_empty_response(response(500, "<html>oops</html>")).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.to_string().contains(FALLBACK_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn unauthorized_is_recognised() {
        let err = handle_empty_response(response(401, "{}")).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn empty_success_body_is_fine() {
        assert!(handle_empty_response(response(204, "")).await.is_ok());
    }

    #[test]
    fn base_url_keeps_version_segment() {
        let base = normalize_base("https://api.kick.com/v1").unwrap();
        assert_eq!(base.join("channels/me").unwrap().as_str(), "https://api.kick.com/v1/channels/me");
    }

    #[tokio::test]
    async fn endpoint_strips_leading_slash() {
        let config = Arc::new(RwLock::new(Config::default()));
        let client = KickAPIClient::new(config).await.unwrap();
        assert_eq!(
            client.endpoint("/clips/42").unwrap().as_str(),
            "https://api.kick.com/v1/clips/42"
        );
        assert!(matches!(client.get_token().await, Err(ApiError::MissingCredential("access_token"))));
    }
}
