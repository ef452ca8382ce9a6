use std::time::Duration;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;
use crate::kick::api::client::{handle_response, normalize_base};
use crate::kick::api::errors::ApiError;
use crate::kick::api::models::PublicChannel;

/// Anything that can look up a channel's public info by slug.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn fetch_channel(&self, slug: &str) -> Result<PublicChannel, ApiError>;
}

/// Unauthenticated client for the public channel endpoint.
pub struct KickPublicClient {
    client: Client,
    base_url: Url,
}

impl KickPublicClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kickwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url: normalize_base(base_url)? })
    }

    pub fn channel_url(&self, slug: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.join("channels/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(slug);
        Ok(url)
    }
}

#[async_trait]
impl ChannelSource for KickPublicClient {
    async fn fetch_channel(&self, slug: &str) -> Result<PublicChannel, ApiError> {
        let url = self.channel_url(slug)?;
        debug!("Fetching public channel info: {}", url);
        let response = self.client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_url_escapes_slug() {
        let client = KickPublicClient::new("https://kick.com/api/v1", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.channel_url("fulustrecofulus").unwrap().as_str(),
            "https://kick.com/api/v1/channels/fulustrecofulus"
        );
        assert_eq!(
            client.channel_url("a b/c").unwrap().as_str(),
            "https://kick.com/api/v1/channels/a%20b%2Fc"
        );
    }
}
