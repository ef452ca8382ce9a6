use reqwest::Method;
use crate::kick::api::{ApiError, KickAPIClient};
use crate::kick::api::models::{Category, Stream, StreamUpdate};

pub async fn get_stream_info(api_client: &KickAPIClient, channel_id: &str) -> Result<Stream, ApiError> {
    api_client.get(&format!("channels/{}/stream", channel_id)).await
}

pub async fn update_stream_info(api_client: &KickAPIClient, channel_id: &str, update: &StreamUpdate) -> Result<Stream, ApiError> {
    api_client
        .request(Method::PUT, &format!("channels/{}/stream", channel_id), Some(update))
        .await
}

pub async fn get_categories(api_client: &KickAPIClient, search: Option<&str>) -> Result<Vec<Category>, ApiError> {
    match search.filter(|query| !query.is_empty()) {
        Some(query) => api_client.get_with_query("categories", &[("search", query)]).await,
        None => api_client.get("categories").await,
    }
}
