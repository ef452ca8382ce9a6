use crate::kick::api::{ApiError, KickAPIClient};
use crate::kick::api::models::Subscription;

pub async fn get_subscribers(api_client: &KickAPIClient, channel_id: &str) -> Result<Vec<Subscription>, ApiError> {
    api_client.get(&format!("channels/{}/subscriptions", channel_id)).await
}
