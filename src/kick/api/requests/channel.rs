use log::debug;
use crate::kick::api::{ApiError, KickAPIClient};
use crate::kick::api::models::{Channel, ChannelStats, StatsRange, User};

pub async fn get_user_info(api_client: &KickAPIClient) -> Result<User, ApiError> {
    api_client.get("user").await
}

pub async fn get_channel_info(api_client: &KickAPIClient) -> Result<Channel, ApiError> {
    let channel: Channel = api_client.get("channels/me").await?;
    debug!("Resolved own channel: {} ({})", channel.slug, channel.id);
    Ok(channel)
}

pub async fn get_channel_stats(api_client: &KickAPIClient, channel_id: &str, range: StatsRange) -> Result<ChannelStats, ApiError> {
    api_client
        .get_with_query(&format!("channels/{}/stats", channel_id), &[("range", range.as_str())])
        .await
}
