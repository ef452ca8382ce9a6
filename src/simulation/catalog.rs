pub const DEFAULT_VIEWER_NAMES: [&str; 17] = [
    "fan123", "gamer_pro", "kick_viewer", "stream_lover", "tech_guru",
    "player_one", "chat_master", "viewer42", "follower99", "live_fan",
    "fulustrecofan", "kick_brasil", "gamemaster", "nova_era", "fiel_viewer",
    "top_supporter", "br_gamer",
];

pub const DEFAULT_MESSAGE_TEMPLATES: [&str; 19] = [
    "Hi everyone!",
    "This stream is awesome!",
    "What's the next game?",
    "LOL",
    "Anyone else lagging?",
    "GG!",
    "Best streamer on the platform!",
    "First time here!",
    "How do I get notified when you go live?",
    "Shoutout to Rio!",
    "Does this game have multiplayer?",
    "KKKKKKKKKK",
    "How long have you been streaming?",
    "Let's hit 100 likes!",
    "My favourite streamer!",
    "The audio is really low",
    "Shared the stream in my groups!",
    "Will you play this again later?",
    "Just followed the channel!",
];

pub fn default_viewer_names() -> Vec<String> {
    DEFAULT_VIEWER_NAMES.iter().map(|name| name.to_string()).collect()
}

pub fn default_message_templates() -> Vec<String> {
    DEFAULT_MESSAGE_TEMPLATES.iter().map(|text| text.to_string()).collect()
}
