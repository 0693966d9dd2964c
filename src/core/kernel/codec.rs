use crate::core::errors::ThreeCommasError;
use crate::core::kernel::signer::sign;
use crate::core::types::{ApiKeyType, Channel};
use serde::Serialize;
use tokio_tungstenite::tungstenite::Message;

/// One subscriber entry inside a channel identifier.
#[derive(Debug, Serialize)]
struct ChannelUser<'a> {
    api_key: &'a str,
    signature: String,
}

/// Identifier naming the channel and the authenticated subscribers. The
/// remote expects it as a JSON *string* nested inside the command frame.
#[derive(Debug, Serialize)]
struct ChannelIdentifier<'a> {
    channel: &'a str,
    users: Vec<ChannelUser<'a>>,
}

#[derive(Debug, Serialize)]
struct SubscribeCommand {
    identifier: String,
    command: &'static str,
}

/// Build the subscribe command frame for a channel.
///
/// The identifier is freshly built per (re)subscription; its signature is
/// computed over the channel's relative path with the configured key type.
pub fn subscribe_frame(
    channel: Channel,
    api_key: &str,
    key_type: ApiKeyType,
    secret: &str,
) -> Result<Message, ThreeCommasError> {
    let identifier = ChannelIdentifier {
        channel: channel.name(),
        users: vec![ChannelUser {
            api_key,
            signature: sign(key_type, channel.path(), secret)?,
        }],
    };

    let command = SubscribeCommand {
        identifier: serde_json::to_string(&identifier)?,
        command: "subscribe",
    };

    Ok(Message::Text(serde_json::to_string(&command)?))
}
