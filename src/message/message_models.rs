use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored message joined with the display details of both participants.
#[derive(Debug, Clone, FromRow)]
pub struct MessageDetail {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_known_as: String,
    pub sender_photo_url: Option<String>,
    pub recipient_id: Uuid,
    pub recipient_known_as: String,
    pub recipient_photo_url: Option<String>,
    pub content: String,
    pub is_read: bool,
    pub date_read: Option<DateTime<Utc>>,
    pub message_sent: DateTime<Utc>,
    pub sender_deleted: bool,
    pub recipient_deleted: bool,
}

impl MessageDetail {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }
}

/// Fields needed to persist a new message. The sender always comes from the
/// route, never from the request body.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_known_as: String,
    pub sender_photo_url: Option<String>,
    pub recipient_id: Uuid,
    pub recipient_known_as: String,
    pub recipient_photo_url: Option<String>,
    pub content: String,
    pub is_read: bool,
    pub date_read: Option<DateTime<Utc>>,
    pub message_sent: DateTime<Utc>,
}

impl From<MessageDetail> for MessageResponse {
    fn from(message: MessageDetail) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            sender_known_as: message.sender_known_as,
            sender_photo_url: message.sender_photo_url,
            recipient_id: message.recipient_id,
            recipient_known_as: message.recipient_known_as,
            recipient_photo_url: message.recipient_photo_url,
            content: message.content,
            is_read: message.is_read,
            date_read: message.date_read,
            message_sent: message.message_sent,
        }
    }
}
