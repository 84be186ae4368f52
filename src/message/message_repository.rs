use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    message::{
        message_dto::{MessageContainer, MessageParams},
        message_models::{MessageDetail, NewMessage},
    },
    pagination::PagedList,
};

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn find_by_id(&self, message_id: Uuid) -> Result<Option<MessageDetail>>;

    /// Messages exchanged between two users, newest first, minus the ones
    /// `user_id` has deleted on their side.
    async fn find_thread(&self, user_id: Uuid, other_user_id: Uuid) -> Result<Vec<MessageDetail>>;

    async fn find_for_user(&self, params: &MessageParams) -> Result<PagedList<MessageDetail>>;

    /// Persists a message. `None` means nothing was written.
    async fn save(&self, message: NewMessage) -> Result<Option<MessageDetail>>;
}

const DETAIL_COLUMNS: &str = "m.id, m.sender_id, s.known_as AS sender_known_as, \
     s.photo_url AS sender_photo_url, m.recipient_id, r.known_as AS recipient_known_as, \
     r.photo_url AS recipient_photo_url, m.content, m.is_read, m.date_read, m.message_sent, \
     m.sender_deleted, m.recipient_deleted";

const PARTICIPANT_JOINS: &str =
    "JOIN users s ON s.id = m.sender_id JOIN users r ON r.id = m.recipient_id";

fn container_filter(container: MessageContainer) -> &'static str {
    match container {
        MessageContainer::Inbox => "m.recipient_id = $1 AND m.recipient_deleted = false",
        MessageContainer::Outbox => "m.sender_id = $1 AND m.sender_deleted = false",
        MessageContainer::Unread => {
            "m.recipient_id = $1 AND m.recipient_deleted = false AND m.is_read = false"
        }
    }
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn find_by_id(&self, message_id: Uuid) -> Result<Option<MessageDetail>> {
        let message = sqlx::query_as::<_, MessageDetail>(&format!(
            "SELECT {} FROM messages m {} WHERE m.id = $1",
            DETAIL_COLUMNS, PARTICIPANT_JOINS
        ))
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    async fn find_thread(&self, user_id: Uuid, other_user_id: Uuid) -> Result<Vec<MessageDetail>> {
        let messages = sqlx::query_as::<_, MessageDetail>(&format!(
            "SELECT {} FROM messages m {}
             WHERE (m.recipient_id = $1 AND m.recipient_deleted = false AND m.sender_id = $2)
                OR (m.recipient_id = $2 AND m.sender_id = $1 AND m.sender_deleted = false)
             ORDER BY m.message_sent DESC",
            DETAIL_COLUMNS, PARTICIPANT_JOINS
        ))
        .bind(user_id)
        .bind(other_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn find_for_user(&self, params: &MessageParams) -> Result<PagedList<MessageDetail>> {
        let filter = container_filter(params.container);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM messages m WHERE {}",
            filter
        ))
        .bind(params.user_id)
        .fetch_one(&self.pool)
        .await?;

        let messages = sqlx::query_as::<_, MessageDetail>(&format!(
            "SELECT {} FROM messages m {}
             WHERE {}
             ORDER BY m.message_sent DESC
             LIMIT $2 OFFSET $3",
            DETAIL_COLUMNS, PARTICIPANT_JOINS, filter
        ))
        .bind(params.user_id)
        .bind(params.page_size as i64)
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(PagedList::new(
            messages,
            total,
            params.page_number,
            params.page_size,
        ))
    }

    async fn save(&self, message: NewMessage) -> Result<Option<MessageDetail>> {
        let saved = sqlx::query_as::<_, MessageDetail>(&format!(
            "WITH m AS (
                INSERT INTO messages (sender_id, recipient_id, content)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             SELECT {} FROM m {}",
            DETAIL_COLUMNS, PARTICIPANT_JOINS
        ))
        .bind(message.sender_id)
        .bind(message.recipient_id)
        .bind(&message.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(saved)
    }
}
