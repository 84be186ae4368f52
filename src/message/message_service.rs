use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    message::{
        message_dto::{MessageForCreationDto, MessageParams},
        message_models::{MessageResponse, NewMessage},
        message_repository::MessageRepository,
    },
    pagination::PagedList,
    user::user_repository::UserRepository,
};

#[derive(Clone)]
pub struct MessageService {
    repo: Arc<dyn MessageRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl MessageService {
    pub fn new(repo: Arc<dyn MessageRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { repo, user_repo }
    }

    /// Fetches a message the user took part in. Messages between other
    /// users are reported as missing.
    pub async fn get_message(&self, user_id: Uuid, message_id: Uuid) -> Result<MessageResponse> {
        let message = self
            .repo
            .find_by_id(message_id)
            .await?
            .filter(|message| message.involves(user_id))
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;

        Ok(message.into())
    }

    pub async fn get_message_thread(
        &self,
        user_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Vec<MessageResponse>> {
        let messages = self.repo.find_thread(user_id, recipient_id).await?;

        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    pub async fn get_messages_for_user(
        &self,
        params: &MessageParams,
    ) -> Result<PagedList<MessageResponse>> {
        let page = self.repo.find_for_user(params).await?;

        Ok(page.map(MessageResponse::from))
    }

    pub async fn create_message(
        &self,
        sender_id: Uuid,
        payload: MessageForCreationDto,
    ) -> Result<MessageResponse> {
        let recipient = self
            .user_repo
            .find_by_id(payload.recipient_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Could not find user".to_string()))?;

        let saved = self
            .repo
            .save(NewMessage {
                sender_id,
                recipient_id: recipient.id,
                content: payload.content,
            })
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Creating the message failed on save".to_string())
            })?;

        tracing::debug!(
            message_id = %saved.id,
            sender_id = %sender_id,
            recipient_id = %recipient.id,
            "message created"
        );

        Ok(saved.into())
    }
}
