use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

#[derive(Clone, Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageForCreationDto {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub content: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Which mailbox view a listing returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MessageContainer {
    Inbox,
    Outbox,
    #[default]
    Unread,
}

impl FromStr for MessageContainer {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inbox" => Ok(Self::Inbox),
            "outbox" => Ok(Self::Outbox),
            "unread" => Ok(Self::Unread),
            other => Err(AppError::BadRequest(format!(
                "Unknown message container '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for MessageContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Inbox => "Inbox",
            Self::Outbox => "Outbox",
            Self::Unread => "Unread",
        };
        f.write_str(name)
    }
}

/// Raw query string for the message listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MessageQuery {
    /// Page number, starting at 1 (default: 1)
    pub page_number: Option<u32>,
    /// Items per page (default: 10, max: 50)
    pub page_size: Option<u32>,
    /// Inbox, Outbox or Unread (default: Unread)
    pub message_container: Option<String>,
}

/// Normalised listing parameters handed to the repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageParams {
    pub user_id: Uuid,
    pub page_number: u32,
    pub page_size: u32,
    pub container: MessageContainer,
}

impl MessageParams {
    pub fn from_query(user_id: Uuid, query: MessageQuery) -> Result<Self, AppError> {
        let container = match query.message_container.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => MessageContainer::default(),
        };

        Ok(Self {
            user_id,
            page_number: query.page_number.unwrap_or(1).max(1),
            page_size: query
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            container,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page_number as i64 - 1) * self.page_size as i64
    }
}
