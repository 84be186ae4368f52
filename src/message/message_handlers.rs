use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    extract::{ApiJson, ApiPath, ApiQuery},
    message::{
        message_dto::{MessageForCreationDto, MessageParams, MessageQuery},
        message_models::MessageResponse,
    },
    middleware::AuthUser,
    pagination::pagination_headers,
    state::AppState,
};

/// Get a single message
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/messages/{id}",
    tag = "messages",
    params(
        ("user_id" = Uuid, Path, description = "Authenticated user's ID"),
        ("id" = Uuid, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message found", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Message not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_message(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath((user_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    caller.ensure_is(user_id)?;

    let message = state.message_service.get_message(user_id, id).await?;

    Ok((StatusCode::OK, Json(message)))
}

/// Get the conversation between the user and another member
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/messages/thread/{recipient_id}",
    tag = "messages",
    params(
        ("user_id" = Uuid, Path, description = "Authenticated user's ID"),
        ("recipient_id" = Uuid, Path, description = "Other user in the conversation")
    ),
    responses(
        (status = 200, description = "Messages in the thread, newest first", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_message_thread(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath((user_id, recipient_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    caller.ensure_is(user_id)?;

    let thread = state
        .message_service
        .get_message_thread(user_id, recipient_id)
        .await?;

    Ok((StatusCode::OK, Json(thread)))
}

/// Get a page of the user's inbox, outbox or unread messages
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/messages",
    tag = "messages",
    params(
        ("user_id" = Uuid, Path, description = "Authenticated user's ID"),
        MessageQuery
    ),
    responses(
        (status = 200, description = "Page of messages; totals in the Pagination header", body = Vec<MessageResponse>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_messages_for_user(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<MessageQuery>,
) -> Result<impl IntoResponse> {
    caller.ensure_is(user_id)?;

    let params = MessageParams::from_query(user_id, query)?;
    tracing::debug!(
        user_id = %user_id,
        container = %params.container,
        page = params.page_number,
        "listing messages"
    );

    let page = state.message_service.get_messages_for_user(&params).await?;
    let headers = pagination_headers(&page)?;

    Ok((StatusCode::OK, headers, Json(page.items)))
}

/// Send a message to another user
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/messages",
    tag = "messages",
    params(
        ("user_id" = Uuid, Path, description = "Authenticated user's ID, used as the sender")
    ),
    request_body = MessageForCreationDto,
    responses(
        (status = 201, description = "Message created", body = MessageResponse),
        (status = 400, description = "Invalid input or recipient not found"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Message could not be saved")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_message(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<MessageForCreationDto>,
) -> Result<impl IntoResponse> {
    caller.ensure_is(user_id)?;
    payload.validate()?;

    let message = state
        .message_service
        .create_message(user_id, payload)
        .await?;

    let location = format!("/api/users/{}/messages/{}", user_id, message.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(message)))
}
