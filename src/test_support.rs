//! In-memory repositories and a router harness for handler tests.

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, Utc};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};
use uuid::Uuid;

use crate::{
    auth::jwt::create_jwt,
    error::Result,
    message::{
        message_dto::{MessageContainer, MessageParams},
        message_models::{MessageDetail, NewMessage},
        message_repository::MessageRepository,
        MessageService,
    },
    pagination::PagedList,
    routes::create_router,
    state::{AppState, Config},
    user::{user_models::User, user_repository::UserRepository},
};

const SECRET: &str = "test-secret";

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    messages: Mutex<Vec<MessageDetail>>,
    touched: Mutex<Vec<Uuid>>,
    fail_saves: AtomicBool,
}

impl InMemoryStore {
    fn in_container(message: &MessageDetail, params: &MessageParams) -> bool {
        let user_id = params.user_id;
        match params.container {
            MessageContainer::Inbox => message.recipient_id == user_id && !message.recipient_deleted,
            MessageContainer::Outbox => message.sender_id == user_id && !message.sender_deleted,
            MessageContainer::Unread => {
                message.recipient_id == user_id && !message.recipient_deleted && !message.is_read
            }
        }
    }

    fn in_thread(message: &MessageDetail, user_id: Uuid, other_user_id: Uuid) -> bool {
        (message.recipient_id == user_id
            && !message.recipient_deleted
            && message.sender_id == other_user_id)
            || (message.recipient_id == other_user_id
                && message.sender_id == user_id
                && !message.sender_deleted)
    }

    fn newest_first(messages: &mut [MessageDetail]) {
        messages.sort_by(|a, b| b.message_sent.cmp(&a.message_sent));
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn touch_last_active(&self, user_id: Uuid) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.last_active = Utc::now();
        }
        self.touched.lock().unwrap().push(user_id);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn find_by_id(&self, message_id: Uuid) -> Result<Option<MessageDetail>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == message_id)
            .cloned())
    }

    async fn find_thread(&self, user_id: Uuid, other_user_id: Uuid) -> Result<Vec<MessageDetail>> {
        let mut thread: Vec<MessageDetail> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| Self::in_thread(m, user_id, other_user_id))
            .cloned()
            .collect();
        Self::newest_first(&mut thread);
        Ok(thread)
    }

    async fn find_for_user(&self, params: &MessageParams) -> Result<PagedList<MessageDetail>> {
        let mut matching: Vec<MessageDetail> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| Self::in_container(m, params))
            .cloned()
            .collect();
        Self::newest_first(&mut matching);

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.page_size as usize)
            .collect();

        Ok(PagedList::new(page, total, params.page_number, params.page_size))
    }

    async fn save(&self, message: NewMessage) -> Result<Option<MessageDetail>> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let users = self.users.lock().unwrap();
        let (Some(sender), Some(recipient)) = (
            users.get(&message.sender_id),
            users.get(&message.recipient_id),
        ) else {
            return Ok(None);
        };

        let detail = MessageDetail {
            id: Uuid::new_v4(),
            sender_id: sender.id,
            sender_known_as: sender.known_as.clone(),
            sender_photo_url: sender.photo_url.clone(),
            recipient_id: recipient.id,
            recipient_known_as: recipient.known_as.clone(),
            recipient_photo_url: recipient.photo_url.clone(),
            content: message.content,
            is_read: false,
            date_read: None,
            message_sent: Utc::now(),
            sender_deleted: false,
            recipient_deleted: false,
        };
        self.messages.lock().unwrap().push(detail.clone());

        Ok(Some(detail))
    }
}

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let config = Config {
            database_url: "postgres://unused".to_string(),
            database_max_connections: 1,
            jwt_secret: SECRET.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:4200".to_string()],
        };

        let state = AppState {
            config: Arc::new(config),
            user_repository: store.clone(),
            message_service: MessageService::new(store.clone(), store.clone()),
        };

        Self { store, state }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn token(&self, user_id: Uuid) -> String {
        create_jwt(user_id, "tester", SECRET, 1).unwrap()
    }

    /// Adds a user whose display name is the capitalised username.
    pub fn add_user(&self, username: &str) -> Uuid {
        let mut chars = username.chars();
        let known_as = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            known_as,
            photo_url: Some(format!("https://photos.test/{}.jpg", username)),
            created_at: Utc::now(),
            last_active: Utc::now(),
        };
        let id = user.id;
        self.store.users.lock().unwrap().insert(id, user);
        id
    }

    /// Adds a message sent `age` ago.
    pub fn add_message(&self, sender_id: Uuid, recipient_id: Uuid, content: &str, age: Duration) -> Uuid {
        let users = self.store.users.lock().unwrap();
        let sender = &users[&sender_id];
        let recipient = &users[&recipient_id];

        let detail = MessageDetail {
            id: Uuid::new_v4(),
            sender_id,
            sender_known_as: sender.known_as.clone(),
            sender_photo_url: sender.photo_url.clone(),
            recipient_id,
            recipient_known_as: recipient.known_as.clone(),
            recipient_photo_url: recipient.photo_url.clone(),
            content: content.to_string(),
            is_read: false,
            date_read: None,
            message_sent: Utc::now() - age,
            sender_deleted: false,
            recipient_deleted: false,
        };
        let id = detail.id;
        self.store.messages.lock().unwrap().push(detail);
        id
    }

    pub fn mark_read(&self, message_id: Uuid) {
        self.update_message(message_id, |m| {
            m.is_read = true;
            m.date_read = Some(Utc::now());
        });
    }

    pub fn mark_recipient_deleted(&self, message_id: Uuid) {
        self.update_message(message_id, |m| m.recipient_deleted = true);
    }

    pub fn fail_saves(&self) {
        self.store.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn message_count(&self) -> usize {
        self.store.messages.lock().unwrap().len()
    }

    pub fn touched(&self) -> Vec<Uuid> {
        self.store.touched.lock().unwrap().clone()
    }

    fn update_message<F: FnOnce(&mut MessageDetail)>(&self, message_id: Uuid, update: F) {
        let mut messages = self.store.messages.lock().unwrap();
        if let Some(message) = messages.iter_mut().find(|m| m.id == message_id) {
            update(message);
        }
    }
}
