//! Private messages of the authenticated user.

use crate::client::Client;
use crate::endpoints::MessageTab;
use crate::error::{Error, Result};
use crate::id::MessageId;
use crate::lazy::Lazy;
use crate::payload::{MessagePageRecord, MessageRecord, MessageUserRecord};
use crate::user::User;
use chrono::{DateTime, Utc};
use roblox_http::Request;
use std::sync::Arc;

type UserRef = Lazy<MessageUserRecord, User>;

/// A private message. Sender and recipient start as the payload's
/// `{ id, name }` stubs and resolve to canonical users.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub sender: UserRef,
    pub recipient: UserRef,
    pub subject: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub read: bool,
    pub is_system_message: bool,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            sender: Lazy::unresolved(record.sender),
            recipient: Lazy::unresolved(record.recipient),
            subject: record.subject,
            body: record.body,
            created: record.created,
            updated: record.updated,
            read: record.is_read,
            is_system_message: record.is_system_message,
        }
    }
}

impl Message {
    /// Resolve sender and recipient through [`Client::get_user`], cache allowed.
    ///
    /// Safe to call repeatedly; resolved references are left alone.
    pub async fn load_users(&mut self, client: &Client) -> Result<()> {
        resolve_user(&mut self.sender, client).await?;
        resolve_user(&mut self.recipient, client).await?;
        Ok(())
    }
}

async fn resolve_user(reference: &mut UserRef, client: &Client) -> Result<Arc<User>> {
    reference
        .resolve_with(|stub| {
            let id = stub.id;
            async move {
                client
                    .get_user(id, true)
                    .await?
                    .ok_or_else(|| Error::not_found("user", id))
            }
        })
        .await
}

/// One page of a message folder.
#[derive(Debug, Clone)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub total_messages: u64,
    pub total_pages: u64,
    pub page_number: u64,
}

impl Client {
    /// One page of the authenticated user's messages. Users are left unresolved.
    pub async fn messages(&self, tab: MessageTab, page_number: u32, page_size: u32) -> Result<MessagePage> {
        let url = self.endpoints().messages(tab, page_number, page_size);
        let record: MessagePageRecord = self.fetch(Request::get(url), "messages").await?;
        Ok(MessagePage {
            messages: record.collection.into_iter().map(Message::from).collect(),
            total_messages: record.total_collection_size,
            total_pages: record.total_pages,
            page_number: record.page_number,
        })
    }
}
