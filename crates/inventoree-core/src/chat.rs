//! [`ChatStore`]: direct messages between users, persisted the same way as
//! the inventory collections.
//!
//! A conversation between two users has the id `"<a>-<b>"` with the two user
//! ids in sorted order. Message membership is decided by recomputing that id
//! from the message's sender and receiver and comparing it whole, so a user
//! id that is a substring of another (`al`, `alice`) never leaks messages
//! into the wrong conversation.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use crate::{
  collection::{Collection, Saved},
  kv::{KeyValueStore, keys},
  model::{ChatConversation, ChatMessage, new_id},
};

/// The conversation id for a pair of users; symmetric in its arguments.
pub fn conversation_id(a: &str, b: &str) -> String {
  if a <= b { format!("{a}-{b}") } else { format!("{b}-{a}") }
}

fn in_conversation(message: &ChatMessage, conversation: &str) -> bool {
  conversation_id(&message.sender_id, &message.receiver_id) == conversation
}

pub struct ChatStore<B> {
  backend:       B,
  loading:       AtomicBool,
  messages:      Collection<ChatMessage>,
  conversations: Collection<ChatConversation>,
}

impl<B: KeyValueStore> ChatStore<B> {
  pub fn new(backend: B) -> Self {
    Self {
      backend,
      loading: AtomicBool::new(true),
      messages: Collection::new(keys::CHAT_MESSAGES),
      conversations: Collection::new(keys::CHAT_CONVERSATIONS),
    }
  }

  pub async fn open(backend: B) -> Self {
    let store = Self::new(backend);
    store.load().await;
    store
  }

  pub async fn load(&self) {
    tokio::join!(
      self.messages.load(&self.backend),
      self.conversations.load(&self.backend),
    );
    self.loading.store(false, Ordering::SeqCst);
    tracing::info!("chat loaded");
  }

  pub fn is_loading(&self) -> bool { self.loading.load(Ordering::SeqCst) }

  pub async fn messages(&self) -> Vec<ChatMessage> { self.messages.snapshot().await }

  pub async fn conversations(&self) -> Vec<ChatConversation> {
    self.conversations.snapshot().await
  }

  /// Append an unread message and bump (or open) the pair's conversation.
  ///
  /// `durable` is true only if both collections were written.
  pub async fn send_message(
    &self,
    sender_id: &str,
    receiver_id: &str,
    text: &str,
  ) -> Saved<ChatMessage> {
    let now = Utc::now();
    let message = ChatMessage {
      id:          new_id(),
      sender_id:   sender_id.to_owned(),
      receiver_id: receiver_id.to_owned(),
      message:     text.to_owned(),
      timestamp:   now,
      read:        false,
    };

    let messages_durable = {
      let mut items = self.messages.write().await;
      items.push(message.clone());
      self.messages.flush(&self.backend, &items).await
    };

    let id = conversation_id(sender_id, receiver_id);
    let conversations_durable = {
      let mut items = self.conversations.write().await;
      match items.iter_mut().find(|c| c.id == id) {
        Some(existing) => {
          existing.last_message = Some(message.clone());
          existing.updated_at = now;
        }
        None => items.push(ChatConversation {
          id,
          participants: vec![sender_id.to_owned(), receiver_id.to_owned()],
          last_message: Some(message.clone()),
          updated_at:   now,
        }),
      }
      self.conversations.flush(&self.backend, &items).await
    };

    Saved::new(message, messages_durable && conversations_durable)
  }

  /// Mark every unread message addressed to `user_id` in the conversation as
  /// read. Returns how many changed; nothing is written when none did.
  pub async fn mark_read(&self, user_id: &str, conversation: &str) -> Saved<usize> {
    let mut items = self.messages.write().await;
    let mut changed = 0;
    for message in items.iter_mut() {
      if message.receiver_id == user_id && !message.read && in_conversation(message, conversation) {
        message.read = true;
        changed += 1;
      }
    }
    if changed == 0 {
      return Saved::new(0, true);
    }
    let durable = self.messages.flush(&self.backend, &items).await;
    Saved::new(changed, durable)
  }

  /// Messages of one conversation, oldest first.
  pub async fn conversation_messages(&self, conversation: &str) -> Vec<ChatMessage> {
    let mut out: Vec<ChatMessage> = self
      .messages
      .read()
      .await
      .iter()
      .filter(|m| in_conversation(m, conversation))
      .cloned()
      .collect();
    out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    out
  }

  /// Conversations `user_id` takes part in, most recently active first.
  pub async fn user_conversations(&self, user_id: &str) -> Vec<ChatConversation> {
    let mut out: Vec<ChatConversation> = self
      .conversations
      .read()
      .await
      .iter()
      .filter(|c| c.participants.iter().any(|p| p == user_id))
      .cloned()
      .collect();
    out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    out
  }

  /// Unread messages addressed to `user_id`, optionally within one
  /// conversation.
  pub async fn unread_count(&self, user_id: &str, conversation: Option<&str>) -> usize {
    self
      .messages
      .read()
      .await
      .iter()
      .filter(|m| m.receiver_id == user_id && !m.read)
      .filter(|m| conversation.is_none_or(|c| in_conversation(m, c)))
      .count()
  }
}
