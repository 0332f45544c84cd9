//! Notification sink and the per-user mailbox behind it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{NotificationId, UserId};
use record_store::{Record, RecordStore, RecordStoreExt};
use serde::{Deserialize, Serialize};

use super::ServiceError;
use crate::error::DomainError;

/// A one-way message addressed to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification.
    pub fn new(recipient: UserId, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            recipient,
            message: message.into(),
            read: false,
            created_at: Utc::now(),
        }
    }
}

impl Record for Notification {
    type Id = NotificationId;
    const KIND: &'static str = "Notification";

    fn id(&self) -> NotificationId {
        self.id
    }
}

/// Append-only view of the notification system used by the engine.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn append(&self, recipient: UserId, message: String)
    -> Result<Notification, ServiceError>;
}

/// Appends a notification, logging and counting a failure instead of
/// returning it.
pub(crate) async fn notify<N: NotificationSink + ?Sized>(
    sink: &N,
    recipient: UserId,
    message: String,
) {
    if let Err(e) = sink.append(recipient, message).await {
        metrics::counter!("notifications_dropped_total").increment(1);
        tracing::warn!(%recipient, error = %e, "failed to deliver notification");
    }
}

/// Durable per-user mailbox kept in a record store.
#[derive(Debug, Clone)]
pub struct Mailbox<S> {
    store: S,
}

impl<S: RecordStore> Mailbox<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a user's notifications, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<Notification>, DomainError> {
        let notifications = self
            .store
            .find_by::<Notification>("recipient", user.to_string())
            .await?;
        Ok(notifications.into_iter().map(|v| v.record).collect())
    }

    /// Marks a notification read or unread.
    ///
    /// Only the recipient may change it.
    #[tracing::instrument(skip(self))]
    pub async fn set_read(
        &self,
        caller: UserId,
        id: NotificationId,
        read: bool,
    ) -> Result<Notification, DomainError> {
        let current = self
            .store
            .get::<Notification>(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification", id))?;

        if current.record.recipient != caller {
            return Err(DomainError::Unauthorized {
                actor: caller,
                action: "update this notification",
            });
        }

        if current.record.read == read {
            return Ok(current.record);
        }

        let mut notification = current.record;
        notification.read = read;
        Ok(self.store.update(notification, current.version).await?.record)
    }

    /// Deletes a notification. Only the recipient may delete it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, caller: UserId, id: NotificationId) -> Result<(), DomainError> {
        let current = self
            .store
            .get::<Notification>(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification", id))?;

        if current.record.recipient != caller {
            return Err(DomainError::Unauthorized {
                actor: caller,
                action: "delete this notification",
            });
        }

        if !self.store.delete::<Notification>(id).await? {
            return Err(DomainError::not_found("Notification", id));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: RecordStore> NotificationSink for Mailbox<S> {
    async fn append(
        &self,
        recipient: UserId,
        message: String,
    ) -> Result<Notification, ServiceError> {
        let stored = self
            .store
            .insert(Notification::new(recipient, message))
            .await?;
        tracing::debug!(%recipient, id = %stored.record.id, "notification appended");
        Ok(stored.record)
    }
}
