//! User directory trait and record-store implementation.

use async_trait::async_trait;
use common::UserId;
use record_store::{Record, RecordStore, RecordStoreExt, StoreError};
use serde::{Deserialize, Serialize};

use super::ServiceError;

/// Public profile of a user, as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Reference to the profile picture, if one was uploaded.
    pub profile_image: Option<String>,
}

impl UserProfile {
    pub fn new(id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            profile_image: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_profile_image(mut self, image: impl Into<String>) -> Self {
        self.profile_image = Some(image.into());
        self
    }
}

impl Record for UserProfile {
    type Id = UserId;
    const KIND: &'static str = "UserProfile";

    fn id(&self) -> UserId {
        self.id
    }
}

/// Read access to user profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Registers a profile. Fails with `Duplicate` if the id is taken.
    async fn register(&self, profile: UserProfile) -> Result<UserProfile, ServiceError>;

    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, ServiceError>;
}

/// Looks up a profile, treating a directory failure like a missing user.
pub(crate) async fn lookup<U: UserDirectory + ?Sized>(
    users: &U,
    id: UserId,
) -> Option<UserProfile> {
    match users.get_user(id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(user = %id, error = %e, "user lookup failed");
            None
        }
    }
}

/// User directory kept in a record store.
#[derive(Debug, Clone)]
pub struct RecordUserDirectory<S> {
    store: S,
}

impl<S: RecordStore> RecordUserDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: RecordStore> UserDirectory for RecordUserDirectory<S> {
    async fn register(&self, profile: UserProfile) -> Result<UserProfile, ServiceError> {
        match self.store.insert(profile).await {
            Ok(stored) => Ok(stored.record),
            Err(StoreError::AlreadyExists { id, .. }) => {
                Err(ServiceError::Duplicate(format!("user {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.store.get::<UserProfile>(id).await?.map(|v| v.record))
    }
}
