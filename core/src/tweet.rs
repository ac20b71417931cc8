//! Tweets, as embedded in a user's `status` field.
//!
//! `Tweet::user` and `User::status` are boxed options, so the two types
//! nest without an infinite type and decoding only follows what the body
//! actually contains.

use serde::{Deserialize, Serialize};

use crate::entities::{Entities, ExtendedEntity, Indices, MediaEntity};
use crate::user::User;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Untruncated text, sent in extended tweet mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_text_range: Option<Indices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Entities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_entities: Option<ExtendedEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweet_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweeted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_screen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_user_id_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possibly_sensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_status_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_status_id_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
}

impl Tweet {
    /// `full_text` when present, otherwise `text`.
    pub fn display_text(&self) -> Option<&str> {
        self.full_text.as_deref().or(self.text.as_deref())
    }

    /// Media from `extended_entities`, falling back to `entities.media`.
    pub fn media(&self) -> &[MediaEntity] {
        self.extended_entities
            .as_ref()
            .and_then(|ext| ext.media.as_deref())
            .or_else(|| self.entities.as_ref().and_then(|e| e.media.as_deref()))
            .unwrap_or(&[])
    }
}
