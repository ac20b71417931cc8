//! The user account record.

use serde::{Deserialize, Serialize};

use crate::entities::UserEntities;
use crate::tweet::Tweet;

/// A user account as returned by the `users/*` endpoints.
///
/// Every attribute is optional and omitted on encode when unset. `entities`
/// and `status` are only sent by the service when asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_profile_image: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<UserEntities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favourites_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_request_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friends_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_translator: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listed_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_background_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_background_image_url_https: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_background_tile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_banner_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url_https: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_link_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_sidebar_border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_sidebar_fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_use_background_image: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_all_inline_media: Option<bool>,
    /// The account's most recent tweet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Box<Tweet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses_count: Option<u64>,
    #[serde(rename = "time_zone", skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Offset from UTC in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withheld_in_countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withheld_scope: Option<String>,
}
