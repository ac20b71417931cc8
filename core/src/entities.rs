//! Entities: structured metadata parsed out of free text.
//!
//! # Design
//! Every entity locates itself with [`Indices`], a half-open character
//! range relative to the text field it was parsed from. Offsets come from
//! the service and are trusted; nothing here validates them.
//!
//! Optional fields are `Option` and are skipped on encode when `None`, so
//! "absent" survives a round-trip instead of turning into an empty value.
//! An `Entities` whose `hashtags` is `None` was not populated; `Some(vec![])`
//! means the text was scanned and held none.

use serde::{Deserialize, Serialize};

/// Start (inclusive) and end (exclusive) character offsets within text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Indices(pub [usize; 2]);

impl Indices {
    pub fn new(start: usize, end: usize) -> Self {
        Indices([start, end])
    }

    /// Offset at which the entity starts, inclusive.
    pub fn start(&self) -> usize {
        self.0[0]
    }

    /// Offset at which the entity ends, exclusive.
    pub fn end(&self) -> usize {
        self.0[1]
    }

    pub fn len(&self) -> usize {
        self.end().saturating_sub(self.start())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The characters of `text` covered by this range, or `None` when the
    /// range does not fit the text.
    pub fn slice(&self, text: &str) -> Option<String> {
        if self.start() > self.end() || self.end() > text.chars().count() {
            return None;
        }
        Some(text.chars().skip(self.start()).take(self.len()).collect())
    }
}

/// Metadata and context parsed from a single text field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<HashtagEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<MediaEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<UrlEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_mentions: Option<Vec<MentionEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<SymbolEntity>>,
}

/// A hashtag parsed from text. `text` excludes the leading `#`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagEntity {
    #[serde(default)]
    pub indices: Indices,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A cashtag such as `$TWTR`. `text` excludes the leading `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntity {
    #[serde(default)]
    pub indices: Indices,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A URL parsed from text, in its shortened, expanded and display forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    #[serde(default)]
    pub indices: Indices,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A media element attached to a tweet.
///
/// The link fields of [`UrlEntity`] sit at the same JSON level as the media
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntity {
    #[serde(flatten)]
    pub link: UrlEntity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url_https: Option<String>,
    /// Id of the tweet the media originally appeared in, for retweeted media.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_status_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_status_id_str: Option<String>,
    /// `photo`, `video` or `animated_gif`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<MediaSizes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_info: Option<VideoInfo>,
}

impl MediaEntity {
    pub fn indices(&self) -> Indices {
        self.link.indices
    }

    pub fn is_video(&self) -> bool {
        matches!(self.media_type.as_deref(), Some("video" | "animated_gif"))
    }
}

/// A user mention parsed from text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEntity {
    #[serde(default)]
    pub indices: Indices,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
}

/// Entities parsed separately from a user's `url` and `description`
/// fields. Offsets in each are relative to their own field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Entities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Entities>,
}

/// Full media list of a tweet; supersedes `Entities::media` when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<MediaEntity>>,
}

/// Available renditions of a media element, keyed by preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSizes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<MediaSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<MediaSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<MediaSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<MediaSize>,
}

/// Dimensions and resize method (`fit` or `crop`) of one rendition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSize {
    #[serde(rename = "w", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(rename = "h", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<String>,
}

/// Playback details of video and animated GIF media.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<[u32; 2]>,
    /// Absent for animated GIFs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_millis: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VideoVariant>>,
}

impl VideoInfo {
    /// The variant with the highest bitrate. Streaming playlists carry no
    /// bitrate and are never chosen.
    pub fn best_variant(&self) -> Option<&VideoVariant> {
        self.variants
            .as_deref()?
            .iter()
            .filter(|variant| variant.bitrate.is_some())
            .max_by_key(|variant| variant.bitrate)
    }
}

/// One encoding of a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoVariant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
