//! Song record types.

use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned to a song by the store.
pub type SongId = i64;

/// A single song record.
///
/// Every field defaults to its zero value when absent from a request body,
/// and unknown fields are ignored. Keys match regardless of ASCII case, a
/// `null` value leaves the field untouched and a repeated key keeps its
/// last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Song {
    /// Store-assigned identifier.
    pub id: SongId,
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Free-form duration, e.g. "3:45".
    pub duration: String,
}

impl Song {
    /// Create a song without an assigned id.
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            artist: artist.into(),
            duration: duration.into(),
        }
    }

    /// Return the same song carrying `id`.
    pub fn with_id(mut self, id: SongId) -> Self {
        self.id = id;
        self
    }
}

impl<'de> Deserialize<'de> for Song {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SongVisitor)
    }
}

struct SongVisitor;

impl<'de> Visitor<'de> for SongVisitor {
    type Value = Song;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a song object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Song, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut song = Song::default();

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("id") {
                if let Some(id) = map.next_value::<Option<SongId>>()? {
                    song.id = id;
                }
                continue;
            }

            let field = if key.eq_ignore_ascii_case("title") {
                &mut song.title
            } else if key.eq_ignore_ascii_case("artist") {
                &mut song.artist
            } else if key.eq_ignore_ascii_case("duration") {
                &mut song.duration
            } else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            if let Some(value) = map.next_value::<Option<String>>()? {
                *field = value;
            }
        }

        Ok(song)
    }
}

/// Body of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Confirmation text.
    pub message: String,
}

impl DeleteResponse {
    /// The confirmation sent after a song is removed.
    pub fn deleted() -> Self {
        Self {
            message: "Song deleted".to_string(),
        }
    }
}
