//! Song entities: attribute bags, display identities and the now-playing mirror

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Keys that only ever exist on the client and are dropped from any incoming bag
const CLIENT_ONLY_KEYS: [&str; 2] = ["htmlId", "displayId"];

static NEXT_DISPLAY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-local label distinguishing otherwise identical songs in lists.
///
/// Not stable across reloads: hydrating a playlist hands out fresh ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(u64);

impl DisplayId {
    fn next() -> Self {
        Self(NEXT_DISPLAY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "song-c{}", self.0)
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct RawSongAttributes {
    #[serde(default, deserialize_with = "string_or_null")]
    artist: String,
    #[serde(default, deserialize_with = "string_or_null")]
    title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    filename: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawSongAttributes> for SongAttributes {
    fn from(raw: RawSongAttributes) -> Self {
        let mut extra = raw.extra;
        for key in CLIENT_ONLY_KEYS {
            extra.remove(key);
        }
        Self {
            artist: raw.artist,
            title: raw.title,
            filename: raw.filename,
            extra,
        }
    }
}

/// Wire and storage shape of a song: the known fields plus whatever else the server sent
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSongAttributes")]
pub struct SongAttributes {
    pub artist: String,
    pub title: String,
    pub filename: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SongAttributes {
    pub fn new(artist: impl Into<String>, title: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            filename: filename.into(),
            extra: Map::new(),
        }
    }

    /// Builder-style setter for a server-provided field
    #[cfg(test)]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        if !CLIENT_ONLY_KEYS.contains(&key) {
            self.extra.insert(key.to_string(), value.into());
        }
        self
    }

    /// The catalog's own id for this object, if the server sent one
    pub fn server_id(&self) -> Option<u64> {
        self.extra.get("id").and_then(Value::as_u64)
    }

    /// Search results mix albums and tracks; only albums carry `has_cover_art`
    pub fn is_album(&self) -> bool {
        self.extra.contains_key("has_cover_art")
    }

    /// Album title for tracks (the server nests a serialized album, or sends an empty string)
    pub fn album_title(&self) -> Option<&str> {
        self.extra
            .get("album")
            .and_then(|album| album.get("title"))
            .and_then(Value::as_str)
    }

    pub fn display_label(&self) -> String {
        match (self.artist.is_empty(), self.title.is_empty()) {
            (false, false) => format!("{} - {}", self.artist, self.title),
            (true, false) => self.title.clone(),
            (false, true) => self.artist.clone(),
            (true, true) => self.filename.clone(),
        }
    }
}

/// Partial update for [`Song::set_attributes`]; `None` fields are left alone
#[derive(Clone, Debug, Default)]
pub struct SongUpdate {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub filename: Option<String>,
    pub extra: Map<String, Value>,
}

impl From<SongAttributes> for SongUpdate {
    fn from(attributes: SongAttributes) -> Self {
        Self {
            artist: Some(attributes.artist),
            title: Some(attributes.title),
            filename: Some(attributes.filename),
            extra: attributes.extra,
        }
    }
}

/// A single track entry with an identity that lives as long as the instance
#[derive(Clone, Debug)]
pub struct Song {
    display_id: DisplayId,
    attributes: SongAttributes,
}

impl Song {
    pub fn new(attributes: SongAttributes) -> Self {
        Self {
            display_id: DisplayId::next(),
            attributes,
        }
    }

    pub fn display_id(&self) -> DisplayId {
        self.display_id
    }

    pub fn attributes(&self) -> &SongAttributes {
        &self.attributes
    }

    pub fn set_attributes(&mut self, update: SongUpdate) {
        if let Some(artist) = update.artist {
            self.attributes.artist = artist;
        }
        if let Some(title) = update.title {
            self.attributes.title = title;
        }
        if let Some(filename) = update.filename {
            self.attributes.filename = filename;
        }
        for (key, value) in update.extra {
            if !CLIENT_ONLY_KEYS.contains(&key.as_str()) {
                self.attributes.extra.insert(key, value);
            }
        }
    }
}

impl From<SongAttributes> for Song {
    fn from(attributes: SongAttributes) -> Self {
        Self::new(attributes)
    }
}

/// Mirror of whatever song the playlist currently points at.
///
/// Holds a value copy, never the playlist's entry itself, and is only
/// written through [`PlayingSong::change_song`] from the playlist's seek path.
#[derive(Clone, Debug)]
pub struct PlayingSong {
    song: Song,
    loaded: bool,
}

impl PlayingSong {
    pub fn new() -> Self {
        Self {
            song: Song::new(SongAttributes::default()),
            loaded: false,
        }
    }

    pub fn change_song(&mut self, new_song: &Song) {
        self.song.attributes = new_song.attributes().clone();
        self.loaded = true;
        tracing::debug!(
            source = %new_song.display_id(),
            playing = %self.display_id(),
            title = %self.song.attributes.title,
            "Now playing changed"
        );
    }

    pub fn attributes(&self) -> &SongAttributes {
        self.song.attributes()
    }

    pub fn display_id(&self) -> DisplayId {
        self.song.display_id()
    }

    /// False until the playlist has selected a song at least once
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl Default for PlayingSong {
    fn default() -> Self {
        Self::new()
    }
}
