//! In-memory song store.
//!
//! Songs live in a `Vec` kept in insertion order. Lookups are linear scans,
//! which is fine for a catalogue held entirely in process memory. The sequence
//! and the id counter sit behind one lock so that every operation sees and
//! mutates them together.

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::types::{Song, SongId};

/// First id handed out by a fresh store.
pub const FIRST_ID: SongId = 1;

#[derive(Debug)]
struct Inner {
    songs: Vec<Song>,
    next_id: SongId,
}

impl Inner {
    fn position(&self, id: SongId) -> Option<usize> {
        self.songs.iter().position(|song| song.id == id)
    }
}

/// Ordered collection of songs plus the id counter.
#[derive(Debug)]
pub struct SongStore {
    inner: RwLock<Inner>,
}

impl SongStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                songs: Vec::new(),
                next_id: FIRST_ID,
            }),
        }
    }

    /// Snapshot of every song in insertion order.
    pub async fn list(&self) -> Vec<Song> {
        self.inner.read().await.songs.clone()
    }

    /// Find the song with `id`.
    pub async fn get(&self, id: SongId) -> Option<Song> {
        let inner = self.inner.read().await;
        inner.songs.iter().find(|song| song.id == id).cloned()
    }

    /// Store `song` under a freshly assigned id and return the stored copy.
    ///
    /// Any id carried by `song` is discarded.
    #[instrument(skip(self, song), fields(title = %song.title))]
    pub async fn create(&self, song: Song) -> Song {
        let mut inner = self.inner.write().await;

        let id = inner.next_id;
        inner.next_id += 1;

        let song = song.with_id(id);
        inner.songs.push(song.clone());

        debug!(id, total = inner.songs.len(), "Song stored");
        song
    }

    /// Replace the song with `id` by the output of `build`.
    ///
    /// `build` runs only when `id` exists, while the write lock is held.
    /// Returns `Ok(None)` when there is no such song. The replacement always
    /// keeps `id`, whatever id `build` produced.
    #[instrument(skip(self, build))]
    pub async fn update<F, E>(&self, id: SongId, build: F) -> Result<Option<Song>, E>
    where
        F: FnOnce() -> Result<Song, E>,
    {
        let mut inner = self.inner.write().await;

        let Some(index) = inner.position(id) else {
            return Ok(None);
        };

        let song = build()?.with_id(id);
        inner.songs[index] = song.clone();

        debug!(id, index, "Song replaced");
        Ok(Some(song))
    }

    /// Remove the song with `id`, keeping the order of the rest.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: SongId) -> Option<Song> {
        let mut inner = self.inner.write().await;

        let index = inner.position(id)?;
        let removed = inner.songs.remove(index);

        debug!(id, remaining = inner.songs.len(), "Song removed");
        Some(removed)
    }

    /// Number of stored songs.
    pub async fn len(&self) -> usize {
        self.inner.read().await.songs.len()
    }

    /// Whether the store holds no songs.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.songs.is_empty()
    }

    /// Id the next created song will receive.
    pub async fn next_id(&self) -> SongId {
        self.inner.read().await.next_id
    }
}

impl Default for SongStore {
    fn default() -> Self {
        Self::new()
    }
}
