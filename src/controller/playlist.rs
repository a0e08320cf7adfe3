//! Playlist editing and navigation

use crate::model::{Playlist, SelectedItem};

use super::AppController;

impl AppController {
    /// Enter on a search result: albums are merged in whole, tracks appended
    pub async fn add_selected_result(&self) {
        let Some(item) = self.model.get_selected_result().await else {
            return;
        };

        match item {
            SelectedItem::Song { attributes } => {
                tracing::debug!(title = %attributes.title, "Adding song to playlist");
                let playlist = self.model.playlist();
                let result = playlist.lock().await.add_song(attributes).await;
                if let Err(e) = result {
                    self.model.set_error(Self::format_error(&e)).await;
                }
            }
            SelectedItem::Album { id, title } => {
                // the album listing is a network round trip; keep the UI responsive
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.add_album(id, &title).await;
                });
            }
        }
    }

    pub async fn add_album(&self, album_id: u64, title: &str) {
        tracing::debug!(album_id, title, "Adding album to playlist");
        let playlist = self.model.playlist();
        let result = Playlist::add_album(&playlist, album_id).await;
        match result {
            Ok(summary) => {
                tracing::info!(album_id, added = summary.added, updated = summary.updated, "Album added");
            }
            Err(e) => {
                tracing::error!(album_id, error = %e, "Adding album failed");
                self.model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    /// Enter on a playlist entry
    pub async fn play_selected(&self) {
        let Some(id) = self.model.get_selected_playlist_song().await else {
            return;
        };

        let playlist = self.model.playlist();
        let mut playlist = playlist.lock().await;
        if let Some(song) = playlist.songs().get(id) {
            tracing::debug!(title = %song.attributes().title, "Playing selected song");
        }
        let result = match playlist.seek_to_song(id).await {
            Ok(()) => playlist.persist("seek").await,
            Err(e) => Err(e),
        };
        drop(playlist);

        if let Err(e) = result {
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    pub async fn next_song(&self) {
        self.step(true).await;
    }

    pub async fn prev_song(&self) {
        self.step(false).await;
    }

    async fn step(&self, forward: bool) {
        let playlist = self.model.playlist();
        let mut playlist = playlist.lock().await;
        let moved = if forward {
            playlist.next_song().await
        } else {
            playlist.prev_song().await
        };

        if !moved {
            tracing::debug!(forward, "No song to move to");
            return;
        }

        let result = playlist.persist("seek").await;
        drop(playlist);

        self.model.follow_position().await;
        if let Err(e) = result {
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    pub async fn remove_selected(&self) {
        let Some(id) = self.model.get_selected_playlist_song().await else {
            return;
        };

        let playlist = self.model.playlist();
        let result = playlist.lock().await.remove_song(id).await;
        self.model.clamp_playlist_selection().await;

        match result {
            Ok(Some(song)) => {
                tracing::info!(title = %song.attributes().title, "Removed song from playlist");
            }
            Ok(None) => {}
            Err(e) => self.model.set_error(Self::format_error(&e)).await,
        }
    }
}
