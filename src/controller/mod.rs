//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input and
//! turns it into playlist and search commands.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playlist`: Playlist editing and navigation

mod input;
mod playlist;

use std::sync::Arc;

use crate::model::{AppModel, CatalogError, PlaylistError};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
}

impl AppController {
    pub fn new(model: Arc<AppModel>) -> Self {
        Self { model }
    }

    /// Short message for the error overlay
    pub(crate) fn format_error(error: &PlaylistError) -> String {
        match error {
            PlaylistError::SongNotFound(_) => "That song is no longer in the playlist.".to_string(),
            PlaylistError::Persistence(e) => format!("Sync failed: {}", e),
            PlaylistError::Network(CatalogError::Status { status: 404, .. }) => {
                "Album not found on the server.".to_string()
            }
            PlaylistError::Network(CatalogError::Status { status: 401 | 300..=399, .. }) => {
                "Not logged in to the server. Log in through the browser first.".to_string()
            }
            PlaylistError::Network(e) => format!("Server request failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> PlaylistError {
        PlaylistError::Network(CatalogError::Status {
            status,
            url: "http://127.0.0.1:5000/album/7".to_string(),
        })
    }

    #[test]
    fn test_format_error_by_status() {
        assert_eq!(AppController::format_error(&status(404)), "Album not found on the server.");
        assert!(AppController::format_error(&status(302)).starts_with("Not logged in"));
        assert!(AppController::format_error(&status(401)).starts_with("Not logged in"));
        assert!(AppController::format_error(&status(500)).starts_with("Server request failed"));
    }

    #[test]
    fn test_format_error_does_not_match_digits_in_urls() {
        let error = PlaylistError::Network(CatalogError::Request {
            url: "http://127.0.0.1:5000/album/404".to_string(),
            message: "connection refused".to_string(),
        });
        assert!(AppController::format_error(&error).starts_with("Server request failed"));
    }
}
