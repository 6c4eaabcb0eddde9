//! Media rows, the legacy image twin, and their post links.

use serde::{Deserialize, Serialize};

/// Uploaded file owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub alt: String,
    pub media_path: String,
    pub user_id: i64,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Playback length in seconds for audio/video.
    pub duration: Option<i32>,
    pub original_filename: Option<String>,
    pub created_at: i64,
}

/// Ordered attachment of a media item to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMedia {
    pub post_id: i64,
    pub media_id: i64,
    pub sort_order: i32,
}

/// Older image record kept for posts created before media existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub alt: String,
    pub image_path: String,
    pub user_id: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImage {
    pub post_id: i64,
    pub image_id: i64,
    pub sort_order: i32,
}
