use super::{like_pattern, Page, Queries};
use crate::error::{RowRef, StoreResult};
use crate::model::{Media, PostMedia};
use rusqlite::{params, Row};

const MEDIA_COLUMNS: &str = "id, name, description, alt, media_path, user_id, file_size, mime_type, width, height, duration, original_filename, created_at";

const MEDIA_COLUMNS_QUALIFIED: &str = "m.id, m.name, m.description, m.alt, m.media_path, m.user_id, m.file_size, m.mime_type, m.width, m.height, m.duration, m.original_filename, m.created_at";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateMediaParams {
    pub name: String,
    pub description: String,
    pub alt: String,
    pub media_path: String,
    pub user_id: i64,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration: Option<i32>,
    pub original_filename: Option<String>,
}

/// Editable descriptive fields. File metadata is fixed at upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMediaParams {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub alt: String,
    pub media_path: String,
}

impl Queries<'_> {
    pub fn create_media(&self, arg: &CreateMediaParams) -> StoreResult<Media> {
        self.insert_returning(
            &format!(
                "INSERT INTO media (
                    name, description, alt, media_path, user_id,
                    file_size, mime_type, width, height, duration, original_filename
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 RETURNING {MEDIA_COLUMNS};"
            ),
            params![
                arg.name,
                arg.description,
                arg.alt,
                arg.media_path,
                arg.user_id,
                arg.file_size,
                arg.mime_type,
                arg.width,
                arg.height,
                arg.duration,
                arg.original_filename
            ],
            "media",
            parse_media_row,
        )
    }

    pub fn get_media(&self, id: i64) -> StoreResult<Media> {
        self.fetch_one(
            &format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = ?1;"),
            [id],
            RowRef::Media(id),
            parse_media_row,
        )
    }

    pub fn list_media(&self, page: Page) -> StoreResult<Vec<Media>> {
        self.fetch_all(
            &format!(
                "SELECT {MEDIA_COLUMNS} FROM media ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2;"
            ),
            params![page.limit, page.offset],
            parse_media_row,
        )
    }

    pub fn count_media(&self) -> StoreResult<i64> {
        self.fetch_i64("SELECT COUNT(*) FROM media;", [])
    }

    pub fn list_media_by_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Media>> {
        self.fetch_all(
            &format!(
                "SELECT {MEDIA_COLUMNS}
                 FROM media
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![user_id, page.limit, page.offset],
            parse_media_row,
        )
    }

    pub fn list_media_ids_by_user(&self, user_id: i64) -> StoreResult<Vec<i64>> {
        self.fetch_ids(
            "SELECT id FROM media WHERE user_id = ?1 ORDER BY id ASC;",
            [user_id],
        )
    }

    pub fn count_media_by_user(&self, user_id: i64) -> StoreResult<i64> {
        self.fetch_i64("SELECT COUNT(*) FROM media WHERE user_id = ?1;", [user_id])
    }

    pub fn search_media_by_name(&self, term: &str, page: Page) -> StoreResult<Vec<Media>> {
        self.fetch_all(
            &format!(
                "SELECT {MEDIA_COLUMNS}
                 FROM media
                 WHERE name LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
                 ORDER BY name ASC, id ASC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![like_pattern(term), page.limit, page.offset],
            parse_media_row,
        )
    }

    /// Media attached to a post in display order.
    pub fn list_media_by_post(&self, post_id: i64) -> StoreResult<Vec<Media>> {
        self.fetch_all(
            &format!(
                "SELECT {MEDIA_COLUMNS_QUALIFIED}
                 FROM media AS m
                 INNER JOIN post_media AS pm ON pm.media_id = m.id
                 WHERE pm.post_id = ?1
                 ORDER BY pm.sort_order ASC, m.id ASC;"
            ),
            [post_id],
            parse_media_row,
        )
    }

    pub fn update_media(&self, arg: &UpdateMediaParams) -> StoreResult<Media> {
        self.update_returning(
            &format!(
                "UPDATE media
                 SET name = ?2, description = ?3, alt = ?4, media_path = ?5
                 WHERE id = ?1
                 RETURNING {MEDIA_COLUMNS};"
            ),
            params![arg.id, arg.name, arg.description, arg.alt, arg.media_path],
            "media",
            RowRef::Media(arg.id),
            parse_media_row,
        )
    }

    pub fn transfer_media_owner(&self, from_user_id: i64, to_user_id: i64) -> StoreResult<usize> {
        self.execute(
            "UPDATE media SET user_id = ?2 WHERE user_id = ?1;",
            params![from_user_id, to_user_id],
            "media",
        )
    }

    pub fn delete_media(&self, id: i64) -> StoreResult<()> {
        self.execute("DELETE FROM media WHERE id = ?1;", [id], "media")?;
        Ok(())
    }

    pub fn delete_media_by_user(&self, user_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM media WHERE user_id = ?1;", [user_id], "media")
    }

    pub fn create_post_media(&self, post_id: i64, media_id: i64, sort_order: i32) -> StoreResult<PostMedia> {
        self.insert_returning(
            "INSERT INTO post_media (post_id, media_id, sort_order)
             VALUES (?1, ?2, ?3)
             RETURNING post_id, media_id, sort_order;",
            params![post_id, media_id, sort_order],
            "post_media",
            parse_post_media_row,
        )
    }

    pub fn list_post_media_by_post(&self, post_id: i64) -> StoreResult<Vec<PostMedia>> {
        self.fetch_all(
            "SELECT post_id, media_id, sort_order
             FROM post_media
             WHERE post_id = ?1
             ORDER BY sort_order ASC, media_id ASC;",
            [post_id],
            parse_post_media_row,
        )
    }

    pub fn delete_post_media(&self, post_id: i64, media_id: i64) -> StoreResult<()> {
        self.execute(
            "DELETE FROM post_media WHERE post_id = ?1 AND media_id = ?2;",
            params![post_id, media_id],
            "post_media",
        )?;
        Ok(())
    }

    pub fn delete_post_media_by_post(&self, post_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM post_media WHERE post_id = ?1;", [post_id], "post_media")
    }

    pub fn delete_post_media_by_media(&self, media_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM post_media WHERE media_id = ?1;", [media_id], "post_media")
    }
}

fn parse_media_row(row: &Row<'_>) -> StoreResult<Media> {
    Ok(Media {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        alt: row.get("alt")?,
        media_path: row.get("media_path")?,
        user_id: row.get("user_id")?,
        file_size: row.get("file_size")?,
        mime_type: row.get("mime_type")?,
        width: row.get("width")?,
        height: row.get("height")?,
        duration: row.get("duration")?,
        original_filename: row.get("original_filename")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_post_media_row(row: &Row<'_>) -> StoreResult<PostMedia> {
    Ok(PostMedia {
        post_id: row.get("post_id")?,
        media_id: row.get("media_id")?,
        sort_order: row.get("sort_order")?,
    })
}
