use super::{like_pattern, Page, Queries};
use crate::error::{RowRef, StoreResult};
use crate::model::{Image, PostImage};
use rusqlite::{params, Row};

const IMAGE_COLUMNS: &str = "id, name, description, alt, image_path, user_id, created_at";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateImageParams {
    pub name: String,
    pub description: String,
    pub alt: String,
    pub image_path: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateImageParams {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub alt: String,
    pub image_path: String,
}

impl Queries<'_> {
    pub fn create_image(&self, arg: &CreateImageParams) -> StoreResult<Image> {
        self.insert_returning(
            &format!(
                "INSERT INTO images (name, description, alt, image_path, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {IMAGE_COLUMNS};"
            ),
            params![arg.name, arg.description, arg.alt, arg.image_path, arg.user_id],
            "images",
            parse_image_row,
        )
    }

    pub fn get_image(&self, id: i64) -> StoreResult<Image> {
        self.fetch_one(
            &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = ?1;"),
            [id],
            RowRef::Image(id),
            parse_image_row,
        )
    }

    pub fn list_images(&self, page: Page) -> StoreResult<Vec<Image>> {
        self.fetch_all(
            &format!(
                "SELECT {IMAGE_COLUMNS} FROM images ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2;"
            ),
            params![page.limit, page.offset],
            parse_image_row,
        )
    }

    pub fn list_images_by_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Image>> {
        self.fetch_all(
            &format!(
                "SELECT {IMAGE_COLUMNS}
                 FROM images
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![user_id, page.limit, page.offset],
            parse_image_row,
        )
    }

    pub fn list_image_ids_by_user(&self, user_id: i64) -> StoreResult<Vec<i64>> {
        self.fetch_ids(
            "SELECT id FROM images WHERE user_id = ?1 ORDER BY id ASC;",
            [user_id],
        )
    }

    pub fn search_images_by_name(&self, term: &str, page: Page) -> StoreResult<Vec<Image>> {
        self.fetch_all(
            &format!(
                "SELECT {IMAGE_COLUMNS}
                 FROM images
                 WHERE name LIKE ?1 ESCAPE '\\'
                 ORDER BY name ASC, id ASC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![like_pattern(term), page.limit, page.offset],
            parse_image_row,
        )
    }

    pub fn list_images_by_post(&self, post_id: i64) -> StoreResult<Vec<Image>> {
        self.fetch_all(
            "SELECT i.id, i.name, i.description, i.alt, i.image_path, i.user_id, i.created_at
             FROM images AS i
             INNER JOIN post_images AS pi ON pi.image_id = i.id
             WHERE pi.post_id = ?1
             ORDER BY pi.sort_order ASC, i.id ASC;",
            [post_id],
            parse_image_row,
        )
    }

    pub fn update_image(&self, arg: &UpdateImageParams) -> StoreResult<Image> {
        self.update_returning(
            &format!(
                "UPDATE images
                 SET name = ?2, description = ?3, alt = ?4, image_path = ?5
                 WHERE id = ?1
                 RETURNING {IMAGE_COLUMNS};"
            ),
            params![arg.id, arg.name, arg.description, arg.alt, arg.image_path],
            "images",
            RowRef::Image(arg.id),
            parse_image_row,
        )
    }

    pub fn transfer_image_owner(&self, from_user_id: i64, to_user_id: i64) -> StoreResult<usize> {
        self.execute(
            "UPDATE images SET user_id = ?2 WHERE user_id = ?1;",
            params![from_user_id, to_user_id],
            "images",
        )
    }

    pub fn delete_image(&self, id: i64) -> StoreResult<()> {
        self.execute("DELETE FROM images WHERE id = ?1;", [id], "images")?;
        Ok(())
    }

    pub fn delete_images_by_user(&self, user_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM images WHERE user_id = ?1;", [user_id], "images")
    }

    pub fn create_post_image(&self, post_id: i64, image_id: i64, sort_order: i32) -> StoreResult<PostImage> {
        self.insert_returning(
            "INSERT INTO post_images (post_id, image_id, sort_order)
             VALUES (?1, ?2, ?3)
             RETURNING post_id, image_id, sort_order;",
            params![post_id, image_id, sort_order],
            "post_images",
            parse_post_image_row,
        )
    }

    pub fn list_post_images_by_post(&self, post_id: i64) -> StoreResult<Vec<PostImage>> {
        self.fetch_all(
            "SELECT post_id, image_id, sort_order
             FROM post_images
             WHERE post_id = ?1
             ORDER BY sort_order ASC, image_id ASC;",
            [post_id],
            parse_post_image_row,
        )
    }

    pub fn delete_post_images_by_post(&self, post_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM post_images WHERE post_id = ?1;", [post_id], "post_images")
    }

    pub fn delete_post_images_by_image(&self, image_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM post_images WHERE image_id = ?1;", [image_id], "post_images")
    }
}

fn parse_image_row(row: &Row<'_>) -> StoreResult<Image> {
    Ok(Image {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        alt: row.get("alt")?,
        image_path: row.get("image_path")?,
        user_id: row.get("user_id")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_post_image_row(row: &Row<'_>) -> StoreResult<PostImage> {
    Ok(PostImage {
        post_id: row.get("post_id")?,
        image_id: row.get("image_id")?,
        sort_order: row.get("sort_order")?,
    })
}
