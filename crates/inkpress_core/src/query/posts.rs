use super::{like_pattern, Page, Queries};
use crate::error::{Conflict, RowRef, StoreResult};
use crate::model::Post;
use rusqlite::{params, Row};

const POST_COLUMNS: &str =
    "id, title, content, description, user_id, username, url, created_at, changed_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub description: String,
    pub user_id: i64,
    pub username: String,
    pub url: String,
}

/// Full replacement of the editable post fields. Ownership moves through
/// the user operations, not through this record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub description: String,
    pub url: String,
}

impl Queries<'_> {
    pub fn create_post(&self, arg: &CreatePostParams) -> StoreResult<Post> {
        self.insert_returning(
            &format!(
                "INSERT INTO posts (title, content, description, user_id, username, url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {POST_COLUMNS};"
            ),
            params![
                arg.title,
                arg.content,
                arg.description,
                arg.user_id,
                arg.username,
                arg.url
            ],
            "posts",
            parse_post_row,
        )
        .map_err(|err| err.or_conflict(Conflict::PostUrl(arg.url.clone())))
    }

    pub fn get_post(&self, id: i64) -> StoreResult<Post> {
        self.fetch_one(
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1;"),
            [id],
            RowRef::Post(id),
            parse_post_row,
        )
    }

    /// Newest first.
    pub fn list_posts(&self, page: Page) -> StoreResult<Vec<Post>> {
        self.fetch_all(
            &format!(
                "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2;"
            ),
            params![page.limit, page.offset],
            parse_post_row,
        )
    }

    pub fn count_posts(&self) -> StoreResult<i64> {
        self.fetch_i64("SELECT COUNT(*) FROM posts;", [])
    }

    pub fn list_posts_by_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Post>> {
        self.fetch_all(
            &format!(
                "SELECT {POST_COLUMNS}
                 FROM posts
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![user_id, page.limit, page.offset],
            parse_post_row,
        )
    }

    /// Ids of every post whose primary owner is `user_id`.
    pub fn list_post_ids_by_user(&self, user_id: i64) -> StoreResult<Vec<i64>> {
        self.fetch_ids(
            "SELECT id FROM posts WHERE user_id = ?1 ORDER BY id ASC;",
            [user_id],
        )
    }

    pub fn search_posts_by_title(&self, term: &str, page: Page) -> StoreResult<Vec<Post>> {
        self.fetch_all(
            &format!(
                "SELECT {POST_COLUMNS}
                 FROM posts
                 WHERE title LIKE ?1 ESCAPE '\\'
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![like_pattern(term), page.limit, page.offset],
            parse_post_row,
        )
    }

    /// Replaces the editable fields and stamps `changed_at`.
    pub fn update_post(&self, arg: &UpdatePostParams) -> StoreResult<Post> {
        self.update_returning(
            &format!(
                "UPDATE posts
                 SET title = ?2,
                     content = ?3,
                     description = ?4,
                     url = ?5,
                     changed_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1
                 RETURNING {POST_COLUMNS};"
            ),
            params![arg.id, arg.title, arg.content, arg.description, arg.url],
            "posts",
            RowRef::Post(arg.id),
            parse_post_row,
        )
        .map_err(|err| err.or_conflict(Conflict::PostUrl(arg.url.clone())))
    }

    /// Moves primary ownership of all of `from_user_id`'s posts.
    pub fn transfer_post_owner(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        to_username: &str,
    ) -> StoreResult<usize> {
        self.execute(
            "UPDATE posts SET user_id = ?2, username = ?3 WHERE user_id = ?1;",
            params![from_user_id, to_user_id, to_username],
            "posts",
        )
    }

    /// Rewrites the denormalized owner username. Leaves `changed_at` alone.
    pub fn update_post_username_for_user(&self, user_id: i64, username: &str) -> StoreResult<usize> {
        self.execute(
            "UPDATE posts SET username = ?2 WHERE user_id = ?1;",
            params![user_id, username],
            "posts",
        )
    }

    pub fn delete_post(&self, id: i64) -> StoreResult<()> {
        self.execute("DELETE FROM posts WHERE id = ?1;", [id], "posts")?;
        Ok(())
    }

    pub fn delete_posts_by_user(&self, user_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM posts WHERE user_id = ?1;", [user_id], "posts")
    }
}

pub(super) fn parse_post_row(row: &Row<'_>) -> StoreResult<Post> {
    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        description: row.get("description")?,
        user_id: row.get("user_id")?,
        username: row.get("username")?,
        url: row.get("url")?,
        created_at: row.get("created_at")?,
        changed_at: row.get("changed_at")?,
    })
}
