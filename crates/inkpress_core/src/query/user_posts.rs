use super::Queries;
use crate::error::StoreResult;
use crate::model::UserPost;
use rusqlite::{params, Row};

impl Queries<'_> {
    pub fn create_user_post(&self, post_id: i64, user_id: i64, sort_order: i32) -> StoreResult<UserPost> {
        self.insert_returning(
            "INSERT INTO user_posts (post_id, user_id, sort_order)
             VALUES (?1, ?2, ?3)
             RETURNING post_id, user_id, sort_order;",
            params![post_id, user_id, sort_order],
            "user_posts",
            parse_user_post_row,
        )
    }

    /// Authors of a post, primary author first.
    pub fn list_user_posts_by_post(&self, post_id: i64) -> StoreResult<Vec<UserPost>> {
        self.fetch_all(
            "SELECT post_id, user_id, sort_order
             FROM user_posts
             WHERE post_id = ?1
             ORDER BY sort_order ASC, user_id ASC;",
            [post_id],
            parse_user_post_row,
        )
    }

    pub fn list_user_posts_by_user(&self, user_id: i64) -> StoreResult<Vec<UserPost>> {
        self.fetch_all(
            "SELECT post_id, user_id, sort_order
             FROM user_posts
             WHERE user_id = ?1
             ORDER BY post_id ASC;",
            [user_id],
            parse_user_post_row,
        )
    }

    pub fn delete_user_posts_by_post(&self, post_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM user_posts WHERE post_id = ?1;", [post_id], "user_posts")
    }

    pub fn delete_user_posts_by_user(&self, user_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM user_posts WHERE user_id = ?1;", [user_id], "user_posts")
    }

    /// Hands every authorship link of `from_user_id` to `to_user_id`.
    ///
    /// Where both users already author the same post the surviving row keeps
    /// the lower of the two orders, so a transferred primary author stays
    /// primary. Returns the number of links that changed hands.
    pub fn transfer_user_posts(&self, from_user_id: i64, to_user_id: i64) -> StoreResult<usize> {
        self.execute(
            "UPDATE user_posts
             SET sort_order = MIN(
                 sort_order,
                 (SELECT departing.sort_order
                  FROM user_posts AS departing
                  WHERE departing.post_id = user_posts.post_id
                    AND departing.user_id = ?1)
             )
             WHERE user_id = ?2
               AND post_id IN (SELECT post_id FROM user_posts WHERE user_id = ?1);",
            params![from_user_id, to_user_id],
            "user_posts",
        )?;
        self.execute(
            "DELETE FROM user_posts
             WHERE user_id = ?1
               AND post_id IN (SELECT post_id FROM user_posts WHERE user_id = ?2);",
            params![from_user_id, to_user_id],
            "user_posts",
        )?;
        self.execute(
            "UPDATE user_posts SET user_id = ?2 WHERE user_id = ?1;",
            params![from_user_id, to_user_id],
            "user_posts",
        )
    }
}

fn parse_user_post_row(row: &Row<'_>) -> StoreResult<UserPost> {
    Ok(UserPost {
        post_id: row.get("post_id")?,
        user_id: row.get("user_id")?,
        sort_order: row.get("sort_order")?,
    })
}
