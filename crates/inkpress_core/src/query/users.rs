use super::{like_pattern, Page, Queries};
use crate::error::{RowRef, StoreResult};
use crate::model::User;
use rusqlite::{params, Row};

const USER_COLUMNS: &str = "id, username, full_name, email, hashed_password, role, password_changed_at, created_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserParams {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: String,
}

/// Full replacement record for one user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserParams {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: String,
    pub password_changed_at: i64,
}

impl From<&User> for UpdateUserParams {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            hashed_password: user.hashed_password.clone(),
            role: user.role.clone(),
            password_changed_at: user.password_changed_at,
        }
    }
}

impl Queries<'_> {
    pub fn create_user(&self, arg: &CreateUserParams) -> StoreResult<User> {
        self.insert_returning(
            &format!(
                "INSERT INTO users (username, full_name, email, hashed_password, role)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {USER_COLUMNS};"
            ),
            params![
                arg.username,
                arg.full_name,
                arg.email,
                arg.hashed_password,
                arg.role
            ],
            "users",
            parse_user_row,
        )
    }

    pub fn get_user(&self, id: i64) -> StoreResult<User> {
        self.fetch_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1;"),
            [id],
            RowRef::User(id),
            parse_user_row,
        )
    }

    pub fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        self.fetch_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1;"),
            [username],
            RowRef::Username(username.to_string()),
            parse_user_row,
        )
    }

    pub fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        self.fetch_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1;"),
            [email],
            RowRef::Email(email.to_string()),
            parse_user_row,
        )
    }

    pub fn list_users(&self, page: Page) -> StoreResult<Vec<User>> {
        self.fetch_all(
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC LIMIT ?1 OFFSET ?2;"),
            params![page.limit, page.offset],
            parse_user_row,
        )
    }

    pub fn count_users(&self) -> StoreResult<i64> {
        self.fetch_i64("SELECT COUNT(*) FROM users;", [])
    }

    /// Case-insensitive substring match on username or full name.
    pub fn search_users_by_name(&self, term: &str, page: Page) -> StoreResult<Vec<User>> {
        self.fetch_all(
            &format!(
                "SELECT {USER_COLUMNS}
                 FROM users
                 WHERE username LIKE ?1 ESCAPE '\\' OR full_name LIKE ?1 ESCAPE '\\'
                 ORDER BY username ASC
                 LIMIT ?2 OFFSET ?3;"
            ),
            params![like_pattern(term), page.limit, page.offset],
            parse_user_row,
        )
    }

    pub fn update_user(&self, arg: &UpdateUserParams) -> StoreResult<User> {
        self.update_returning(
            &format!(
                "UPDATE users
                 SET username = ?2,
                     full_name = ?3,
                     email = ?4,
                     hashed_password = ?5,
                     role = ?6,
                     password_changed_at = ?7
                 WHERE id = ?1
                 RETURNING {USER_COLUMNS};"
            ),
            params![
                arg.id,
                arg.username,
                arg.full_name,
                arg.email,
                arg.hashed_password,
                arg.role,
                arg.password_changed_at
            ],
            "users",
            RowRef::User(arg.id),
            parse_user_row,
        )
    }

    pub fn delete_user(&self, id: i64) -> StoreResult<()> {
        self.execute("DELETE FROM users WHERE id = ?1;", [id], "users")?;
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> StoreResult<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        hashed_password: row.get("hashed_password")?,
        role: row.get("role")?,
        password_changed_at: row.get("password_changed_at")?,
        created_at: row.get("created_at")?,
    })
}
