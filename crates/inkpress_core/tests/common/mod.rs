#![allow(dead_code)]

use inkpress_core::model::{Image, Media, Session, Taxonomy, User};
use inkpress_core::query::{
    CreateImageParams, CreateMediaParams, CreatePostParams, CreateSessionParams,
    CreateTaxonomyParams, CreateUserParams,
};
use inkpress_core::Queries;
use rusqlite::Connection;
use uuid::Uuid;

pub fn user(q: &Queries<'_>, username: &str) -> User {
    q.create_user(&CreateUserParams {
        username: username.to_string(),
        full_name: format!("{username} full"),
        email: format!("{username}@example.com"),
        hashed_password: "hash".to_string(),
        role: "user".to_string(),
    })
    .unwrap()
}

pub fn post_params(owner: &User, url: &str) -> CreatePostParams {
    CreatePostParams {
        title: format!("Title {url}"),
        content: "body".to_string(),
        description: "summary".to_string(),
        user_id: owner.id,
        username: owner.username.clone(),
        url: url.to_string(),
    }
}

pub fn media_params(owner: &User, name: &str) -> CreateMediaParams {
    CreateMediaParams {
        name: name.to_string(),
        media_path: format!("/uploads/{name}"),
        user_id: owner.id,
        mime_type: Some("image/png".to_string()),
        width: Some(640),
        height: Some(480),
        ..CreateMediaParams::default()
    }
}

pub fn media(q: &Queries<'_>, owner: &User, name: &str) -> Media {
    q.create_media(&media_params(owner, name)).unwrap()
}

pub fn image_params(owner: &User, name: &str) -> CreateImageParams {
    CreateImageParams {
        name: name.to_string(),
        image_path: format!("/images/{name}"),
        user_id: owner.id,
        ..CreateImageParams::default()
    }
}

pub fn image(q: &Queries<'_>, owner: &User, name: &str) -> Image {
    q.create_image(&image_params(owner, name)).unwrap()
}

pub fn taxonomy(q: &Queries<'_>, name: &str) -> Taxonomy {
    q.create_taxonomy(&CreateTaxonomyParams {
        name: name.to_string(),
        description: String::new(),
    })
    .unwrap()
}

pub fn session(q: &Queries<'_>, owner: &User) -> Session {
    q.create_session(&CreateSessionParams {
        id: Uuid::new_v4(),
        user_id: owner.id,
        username: owner.username.clone(),
        refresh_token: "refresh".to_string(),
        user_agent: "tests".to_string(),
        client_ip: "127.0.0.1".to_string(),
        is_blocked: false,
        expires_at: i64::MAX,
    })
    .unwrap()
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
