use super::posts::parse_post_row;
use super::{like_pattern, Page, Queries};
use crate::error::{Conflict, RowRef, StoreResult};
use crate::model::{Post, PostTaxonomy, Taxonomy};
use rusqlite::{params, Row};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaxonomyParams {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaxonomyParams {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl Queries<'_> {
    pub fn create_taxonomy(&self, arg: &CreateTaxonomyParams) -> StoreResult<Taxonomy> {
        self.insert_returning(
            "INSERT INTO taxonomies (name, description)
             VALUES (?1, ?2)
             RETURNING id, name, description;",
            params![arg.name, arg.description],
            "taxonomies",
            parse_taxonomy_row,
        )
        .map_err(|err| err.or_conflict(Conflict::TaxonomyName(arg.name.clone())))
    }

    pub fn get_taxonomy(&self, id: i64) -> StoreResult<Taxonomy> {
        self.fetch_one(
            "SELECT id, name, description FROM taxonomies WHERE id = ?1;",
            [id],
            RowRef::Taxonomy(id),
            parse_taxonomy_row,
        )
    }

    /// Exact, case-sensitive name lookup.
    pub fn get_taxonomy_by_name(&self, name: &str) -> StoreResult<Taxonomy> {
        self.fetch_one(
            "SELECT id, name, description FROM taxonomies WHERE name = ?1;",
            [name],
            RowRef::TaxonomyName(name.to_string()),
            parse_taxonomy_row,
        )
    }

    pub fn list_taxonomies(&self, page: Page) -> StoreResult<Vec<Taxonomy>> {
        self.fetch_all(
            "SELECT id, name, description
             FROM taxonomies
             ORDER BY name ASC, id ASC
             LIMIT ?1 OFFSET ?2;",
            params![page.limit, page.offset],
            parse_taxonomy_row,
        )
    }

    pub fn count_taxonomies(&self) -> StoreResult<i64> {
        self.fetch_i64("SELECT COUNT(*) FROM taxonomies;", [])
    }

    pub fn search_taxonomies_by_name(&self, term: &str, page: Page) -> StoreResult<Vec<Taxonomy>> {
        self.fetch_all(
            "SELECT id, name, description
             FROM taxonomies
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY name ASC, id ASC
             LIMIT ?2 OFFSET ?3;",
            params![like_pattern(term), page.limit, page.offset],
            parse_taxonomy_row,
        )
    }

    pub fn update_taxonomy(&self, arg: &UpdateTaxonomyParams) -> StoreResult<Taxonomy> {
        self.update_returning(
            "UPDATE taxonomies
             SET name = ?2, description = ?3
             WHERE id = ?1
             RETURNING id, name, description;",
            params![arg.id, arg.name, arg.description],
            "taxonomies",
            RowRef::Taxonomy(arg.id),
            parse_taxonomy_row,
        )
        .map_err(|err| err.or_conflict(Conflict::TaxonomyName(arg.name.clone())))
    }

    pub fn delete_taxonomy(&self, id: i64) -> StoreResult<()> {
        self.execute("DELETE FROM taxonomies WHERE id = ?1;", [id], "taxonomies")?;
        Ok(())
    }

    /// Taxonomies linked to a post, by name.
    pub fn list_taxonomies_for_post(&self, post_id: i64) -> StoreResult<Vec<Taxonomy>> {
        self.fetch_all(
            "SELECT t.id, t.name, t.description
             FROM taxonomies AS t
             INNER JOIN posts_taxonomies AS pt ON pt.taxonomy_id = t.id
             WHERE pt.post_id = ?1
             ORDER BY t.name ASC, t.id ASC;",
            [post_id],
            parse_taxonomy_row,
        )
    }

    pub fn list_posts_for_taxonomy(&self, taxonomy_id: i64, page: Page) -> StoreResult<Vec<Post>> {
        self.fetch_all(
            "SELECT p.id, p.title, p.content, p.description, p.user_id, p.username, p.url,
                    p.created_at, p.changed_at
             FROM posts AS p
             INNER JOIN posts_taxonomies AS pt ON pt.post_id = p.id
             WHERE pt.taxonomy_id = ?1
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT ?2 OFFSET ?3;",
            params![taxonomy_id, page.limit, page.offset],
            parse_post_row,
        )
    }

    pub fn count_posts_for_taxonomy(&self, taxonomy_id: i64) -> StoreResult<i64> {
        self.fetch_i64(
            "SELECT COUNT(*) FROM posts_taxonomies WHERE taxonomy_id = ?1;",
            [taxonomy_id],
        )
    }

    pub fn create_post_taxonomy(&self, post_id: i64, taxonomy_id: i64) -> StoreResult<PostTaxonomy> {
        self.insert_returning(
            "INSERT INTO posts_taxonomies (post_id, taxonomy_id)
             VALUES (?1, ?2)
             RETURNING post_id, taxonomy_id;",
            params![post_id, taxonomy_id],
            "posts_taxonomies",
            parse_post_taxonomy_row,
        )
    }

    pub fn get_post_taxonomy(&self, post_id: i64, taxonomy_id: i64) -> StoreResult<PostTaxonomy> {
        self.fetch_one(
            "SELECT post_id, taxonomy_id
             FROM posts_taxonomies
             WHERE post_id = ?1 AND taxonomy_id = ?2;",
            params![post_id, taxonomy_id],
            RowRef::PostTaxonomy {
                post_id,
                taxonomy_id,
            },
            parse_post_taxonomy_row,
        )
    }

    pub fn list_post_taxonomies_by_post(&self, post_id: i64) -> StoreResult<Vec<PostTaxonomy>> {
        self.fetch_all(
            "SELECT post_id, taxonomy_id
             FROM posts_taxonomies
             WHERE post_id = ?1
             ORDER BY taxonomy_id ASC;",
            [post_id],
            parse_post_taxonomy_row,
        )
    }

    pub fn delete_post_taxonomy(&self, post_id: i64, taxonomy_id: i64) -> StoreResult<()> {
        self.execute(
            "DELETE FROM posts_taxonomies WHERE post_id = ?1 AND taxonomy_id = ?2;",
            params![post_id, taxonomy_id],
            "posts_taxonomies",
        )?;
        Ok(())
    }

    pub fn delete_post_taxonomies_by_post(&self, post_id: i64) -> StoreResult<usize> {
        self.execute(
            "DELETE FROM posts_taxonomies WHERE post_id = ?1;",
            [post_id],
            "posts_taxonomies",
        )
    }

    pub fn delete_post_taxonomies_by_taxonomy(&self, taxonomy_id: i64) -> StoreResult<usize> {
        self.execute(
            "DELETE FROM posts_taxonomies WHERE taxonomy_id = ?1;",
            [taxonomy_id],
            "posts_taxonomies",
        )
    }
}

fn parse_taxonomy_row(row: &Row<'_>) -> StoreResult<Taxonomy> {
    Ok(Taxonomy {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

fn parse_post_taxonomy_row(row: &Row<'_>) -> StoreResult<PostTaxonomy> {
    Ok(PostTaxonomy {
        post_id: row.get("post_id")?,
        taxonomy_id: row.get("taxonomy_id")?,
    })
}
