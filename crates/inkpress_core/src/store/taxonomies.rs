//! Taxonomy steps: create-or-reuse linking and deletion.

use crate::error::StoreResult;
use crate::model::{PostTaxonomy, Taxonomy};
use crate::query::{CreateTaxonomyParams, Queries};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyLink {
    pub taxonomy: Taxonomy,
    pub link: PostTaxonomy,
    /// False when a taxonomy with the same name already existed.
    pub taxonomy_created: bool,
    /// False when the post was already linked to the taxonomy.
    pub link_created: bool,
}

/// Looks up by name before inserting and checks for an existing link before
/// linking, so repeated calls converge on one taxonomy and one link.
pub(super) fn create_taxonomy_and_link(
    q: &Queries<'_>,
    arg: &CreateTaxonomyParams,
    post_id: i64,
) -> StoreResult<TaxonomyLink> {
    let (taxonomy, taxonomy_created) = match q.get_taxonomy_by_name(&arg.name) {
        Ok(existing) => (existing, false),
        Err(err) if err.is_not_found() => (q.create_taxonomy(arg)?, true),
        Err(err) => return Err(err),
    };

    q.get_post(post_id)?;

    let (link, link_created) = match q.get_post_taxonomy(post_id, taxonomy.id) {
        Ok(existing) => (existing, false),
        Err(err) if err.is_not_found() => (q.create_post_taxonomy(post_id, taxonomy.id)?, true),
        Err(err) => return Err(err),
    };

    Ok(TaxonomyLink {
        taxonomy,
        link,
        taxonomy_created,
        link_created,
    })
}

pub(super) fn delete_taxonomy(q: &Queries<'_>, taxonomy_id: i64) -> StoreResult<()> {
    q.delete_post_taxonomies_by_taxonomy(taxonomy_id)?;
    q.delete_taxonomy(taxonomy_id)
}
