//! Taxonomy use-case service.
//!
//! # Invariants
//! - Names are trimmed and must not be blank.
//! - A taken name yields `Conflict::TaxonomyName` whether it is caught by
//!   the lookup or by the unique index.

use crate::context::OpContext;
use crate::error::{Conflict, StoreError, StoreResult};
use crate::model::Taxonomy;
use crate::query::CreateTaxonomyParams;
use crate::store::{Store, TaxonomyLink};

pub struct TaxonomyService<S: Store> {
    store: S,
}

impl<S: Store> TaxonomyService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_taxonomy(
        &self,
        ctx: &OpContext,
        name: &str,
        description: &str,
    ) -> StoreResult<Taxonomy> {
        let arg = taxonomy_params(name, description)?;
        let q = self.store.queries(ctx);
        match q.get_taxonomy_by_name(&arg.name) {
            Ok(_) => return Err(StoreError::Conflict(Conflict::TaxonomyName(arg.name))),
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }
        q.create_taxonomy(&arg)
    }

    /// Links `post_id` to the taxonomy called `name`, creating it if needed.
    pub fn link_to_post(
        &self,
        ctx: &OpContext,
        post_id: i64,
        name: &str,
        description: &str,
    ) -> StoreResult<TaxonomyLink> {
        let arg = taxonomy_params(name, description)?;
        self.store.create_taxonomy_and_link_tx(ctx, &arg, post_id)
    }

    pub fn delete_taxonomy(&self, ctx: &OpContext, taxonomy_id: i64) -> StoreResult<()> {
        self.store.queries(ctx).get_taxonomy(taxonomy_id)?;
        self.store.delete_taxonomy_tx(ctx, taxonomy_id)
    }
}

fn taxonomy_params(name: &str, description: &str) -> StoreResult<CreateTaxonomyParams> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidInput(
            "taxonomy name must not be blank".to_string(),
        ));
    }
    Ok(CreateTaxonomyParams {
        name: name.to_string(),
        description: description.trim().to_string(),
    })
}
