//! Store authoring: the owner-only operations behind the editor and the
//! `/api/stores` endpoints.
//!
//! Every operation checks ownership first. A store that exists but belongs
//! to someone else is reported as [`AuthoringError::NotFound`], the same as
//! an unknown id.

use std::collections::HashSet;

use thiserror::Error;
use tracing::instrument;

use shopwright_core::{
    NewStore, NewStoreProduct, ProductError, Store, StoreChanges, StoreError, StoreId,
    StoreProductChanges, StoreProductEntry, StoreProductId, StoreTemplate, UserId,
};

use crate::db::{Repository, RepositoryError};
use crate::models::CurrentUser;
use crate::services::assistant::rules::{self, GAP_CANDIDATES, RECOMMEND_CANDIDATES};
use crate::services::assistant::{
    AssistantError, AssistantService, ChatContext, ChatReply, HistoryTurn, Recommendations,
    StoreContext, StoreInsights,
};

/// Errors from authoring operations.
#[derive(Debug, Error)]
pub enum AuthoringError {
    /// Unknown id, or a store the caller does not own. Carries the kind of
    /// record that was missing.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    InvalidStore(#[from] StoreError),

    #[error(transparent)]
    InvalidProduct(#[from] ProductError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("assistant error: {0}")]
    Assistant(#[from] AssistantError),
}

impl From<RepositoryError> for AuthoringError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound("Record"),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => Self::Repository(other),
        }
    }
}

/// Owner-scoped store and store-product operations.
pub struct AuthoringService<'a> {
    repo: &'a dyn Repository,
    assistant: &'a AssistantService,
}

impl<'a> AuthoringService<'a> {
    #[must_use]
    pub const fn new(repo: &'a dyn Repository, assistant: &'a AssistantService) -> Self {
        Self { repo, assistant }
    }

    async fn owned_store(&self, owner: UserId, id: StoreId) -> Result<Store, AuthoringError> {
        self.repo
            .store_by_id(id)
            .await?
            .filter(|store| store.is_owned_by(owner))
            .ok_or(AuthoringError::NotFound("Store"))
    }

    /// Create a store. The slug comes from the name and is made unique.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::InvalidStore` for a bad name or color.
    #[instrument(skip(self, input), fields(owner = %owner))]
    pub async fn create_store(
        &self,
        owner: UserId,
        input: NewStore,
    ) -> Result<Store, AuthoringError> {
        let input = input.normalize()?;
        warn_unknown_template(input.template.as_deref());
        let store = self.repo.create_store(owner, &input).await?;
        tracing::info!(store_id = %store.id, slug = %store.slug, "store created");
        Ok(store)
    }

    /// The caller's stores, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Repository` if the lookup fails.
    pub async fn list_my_stores(&self, owner: UserId) -> Result<Vec<Store>, AuthoringError> {
        Ok(self.repo.stores_by_owner(owner).await?)
    }

    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` if the store is unknown or not owned.
    pub async fn load_store(&self, owner: UserId, id: StoreId) -> Result<Store, AuthoringError> {
        self.owned_store(owner, id).await
    }

    /// Apply a partial change and persist it.
    ///
    /// Template names outside the known set are stored as given; rendering
    /// falls back to the default template.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` or `AuthoringError::InvalidStore`.
    #[instrument(skip(self, changes), fields(owner = %owner, store_id = %id))]
    pub async fn update_store(
        &self,
        owner: UserId,
        id: StoreId,
        changes: &StoreChanges,
    ) -> Result<Store, AuthoringError> {
        let mut store = self.owned_store(owner, id).await?;
        changes.apply(&mut store)?;
        warn_unknown_template(changes.template.as_deref());
        Ok(self.repo.save_store(&store).await?)
    }

    /// Delete a store and its product links.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` if the store is unknown or not owned.
    #[instrument(skip(self), fields(owner = %owner, store_id = %id))]
    pub async fn delete_store(&self, owner: UserId, id: StoreId) -> Result<(), AuthoringError> {
        self.owned_store(owner, id).await?;
        if self.repo.delete_store(id).await? {
            tracing::info!("store deleted");
        }
        Ok(())
    }

    /// Products in the store, featured first, then newest first, each with
    /// its effective name and price.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` if the store is unknown or not owned.
    pub async fn list_store_products(
        &self,
        owner: UserId,
        store: StoreId,
    ) -> Result<Vec<StoreProductEntry>, AuthoringError> {
        self.owned_store(owner, store).await?;
        Ok(self.repo.store_product_entries(store).await?)
    }

    /// Link a catalog product into the store.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` if the store is not owned or the
    /// product is unknown or inactive, `AuthoringError::Conflict` if the
    /// product is already in the store.
    #[instrument(skip(self, input), fields(owner = %owner, store_id = %store, product_id = %input.product_id))]
    pub async fn import_product(
        &self,
        owner: UserId,
        store: StoreId,
        input: NewStoreProduct,
    ) -> Result<StoreProductEntry, AuthoringError> {
        self.owned_store(owner, store).await?;
        let product = self
            .repo
            .product_by_id(input.product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(AuthoringError::NotFound("Product"))?;

        let entry = self
            .repo
            .add_store_product(store, &input.normalize())
            .await?;
        tracing::info!(store_product_id = %entry.link.id, sku = %product.sku, "product imported");
        Ok(entry)
    }

    /// Partial update of a link's overrides and flags.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` if the store is not owned or the
    /// link is not in it.
    #[instrument(skip(self, changes), fields(owner = %owner, store_id = %store, store_product_id = %id))]
    pub async fn update_store_product(
        &self,
        owner: UserId,
        store: StoreId,
        id: StoreProductId,
        changes: &StoreProductChanges,
    ) -> Result<StoreProductEntry, AuthoringError> {
        self.owned_store(owner, store).await?;
        let mut link = self
            .repo
            .store_product(store, id)
            .await?
            .ok_or(AuthoringError::NotFound("Store product"))?
            .link;
        changes.apply(&mut link);
        Ok(self.repo.save_store_product(&link).await?)
    }

    /// Set or clear the featured flag.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_store_product`].
    pub async fn set_featured(
        &self,
        owner: UserId,
        store: StoreId,
        id: StoreProductId,
        featured: bool,
    ) -> Result<StoreProductEntry, AuthoringError> {
        self.update_store_product(owner, store, id, &StoreProductChanges::featured(featured))
            .await
    }

    /// Remove a link. Removing one that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` only if the store is unknown or not owned.
    #[instrument(skip(self), fields(owner = %owner, store_id = %store, store_product_id = %id))]
    pub async fn remove_product(
        &self,
        owner: UserId,
        store: StoreId,
        id: StoreProductId,
    ) -> Result<(), AuthoringError> {
        self.owned_store(owner, store).await?;
        if !self.repo.remove_store_product(store, id).await? {
            tracing::debug!("store product already removed");
        }
        Ok(())
    }

    /// Gap analysis against the highest-demand catalog products.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NotFound` if the store is unknown or not owned.
    pub async fn store_insights(
        &self,
        owner: UserId,
        store: StoreId,
    ) -> Result<StoreInsights, AuthoringError> {
        let store = self.owned_store(owner, store).await?;
        let entries = self.repo.store_product_entries(store.id).await?;
        let top = self.repo.top_products_by_demand(GAP_CANDIDATES).await?;
        Ok(rules::store_insights(&store, &entries, &top))
    }

    /// Recommend catalog products for a query. When `store` belongs to the
    /// caller, products it already links are left out; a store owned by
    /// someone else is ignored.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Repository` if the catalog cannot be read.
    #[instrument(skip(self, query), fields(owner = %owner))]
    pub async fn recommend(
        &self,
        owner: UserId,
        store: Option<StoreId>,
        query: &str,
    ) -> Result<Recommendations, AuthoringError> {
        let carried = match store {
            Some(id) => match self.owned_store(owner, id).await {
                Ok(store) => self
                    .repo
                    .store_product_entries(store.id)
                    .await?
                    .iter()
                    .map(|e| e.link.product_id)
                    .collect(),
                Err(AuthoringError::NotFound(_)) => HashSet::new(),
                Err(e) => return Err(e),
            },
            None => HashSet::new(),
        };
        let top = self.repo.top_products_by_demand(RECOMMEND_CANDIDATES).await?;
        Ok(rules::recommend_products(query, &carried, &top))
    }

    /// Ask the assistant. Store details are attached only when `store`
    /// belongs to the caller; otherwise the question is answered without them.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Validation` for a blank message and
    /// `AuthoringError::Assistant` when the remote call fails.
    #[instrument(skip(self, user, message, history), fields(user_id = %user.id))]
    pub async fn ask_assistant(
        &self,
        user: &CurrentUser,
        store: Option<StoreId>,
        message: &str,
        history: &[HistoryTurn],
    ) -> Result<ChatReply, AuthoringError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AuthoringError::Validation("message cannot be empty".to_string()));
        }

        let store_context = match store {
            Some(id) => match self.owned_store(user.id, id).await {
                Ok(store) => {
                    let product_count = self.repo.store_product_entries(store.id).await?.len();
                    Some(StoreContext {
                        name: store.name,
                        product_count,
                    })
                }
                Err(AuthoringError::NotFound(_)) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        let context = ChatContext {
            user_name: user.display_name.clone(),
            store: store_context,
        };
        Ok(self.assistant.chat(&context, message, history).await?)
    }
}

fn warn_unknown_template(template: Option<&str>) {
    if let Some(name) = template
        && name.trim().parse::<StoreTemplate>().is_err()
    {
        tracing::warn!(
            template = name,
            fallback = StoreTemplate::default().as_str(),
            "unknown template stored; storefront will render with the fallback"
        );
    }
}
