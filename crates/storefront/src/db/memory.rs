//! In-memory repository.
//!
//! An arena of id-keyed maps behind a single `tokio::sync::RwLock`. Every
//! mutation takes the write lock for its whole check-then-insert, so the
//! slug, sku, email and (store, product) uniqueness rules hold the same way
//! the Postgres constraints enforce them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use shopwright_core::{
    Email, NewProduct, NewStore, NewStoreProduct, Product, ProductId, SortOrder, Store, StoreId,
    StoreProduct, StoreProductEntry, StoreProductId, UserId, UserRole,
};

use super::{
    CatalogRepository, RepositoryError, StoreProductRepository, StoreRepository, UserRepository,
    slug_candidates,
};
use crate::models::{CatalogQuery, CatalogSort, NewUser, User};

#[derive(Debug, Default)]
struct Arena {
    users: BTreeMap<UserId, (User, String)>,
    products: BTreeMap<ProductId, Product>,
    stores: BTreeMap<StoreId, Store>,
    links: BTreeMap<StoreProductId, StoreProduct>,
    last_user: i32,
    last_product: i32,
    last_store: i32,
    last_link: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl Arena {
    fn entry(&self, link: &StoreProduct) -> Option<StoreProductEntry> {
        let product = self.products.get(&link.product_id)?;
        Some(StoreProductEntry::resolve(link.clone(), product.clone()))
    }
}

/// Process-local repository. Cheap to create, empty on start.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    arena: RwLock<Arena>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(a_at: &T, a_id: i32, b_at: &T, b_id: i32) -> Ordering
where
    T: Ord,
{
    b_at.cmp(a_at).then_with(|| b_id.cmp(&a_id))
}

fn compare_products(a: &Product, b: &Product, sort: CatalogSort) -> Ordering {
    match sort {
        CatalogSort::Name => a.name.cmp(&b.name),
        CatalogSort::BasePrice => a.base_price.amount().cmp(&b.base_price.amount()),
        CatalogSort::DemandScore => a.demand_score.total_cmp(&b.demand_score),
        CatalogSort::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn matches_query(product: &Product, query: &CatalogQuery) -> bool {
    if !product.is_active {
        return false;
    }
    if let Some(category) = query.category_filter()
        && product.category != category
    {
        return false;
    }
    if let Some(term) = query.search_term() {
        let term = term.to_lowercase();
        let in_name = product.name.to_lowercase().contains(&term);
        let in_description = product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&term));
        if !in_name && !in_description {
            return false;
        }
    }
    if let Some(min) = query.min_price
        && product.base_price.amount() < min.amount()
    {
        return false;
    }
    if let Some(max) = query.max_price
        && product.base_price.amount() > max.amount()
    {
        return false;
    }
    match query.in_stock {
        Some(true) => product.in_stock(),
        Some(false) => !product.in_stock(),
        None => true,
    }
}

fn take(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut arena = self.arena.write().await;
        if arena.users.values().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        let now = Utc::now();
        let id = UserId::new(next_id(&mut arena.last_user));
        let created = User {
            id,
            email: user.email,
            full_name: user.full_name,
            role: UserRole::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        arena.users.insert(id, (created.clone(), user.password_hash));
        Ok(created)
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(arena.users.get(&id).map(|(u, _)| u.clone()))
    }

    async fn user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(arena
            .users
            .values()
            .find(|(u, _)| &u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(arena.users.values().find(|(u, _)| &u.email == email).cloned())
    }

    async fn set_user_role(&self, id: UserId, role: UserRole) -> Result<User, RepositoryError> {
        let mut arena = self.arena.write().await;
        let (user, _) = arena.users.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn count_users(&self) -> Result<i64, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(i64::try_from(arena.users.len()).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl CatalogRepository for MemoryRepository {
    async fn browse_products(&self, query: &CatalogQuery) -> Result<Vec<Product>, RepositoryError> {
        let arena = self.arena.read().await;
        let mut products: Vec<Product> = arena
            .products
            .values()
            .filter(|p| matches_query(p, query))
            .cloned()
            .collect();

        products.sort_by(|a, b| {
            let ord = compare_products(a, b, query.sort_by);
            let ord = match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            ord.then_with(|| a.id.cmp(&b.id))
        });

        Ok(products
            .into_iter()
            .skip(take(query.offset()))
            .take(take(query.limit()))
            .collect())
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(arena.products.get(&id).cloned())
    }

    async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let arena = self.arena.read().await;
        let set: BTreeSet<&str> = arena
            .products
            .values()
            .filter(|p| p.is_active)
            .map(|p| p.category.as_str())
            .collect();
        Ok(set.into_iter().map(str::to_owned).collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut arena = self.arena.write().await;
        if arena.products.values().any(|p| p.sku == product.sku) {
            return Err(RepositoryError::Conflict("sku already exists".to_owned()));
        }
        let now = Utc::now();
        let id = ProductId::new(next_id(&mut arena.last_product));
        let created = Product {
            id,
            sku: product.sku,
            name: product.name,
            description: product.description,
            category: product.category,
            subcategory: product.subcategory,
            cost_price: product.cost_price,
            base_price: product.base_price,
            suggested_retail: product.suggested_retail,
            stock_quantity: product.stock_quantity,
            low_stock_threshold: product.low_stock_threshold,
            image_url: product.image_url,
            images: product.images,
            tags: product.tags,
            demand_score: product.demand_score,
            margin_potential: product.margin_potential,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        arena.products.insert(id, created.clone());
        Ok(created)
    }

    async fn save_product(&self, product: &Product) -> Result<Product, RepositoryError> {
        let mut arena = self.arena.write().await;
        let stored = arena
            .products
            .get_mut(&product.id)
            .ok_or(RepositoryError::NotFound)?;
        let (sku, created_at) = (stored.sku.clone(), stored.created_at);
        *stored = Product {
            sku,
            created_at,
            updated_at: Utc::now(),
            ..product.clone()
        };
        Ok(stored.clone())
    }

    async fn list_products(&self, include_inactive: bool) -> Result<Vec<Product>, RepositoryError> {
        let arena = self.arena.read().await;
        let mut products: Vec<Product> = arena
            .products
            .values()
            .filter(|p| include_inactive || p.is_active)
            .cloned()
            .collect();
        products.sort_by(|a, b| newest_first(&a.created_at, a.id.as_i32(), &b.created_at, b.id.as_i32()));
        Ok(products)
    }

    async fn top_products_by_demand(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let arena = self.arena.read().await;
        let mut products: Vec<Product> =
            arena.products.values().filter(|p| p.is_active).cloned().collect();
        products.sort_by(|a, b| {
            b.demand_score
                .total_cmp(&a.demand_score)
                .then_with(|| a.id.cmp(&b.id))
        });
        products.truncate(take(limit));
        Ok(products)
    }

    async fn low_stock_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let arena = self.arena.read().await;
        let mut products: Vec<Product> = arena
            .products
            .values()
            .filter(|p| p.is_active && p.is_low_stock())
            .cloned()
            .collect();
        products.sort_by(|a, b| {
            a.stock_quantity
                .cmp(&b.stock_quantity)
                .then_with(|| a.id.cmp(&b.id))
        });
        products.truncate(take(limit));
        Ok(products)
    }

    async fn count_active_products(&self) -> Result<i64, RepositoryError> {
        let arena = self.arena.read().await;
        let count = arena.products.values().filter(|p| p.is_active).count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl StoreRepository for MemoryRepository {
    async fn create_store(&self, owner: UserId, store: &NewStore) -> Result<Store, RepositoryError> {
        let mut arena = self.arena.write().await;
        let slug = slug_candidates(store)
            .find(|candidate| !arena.stores.values().any(|s| &s.slug == candidate))
            .ok_or_else(|| RepositoryError::Conflict("no free slug for this store name".to_owned()))?;

        let now = Utc::now();
        let id = StoreId::new(next_id(&mut arena.last_store));
        let created = Store {
            id,
            owner_id: owner,
            name: store.name.clone(),
            slug,
            description: store.description.clone(),
            template: store.template_or_default(),
            primary_color: store.color_or_default(),
            logo_url: None,
            banner_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        arena.stores.insert(id, created.clone());
        Ok(created)
    }

    async fn store_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(arena.stores.get(&id).cloned())
    }

    async fn store_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(arena.stores.values().find(|s| s.slug.as_str() == slug).cloned())
    }

    async fn stores_by_owner(&self, owner: UserId) -> Result<Vec<Store>, RepositoryError> {
        let arena = self.arena.read().await;
        let mut stores: Vec<Store> = arena
            .stores
            .values()
            .filter(|s| s.owner_id == owner)
            .cloned()
            .collect();
        stores.sort_by(|a, b| newest_first(&a.created_at, a.id.as_i32(), &b.created_at, b.id.as_i32()));
        Ok(stores)
    }

    async fn save_store(&self, store: &Store) -> Result<Store, RepositoryError> {
        let mut arena = self.arena.write().await;
        let stored = arena.stores.get_mut(&store.id).ok_or(RepositoryError::NotFound)?;
        stored.name.clone_from(&store.name);
        stored.description.clone_from(&store.description);
        stored.template.clone_from(&store.template);
        stored.primary_color.clone_from(&store.primary_color);
        stored.logo_url.clone_from(&store.logo_url);
        stored.banner_url.clone_from(&store.banner_url);
        stored.is_active = store.is_active;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_store(&self, id: StoreId) -> Result<bool, RepositoryError> {
        let mut arena = self.arena.write().await;
        if arena.stores.remove(&id).is_none() {
            return Ok(false);
        }
        arena.links.retain(|_, link| link.store_id != id);
        Ok(true)
    }

    async fn count_stores(&self) -> Result<i64, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(i64::try_from(arena.stores.len()).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl StoreProductRepository for MemoryRepository {
    async fn add_store_product(
        &self,
        store: StoreId,
        input: &NewStoreProduct,
    ) -> Result<StoreProductEntry, RepositoryError> {
        let mut arena = self.arena.write().await;
        if !arena.stores.contains_key(&store) || !arena.products.contains_key(&input.product_id) {
            return Err(RepositoryError::NotFound);
        }
        if arena
            .links
            .values()
            .any(|l| l.store_id == store && l.product_id == input.product_id)
        {
            return Err(RepositoryError::Conflict("product already in store".to_owned()));
        }

        let id = StoreProductId::new(next_id(&mut arena.last_link));
        let link = StoreProduct {
            id,
            store_id: store,
            product_id: input.product_id,
            custom_name: input.custom_name.clone(),
            custom_price: input.custom_price,
            is_featured: input.is_featured,
            is_active: true,
            created_at: Utc::now(),
        };
        let entry = arena.entry(&link).ok_or(RepositoryError::NotFound)?;
        arena.links.insert(id, link);
        Ok(entry)
    }

    async fn store_product(
        &self,
        store: StoreId,
        id: StoreProductId,
    ) -> Result<Option<StoreProductEntry>, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(arena
            .links
            .get(&id)
            .filter(|l| l.store_id == store)
            .and_then(|l| arena.entry(l)))
    }

    async fn store_product_entries(
        &self,
        store: StoreId,
    ) -> Result<Vec<StoreProductEntry>, RepositoryError> {
        let arena = self.arena.read().await;
        let mut entries: Vec<StoreProductEntry> = arena
            .links
            .values()
            .filter(|l| l.store_id == store)
            .filter_map(|l| arena.entry(l))
            .collect();
        StoreProductEntry::sort_for_listing(&mut entries);
        Ok(entries)
    }

    async fn save_store_product(
        &self,
        link: &StoreProduct,
    ) -> Result<StoreProductEntry, RepositoryError> {
        let mut arena = self.arena.write().await;
        let stored = arena
            .links
            .get_mut(&link.id)
            .filter(|l| l.store_id == link.store_id)
            .ok_or(RepositoryError::NotFound)?;
        stored.custom_name.clone_from(&link.custom_name);
        stored.custom_price = link.custom_price;
        stored.is_featured = link.is_featured;
        stored.is_active = link.is_active;
        let saved = stored.clone();
        arena.entry(&saved).ok_or(RepositoryError::NotFound)
    }

    async fn remove_store_product(
        &self,
        store: StoreId,
        id: StoreProductId,
    ) -> Result<bool, RepositoryError> {
        let mut arena = self.arena.write().await;
        let owned = arena.links.get(&id).is_some_and(|l| l.store_id == store);
        if owned {
            arena.links.remove(&id);
        }
        Ok(owned)
    }

    async fn count_store_products(&self) -> Result<i64, RepositoryError> {
        let arena = self.arena.read().await;
        Ok(i64::try_from(arena.links.len()).unwrap_or(i64::MAX))
    }
}
