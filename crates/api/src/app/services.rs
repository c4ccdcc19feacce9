//! Store selection and the shared application services handed to handlers.

use std::sync::Arc;

use shopfront_auth::AdminDirectory;
use shopfront_infra::reporting::{self, AnalyticsSummary, OrderReport};
use shopfront_infra::store::{CatalogStore, InMemoryStore, OrderStore, StoreBackend, StoreError};
use shopfront_infra::OrderingService;

#[derive(Clone)]
pub struct AppServices {
    store: StoreBackend,
    ordering: OrderingService<StoreBackend>,
    admins: AdminDirectory,
}

impl AppServices {
    pub fn new(store: StoreBackend, admins: AdminDirectory) -> Self {
        Self {
            ordering: OrderingService::new(store.clone()),
            store,
            admins,
        }
    }

    pub fn store(&self) -> &StoreBackend {
        &self.store
    }

    pub fn ordering(&self) -> &OrderingService<StoreBackend> {
        &self.ordering
    }

    pub fn admins(&self) -> &AdminDirectory {
        &self.admins
    }

    /// Dashboard order list: every order, newest first, enriched with the
    /// variant's pricing.
    pub async fn orders_report(&self) -> Result<Vec<OrderReport>, StoreError> {
        let orders = self.store.list_orders().await?;
        let variants = self.store.list_all_variants().await?;
        Ok(reporting::enrich_orders(orders, &variants))
    }

    /// Dashboard analytics summary over the three collections.
    pub async fn analytics(&self) -> Result<AnalyticsSummary, StoreError> {
        let products = self.store.list_products().await?;
        let variants = self.store.list_all_variants().await?;
        let orders = self.store.list_orders().await?;
        Ok(reporting::summarize(&products, &variants, &orders))
    }
}

/// Pick the storage backend from the environment: in-memory unless
/// `USE_PERSISTENT_STORES=true` and the `postgres` feature is on.
pub async fn build_services() -> AppServices {
    let admins = AdminDirectory::from_env();

    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        #[cfg(feature = "postgres")]
        {
            return AppServices::new(build_postgres_backend().await, admins);
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
        }
    }

    AppServices::new(StoreBackend::InMemory(Arc::new(InMemoryStore::new())), admins)
}

#[cfg(feature = "postgres")]
async fn build_postgres_backend() -> StoreBackend {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to Postgres");

    let store = shopfront_infra::PostgresStore::new(pool);
    store
        .ensure_schema()
        .await
        .expect("Failed to ensure Postgres schema");

    StoreBackend::Postgres(Arc::new(store))
}
