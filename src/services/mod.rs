//! Business logic services

pub mod availability;
pub mod catalog;
pub mod enrichment;
pub mod rentals;
pub mod reports;
pub mod users;
pub mod wishlist;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{audit::AuditLog, config::EnrichmentConfig, error::AppResult, repository::Repository};

/// Serializes every write to a book's availability and rental state.
///
/// Held across the whole check-then-write transaction and the side effects
/// that follow it, so notifications for one book come out in commit order.
pub type CirculationLock = Arc<Mutex<()>>;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    pub wishlist: wishlist::WishlistService,
    pub availability: availability::AvailabilityService,
    pub rentals: rentals::RentalsService,
    pub reports: reports::ReportsService,
    pub enrichment: enrichment::EnrichmentService,
}

impl Services {
    /// Create all services with the given repository and audit sink
    pub fn new(
        repository: Repository,
        audit: Arc<dyn AuditLog>,
        enrichment_config: EnrichmentConfig,
    ) -> AppResult<Self> {
        let lock: CirculationLock = Arc::new(Mutex::new(()));
        let availability =
            availability::AvailabilityService::new(repository.clone(), audit.clone(), lock.clone());

        Ok(Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            wishlist: wishlist::WishlistService::new(repository.clone()),
            rentals: rentals::RentalsService::new(
                repository.clone(),
                availability.clone(),
                audit.clone(),
                lock,
            ),
            availability,
            reports: reports::ReportsService::new(repository.clone(), audit),
            enrichment: enrichment::EnrichmentService::new(repository, enrichment_config)?,
        })
    }
}

/// Counts reported by the bulk import commands
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}
