//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, CatalogueService, FavouritesService, TokenIssuer};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub catalogue: Arc<dyn CatalogueService>,
    pub favourites: Arc<dyn FavouritesService>,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl HttpState {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        catalogue: Arc<dyn CatalogueService>,
        favourites: Arc<dyn FavouritesService>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            catalogue,
            favourites,
            tokens,
        }
    }
}
