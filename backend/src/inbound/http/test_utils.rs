//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::ports::{
    MockAccountService, MockCatalogueService, MockFavouritesService, MockTokenIssuer, TokenIssuer,
};
use crate::domain::{AccountId, Role, SessionClaim, Username};

use super::state::HttpState;

/// Bearer token accepted by [`accepting_tokens`].
pub const TEST_TOKEN: &str = "test-token";

/// Builder assembling [`HttpState`] from per-port mocks.
///
/// Ports left untouched are mocks without expectations, so any unexpected
/// call fails the test.
pub struct StateBuilder {
    pub accounts: MockAccountService,
    pub catalogue: MockCatalogueService,
    pub favourites: MockFavouritesService,
    pub tokens: MockTokenIssuer,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self {
            accounts: MockAccountService::new(),
            catalogue: MockCatalogueService::new(),
            favourites: MockFavouritesService::new(),
            tokens: MockTokenIssuer::new(),
        }
    }
}

impl StateBuilder {
    pub fn build(self) -> HttpState {
        HttpState::new(
            Arc::new(self.accounts),
            Arc::new(self.catalogue),
            Arc::new(self.favourites),
            Arc::new(self.tokens),
        )
    }
}

/// State whose only live port is `tokens`.
pub fn state_with_tokens(tokens: Arc<dyn TokenIssuer>) -> HttpState {
    HttpState::new(
        Arc::new(MockAccountService::new()),
        Arc::new(MockCatalogueService::new()),
        Arc::new(MockFavouritesService::new()),
        tokens,
    )
}

/// Token issuer mock resolving [`TEST_TOKEN`] to `account_id`.
pub fn accepting_tokens(account_id: i64) -> MockTokenIssuer {
    let mut tokens = MockTokenIssuer::new();
    tokens
        .expect_verify()
        .withf(|token| token == TEST_TOKEN)
        .returning(move |_| {
            Ok(SessionClaim {
                account_id: AccountId::new(account_id).expect("fixture id"),
                username: Username::new("fixture").expect("fixture username"),
                role: Role::User,
                expires_at: Utc::now() + Duration::hours(1),
            })
        });
    tokens
}

/// `Authorization` header value carrying [`TEST_TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("authorization", format!("Bearer {TEST_TOKEN}"))
}
