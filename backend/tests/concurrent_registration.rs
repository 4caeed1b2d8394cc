//! Registration under contention over the in-memory adapters.

use bookshelf::domain::ErrorCode;
use bookshelf::domain::ports::AccountService;
use bookshelf::test_support::InMemoryBackend;
use futures_util::future::join_all;
use rstest::{fixture, rstest};

const CONTENDERS: usize = 8;

#[fixture]
fn backend() -> InMemoryBackend {
    InMemoryBackend::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_concurrent_registration_wins(backend: InMemoryBackend) {
    let attempts = (0..CONTENDERS).map(|n| {
        let accounts = backend.accounts.clone();
        tokio::spawn(async move { accounts.register("alice", &format!("secret-{n}")).await })
    });

    let outcomes: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("registration task completes"))
        .collect();

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1);
    for outcome in outcomes.iter().filter_map(|outcome| outcome.as_ref().err()) {
        assert_eq!(outcome.code(), ErrorCode::Conflict);
        assert_eq!(outcome.message(), "username already exists");
    }

    let admin = backend
        .accounts
        .ensure_admin("root", "root-pass")
        .await
        .expect("bootstrap admin");
    let listed = backend
        .accounts
        .list_accounts(admin.id)
        .await
        .expect("admin lists accounts");
    assert_eq!(
        listed
            .iter()
            .filter(|account| account.username.as_ref() == "alice")
            .count(),
        1
    );
}
