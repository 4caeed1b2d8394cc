//! Tests for the account service authorization rules.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockAccountRepository, MockPasswordHasher};
use crate::domain::{ErrorCode, PasswordHash, StoredAccount, Username};

type TestService = AccountServiceImpl<MockAccountRepository, MockPasswordHasher>;

fn id(raw: i64) -> AccountId {
    AccountId::new(raw).expect("fixture id")
}

fn account(raw: i64, name: &str, role: Role) -> Account {
    Account {
        id: id(raw),
        username: Username::new(name).expect("fixture name"),
        role,
    }
}

fn stored(raw: i64, name: &str, role: Role) -> StoredAccount {
    StoredAccount {
        account: account(raw, name, role),
        password_hash: PasswordHash::new("$argon2id$fixture"),
    }
}

fn service(repo: MockAccountRepository, hasher: MockPasswordHasher) -> TestService {
    AccountServiceImpl::new(Arc::new(repo), Arc::new(hasher))
}

fn repo_with(accounts: Vec<StoredAccount>) -> MockAccountRepository {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id().returning(move |wanted| {
        Ok(accounts
            .iter()
            .find(|candidate| candidate.account.id == wanted)
            .cloned())
    });
    repo
}

#[rstest]
#[case("", "pw123456")]
#[case("   ", "pw123456")]
#[case("alice", "")]
#[tokio::test]
async fn register_requires_both_parts(#[case] username: &str, #[case] password: &str) {
    let svc = service(MockAccountRepository::new(), MockPasswordHasher::new());

    let err = svc.register(username, password).await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "username and password required");
}

#[tokio::test]
async fn register_rejects_taken_username_before_hashing() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username()
        .withf(|name| name.as_ref() == "alice")
        .return_once(|_| Ok(Some(stored(1, "alice", Role::User))));
    let svc = service(repo, MockPasswordHasher::new());

    let err = svc.register("alice", "pw123456").await.expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "username already exists");
}

#[tokio::test]
async fn register_maps_store_uniqueness_violation_to_conflict() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    repo.expect_create()
        .return_once(|_| Err(AccountRepositoryError::duplicate_username("alice")));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordHash::new("digest")));
    let svc = service(repo, hasher);

    let err = svc.register("alice", "pw123456").await.expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn register_stores_hashed_password_with_user_role() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    repo.expect_create()
        .withf(|new| {
            new.username.as_ref() == "alice"
                && new.role == Role::User
                && new.password_hash.as_str() == "digest-of-pw123456"
        })
        .return_once(|_| Ok(stored(1, "alice", Role::User)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "pw123456")
        .return_once(|password| Ok(PasswordHash::new(format!("digest-of-{password}"))));
    let svc = service(repo, hasher);

    let created = svc.register(" alice ", "pw123456").await.expect("registered");

    assert_eq!(created, account(1, "alice", Role::User));
}

#[tokio::test(start_paused = true)]
async fn login_with_unknown_name_fails_without_delay() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    let svc = service(repo, MockPasswordHasher::new());
    let started = tokio::time::Instant::now();

    let err = svc.login("ghost", "whatever").await.expect_err("unknown");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid credentials");
    assert!(started.elapsed() < FAILED_LOGIN_DELAY);
}

#[tokio::test]
async fn login_with_overlong_name_reports_invalid_credentials() {
    let svc = service(MockAccountRepository::new(), MockPasswordHasher::new());

    let err = svc.login(&"a".repeat(65), "pw").await.expect_err("no such account");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid credentials");
}

#[tokio::test]
async fn register_still_rejects_overlong_name() {
    let svc = service(MockAccountRepository::new(), MockPasswordHasher::new());

    let err = svc
        .register(&"a".repeat(65), "pw123456")
        .await
        .expect_err("too long");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test(start_paused = true)]
async fn login_with_wrong_password_waits_before_failing() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username()
        .return_once(|_| Ok(Some(stored(1, "alice", Role::User))));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(false));
    let svc = service(repo, hasher);
    let started = tokio::time::Instant::now();

    let err = svc.login("alice", "wrong").await.expect_err("mismatch");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid credentials");
    assert!(started.elapsed() >= FAILED_LOGIN_DELAY);
}

#[tokio::test]
async fn login_returns_account_on_match() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username()
        .return_once(|_| Ok(Some(stored(4, "alice", Role::Admin))));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, hash| password == "pw123456" && hash.as_str() == "$argon2id$fixture")
        .return_once(|_, _| Ok(true));
    let svc = service(repo, hasher);

    let found = svc.login("alice", "pw123456").await.expect("login");

    assert_eq!(found, account(4, "alice", Role::Admin));
}

#[tokio::test]
async fn login_surfaces_malformed_hash_as_internal() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username()
        .return_once(|_| Ok(Some(stored(4, "alice", Role::User))));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .return_once(|_, _| Err(PasswordHasherError::malformed_hash("bad phc")));
    let svc = service(repo, hasher);

    let err = svc.login("alice", "pw123456").await.expect_err("hash error");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn profile_fails_when_account_vanished() {
    let svc = service(repo_with(vec![]), MockPasswordHasher::new());

    let err = svc.profile(id(9)).await.expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "account not found");
}

#[rstest]
#[case(1, 2, Role::User, Err(ErrorCode::Forbidden))]
#[case(1, 1, Role::User, Ok(1))]
#[case(1, 2, Role::Admin, Ok(2))]
#[case(1, 3, Role::Admin, Err(ErrorCode::NotFound))]
#[tokio::test]
async fn account_visibility_is_self_or_admin(
    #[case] acting: i64,
    #[case] target: i64,
    #[case] acting_role: Role,
    #[case] expected: Result<i64, ErrorCode>,
) {
    let repo = repo_with(vec![
        stored(1, "acting", acting_role),
        stored(2, "other", Role::User),
    ]);
    let svc = service(repo, MockPasswordHasher::new());

    let outcome = svc
        .account(id(acting), id(target))
        .await
        .map(|found| found.id.get())
        .map_err(|err| err.code());

    assert_eq!(outcome, expected);
}

#[tokio::test]
async fn account_denial_uses_contract_message() {
    let repo = repo_with(vec![stored(1, "a", Role::User), stored(2, "b", Role::User)]);
    let svc = service(repo, MockPasswordHasher::new());

    let err = svc.account(id(1), id(2)).await.expect_err("denied");

    assert_eq!(err.message(), "access denied");
}

#[tokio::test]
async fn list_accounts_requires_admin() {
    let svc = service(
        repo_with(vec![stored(1, "alice", Role::User)]),
        MockPasswordHasher::new(),
    );

    let err = svc.list_accounts(id(1)).await.expect_err("denied");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn list_accounts_returns_all_for_admin() {
    let mut repo = repo_with(vec![stored(1, "root", Role::Admin)]);
    repo.expect_list().return_once(|| {
        Ok(vec![
            account(1, "root", Role::Admin),
            account(2, "alice", Role::User),
        ])
    });
    let svc = service(repo, MockPasswordHasher::new());

    let accounts = svc.list_accounts(id(1)).await.expect("listed");

    assert_eq!(accounts.len(), 2);
}

#[rstest]
#[case("admin")]
#[case("user")]
#[case("emperor")]
#[tokio::test]
async fn set_role_on_self_is_always_invalid(#[case] new_role: &str) {
    let svc = service(
        repo_with(vec![stored(1, "root", Role::Admin)]),
        MockPasswordHasher::new(),
    );

    let err = svc.set_role(id(1), id(1), new_role).await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn set_role_on_self_by_non_admin_is_invalid_not_forbidden() {
    let svc = service(
        repo_with(vec![stored(5, "alice", Role::User)]),
        MockPasswordHasher::new(),
    );

    let err = svc.set_role(id(5), id(5), "admin").await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "cannot change own role");
}

#[tokio::test]
async fn set_role_rejects_unknown_role_value() {
    let svc = service(MockAccountRepository::new(), MockPasswordHasher::new());

    let err = svc.set_role(id(1), id(2), "root").await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "invalid role, must be 'admin' or 'user'");
}

#[tokio::test]
async fn set_role_requires_current_admin_role() {
    let svc = service(
        repo_with(vec![stored(1, "demoted", Role::User), stored(2, "b", Role::User)]),
        MockPasswordHasher::new(),
    );

    let err = svc.set_role(id(1), id(2), "admin").await.expect_err("denied");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn set_role_reports_missing_target() {
    let mut repo = repo_with(vec![stored(1, "root", Role::Admin)]);
    repo.expect_update_role().return_once(|_, _| Ok(None));
    let svc = service(repo, MockPasswordHasher::new());

    let err = svc.set_role(id(1), id(8), "admin").await.expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn set_role_persists_new_role() {
    let mut repo = repo_with(vec![stored(1, "root", Role::Admin)]);
    repo.expect_update_role()
        .with(eq(id(2)), eq(Role::Admin))
        .return_once(|_, _| Ok(Some(account(2, "alice", Role::Admin))));
    let svc = service(repo, MockPasswordHasher::new());

    let updated = svc.set_role(id(1), id(2), "admin").await.expect("updated");

    assert_eq!(updated.role, Role::Admin);
}

#[tokio::test]
async fn delete_account_requires_admin() {
    let svc = service(
        repo_with(vec![stored(1, "alice", Role::User)]),
        MockPasswordHasher::new(),
    );

    let err = svc.delete_account(id(1), id(2)).await.expect_err("denied");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn admin_may_delete_own_account() {
    let mut repo = repo_with(vec![stored(1, "root", Role::Admin)]);
    repo.expect_delete()
        .with(eq(id(1)))
        .times(1)
        .return_once(|_| Ok(true));
    let svc = service(repo, MockPasswordHasher::new());

    svc.delete_account(id(1), id(1)).await.expect("deleted");
}

#[tokio::test]
async fn repository_failures_become_internal_errors() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Err(AccountRepositoryError::connection("refused")));
    let svc = service(repo, MockPasswordHasher::new());

    let err = svc.profile(id(1)).await.expect_err("store down");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn ensure_admin_promotes_existing_account() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username()
        .return_once(|_| Ok(Some(stored(3, "ops", Role::User))));
    repo.expect_update_role()
        .with(eq(id(3)), eq(Role::Admin))
        .return_once(|_, _| Ok(Some(account(3, "ops", Role::Admin))));
    let svc = service(repo, MockPasswordHasher::new());

    let admin = svc.ensure_admin("ops", "secret").await.expect("promoted");

    assert_eq!(admin.role, Role::Admin);
}

#[tokio::test]
async fn ensure_admin_creates_missing_account() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    repo.expect_create()
        .withf(|new| new.role == Role::Admin)
        .return_once(|_| Ok(stored(1, "ops", Role::Admin)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordHash::new("digest")));
    let svc = service(repo, hasher);

    let admin = svc.ensure_admin("ops", "secret").await.expect("created");

    assert_eq!(admin.id, id(1));
}

#[tokio::test]
async fn ensure_admin_is_a_no_op_for_existing_admin() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_username()
        .return_once(|_| Ok(Some(stored(1, "ops", Role::Admin))));
    let svc = service(repo, MockPasswordHasher::new());

    let admin = svc.ensure_admin("ops", "secret").await.expect("unchanged");

    assert_eq!(admin, account(1, "ops", Role::Admin));
}
