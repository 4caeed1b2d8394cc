//! Tests for account API handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{AccountId, Error, Role, Username};
use crate::inbound::http::error::json_config;
use crate::inbound::http::test_utils::{StateBuilder, accepting_tokens, bearer};

const CALLER: i64 = 2;

fn account(id: i64, name: &str, role: Role) -> Account {
    Account {
        id: AccountId::new(id).expect("valid id"),
        username: Username::new(name).expect("valid username"),
        role,
    }
}

fn id(raw: i64) -> AccountId {
    AccountId::new(raw).expect("valid id")
}

fn ports() -> StateBuilder {
    StateBuilder {
        tokens: accepting_tokens(CALLER),
        ..StateBuilder::default()
    }
}

async fn send(state: HttpState, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .service(
                web::scope("/api/v1")
                    .service(current_user)
                    .service(list_users)
                    .service(get_user)
                    .service(update_role)
                    .service(delete_user),
            ),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn me_resolves_the_token_subject() {
    let mut ports = ports();
    ports
        .accounts
        .expect_profile()
        .with(eq(id(CALLER)))
        .returning(|_| Ok(account(CALLER, "bob", Role::User)));

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(bearer());
    let (status, body) = send(ports.build(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2, "username": "bob", "role": "user"}));
}

#[rstest]
#[actix_web::test]
async fn me_requires_a_token() {
    let (status, body) = send(
        ports().build(),
        actix_test::TestRequest::get().uri("/api/v1/users/me"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authorization header required");
}

#[rstest]
#[actix_web::test]
async fn get_user_passes_caller_and_target() {
    let mut ports = ports();
    ports
        .accounts
        .expect_account()
        .with(eq(id(CALLER)), eq(id(9)))
        .returning(|_, _| Err(Error::forbidden("access denied")));

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/9")
        .insert_header(bearer());
    let (status, body) = send(ports.build(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "access denied");
}

#[rstest]
#[case("abc")]
#[case("0")]
#[actix_web::test]
async fn malformed_ids_are_bad_requests(#[case] raw: &str) {
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/users/{raw}"))
        .insert_header(bearer());
    let (status, body) = send(ports().build(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid account id");
}

#[rstest]
#[actix_web::test]
async fn list_users_returns_accounts_without_hashes() {
    let mut ports = ports();
    ports.accounts.expect_list_accounts().returning(|_| {
        Ok(vec![
            account(1, "root", Role::Admin),
            account(2, "bob", Role::User),
        ])
    });

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(bearer());
    let (status, body) = send(ports.build(), request).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.get("password_hash").is_none()));
    assert_eq!(entries[0]["role"], "admin");
}

#[rstest]
#[actix_web::test]
async fn update_role_forwards_the_raw_role() {
    let mut ports = ports();
    ports
        .accounts
        .expect_set_role()
        .withf(|acting, target, role| {
            acting.get() == CALLER && target.get() == 4 && role == "admin"
        })
        .returning(|_, _, _| Ok(account(4, "carol", Role::Admin)));

    let request = actix_test::TestRequest::patch()
        .uri("/api/v1/users/4/role")
        .insert_header(bearer())
        .set_json(json!({"new_role": "admin"}));
    let (status, body) = send(ports.build(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
}

#[rstest]
#[actix_web::test]
async fn update_role_requires_the_field() {
    let mut ports = ports();
    ports.accounts.expect_set_role().never();

    let request = actix_test::TestRequest::patch()
        .uri("/api/v1/users/4/role")
        .insert_header(bearer())
        .set_json(json!({}));
    let (status, body) = send(ports.build(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "new_role");
}

#[rstest]
#[actix_web::test]
async fn own_role_changes_are_bad_requests() {
    let mut ports = ports();
    ports
        .accounts
        .expect_set_role()
        .returning(|_, _, _| Err(Error::invalid_request("cannot change own role")));

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/v1/users/{CALLER}/role"))
        .insert_header(bearer())
        .set_json(json!({"new_role": "user"}));
    let (status, body) = send(ports.build(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cannot change own role");
}

#[rstest]
#[actix_web::test]
async fn delete_user_returns_no_content() {
    let mut ports = ports();
    ports
        .accounts
        .expect_delete_account()
        .with(eq(id(CALLER)), eq(id(7)))
        .times(1)
        .returning(|_, _| Ok(()));

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/users/7")
        .insert_header(bearer());
    let (status, body) = send(ports.build(), request).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}
