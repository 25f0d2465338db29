//! Contract tests for the HTTP-backed providers.
//!
//! | Service | Method | Path | Test |
//! |---------|--------|------|------|
//! | SparkPost | POST | `/transmissions/` | `sparkpost_*` |
//! | auth | PUT | `/auth/roles/add/` | `role_grant_*` |
//! | user | GET | `/user/{id}/` | `user_lookup_*` |

use event_registration::models::{Address, Content, Recipient, Substitutions};
use event_registration::providers::{
    HttpRoleService, HttpUserDirectory, MailProvider, RoleService, SparkPostProvider,
    UserDirectory,
};
use event_registration::{MailInfo, RegistrationError, UserId};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_mail() -> MailInfo {
    let mut substitutions = Substitutions::default();
    substitutions.insert(Substitutions::NAME, "Ada");

    MailInfo {
        content: Content {
            template_id: "welcome".to_string(),
        },
        recipients: vec![Recipient {
            address: Address {
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            },
            substitutions,
        }],
    }
}

// ── POST /transmissions/ ─────────────────────────────────────────────

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn sparkpost_returns_body_unchanged() {
    let server = MockServer::start().await;
    let body = json!({
        "results": {
            "total_rejected_recipients": 0,
            "total_accepted_recipients": 1,
            "id": "11668787484950529"
        }
    });

    Mock::given(method("POST"))
        .and(path("/transmissions/"))
        .and(header("authorization", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "content": { "template_id": "welcome" },
            "recipients": [{
                "address": { "email": "ada@example.com", "name": "Ada" },
                "substitution_data": { "name": "Ada" }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = SparkPostProvider::new("test-key".to_string(), server.uri());
    let status = provider.send(&create_test_mail()).await.unwrap();

    assert_eq!(status.0, body);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn sparkpost_non_ok_is_dispatch_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transmissions/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid template"))
        .mount(&server)
        .await;

    let provider = SparkPostProvider::new("test-key".to_string(), server.uri());
    let err = provider.send(&create_test_mail()).await.unwrap_err();

    assert_eq!(
        err,
        RegistrationError::DispatchFailed {
            status: Some(400),
            reason: "invalid template".to_string(),
        }
    );
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn sparkpost_accepted_is_not_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transmissions/"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .mount(&server)
        .await;

    let provider = SparkPostProvider::new("test-key".to_string(), server.uri());
    let err = provider.send(&create_test_mail()).await.unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::DispatchFailed {
            status: Some(202),
            ..
        }
    ));
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn sparkpost_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transmissions/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let provider = SparkPostProvider::new("test-key".to_string(), server.uri());
    let err = provider.send(&create_test_mail()).await.unwrap_err();

    assert!(matches!(err, RegistrationError::InvalidProviderResponse(_)));
}

// ── PUT /auth/roles/add/ ─────────────────────────────────────────────

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn role_grant_sends_attendee_role() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/auth/roles/add/"))
        .and(body_json(json!({ "id": "u1", "role": "Attendee" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let roles = HttpRoleService::new(server.uri());
    roles.grant_attendee_role(&UserId::new("u1")).await.unwrap();
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn role_grant_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/auth/roles/add/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let roles = HttpRoleService::new(server.uri());
    let err = roles.grant_attendee_role(&UserId::new("u1")).await.unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::RoleGrantFailed { ref user_id, .. } if user_id == "u1"
    ));
}

// ── GET /user/{id}/ ──────────────────────────────────────────────────

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn user_lookup_returns_info() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/u1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "username": "Ada",
            "email": "ada@example.com"
        })))
        .mount(&server)
        .await;

    let directory = HttpUserDirectory::new(server.uri());
    let user = directory.user_info(&UserId::new("u1")).await.unwrap();

    assert_eq!(user.username, "Ada");
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn user_lookup_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/ghost/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let directory = HttpUserDirectory::new(server.uri());
    let err = directory.user_info(&UserId::new("ghost")).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn user_lookup_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/u1/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let directory = HttpUserDirectory::new(server.uri());
    let err = directory.user_info(&UserId::new("u1")).await.unwrap_err();

    assert!(matches!(err, RegistrationError::LookupFailed(_)));
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn user_lookup_escapes_id_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/team%2Fu1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "team/u1",
            "username": "Ada",
            "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = HttpUserDirectory::new(server.uri());
    let user = directory.user_info(&UserId::new("team/u1")).await.unwrap();

    assert_eq!(user.id, UserId::new("team/u1"));
}
