//! Integration tests for the RSVP service.

use event_registration::mocks::MockRsvpStore;
use event_registration::{RegistrationError, RsvpService, UserId, UserRsvp};
use serde_json::json;

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_create_then_get() {
    let service = RsvpService::new(MockRsvpStore::new());
    let mut rsvp = UserRsvp::new(UserId::new("someone-else"), true);
    rsvp.details.insert("shirtSize".to_string(), json!("M"));

    let created = service.create_rsvp(&UserId::new("u1"), rsvp).await.unwrap();
    assert_eq!(created.id, UserId::new("u1"));

    let fetched = service.get_rsvp(&UserId::new("u1")).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.details.get("shirtSize"), Some(&json!("M")));
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_duplicate_create_is_rejected() {
    let service = RsvpService::new(MockRsvpStore::new());
    let user = UserId::new("u1");

    service
        .create_rsvp(&user, UserRsvp::new(user.clone(), true))
        .await
        .unwrap();
    let err = service
        .create_rsvp(&user, UserRsvp::new(user.clone(), false))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::AlreadyExists { .. }));
    assert!(service.get_rsvp(&user).await.unwrap().is_attending);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_update_missing_rsvp_is_not_found() {
    let service = RsvpService::new(MockRsvpStore::new());

    let err = service
        .update_rsvp(&UserId::new("u1"), UserRsvp::new(UserId::new("u1"), true))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_update_and_stats() {
    let service = RsvpService::new(MockRsvpStore::with_rsvps([
        UserRsvp::new(UserId::new("u1"), true),
        UserRsvp::new(UserId::new("u2"), true),
        UserRsvp::new(UserId::new("u3"), false),
    ]));

    service
        .update_rsvp(&UserId::new("u2"), UserRsvp::new(UserId::new("u2"), false))
        .await
        .unwrap();

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.count("isAttending", "true"), 1);
    assert_eq!(stats.count("isAttending", "false"), 2);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_broken_store_is_lookup_failure() {
    let store = MockRsvpStore::new();
    store.fail_reads();
    let service = RsvpService::new(store);

    let err = service
        .create_rsvp(&UserId::new("u1"), UserRsvp::new(UserId::new("u1"), true))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrationError::LookupFailed(_)));
}
