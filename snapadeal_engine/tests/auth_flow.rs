mod support;

use snapadeal_engine::{
    db_types::{Role, UserStatus},
    traits::{UpdateProfileRequest, UserManagement},
    AuthApiError,
};
use support::{auth_api, new_user, prepare_env::*};

#[tokio::test]
async fn registration_and_otp_verification() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let auth = auth_api(&db);

    let (user, code) = auth.register(new_user("amina@example.com", "+256700000001", Role::Customer)).await.unwrap();
    assert_eq!(user.status, UserStatus::Pending);
    assert!(!user.is_verified);
    assert_eq!(code.len(), 6);

    // Unverified accounts cannot log in
    let err = auth.authenticate("amina@example.com", "password1").await.unwrap_err();
    assert!(matches!(err, AuthApiError::NotVerified));

    // Wrong code is rejected without consuming the real one
    let err = auth.verify_otp("amina@example.com", "000000").await.unwrap_err();
    assert!(matches!(err, AuthApiError::InvalidOrExpired));

    let (user, token) = auth.verify_otp("amina@example.com", &code).await.unwrap();
    assert!(user.is_verified);
    assert_eq!(user.status, UserStatus::Active);
    assert!(user.email_verified_at.is_some());
    let claims = auth.validate_token(&token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.role, Role::Customer);

    // The code is one-shot
    let err = auth.verify_otp("amina@example.com", &code).await.unwrap_err();
    assert!(matches!(err, AuthApiError::InvalidOrExpired));
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let auth = auth_api(&db);

    auth.register(new_user("amina@example.com", "+256700000001", Role::Customer)).await.unwrap();
    let err = auth.register(new_user("amina@example.com", "+256700000002", Role::Customer)).await.unwrap_err();
    assert!(matches!(err, AuthApiError::UserAlreadyExists));
    let err = auth.register(new_user("other@example.com", "+256700000001", Role::Customer)).await.unwrap_err();
    assert!(matches!(err, AuthApiError::UserAlreadyExists));
}

#[tokio::test]
async fn login_with_email_or_phone() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let auth = auth_api(&db);
    support::register_active_user(&db, "amina@example.com", "+256700000001", Role::Customer).await;

    // The returned record carries the login timestamp just written, and the store agrees
    let (user, _) = auth.authenticate("amina@example.com", "password1").await.unwrap();
    assert!(user.last_login_at.is_some());
    assert!(auth.profile(user.id).await.unwrap().last_login_at.is_some());

    // Phone login tolerates formatting characters
    let (by_phone, _) = auth.authenticate("+256 700-000 001", "password1").await.unwrap();
    assert_eq!(by_phone.id, user.id);

    // Unknown identifier and wrong password are indistinguishable
    let err = auth.authenticate("nobody@example.com", "password1").await.unwrap_err();
    assert!(matches!(err, AuthApiError::InvalidCredentials));
    let err = auth.authenticate("amina@example.com", "wrong-password").await.unwrap_err();
    assert!(matches!(err, AuthApiError::InvalidCredentials));
}

#[tokio::test]
async fn suspended_accounts_cannot_log_in() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let auth = auth_api(&db);
    let user = support::register_active_user(&db, "amina@example.com", "+256700000001", Role::Customer).await;

    db.update_user_status(user.id, UserStatus::Suspended).await.unwrap();
    let err = auth.authenticate("amina@example.com", "password1").await.unwrap_err();
    assert!(matches!(err, AuthApiError::NotActive));
}

#[tokio::test]
async fn password_reset_round_trip() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let auth = auth_api(&db);
    support::register_active_user(&db, "amina@example.com", "+256700000001", Role::Customer).await;

    // Unknown emails quietly yield no token
    assert!(auth.request_password_reset("nobody@example.com").await.unwrap().is_none());

    let token = auth.request_password_reset("amina@example.com").await.unwrap().unwrap();
    assert_eq!(token.len(), 64);
    auth.reset_password(&token, "new-password").await.unwrap();

    // The token is one-shot
    let err = auth.reset_password(&token, "sneaky-password").await.unwrap_err();
    assert!(matches!(err, AuthApiError::InvalidOrExpired));

    // Old password no longer works, new one does
    let err = auth.authenticate("amina@example.com", "password1").await.unwrap_err();
    assert!(matches!(err, AuthApiError::InvalidCredentials));
    auth.authenticate("amina@example.com", "new-password").await.unwrap();
}

#[tokio::test]
async fn reissued_otp_replaces_the_old_code() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let auth = auth_api(&db);

    let (user, first) = auth.register(new_user("amina@example.com", "+256700000001", Role::Customer)).await.unwrap();
    let second = auth.issue_otp(&user.email).await.unwrap();
    if first != second {
        let err = auth.verify_otp(&user.email, &first).await.unwrap_err();
        assert!(matches!(err, AuthApiError::InvalidOrExpired));
    }
    auth.verify_otp(&user.email, &second).await.unwrap();

    // Verified accounts cannot request another code
    let err = auth.issue_otp(&user.email).await.unwrap_err();
    assert!(matches!(err, AuthApiError::AlreadyVerified));
}

#[tokio::test]
async fn profile_updates() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let auth = auth_api(&db);
    let user = support::register_active_user(&db, "amina@example.com", "+256700000001", Role::Customer).await;

    let err = auth.update_profile(user.id, UpdateProfileRequest::default()).await.unwrap_err();
    assert!(matches!(err, AuthApiError::InvalidInput(_)));

    let update = UpdateProfileRequest {
        first_name: Some("Aisha".to_string()),
        phone: Some("+256 711 222 333".to_string()),
        ..Default::default()
    };
    let updated = auth.update_profile(user.id, update).await.unwrap();
    assert_eq!(updated.first_name, "Aisha");
    assert_eq!(updated.last_name, user.last_name);
    assert_eq!(updated.phone, "+256711222333");

    let fetched = auth.profile(user.id).await.unwrap();
    assert_eq!(fetched.first_name, "Aisha");
}
