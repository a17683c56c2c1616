mod support;

use snapadeal_engine::{
    db_types::{NotificationType, Role},
    traits::BroadcastAudience,
    NotificationApiError,
};
use support::{notification_api, prepare_env::*, register_active_user};

#[tokio::test]
async fn inbox_round_trip() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let api = notification_api(&db);
    let user = register_active_user(&db, "amina@example.com", "+256700000001", Role::Customer).await;

    let n1 = api
        .notify(user.id, "Welcome".to_string(), "Thanks for joining!".to_string(), NotificationType::System, "{}".to_string())
        .await
        .unwrap();
    api.notify(user.id, "Tip".to_string(), "Browse today's deals.".to_string(), NotificationType::System, "{}".to_string())
        .await
        .unwrap();

    assert_eq!(api.unread_count(user.id).await.unwrap(), 2);
    let inbox = api.notifications_for_user(user.id, 10, 0).await.unwrap();
    assert_eq!(inbox.len(), 2);

    let read = api.mark_as_read(n1.id, user.id).await.unwrap();
    assert!(read.is_read);
    assert_eq!(api.unread_count(user.id).await.unwrap(), 1);

    assert_eq!(api.mark_all_as_read(user.id).await.unwrap(), 1);
    assert_eq!(api.unread_count(user.id).await.unwrap(), 0);

    api.delete_notification(n1.id, user.id).await.unwrap();
    assert_eq!(api.notifications_for_user(user.id, 10, 0).await.unwrap().len(), 1);
}

#[tokio::test]
async fn inbox_is_owner_scoped() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let api = notification_api(&db);
    let amina = register_active_user(&db, "amina@example.com", "+256700000001", Role::Customer).await;
    let bob = register_active_user(&db, "bob@example.com", "+256700000002", Role::Customer).await;

    let n = api
        .notify(amina.id, "Private".to_string(), "Only for Amina".to_string(), NotificationType::System, "{}".to_string())
        .await
        .unwrap();

    let err = api.mark_as_read(n.id, bob.id).await.unwrap_err();
    assert!(matches!(err, NotificationApiError::NotificationNotFound));
    let err = api.delete_notification(n.id, bob.id).await.unwrap_err();
    assert!(matches!(err, NotificationApiError::NotificationNotFound));
    assert!(api.notifications_for_user(bob.id, 10, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn broadcasts_fan_out_by_role() {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let api = notification_api(&db);
    let m1 = register_active_user(&db, "shop1@example.com", "+256700000001", Role::Merchant).await;
    let m2 = register_active_user(&db, "shop2@example.com", "+256700000002", Role::Merchant).await;
    let customer = register_active_user(&db, "buyer@example.com", "+256700000003", Role::Customer).await;

    let written = api
        .broadcast(BroadcastAudience::WithRole(Role::Merchant), "Fees".to_string(), "Fees change next month.".to_string())
        .await
        .unwrap();
    assert_eq!(written, 2);
    assert_eq!(api.unread_count(m1.id).await.unwrap(), 1);
    assert_eq!(api.unread_count(m2.id).await.unwrap(), 1);
    assert_eq!(api.unread_count(customer.id).await.unwrap(), 0);

    let written = api
        .broadcast(BroadcastAudience::Everyone, "Maintenance".to_string(), "Short outage tonight.".to_string())
        .await
        .unwrap();
    assert_eq!(written, 3);

    let written = api
        .broadcast(BroadcastAudience::Users(vec![customer.id]), "Hello".to_string(), "Just you.".to_string())
        .await
        .unwrap();
    assert_eq!(written, 1);
    assert_eq!(api.unread_count(customer.id).await.unwrap(), 2);
}
