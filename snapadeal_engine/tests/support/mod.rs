pub mod prepare_env;

use chrono::{Duration, Utc};
use snap_common::{Money, Secret};
use snapadeal_engine::{
    db_types::{NewDeal, NewUser, Role, User},
    events::EventProducers,
    traits::UnconfiguredGateway,
    AuthApi,
    DealApi,
    NotificationApi,
    PurchaseFlowApi,
    SqliteDatabase,
};

pub const TEST_JWT_SECRET: &str = "snapadeal-test-secret";
pub const TEST_REDIRECT_BASE: &str = "http://localhost:3000";

pub fn auth_api(db: &SqliteDatabase) -> AuthApi<SqliteDatabase> {
    AuthApi::new(db.clone(), Secret::new(TEST_JWT_SECRET.to_string()))
}

pub fn deal_api(db: &SqliteDatabase) -> DealApi<SqliteDatabase> {
    DealApi::new(db.clone(), EventProducers::default())
}

pub fn purchase_api(db: &SqliteDatabase) -> PurchaseFlowApi<SqliteDatabase, UnconfiguredGateway> {
    PurchaseFlowApi::new(db.clone(), UnconfiguredGateway, TEST_REDIRECT_BASE.to_string(), EventProducers::default())
}

pub fn notification_api(db: &SqliteDatabase) -> NotificationApi<SqliteDatabase> {
    NotificationApi::new(db.clone())
}

pub fn new_user(email: &str, phone: &str, role: Role) -> NewUser {
    NewUser {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password: "password1".to_string(),
        role,
    }
}

/// Register a user and walk them through OTP verification so they end up `Active`.
pub async fn register_active_user(db: &SqliteDatabase, email: &str, phone: &str, role: Role) -> User {
    let auth = auth_api(db);
    let (user, code) = auth.register(new_user(email, phone, role)).await.expect("registration failed");
    let (user, _token) = auth.verify_otp(&user.email, &code).await.expect("verification failed");
    user
}

/// A valid draft: runs from an hour ago until tomorrow, whole-unit prices.
pub fn deal_draft(category_id: i64, original: i64, discount: i64, max_quantity: Option<i64>) -> NewDeal {
    NewDeal {
        title: "Two-for-one lunch special".to_string(),
        description: "Bring a friend, pay for one plate.".to_string(),
        short_description: "2-for-1 lunch".to_string(),
        original_price: Money::from_whole(original),
        discount_price: Money::from_whole(discount),
        image_url: String::new(),
        images: vec![],
        category_id,
        start_date: Utc::now() - Duration::hours(1),
        end_date: Utc::now() + Duration::days(1),
        max_quantity,
        location: "Kampala".to_string(),
        fine_prints: "Weekdays only.".to_string(),
    }
}
