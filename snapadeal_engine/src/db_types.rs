use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snap_common::Money;
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------        Role          ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Buys deals. The default role for new registrations.
    Customer,
    /// Publishes deals and receives sale notifications.
    Merchant,
    /// Moderates deals and manages users.
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "Customer"),
            Role::Merchant => write!(f, "Merchant"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "merchant" => Ok(Self::Merchant),
            "admin" => Ok(Self::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------     UserStatus       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Registered but the email address has not been verified yet.
    Pending,
    /// Verified and allowed to log in.
    Active,
    /// Deactivated by the user or an admin.
    Inactive,
    /// Suspended by an admin.
    Suspended,
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Pending => write!(f, "Pending"),
            UserStatus::Active => write!(f, "Active"),
            UserStatus::Inactive => write!(f, "Inactive"),
            UserStatus::Suspended => write!(f, "Suspended"),
        }
    }
}

impl FromStr for UserStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            s => Err(ConversionError(format!("Invalid user status: {s}"))),
        }
    }
}

//--------------------------------------        User          ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    pub is_verified: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub otp_code: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A registration request. The password arrives raw and is hashed before it ever reaches the database.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

//--------------------------------------      Category        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub is_active: bool,
}

//--------------------------------------     DealStatus       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    /// Newly submitted or edited; awaiting moderation. Not publicly visible.
    Pending,
    /// Approved by an admin and visible to customers while active and unexpired.
    Approved,
    /// Rejected by an admin. The merchant may edit and re-submit.
    Rejected,
    /// Derived, read-only condition: the end date has passed. Never written by the moderation machine.
    Expired,
}

impl Display for DealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealStatus::Pending => write!(f, "Pending"),
            DealStatus::Approved => write!(f, "Approved"),
            DealStatus::Rejected => write!(f, "Rejected"),
            DealStatus::Expired => write!(f, "Expired"),
        }
    }
}

impl FromStr for DealStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            s => Err(ConversionError(format!("Invalid deal status: {s}"))),
        }
    }
}

//--------------------------------------        Deal          ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deal {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub original_price: Money,
    pub discount_price: Money,
    pub discount_percent: i64,
    pub image_url: String,
    pub images: Json<Vec<String>>,
    pub category_id: i64,
    pub merchant_id: i64,
    pub status: DealStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_quantity: i64,
    pub sold_quantity: i64,
    pub location: String,
    pub fine_prints: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    pub fn remaining_quantity(&self) -> i64 {
        self.max_quantity - self.sold_quantity
    }

    /// Whether the deal can be shown to, and purchased by, customers right now.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.status == DealStatus::Approved
            && self.is_active
            && !self.is_expired(now)
            && self.sold_quantity < self.max_quantity
    }
}

/// A deal draft, as submitted or edited by a merchant. Validation and the derived discount percentage are applied by
/// the deal API before the draft is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeal {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    pub original_price: Money,
    pub discount_price: Money,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_quantity: Option<i64>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub fine_prints: String,
}

/// The number of images a single deal may carry.
pub const MAX_DEAL_IMAGES: usize = 10;
/// Quantity cap applied when a draft does not specify one.
pub const DEFAULT_MAX_QUANTITY: i64 = 100;

impl NewDeal {
    /// The discount percentage derived from the draft prices, rounded to the nearest whole percent.
    pub fn discount_percent(&self) -> i64 {
        let original = self.original_price.value();
        if original <= 0 {
            return 0;
        }
        let saved = original - self.discount_price.value();
        ((saved as f64 / original as f64) * 100.0).round() as i64
    }
}

//-------------------------------------- TransactionStatus ------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Created by a purchase; awaiting a settlement signal.
    Pending,
    /// Settled successfully. Inventory has been applied exactly once.
    Completed,
    /// Settled unsuccessfully. No inventory effect.
    Failed,
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "Pending"),
            TransactionStatus::Completed => write!(f, "Completed"),
            TransactionStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid transaction status: {s}"))),
        }
    }
}

//--------------------------------------     Transaction      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub deal_id: i64,
    pub quantity: i64,
    /// `quantity × discount_price`, computed server-side at creation and immutable thereafter.
    pub amount: Money,
    pub payment_method: String,
    pub phone_number: String,
    pub payment_reference: Option<String>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub deal_id: i64,
    pub quantity: i64,
    pub amount: Money,
    pub payment_method: String,
    pub phone_number: String,
}

//-------------------------------------- NotificationType ------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    DealApproved,
    DealRejected,
    DealPurchased,
    System,
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::DealApproved => write!(f, "DealApproved"),
            NotificationType::DealRejected => write!(f, "DealRejected"),
            NotificationType::DealPurchased => write!(f, "DealPurchased"),
            NotificationType::System => write!(f, "System"),
        }
    }
}

impl FromStr for NotificationType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "").as_str() {
            "dealapproved" => Ok(Self::DealApproved),
            "dealrejected" => Ok(Self::DealRejected),
            "dealpurchased" => Ok(Self::DealPurchased),
            "system" => Ok(Self::System),
            s => Err(ConversionError(format!("Invalid notification type: {s}"))),
        }
    }
}

//--------------------------------------    Notification      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    /// Opaque JSON payload. Moderation notifications embed `deal_id`; purchase notifications also embed
    /// `transaction_id` and `quantity`.
    pub data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub data: String,
}

#[cfg(test)]
mod test {
    use snap_common::Money;

    use super::*;

    fn draft(original: i64, discount: i64) -> NewDeal {
        NewDeal {
            title: "t".into(),
            description: "d".into(),
            short_description: String::new(),
            original_price: Money::from_whole(original),
            discount_price: Money::from_whole(discount),
            image_url: String::new(),
            images: vec![],
            category_id: 1,
            start_date: Utc::now(),
            end_date: Utc::now(),
            max_quantity: None,
            location: String::new(),
            fine_prints: String::new(),
        }
    }

    #[test]
    fn discount_percent_is_rounded() {
        assert_eq!(draft(100, 80).discount_percent(), 20);
        assert_eq!(draft(3, 1).discount_percent(), 67);
        assert_eq!(draft(100, 0).discount_percent(), 100);
    }

    #[test]
    fn availability_needs_approval_stock_and_an_open_window() {
        let now = Utc::now();
        let mut deal = Deal {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            short_description: String::new(),
            original_price: Money::from_whole(100),
            discount_price: Money::from_whole(80),
            discount_percent: 20,
            image_url: String::new(),
            images: Json(vec![]),
            category_id: 1,
            merchant_id: 1,
            status: DealStatus::Approved,
            start_date: now - chrono::Duration::hours(1),
            end_date: now + chrono::Duration::days(1),
            max_quantity: 10,
            sold_quantity: 0,
            location: String::new(),
            fine_prints: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert!(deal.is_available(now));
        deal.status = DealStatus::Pending;
        assert!(!deal.is_available(now));
        deal.status = DealStatus::Approved;
        deal.is_active = false;
        assert!(!deal.is_available(now));
        deal.is_active = true;
        deal.sold_quantity = deal.max_quantity;
        assert!(!deal.is_available(now));
        deal.sold_quantity = deal.max_quantity - 1;
        assert!(deal.is_available(now));
        assert!(!deal.is_available(deal.end_date + chrono::Duration::hours(1)));
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("merchant".parse::<Role>().unwrap(), Role::Merchant);
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn secrets_never_serialize() {
        let user = User {
            id: 1,
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.c".into(),
            phone: "+256700000001".into(),
            password_hash: "$argon2id$...".into(),
            role: Role::Customer,
            status: UserStatus::Active,
            is_verified: true,
            email_verified_at: None,
            otp_code: Some("123456".into()),
            otp_expires_at: None,
            reset_token: None,
            reset_token_expires_at: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("123456"));
        assert!(json.contains("\"role\":\"customer\""));
    }
}
