use std::fmt::Debug;

use chrono::Utc;
use log::*;
use serde::{Deserialize, Serialize};
use snap_common::UGX_CURRENCY_CODE;

use crate::{
    api::errors::PurchaseApiError,
    db_types::{Deal, DealStatus, NewNotification, NewTransaction, NotificationType, Transaction, TransactionStatus},
    events::{DealPurchasedEvent, EventProducers},
    traits::{
        CustomerInfo,
        DealManagement,
        NotificationManagement,
        PaymentGateway,
        PaymentMeta,
        PaymentSessionRequest,
        SettlementOutcome,
        TransactionManagement,
        UserManagement,
    },
};

pub const DEFAULT_PAYMENT_METHOD: &str = "mobilemoney";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub deal_id: i64,
    pub quantity: i64,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    pub phone_number: String,
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

/// The settlement signal carried by one of the three reconcile triggers.
///
/// Precedence when interpreting the signal: an explicit `simulate` always wins, then a gateway reference to verify,
/// then the redirect `status` parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentSignal {
    #[serde(default)]
    pub simulate: bool,
    pub tx_ref: Option<String>,
    pub status: Option<String>,
}

impl PaymentSignal {
    /// The local fallback: settle successfully without consulting any gateway.
    pub fn simulated() -> Self {
        Self { simulate: true, ..Default::default() }
    }

    /// A webhook or callback carrying the gateway reference; the outcome is whatever the gateway says it is.
    pub fn for_reference<S: Into<String>>(tx_ref: S) -> Self {
        Self { tx_ref: Some(tx_ref.into()), ..Default::default() }
    }

    /// A redirect callback that only carries the gateway's `status` query parameter.
    pub fn from_redirect<S: Into<String>>(status: S) -> Self {
        Self { status: Some(status.into()), ..Default::default() }
    }
}

#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub transaction: Transaction,
    /// Where to send the customer: the gateway's hosted checkout, or the local simulated-verify URL when the
    /// gateway was unavailable.
    pub payment_link: String,
    pub simulated: bool,
}

#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// The payment succeeded and inventory was applied, exactly once.
    Completed { transaction: Transaction, deal: Deal },
    /// The payment did not succeed. No inventory effect.
    Failed { transaction: Transaction },
    /// The payment succeeded, but the deal sold out between purchase admission and settlement. The transaction is
    /// settled `Failed`.
    SoldOut { transaction: Transaction },
    /// The transaction had already been settled by an earlier signal. Nothing changed.
    AlreadySettled { transaction: Transaction },
}

/// `PurchaseFlowApi` is the transaction engine: it admits purchases against live inventory, opens payment sessions
/// with the external gateway, and settles transactions exactly once regardless of which reconcile path fires first.
pub struct PurchaseFlowApi<B, G> {
    db: B,
    gateway: G,
    redirect_base: String,
    producers: EventProducers,
}

impl<B, G> Debug for PurchaseFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PurchaseFlowApi")
    }
}

impl<B, G> PurchaseFlowApi<B, G> {
    pub fn new(db: B, gateway: G, redirect_base: String, producers: EventProducers) -> Self {
        let redirect_base = redirect_base.trim_end_matches('/').to_string();
        Self { db, gateway, redirect_base, producers }
    }
}

impl<B, G> PurchaseFlowApi<B, G>
where
    B: DealManagement + TransactionManagement + UserManagement + NotificationManagement,
    G: PaymentGateway,
{
    /// Admit a purchase and open a payment session.
    ///
    /// Admission is an early, read-only check against current inventory; the binding reservation happens at
    /// settlement. A transaction is always created `Pending` before the gateway is consulted, and a gateway failure
    /// never fails the purchase: the customer is sent to the local simulated-verify URL instead.
    pub async fn purchase(&self, customer_id: i64, request: PurchaseRequest) -> Result<PurchaseOutcome, PurchaseApiError> {
        if request.quantity <= 0 {
            return Err(PurchaseApiError::InvalidQuantity);
        }
        let deal = self.db.fetch_deal(request.deal_id).await?.ok_or(PurchaseApiError::DealNotFound)?;
        if deal.status != DealStatus::Approved || !deal.is_active {
            return Err(PurchaseApiError::DealNotAvailable);
        }
        let remaining = deal.remaining_quantity();
        if remaining < request.quantity {
            return Err(PurchaseApiError::InsufficientInventory { remaining });
        }
        let now = Utc::now();
        if deal.is_expired(now) {
            return Err(PurchaseApiError::DealExpired);
        }
        let customer = self.db.fetch_user_by_id(customer_id).await?.ok_or(PurchaseApiError::UserNotFound)?;
        let customer_name = customer.full_name();
        let amount = deal.discount_price * request.quantity;
        let tx = self
            .db
            .insert_transaction(&NewTransaction {
                user_id: customer_id,
                deal_id: deal.id,
                quantity: request.quantity,
                amount,
                payment_method: request.payment_method.clone(),
                phone_number: request.phone_number.clone(),
            })
            .await?;
        debug!("💳️ Transaction #{} created for deal #{} ({} x{})", tx.id, deal.id, amount, request.quantity);

        let tx_ref = format!("SNAPADEAL_{}_{}", tx.id, now.timestamp());
        let session = PaymentSessionRequest {
            tx_ref: tx_ref.clone(),
            amount,
            currency: UGX_CURRENCY_CODE.to_string(),
            redirect_url: format!(
                "{}/payment/verify?transaction_id={}&tx_ref={tx_ref}",
                self.redirect_base, tx.id
            ),
            payment_method: request.payment_method,
            customer: CustomerInfo { email: customer.email, phone: request.phone_number, name: customer_name },
            title: deal.title.clone(),
            description: deal.short_description.clone(),
            meta: PaymentMeta { deal_id: deal.id, transaction_id: tx.id, user_id: customer_id },
        };
        match self.gateway.create_payment_session(&session).await {
            Ok(link) => {
                self.db.set_payment_reference(tx.id, &tx_ref).await?;
                info!("💳️ Payment session opened for transaction #{}", tx.id);
                Ok(PurchaseOutcome { transaction: tx, payment_link: link, simulated: false })
            },
            Err(e) => {
                warn!("💳️ Payment gateway unavailable for transaction #{} ({e}). Falling back to simulation.", tx.id);
                let link =
                    format!("{}/payment/verify?transaction_id={}&simulate=true", self.redirect_base, tx.id);
                Ok(PurchaseOutcome { transaction: tx, payment_link: link, simulated: true })
            },
        }
    }

    /// Settle a transaction in response to a payment signal. All three triggers (webhook, redirect callback,
    /// explicit simulation) land here, and only the first signal for a transaction has any effect.
    pub async fn reconcile(&self, tx_id: i64, signal: PaymentSignal) -> Result<ReconcileOutcome, PurchaseApiError> {
        // Touch the transaction first so an unknown id is reported as such rather than as a settled no-op.
        let _ = self.db.fetch_transaction(tx_id).await?.ok_or(PurchaseApiError::TransactionNotFound(tx_id))?;
        let success = if signal.simulate {
            debug!("💳️ Transaction #{tx_id} settling via simulation");
            true
        } else if let Some(tx_ref) = signal.tx_ref.as_deref() {
            match self.gateway.verify_by_reference(tx_ref).await {
                Ok(verified) => verified,
                Err(e) => {
                    warn!("💳️ Could not verify [{tx_ref}] with the gateway: {e}. Treating as failed.");
                    false
                },
            }
        } else {
            matches!(
                signal.status.as_deref(),
                Some(s)
                    if s.eq_ignore_ascii_case("successful")
                        || s.eq_ignore_ascii_case("success")
                        || s.eq_ignore_ascii_case("completed")
            )
        };

        let outcome = self.db.settle_transaction(tx_id, success, signal.tx_ref.as_deref()).await?;
        match outcome {
            SettlementOutcome::Settled { transaction, deal: Some(deal) }
                if transaction.status == TransactionStatus::Completed =>
            {
                info!("💳️ Transaction #{tx_id} completed; deal #{} now at {}/{}", deal.id, deal.sold_quantity, deal.max_quantity);
                self.notify_merchant_of_sale(&deal, &transaction).await;
                for emitter in &self.producers.deal_purchased_producer {
                    emitter.publish_event(DealPurchasedEvent::new(deal.clone(), transaction.clone())).await;
                }
                Ok(ReconcileOutcome::Completed { transaction, deal })
            },
            SettlementOutcome::Settled { transaction, .. } => {
                info!("💳️ Transaction #{tx_id} settled as failed");
                Ok(ReconcileOutcome::Failed { transaction })
            },
            SettlementOutcome::SoldOut { transaction } => {
                warn!("💳️ Transaction #{tx_id} paid but the deal sold out first; settled as failed");
                Ok(ReconcileOutcome::SoldOut { transaction })
            },
            SettlementOutcome::AlreadySettled { transaction } => {
                debug!("💳️ Transaction #{tx_id} already settled ({}); signal ignored", transaction.status);
                Ok(ReconcileOutcome::AlreadySettled { transaction })
            },
        }
    }

    /// A customer's own purchase history, newest first.
    pub async fn user_transactions(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, PurchaseApiError> {
        Ok(self.db.fetch_transactions_for_user(user_id, limit, offset).await?)
    }

    pub async fn fetch_transaction(&self, tx_id: i64) -> Result<Transaction, PurchaseApiError> {
        self.db.fetch_transaction(tx_id).await?.ok_or(PurchaseApiError::TransactionNotFound(tx_id))
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    async fn notify_merchant_of_sale(&self, deal: &Deal, tx: &Transaction) {
        let notification = NewNotification {
            user_id: deal.merchant_id,
            title: "Deal purchased".to_string(),
            message: format!("\"{}\" sold x{} for {}.", deal.title, tx.quantity, tx.amount),
            notification_type: NotificationType::DealPurchased,
            data: serde_json::json!({ "deal_id": deal.id, "transaction_id": tx.id, "quantity": tx.quantity })
                .to_string(),
        };
        if let Err(e) = self.db.insert_notification(&notification).await {
            warn!("💳️ Could not write sale notification for deal #{}: {e}", deal.id);
        }
    }
}
