use serde::{Deserialize, Serialize};
use snapadeal_engine::traits::PaymentSessionRequest;

/// The body of a `POST /payments` request, shaped exactly as the Flutterwave v3 API expects it. Amounts go over the
/// wire as decimal strings and the phone field is spelled `phonenumber`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPayload {
    pub tx_ref: String,
    pub amount: String,
    pub currency: String,
    pub redirect_url: String,
    pub payment_options: String,
    pub customer: CustomerPayload,
    pub customizations: Customizations,
    pub meta: Vec<PaymentMetaItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub email: String,
    pub phonenumber: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customizations {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMetaItem {
    pub deal_id: i64,
    pub transaction_id: i64,
    pub user_id: i64,
}

impl From<&PaymentSessionRequest> for PaymentPayload {
    fn from(req: &PaymentSessionRequest) -> Self {
        Self {
            tx_ref: req.tx_ref.clone(),
            amount: req.amount.to_decimal_string(),
            currency: req.currency.clone(),
            redirect_url: req.redirect_url.clone(),
            payment_options: req.payment_method.clone(),
            customer: CustomerPayload {
                email: req.customer.email.clone(),
                phonenumber: req.customer.phone.clone(),
                name: req.customer.name.clone(),
            },
            customizations: Customizations { title: req.title.clone(), description: req.description.clone() },
            meta: vec![PaymentMetaItem {
                deal_id: req.meta.deal_id,
                transaction_id: req.meta.transaction_id,
                user_id: req.meta.user_id,
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<PaymentLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLink {
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub status: String,
    pub data: Option<VerifyData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyData {
    pub status: String,
}

impl VerifyResponse {
    /// A payment only counts as verified when the envelope succeeded *and* the transaction itself did.
    pub fn is_successful(&self) -> bool {
        self.status == "success" && self.data.as_ref().map(|d| d.status == "successful").unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    use snap_common::Money;
    use snapadeal_engine::traits::{CustomerInfo, PaymentMeta};

    use super::*;

    fn session() -> PaymentSessionRequest {
        PaymentSessionRequest {
            tx_ref: "SNAPADEAL_7_1700000000".to_string(),
            amount: Money::from_whole(240),
            currency: "UGX".to_string(),
            redirect_url: "http://localhost:3000/payment/verify?transaction_id=7&tx_ref=SNAPADEAL_7_1700000000"
                .to_string(),
            payment_method: "mobilemoney".to_string(),
            customer: CustomerInfo {
                email: "buyer@example.com".to_string(),
                phone: "+256700000009".to_string(),
                name: "Amina Test".to_string(),
            },
            title: "Two-for-one lunch special".to_string(),
            description: "2-for-1 lunch".to_string(),
            meta: PaymentMeta { deal_id: 3, transaction_id: 7, user_id: 11 },
        }
    }

    #[test]
    fn payload_matches_the_wire_shape() {
        let payload = PaymentPayload::from(&session());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["tx_ref"], "SNAPADEAL_7_1700000000");
        assert_eq!(json["amount"], "240.00");
        assert_eq!(json["currency"], "UGX");
        assert_eq!(json["payment_options"], "mobilemoney");
        assert_eq!(json["customer"]["phonenumber"], "+256700000009");
        assert_eq!(json["meta"][0]["transaction_id"], 7);
    }

    #[test]
    fn verification_requires_both_statuses() {
        let ok: VerifyResponse =
            serde_json::from_str(r#"{"status":"success","data":{"status":"successful"}}"#).unwrap();
        assert!(ok.is_successful());
        let pending: VerifyResponse =
            serde_json::from_str(r#"{"status":"success","data":{"status":"pending"}}"#).unwrap();
        assert!(!pending.is_successful());
        let failed: VerifyResponse = serde_json::from_str(r#"{"status":"error","data":null}"#).unwrap();
        assert!(!failed.is_successful());
    }

    #[test]
    fn payment_response_parses_with_and_without_link() {
        let ok: PaymentResponse = serde_json::from_str(
            r#"{"status":"success","message":"Hosted Link","data":{"link":"https://checkout.flutterwave.com/v3/hosted/pay/abc"}}"#,
        )
        .unwrap();
        assert_eq!(ok.status, "success");
        assert_eq!(ok.data.unwrap().link, "https://checkout.flutterwave.com/v3/hosted/pay/abc");

        let err: PaymentResponse =
            serde_json::from_str(r#"{"status":"error","message":"Invalid currency"}"#).unwrap();
        assert!(err.data.is_none());
    }
}
