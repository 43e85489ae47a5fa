use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::database::models::Registration;
use crate::database::DatabaseError;
use crate::error::FieldErrors;
use crate::types::PaymentStatus;
use crate::validation::{Validate, Validator};

use super::registration_service::{PaymentReference, PaymentUpdate, RegistrationService};

/// Subset of the Asaas webhook body we act on
#[derive(Debug, Clone, Deserialize)]
pub struct AsaasWebhook {
    pub event: String,
    pub payment: Option<AsaasPayment>,
}

impl Validate for AsaasWebhook {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new().required("event", &self.event).finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsaasPayment {
    pub id: String,
    pub external_reference: Option<String>,
    pub value: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookOutcome {
    pub processed: bool,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<Registration>,
}

/// Registration status an Asaas event moves to, if any
pub fn status_for_event(event: &str) -> Option<PaymentStatus> {
    match event {
        "PAYMENT_CONFIRMED" | "PAYMENT_RECEIVED" | "PAYMENT_RECEIVED_IN_CASH" => Some(PaymentStatus::Paid),
        "PAYMENT_REFUNDED" | "PAYMENT_CHARGEBACK_REQUESTED" => Some(PaymentStatus::Refunded),
        _ => None,
    }
}

pub struct PaymentWebhookService {
    registrations: RegistrationService,
}

impl PaymentWebhookService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            registrations: RegistrationService::new(pool),
        }
    }

    pub async fn handle(&self, webhook: AsaasWebhook) -> Result<WebhookOutcome, DatabaseError> {
        let Some(status) = status_for_event(&webhook.event) else {
            tracing::debug!("Ignoring Asaas event {}", webhook.event);
            return Ok(WebhookOutcome { processed: false, event: webhook.event, registration: None });
        };

        let payment = webhook
            .payment
            .as_ref()
            .ok_or_else(|| DatabaseError::NotFound("Webhook carries no payment".to_string()))?;

        let reference = payment
            .external_reference
            .as_deref()
            .and_then(PaymentReference::parse)
            .ok_or_else(|| DatabaseError::NotFound(format!("Payment {} has no external reference", payment.id)))?;

        tracing::info!(
            "Asaas {} for payment {} (value {:?}, reference {:?})",
            webhook.event,
            payment.id,
            payment.value,
            reference
        );

        let (processed, registration) = match self
            .registrations
            .apply_payment_update(&reference, status, Some(payment.id.as_str()))
            .await?
        {
            PaymentUpdate::Applied(registration) => (true, registration),
            PaymentUpdate::Ignored(registration) => (false, registration),
        };

        Ok(WebhookOutcome {
            processed,
            event: webhook.event,
            registration: Some(registration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_mapping() {
        assert_eq!(status_for_event("PAYMENT_CONFIRMED"), Some(PaymentStatus::Paid));
        assert_eq!(status_for_event("PAYMENT_RECEIVED"), Some(PaymentStatus::Paid));
        assert_eq!(status_for_event("PAYMENT_REFUNDED"), Some(PaymentStatus::Refunded));
        assert_eq!(status_for_event("PAYMENT_OVERDUE"), None);
        assert_eq!(status_for_event("payment_confirmed"), None);
    }

    #[test]
    fn parses_asaas_body() {
        let body = serde_json::json!({
            "event": "PAYMENT_RECEIVED",
            "payment": {
                "id": "pay_080225913252",
                "externalReference": "RH-0A1B2C3D",
                "value": 120.0,
                "status": "RECEIVED",
                "billingType": "PIX"
            }
        });
        let webhook: AsaasWebhook = serde_json::from_value(body).unwrap();
        let payment = webhook.payment.unwrap();
        assert_eq!(payment.id, "pay_080225913252");
        assert_eq!(payment.external_reference.as_deref(), Some("RH-0A1B2C3D"));
    }
}
