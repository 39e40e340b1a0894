use chrono::Utc;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use prescription_cell::models::Prescription;
use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};
use token_cell::models::{Token, TokenError, TokenStatus};
use token_cell::services::TokenQueueService;

use crate::models::{BillQuote, Billing, BillingError, RecordPaymentRequest};
use crate::services::calculator::compute_bill;

pub struct BillingService {
    store: StoreClient,
    tokens: TokenQueueService,
    consultation_fee: f64,
}

impl BillingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            tokens: TokenQueueService::new(config),
            consultation_fee: config.consultation_fee,
        }
    }

    /// Settle a seen visit: persist the billing record, then complete the
    /// token. The desk retries this call as-is after a failure, so both
    /// writes tolerate having already happened.
    pub async fn record_payment(
        &self,
        request: RecordPaymentRequest,
    ) -> Result<Billing, BillingError> {
        let patient_id = request.patient.as_deref().unwrap_or("").trim().to_string();
        let token_id = request.token.as_deref().unwrap_or("").trim().to_string();
        let (amount, paid) = match (request.amount, request.paid_amount) {
            (Some(amount), Some(paid)) => (amount, paid),
            _ => return Err(BillingError::MissingFields),
        };
        if patient_id.is_empty() || token_id.is_empty() {
            return Err(BillingError::MissingFields);
        }
        let discount = request.discount.unwrap_or(0.0);

        let token = self.find_token(&token_id).await?;

        match token.status {
            TokenStatus::Seen => {}
            TokenStatus::Completed => {
                // A retried submission whose earlier attempt got all the
                // way through. Hand back the bill that attempt saved.
                if let Some(existing) = self.find_by_token(&token.id).await? {
                    debug!("Token {} already billed, returning existing record", token.id);
                    return Ok(existing);
                }
                return Err(BillingError::TokenNotSeen);
            }
            _ => return Err(BillingError::TokenNotSeen),
        }

        if paid < amount {
            return Err(BillingError::Underpaid);
        }
        let return_amount = paid - amount;

        // The token row is authoritative for patient identity.
        let billing_doc = json!({
            "id": Uuid::new_v4(),
            "patientId": token.patient_id,
            "patientPhone": token.patient_phone,
            "tokenId": token.id,
            "amount": amount,
            "paidAmount": paid,
            "returnAmount": return_amount,
            "discount": discount,
            "createdAt": Utc::now().to_rfc3339(),
        });

        let billing = match self.store.insert::<Billing>("/rest/v1/billings", billing_doc).await {
            Ok(created) => created.into_iter().next().ok_or_else(|| {
                BillingError::DatabaseError("Store returned no billing record".to_string())
            })?,
            Err(StoreError::Conflict(_)) => {
                // An earlier attempt saved the bill but died before
                // completing the token. Reuse its record and move on.
                debug!("Billing for token {} already on file, reusing it", token.id);
                self.find_by_token(&token.id).await?.ok_or_else(|| {
                    BillingError::DatabaseError(
                        "Billing conflict without an existing record".to_string(),
                    )
                })?
            }
            Err(err) => return Err(err.into()),
        };

        let update_path = format!("/rest/v1/tokens?id=eq.{}&status=eq.seen", token.id);
        let updated: Vec<Token> = self
            .store
            .update(&update_path, json!({ "status": TokenStatus::Completed.to_string() }))
            .await?;

        if updated.is_empty() {
            // Lost the conditional write. Fine only when another attempt
            // already moved the token past seen.
            let current = self.find_token(&token.id.to_string()).await?;
            if current.status != TokenStatus::Completed {
                return Err(BillingError::DatabaseError(format!(
                    "Token {} was not completed after billing",
                    token.id
                )));
            }
        }

        Ok(billing)
    }

    /// Bill preview for a seen visit, before any money changes hands.
    pub async fn quote(&self, token_id: &str) -> Result<BillQuote, BillingError> {
        let token = self.find_token(token_id).await?;
        if token.status != TokenStatus::Seen {
            return Err(BillingError::TokenNotSeen);
        }

        let path = format!(
            "/rest/v1/prescriptions?tokenId=eq.{}&order=createdAt.desc&limit=1",
            token.id
        );
        let prescriptions: Vec<Prescription> = self.store.select(&path).await?;
        let prescription = prescriptions
            .into_iter()
            .next()
            .ok_or(BillingError::PrescriptionNotFound)?;

        let prices: Vec<f64> = prescription
            .meds
            .iter()
            .map(|med| med.price.unwrap_or(0.0))
            .collect();
        let bill = compute_bill(self.consultation_fee, prescription.discount, &prices);

        let patient = token.patient.as_ref();
        Ok(BillQuote {
            token_id: token.id,
            token_number: token.token_number,
            name: patient.map(|p| p.name.clone()).unwrap_or_default(),
            phone: token.patient_phone.clone(),
            age: patient.and_then(|p| p.age),
            issue: token.issue.clone(),
            doctor_fee: bill.doctor_fee,
            medicine_fee: bill.medicine_fee,
            discount: bill.discount,
            total: bill.total,
        })
    }

    async fn find_token(&self, token_id: &str) -> Result<Token, BillingError> {
        match self.tokens.find_by_id(token_id).await {
            Ok(token) => Ok(token),
            Err(TokenError::NotFound) => Err(BillingError::TokenNotFound),
            Err(err) => Err(BillingError::DatabaseError(err.to_string())),
        }
    }

    async fn find_by_token(&self, token_id: &Uuid) -> Result<Option<Billing>, BillingError> {
        let path = format!("/rest/v1/billings?tokenId=eq.{}&limit=1", token_id);
        let billings: Vec<Billing> = self.store.select(&path).await?;
        Ok(billings.into_iter().next())
    }
}
