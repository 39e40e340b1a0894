use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::StoreClient;

use crate::models::{Token, TokenError, TokenStatus, UpdateTokenStatusRequest};

const EMBED_PATIENT: &str = "select=*,patient:patients(*)";

pub struct TokenQueueService {
    store: StoreClient,
}

impl TokenQueueService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    pub async fn list(
        &self,
        patient_phone: Option<&str>,
        status: Option<TokenStatus>,
    ) -> Result<Vec<Token>, TokenError> {
        let mut path = format!("/rest/v1/tokens?{}", EMBED_PATIENT);
        if let Some(phone) = patient_phone {
            path.push_str(&format!(
                "&patientPhone=eq.{}",
                urlencoding::encode(phone.trim())
            ));
        }
        if let Some(status) = status {
            path.push_str(&format!("&status=eq.{}", status));
        }
        path.push_str("&order=createdAt.desc");

        let tokens: Vec<Token> = self.store.select(&path).await?;
        Ok(tokens)
    }

    /// The doctor's queue: waiting tokens in call order.
    pub async fn list_waiting(&self) -> Result<Vec<Token>, TokenError> {
        let path = format!(
            "/rest/v1/tokens?{}&status=eq.waiting&order=tokenNumber.asc",
            EMBED_PATIENT
        );
        let tokens: Vec<Token> = self.store.select(&path).await?;
        Ok(tokens)
    }

    pub async fn find_by_id(&self, token_id: &str) -> Result<Token, TokenError> {
        let path = format!(
            "/rest/v1/tokens?id=eq.{}&{}",
            urlencoding::encode(token_id),
            EMBED_PATIENT
        );
        let result: Vec<Token> = self.store.select(&path).await?;

        result.into_iter().next().ok_or(TokenError::NotFound)
    }

    pub async fn find_latest_by_phone(&self, phone: &str) -> Result<Token, TokenError> {
        let path = format!(
            "/rest/v1/tokens?patientPhone=eq.{}&{}&order=createdAt.desc&limit=1",
            urlencoding::encode(phone.trim()),
            EMBED_PATIENT
        );
        let result: Vec<Token> = self.store.select(&path).await?;

        result.into_iter().next().ok_or(TokenError::NotFound)
    }

    /// Move the token matching (phone, currentStatus) along the lifecycle.
    /// When several tokens share that pair the newest one is taken. The write
    /// itself is conditional on the status still being `currentStatus`, so a
    /// concurrent transition makes this call fail rather than clobber.
    pub async fn update_status(
        &self,
        request: UpdateTokenStatusRequest,
    ) -> Result<Token, TokenError> {
        let phone = request.patient_phone.as_deref().unwrap_or("").trim().to_string();
        let current_raw = request.current_status.as_deref().unwrap_or("").trim();
        let new_raw = request.new_status.as_deref().unwrap_or("").trim();

        if phone.is_empty() || current_raw.is_empty() || new_raw.is_empty() {
            return Err(TokenError::MissingUpdateFields);
        }

        let current: TokenStatus = current_raw.parse()?;
        let new: TokenStatus = new_raw.parse()?;

        if !current.can_transition_to(&new) {
            return Err(TokenError::NoMatchingToken);
        }

        let lookup_path = format!(
            "/rest/v1/tokens?patientPhone=eq.{}&status=eq.{}&order=createdAt.desc&limit=1",
            urlencoding::encode(&phone),
            current
        );
        let matches: Vec<Token> = self.store.select(&lookup_path).await?;
        let token = matches.into_iter().next().ok_or(TokenError::NoMatchingToken)?;

        debug!(
            "Transitioning token {} ({} -> {})",
            token.id, current, new
        );

        let mut patch = json!({ "status": new.to_string() });
        if let Some(issue) = request.new_issue {
            patch["issue"] = json!(issue);
        }

        let update_path = format!(
            "/rest/v1/tokens?id=eq.{}&status=eq.{}",
            token.id, current
        );
        let updated: Vec<Token> = self.store.update(&update_path, patch).await?;

        updated.into_iter().next().ok_or(TokenError::NoMatchingToken)
    }
}
