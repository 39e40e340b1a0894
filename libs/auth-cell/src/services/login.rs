use tracing::debug;

use shared_config::AppConfig;
use shared_database::StoreClient;

use crate::models::{AuthError, LoginRequest, StaffMember};
use crate::services::password::PasswordService;

pub struct AuthService {
    store: StoreClient,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Check desk credentials against the staff table. Unknown emails and
    /// wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> Result<StaffMember, AuthError> {
        let email = request.email.as_deref().unwrap_or("").trim().to_string();
        let password = request.password.as_deref().unwrap_or("").to_string();

        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let path = format!(
            "/rest/v1/staff?email=eq.{}&limit=1",
            urlencoding::encode(&email)
        );
        let accounts: Vec<StaffMember> = self.store.select(&path).await?;
        let member = match accounts.into_iter().next() {
            Some(member) => member,
            None => {
                debug!("No staff account for {}", email);
                return Err(AuthError::InvalidCredentials);
            }
        };

        match PasswordService::verify_password(&password, &member.password) {
            Ok(true) => Ok(member),
            Ok(false) => {
                debug!("Password mismatch for {}", email);
                Err(AuthError::InvalidCredentials)
            }
            Err(err) => Err(AuthError::DatabaseError(err.to_string())),
        }
    }
}
