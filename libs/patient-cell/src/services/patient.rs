use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::StoreClient;
use shared_utils::validation::validate_phone;

use crate::models::{CreatePatientRequest, Patient, PatientError, UpdatePatientRequest};

pub struct PatientService {
    store: StoreClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    pub async fn register(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        let name = match request.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err(PatientError::ValidationError("Name is required".to_string())),
        };

        let phone = request.phone.as_deref().unwrap_or("").trim().to_string();
        if !validate_phone(&phone) {
            return Err(PatientError::InvalidPhone);
        }

        debug!("Registering patient with phone {}", phone);

        if self.find_by_phone_opt(&phone).await?.is_some() {
            return Err(PatientError::PhoneAlreadyExists);
        }

        let now = Utc::now();
        let patient_data = json!({
            "id": Uuid::new_v4(),
            "name": name,
            "phone": phone,
            "age": request.age,
            "gender": request.gender,
            "address": request.address,
            "guardianName": request.guardian_name.unwrap_or_default(),
            "guardianContact": request.guardian_contact.unwrap_or_default(),
            "history": [],
            "createdAt": now.to_rfc3339(),
            "updatedAt": now.to_rfc3339()
        });

        let result: Vec<Patient> = self.store.insert("/rest/v1/patients", patient_data).await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| PatientError::DatabaseError("Failed to create patient".to_string()))
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Patient, PatientError> {
        self.find_by_phone_opt(phone.trim())
            .await?
            .ok_or(PatientError::NotFound)
    }

    async fn find_by_phone_opt(&self, phone: &str) -> Result<Option<Patient>, PatientError> {
        let path = format!(
            "/rest/v1/patients?phone=eq.{}&limit=1",
            urlencoding::encode(phone)
        );
        let result: Vec<Patient> = self.store.select(&path).await?;
        Ok(result.into_iter().next())
    }

    pub async fn find_by_id(&self, patient_id: &str) -> Result<Patient, PatientError> {
        let path = format!(
            "/rest/v1/patients?id=eq.{}",
            urlencoding::encode(patient_id)
        );
        let result: Vec<Patient> = self.store.select(&path).await?;

        result.into_iter().next().ok_or(PatientError::NotFound)
    }

    pub async fn list_all(&self) -> Result<Vec<Patient>, PatientError> {
        let patients: Vec<Patient> = self
            .store
            .select("/rest/v1/patients?order=createdAt.desc")
            .await?;
        Ok(patients)
    }

    pub async fn update(
        &self,
        patient_id: &str,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient {}", patient_id);

        let existing = self.find_by_id(patient_id).await?;

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name.trim()));
        }
        if let Some(age) = request.age {
            update_data.insert("age".to_string(), json!(age));
        }
        if let Some(phone) = request.phone {
            let phone = phone.trim().to_string();
            if !validate_phone(&phone) {
                return Err(PatientError::InvalidPhone);
            }
            // A phone change must not collide with another registration.
            if phone != existing.phone && self.find_by_phone_opt(&phone).await?.is_some() {
                return Err(PatientError::PhoneAlreadyExists);
            }
            update_data.insert("phone".to_string(), json!(phone));
        }

        update_data.insert("updatedAt".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/patients?id=eq.{}",
            urlencoding::encode(patient_id)
        );
        let result: Vec<Patient> = self
            .store
            .update(&path, Value::Object(update_data))
            .await?;

        result.into_iter().next().ok_or(PatientError::NotFound)
    }
}
