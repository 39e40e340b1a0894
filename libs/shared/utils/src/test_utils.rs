use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub store_url: String,
    pub store_service_key: String,
    pub consultation_fee: f64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:54321".to_string(),
            store_service_key: "test-service-key".to_string(),
            consultation_fee: 1000.0,
        }
    }
}

impl TestConfig {
    pub fn with_store_url(url: &str) -> Self {
        Self {
            store_url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_service_key: self.store_service_key.clone(),
            consultation_fee: self.consultation_fee,
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned store documents for wiremock-backed router tests. Shapes mirror
/// what the live store serves.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn patient_doc(id: &str, phone: &str) -> Value {
        json!({
            "id": id,
            "name": "Test Patient",
            "phone": phone,
            "age": 30,
            "gender": "female",
            "address": "12 Lake Road",
            "guardianName": "",
            "guardianContact": "",
            "history": [],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    pub fn token_doc(id: &str, number: i64, phone: &str, status: &str) -> Value {
        json!({
            "id": id,
            "tokenNumber": number,
            "patientId": Uuid::new_v4(),
            "patientPhone": phone,
            "status": status,
            "issue": "fever",
            "createdAt": "2024-01-02T09:00:00Z"
        })
    }

    pub fn token_doc_with_patient(id: &str, number: i64, phone: &str, status: &str) -> Value {
        let mut doc = Self::token_doc(id, number, phone, status);
        doc["patient"] = Self::patient_doc(&Uuid::new_v4().to_string(), phone);
        doc
    }

    pub fn medicine_entry(name: &str, price: f64) -> Value {
        json!({
            "name": name,
            "dose": "1+0+1",
            "duration": "7 days",
            "notes": "",
            "quantity": 14,
            "beforeMeal": false,
            "afterMeal": true,
            "morning": true,
            "noon": false,
            "night": true,
            "price": price
        })
    }

    pub fn prescription_doc(id: &str, token_id: &str, phone: &str, discount: f64) -> Value {
        json!({
            "id": id,
            "patientId": Uuid::new_v4(),
            "patientPhone": phone,
            "tokenId": token_id,
            "meds": [Self::medicine_entry("Napa Extra", 200.0)],
            "notes": "after meals",
            "discount": discount,
            "createdAt": "2024-01-02T09:30:00Z"
        })
    }

    pub fn billing_doc(id: &str, token_id: &str, phone: &str, amount: f64, paid: f64) -> Value {
        json!({
            "id": id,
            "patientId": Uuid::new_v4(),
            "patientPhone": phone,
            "tokenId": token_id,
            "amount": amount,
            "paidAmount": paid,
            "returnAmount": paid - amount,
            "discount": 0.0,
            "createdAt": "2024-01-02T10:00:00Z"
        })
    }

    pub fn staff_doc(id: &str, email: &str, password_hash: &str, role: &str) -> Value {
        json!({
            "id": id,
            "name": "Dr. Test",
            "email": email,
            "password": password_hash,
            "role": role,
            "createdAt": "2024-01-01T00:00:00Z"
        })
    }
}
