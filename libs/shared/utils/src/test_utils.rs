use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use uuid::Uuid;

use shared_config::ClientConfig;
use shared_models::auth::Role;

pub const TEST_SIGNING_SECRET: &str = "test-secret-key-for-token-minting-must-be-long-enough";

pub struct TestConfig {
    pub base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::single_host(&self.base_url)
    }
}

pub struct TestUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Test Patient".to_string(),
            email: format!("patient-{}@example.com", Uuid::new_v4().simple()),
            role: Role::Patient,
        }
    }
}

impl TestUser {
    pub fn new(id: i64, name: &str, email: &str, role: Role) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn doctor(id: i64, email: &str) -> Self {
        Self::new(id, "Dr. Rahul", email, Role::Doctor)
    }

    pub fn patient(id: i64, email: &str) -> Self {
        Self::new(id, "Asha Rao", email, Role::Patient)
    }

    pub fn admin(id: i64, email: &str) -> Self {
        Self::new(id, "Clinic Admin", email, Role::Admin)
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(10));

        let payload = json!({
            "sub": user.email,
            "role": user.role.as_str(),
            "id": user.id,
            "name": user.name,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        Self::sign(&payload)
    }

    /// Token whose payload is exactly `payload`, signed with the test secret.
    pub fn sign(payload: &serde_json::Value) -> String {
        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(TEST_SIGNING_SECRET.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser) -> String {
        Self::create_test_token(user, Some(-1))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn user_response(id: i64, name: &str, role: Role) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "userEmail": format!("user{}@example.com", id),
            "phone": 9876543210u64,
            "age": 34,
            "role": role.as_str(),
            "specialisation": if role == Role::Doctor { json!("Cardiology") } else { json!(null) }
        })
    }

    pub fn doctor_summary_response(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "phone": 9123456780u64,
            "email": format!("doctor{}@clinic.in", id)
        })
    }

    pub fn appointment_response(id: i64, patient_id: i64, doctor_id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "patientId": patient_id,
            "doctorId": doctor_id,
            "date": "2025-12-24",
            "slot": "09:00-10:00",
            "patientName": "Asha Rao",
            "patientEmail": "asha@example.com",
            "doctorName": "Dr. Rahul",
            "startTime": "09:00",
            "endTime": "10:00",
            "reason": "Follow-up",
            "status": "BOOKED"
        })
    }

    pub fn availability_response(doctor_id: i64, date: &str, slots: &[&str]) -> serde_json::Value {
        json!({
            "doctorID": doctor_id,
            "date": date,
            "timeSlots": slots,
            "doctorName": "Dr. Rahul",
            "specialty": "Cardiology"
        })
    }

    pub fn consultation_response(id: i64, appointment_id: i64, patient_id: i64) -> serde_json::Value {
        json!({
            "consultationId": id,
            "notes": "Mild fever, advised rest",
            "prescription": "Paracetamol 500mg twice daily",
            "appointmentId": appointment_id,
            "patientId": patient_id
        })
    }

    pub fn error_response(message: &str, details: &str) -> serde_json::Value {
        json!({
            "timestamp": "2025-09-15T10:00:00",
            "message": message,
            "details": details
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::decode_claims;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::with_base_url("http://127.0.0.1:4010").to_client_config();

        assert_eq!(config.auth_api_url(), "http://127.0.0.1:4010/auth");
        assert!(config.is_configured());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::doctor(5, "doc@example.com");
        assert_eq!(user.email, "doc@example.com");
        assert_eq!(user.role, Role::Doctor);
    }

    #[test]
    fn test_jwt_token_creation() {
        let user = TestUser::patient(7, "asha@example.com");
        let token = JwtTestUtils::create_test_token(&user, Some(1));

        assert_eq!(token.split('.').count(), 3);

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.role.as_deref(), Some("PATIENT"));
        assert_eq!(claims.user_id, Some(7));
        assert_eq!(claims.email.as_deref(), Some("asha@example.com"));
    }

    #[test]
    fn test_expired_token_still_decodes() {
        let token = JwtTestUtils::create_expired_token(&TestUser::admin(1, "admin@clinic.in"));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.role.as_deref(), Some("ADMIN"));
        assert!(claims.expires_at.unwrap() < Utc::now());
    }
}
