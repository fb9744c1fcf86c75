use chrono::NaiveDate;
use reqwest::Method;
use tracing::{debug, info, warn};

use shared_config::ClientConfig;
use shared_gateway::dispatcher::to_body;
use shared_gateway::RequestDispatcher;
use shared_models::error::ClientError;

use crate::models::{
    Appointment, AppointmentCancelInfo, AppointmentRequest, AppointmentUpdateRequest, DoctorSummary,
};

pub struct AppointmentService {
    dispatcher: RequestDispatcher,
    base_url: String,
}

impl AppointmentService {
    pub fn new(config: &ClientConfig, dispatcher: RequestDispatcher) -> Self {
        Self {
            dispatcher,
            base_url: config.appointments_api_url(),
        }
    }

    /// Book an appointment. Every failure, including a 500, is returned to
    /// the caller; nothing is fabricated locally.
    pub async fn book(&self, request: &AppointmentRequest) -> Result<Appointment, ClientError> {
        debug!("Booking {} for patient {} with doctor {}", request.slot, request.patient_id, request.doctor_id);

        let url = format!("{}/book", self.base_url);
        let appointment: Appointment = self
            .dispatcher
            .send_json(Method::POST, &url, Some(to_body(request)?))
            .await?;

        info!("Appointment {} booked", appointment.id);
        Ok(appointment)
    }

    pub async fn update(&self, id: i64, request: &AppointmentUpdateRequest) -> Result<Appointment, ClientError> {
        debug!("Updating appointment {}", id);

        let url = format!("{}/update/{}", self.base_url, id);
        self.dispatcher
            .send_json(Method::PUT, &url, Some(to_body(request)?))
            .await
    }

    pub async fn cancel(&self, id: i64, info: &AppointmentCancelInfo) -> Result<String, ClientError> {
        debug!("Cancelling appointment {}", id);

        let url = format!("{}/cancel/{}", self.base_url, id);
        self.dispatcher
            .send_for_text(Method::DELETE, &url, Some(to_body(info)?))
            .await
    }

    pub async fn list_by_patient(&self, patient_id: i64) -> Result<Vec<Appointment>, ClientError> {
        let url = format!("{}/patient/{}", self.base_url, patient_id);
        self.dispatcher.get_json(&url).await
    }

    pub async fn list_by_doctor(&self, doctor_id: i64) -> Result<Vec<Appointment>, ClientError> {
        let url = format!("{}/doctor/{}", self.base_url, doctor_id);
        self.dispatcher.get_json(&url).await
    }

    pub async fn upcoming(&self, patient_id: i64, date: NaiveDate) -> Result<Appointment, ClientError> {
        let url = format!("{}/upcoming?patientId={}&date={}", self.base_url, patient_id, date);
        self.dispatcher.get_json(&url).await
    }

    pub async fn list_by_specialisation(&self, specialisation: &str) -> Result<Vec<DoctorSummary>, ClientError> {
        let url = format!(
            "{}/by-specialisation/{}",
            self.base_url,
            urlencoding::encode(specialisation)
        );
        self.dispatcher.get_json(&url).await
    }

    /// Free slots for a doctor on a date. Failures yield an empty list so the
    /// booking wizard simply shows nothing to pick.
    pub async fn list_available_slots(&self, doctor_id: i64, date: NaiveDate) -> Vec<String> {
        let url = format!("{}/available-slots/{}/{}", self.base_url, doctor_id, date);
        match self.dispatcher.get_json(&url).await {
            Ok(slots) => slots,
            Err(e) => {
                warn!("Available slots lookup failed for doctor {} on {}: {}", doctor_id, date, e);
                Vec::new()
            }
        }
    }
}
