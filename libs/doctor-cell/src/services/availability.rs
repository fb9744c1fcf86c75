use chrono::NaiveDate;
use reqwest::Method;
use tracing::{debug, info};

use shared_config::ClientConfig;
use shared_gateway::dispatcher::to_body;
use shared_gateway::RequestDispatcher;
use shared_models::error::ClientError;

use crate::models::Availability;

pub struct AvailabilityService {
    dispatcher: RequestDispatcher,
    base_url: String,
}

impl AvailabilityService {
    pub fn new(config: &ClientConfig, dispatcher: RequestDispatcher) -> Self {
        Self {
            dispatcher,
            base_url: config.availability_api_url(),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Availability>, ClientError> {
        self.dispatcher.get_json(&self.base_url).await
    }

    pub async fn get_one(&self, doctor_id: i64, date: NaiveDate) -> Result<Availability, ClientError> {
        let url = format!("{}/{}/{}", self.base_url, doctor_id, date);
        self.dispatcher.get_json(&url).await
    }

    /// Availability records for a doctor within an inclusive date range.
    pub async fn get_by_doctor(
        &self,
        doctor_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Availability>, ClientError> {
        debug!("Fetching availability for doctor {} from {} to {}", doctor_id, start_date, end_date);

        let url = format!(
            "{}/doctor/{}?startDate={}&endDate={}",
            self.base_url, doctor_id, start_date, end_date
        );
        self.dispatcher.get_json(&url).await
    }

    pub async fn check(&self, doctor_id: i64, date: NaiveDate, time_slot: &str) -> Result<bool, ClientError> {
        let url = format!(
            "{}/check?doctorID={}&date={}&timeSlot={}",
            self.base_url,
            doctor_id,
            date,
            urlencoding::encode(time_slot)
        );
        self.dispatcher.get_json(&url).await
    }

    pub async fn add(&self, availability: &Availability) -> Result<Availability, ClientError> {
        debug!(
            "Adding {} slots for doctor {} on {}",
            availability.time_slots.len(),
            availability.doctor_id,
            availability.date
        );

        let created: Availability = self
            .dispatcher
            .send_json(Method::POST, &self.base_url, Some(to_body(availability)?))
            .await?;

        info!("Availability stored for doctor {} on {}", created.doctor_id, created.date);
        Ok(created)
    }

    /// In-place update of the record at `(doctor_id, date)`.
    pub async fn update(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        availability: &Availability,
    ) -> Result<Availability, ClientError> {
        let url = format!("{}/{}/{}", self.base_url, doctor_id, date);
        self.dispatcher
            .send_json(Method::PUT, &url, Some(to_body(availability)?))
            .await
    }

    pub async fn delete(&self, doctor_id: i64, date: NaiveDate) -> Result<(), ClientError> {
        debug!("Deleting availability for doctor {} on {}", doctor_id, date);

        let url = format!("{}/{}/{}", self.base_url, doctor_id, date);
        self.dispatcher.send_no_content(Method::DELETE, &url, None).await
    }

    pub async fn doctor_id_by_phone(&self, phone: &str) -> Result<i64, ClientError> {
        let url = format!(
            "{}/get-doctor-id/by-phone/{}",
            self.base_url,
            urlencoding::encode(phone.trim())
        );
        self.dispatcher.get_json(&url).await
    }
}
