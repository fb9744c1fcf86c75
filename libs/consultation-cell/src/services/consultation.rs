use chrono::NaiveDate;
use reqwest::Method;
use tracing::{debug, info};

use appointment_cell::Appointment;
use shared_config::ClientConfig;
use shared_gateway::dispatcher::to_body;
use shared_gateway::RequestDispatcher;
use shared_models::error::ClientError;

use crate::cache::HistoryCache;
use crate::models::{Consultation, ConsultationStats};

pub struct ConsultationService {
    dispatcher: RequestDispatcher,
    base_url: String,
    history: HistoryCache<i64, Vec<Consultation>>,
}

impl ConsultationService {
    /// Service with a never-expiring history cache.
    pub fn new(config: &ClientConfig, dispatcher: RequestDispatcher) -> Self {
        Self::with_cache(config, dispatcher, HistoryCache::default())
    }

    pub fn with_cache(
        config: &ClientConfig,
        dispatcher: RequestDispatcher,
        history: HistoryCache<i64, Vec<Consultation>>,
    ) -> Self {
        Self {
            dispatcher,
            base_url: config.consultation_api_url(),
            history,
        }
    }

    /// Save a consultation and drop the patient's cached history.
    pub async fn save(&self, consultation: &Consultation) -> Result<String, ClientError> {
        debug!(
            "Saving consultation for patient {} (appointment {})",
            consultation.patient_id, consultation.appointment_id
        );

        let url = format!("{}/save-consultation", self.base_url);
        let ack = self
            .dispatcher
            .send_for_text(Method::POST, &url, Some(to_body(consultation)?))
            .await?;

        self.clear_patient_cache(consultation.patient_id);
        info!("Consultation saved for patient {}", consultation.patient_id);
        Ok(ack)
    }

    /// Medical history for a patient, served from cache unless
    /// `force_refresh` is set or nothing is cached.
    pub async fn get_medical_history(
        &self,
        patient_id: i64,
        force_refresh: bool,
    ) -> Result<Vec<Consultation>, ClientError> {
        if !force_refresh {
            if let Some(cached) = self.history.get(&patient_id) {
                debug!("Returning cached history for patient {}", patient_id);
                return Ok(cached);
            }
        }

        let url = format!("{}/view-mh/{}", self.base_url, patient_id);
        let consultations: Vec<Consultation> = self.dispatcher.get_json(&url).await?;

        debug!("Fetched {} consultations for patient {}", consultations.len(), patient_id);
        self.history.insert(patient_id, consultations.clone());
        Ok(consultations)
    }

    pub async fn upcoming(&self, patient_id: i64, date: NaiveDate) -> Result<Appointment, ClientError> {
        let url = format!("{}/upcoming?patientId={}&date={}", self.base_url, patient_id, date);
        self.dispatcher.get_json(&url).await
    }

    pub async fn patient_id_by_phone(&self, phone: &str) -> Result<i64, ClientError> {
        let url = format!(
            "{}/get-patient-id/by-phone/{}",
            self.base_url,
            urlencoding::encode(phone.trim())
        );
        self.dispatcher.get_json(&url).await
    }

    pub fn cached(&self, patient_id: i64) -> Option<Vec<Consultation>> {
        self.history.get(&patient_id)
    }

    pub fn is_cached(&self, patient_id: i64) -> bool {
        self.history.contains(&patient_id)
    }

    pub fn clear_patient_cache(&self, patient_id: i64) {
        if self.history.invalidate(&patient_id) {
            debug!("History cache cleared for patient {}", patient_id);
        }
    }

    pub fn clear_all_cache(&self) {
        self.history.clear();
        debug!("History cache cleared");
    }

    pub fn cached_stats(&self, patient_id: i64) -> Option<ConsultationStats> {
        self.history
            .get(&patient_id)
            .map(|history| ConsultationStats::from_history(&history))
    }
}
