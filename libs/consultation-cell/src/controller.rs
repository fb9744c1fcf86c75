use tracing::error;

use shared_models::error::ClientError;
use shared_models::forms::FormErrors;

use crate::models::{parse_patient_search, Consultation, ConsultationForm};
use crate::services::ConsultationService;

const SAVED_MESSAGE: &str = "Consultation saved successfully";

/// Consultation note editor and medical-history lookup.
pub struct ConsultationRecords {
    service: ConsultationService,
    pub consultations: Vec<Consultation>,
    pub selected_patient_id: Option<i64>,
    pub show_add_form: bool,
    pub form_errors: FormErrors,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

impl ConsultationRecords {
    pub fn new(service: ConsultationService) -> Self {
        Self {
            service,
            consultations: Vec::new(),
            selected_patient_id: None,
            show_add_form: false,
            form_errors: FormErrors::new(),
            success_message: None,
            error_message: None,
        }
    }

    pub fn service(&self) -> &ConsultationService {
        &self.service
    }

    pub fn clear_messages(&mut self) {
        self.success_message = None;
        self.error_message = None;
    }

    pub fn toggle_add_form(&mut self, form: &mut ConsultationForm) {
        self.show_add_form = !self.show_add_form;
        if !self.show_add_form {
            form.reset();
            self.form_errors.clear();
            self.clear_messages();
        }
    }

    /// Search box handler.
    pub async fn search(&mut self, input: &str) -> Result<(), ClientError> {
        self.clear_messages();
        match parse_patient_search(input) {
            Ok(patient_id) => self.view_history(patient_id, false).await,
            Err(message) => {
                self.error_message = Some(message.clone());
                Err(ClientError::validation(message))
            }
        }
    }

    pub async fn view_history(&mut self, patient_id: i64, force_refresh: bool) -> Result<(), ClientError> {
        self.clear_messages();
        if patient_id <= 0 {
            let message = "Please enter a valid Patient ID (positive number)";
            self.error_message = Some(message.to_string());
            return Err(ClientError::validation(message));
        }
        self.selected_patient_id = Some(patient_id);

        match self.service.get_medical_history(patient_id, force_refresh).await {
            Ok(consultations) => {
                if consultations.is_empty() {
                    self.error_message = Some(format!("No consultation records found for Patient ID: {}", patient_id));
                } else {
                    self.success_message = Some(format!(
                        "Found {} consultation record(s) for Patient ID: {}",
                        consultations.len(),
                        patient_id
                    ));
                }
                self.consultations = consultations;
                Ok(())
            }
            Err(e) => {
                error!("Error fetching medical history for patient {}: {}", patient_id, e);
                self.error_message = Some(e.to_string());
                self.consultations.clear();
                Err(e)
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.selected_patient_id {
            Some(patient_id) => self.view_history(patient_id, true).await,
            None => Ok(()),
        }
    }

    /// Validate and save the form. When the saved patient is the one on
    /// screen, the history is re-fetched.
    pub async fn save(&mut self, form: &mut ConsultationForm) -> Result<(), ClientError> {
        self.clear_messages();
        self.form_errors.clear();

        let consultation = match form.validate() {
            Ok(consultation) => consultation,
            Err(errors) => {
                self.error_message = Some("Please fill in all required fields correctly.".to_string());
                self.form_errors = errors.clone();
                return Err(errors.into());
            }
        };
        if let Err(e) = consultation.validate() {
            self.error_message = Some(e.to_string());
            return Err(e);
        }

        match self.service.save(&consultation).await {
            Ok(ack) => {
                form.reset();
                self.show_add_form = false;
                if self.selected_patient_id == Some(consultation.patient_id) {
                    if let Err(e) = self.refresh().await {
                        error!("History refresh after save failed: {}", e);
                    }
                }
                self.error_message = None;
                self.success_message = Some(if ack.trim().is_empty() {
                    SAVED_MESSAGE.to_string()
                } else {
                    ack
                });
                Ok(())
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }
}
