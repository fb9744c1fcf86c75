use chrono::NaiveDate;
use tracing::{error, warn};

use shared_models::error::ClientError;

use crate::models::{time_slot_labels, Availability, AvailabilityForm};
use crate::services::AvailabilityService;

/// Search criteria for the dashboard list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilitySearch {
    pub doctor_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Doctor availability calendar: search results, the add form and the
/// record currently being edited.
pub struct AvailabilityDashboard {
    service: AvailabilityService,
    pub slot_labels: Vec<String>,
    pub availabilities: Vec<Availability>,
    pub last_search: Option<AvailabilitySearch>,
    pub editing: Option<Availability>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

impl AvailabilityDashboard {
    pub fn new(service: AvailabilityService) -> Self {
        Self {
            service,
            slot_labels: time_slot_labels(),
            availabilities: Vec::new(),
            last_search: None,
            editing: None,
            success_message: None,
            error_message: None,
        }
    }

    pub fn service(&self) -> &AvailabilityService {
        &self.service
    }

    pub fn clear_messages(&mut self) {
        self.success_message = None;
        self.error_message = None;
    }

    pub async fn search(
        &mut self,
        doctor_id: Option<i64>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<(), ClientError> {
        self.clear_messages();

        let (Some(doctor_id), Some(start_date), Some(end_date)) = (doctor_id, start_date, end_date) else {
            return Err(self.reject("Please enter Doctor ID and date range"));
        };
        if start_date > end_date {
            return Err(self.reject("End date must be on or after start date"));
        }

        let search = AvailabilitySearch {
            doctor_id,
            start_date,
            end_date,
        };
        self.last_search = Some(search);
        self.run_search(search).await
    }

    async fn run_search(&mut self, search: AvailabilitySearch) -> Result<(), ClientError> {
        match self
            .service
            .get_by_doctor(search.doctor_id, search.start_date, search.end_date)
            .await
        {
            Ok(found) => {
                if found.is_empty() {
                    self.error_message = Some("No availability found for this doctor".to_string());
                }
                self.availabilities = found;
                Ok(())
            }
            Err(e) => {
                error!("Availability search failed for doctor {}: {}", search.doctor_id, e);
                self.error_message = Some("Error fetching availability data".to_string());
                self.availabilities.clear();
                Err(e)
            }
        }
    }

    /// Re-run the last search so the list reflects a write. A failed refresh
    /// only logs; the write itself already succeeded.
    async fn refresh(&mut self) {
        if let Some(search) = self.last_search {
            if let Err(e) = self.run_search(search).await {
                warn!("Refresh after write failed: {}", e);
            }
        }
    }

    pub async fn add(&mut self, form: &mut AvailabilityForm, today: NaiveDate) -> Result<(), ClientError> {
        self.clear_messages();

        let availability = form.validate(today).map_err(|message| self.reject(&message))?;

        match self.service.add(&availability).await {
            Ok(_) => {
                self.success_message = Some("Availability added successfully!".to_string());
                form.reset();
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.error_message = Some("Error adding availability".to_string());
                Err(e)
            }
        }
    }

    /// Open the edit form for a listed record.
    pub fn begin_update(&mut self, availability: &Availability) -> AvailabilityForm {
        self.editing = Some(availability.clone());
        AvailabilityForm::from_availability(availability)
    }

    pub fn cancel_update(&mut self) {
        self.editing = None;
    }

    /// Replace the record being edited: delete the original key, then add the
    /// new values. The two calls are not atomic; if the add fails the original
    /// stays deleted.
    pub async fn update(&mut self, form: &AvailabilityForm, today: NaiveDate) -> Result<(), ClientError> {
        self.clear_messages();

        let Some(original) = self.editing.clone() else {
            return Err(self.reject("Select an availability to update"));
        };
        let replacement = form.validate(today).map_err(|message| self.reject(&message))?;
        let (doctor_id, date) = original.key();

        if let Err(e) = self.service.delete(doctor_id, date).await {
            self.error_message = Some("Error updating availability".to_string());
            return Err(e);
        }
        self.availabilities.retain(|a| a.key() != (doctor_id, date));

        match self.service.add(&replacement).await {
            Ok(_) => {
                self.success_message = Some("Availability updated successfully!".to_string());
                self.editing = None;
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                error!(
                    "Availability for doctor {} on {} was deleted but the replacement failed: {}",
                    doctor_id, date, e
                );
                self.error_message = Some("Error updating availability".to_string());
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, doctor_id: i64, date: NaiveDate) -> Result<(), ClientError> {
        self.clear_messages();

        match self.service.delete(doctor_id, date).await {
            Ok(()) => {
                self.availabilities.retain(|a| a.key() != (doctor_id, date));
                self.success_message = Some("Availability deleted successfully".to_string());
                Ok(())
            }
            Err(e) => {
                self.error_message = Some("Error deleting availability".to_string());
                Err(e)
            }
        }
    }

    fn reject(&mut self, message: &str) -> ClientError {
        self.error_message = Some(message.to_string());
        ClientError::validation(message)
    }
}
