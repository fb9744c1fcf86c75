use chrono::NaiveDate;
use tracing::{debug, error};

use shared_models::error::ClientError;

use crate::models::{
    find_slot_option, parse_slot, Appointment, BookingForm, CancelForm, DoctorSummary, UpdateForm,
};
use crate::services::AppointmentService;

/// State behind the appointment-scheduling view: the specialisation, doctor,
/// date and slot wizard plus the loaded appointment list.
pub struct AppointmentScheduler {
    service: AppointmentService,
    pub appointments: Vec<Appointment>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,

    pub selected_specialisation: Option<String>,
    pub doctors: Vec<DoctorSummary>,
    pub selected_doctor: Option<DoctorSummary>,
    pub selected_date: Option<NaiveDate>,
    pub available_slots: Vec<String>,

    pub selected_slot: Option<String>,
    pub selected_start_time: String,
    pub selected_end_time: String,
    pub selected_update_start_time: String,
    pub selected_update_end_time: String,
}

impl AppointmentScheduler {
    pub fn new(service: AppointmentService) -> Self {
        Self {
            service,
            appointments: Vec::new(),
            success_message: None,
            error_message: None,
            selected_specialisation: None,
            doctors: Vec::new(),
            selected_doctor: None,
            selected_date: None,
            available_slots: Vec::new(),
            selected_slot: None,
            selected_start_time: String::new(),
            selected_end_time: String::new(),
            selected_update_start_time: String::new(),
            selected_update_end_time: String::new(),
        }
    }

    pub fn service(&self) -> &AppointmentService {
        &self.service
    }

    pub fn clear_messages(&mut self) {
        self.success_message = None;
        self.error_message = None;
    }

    // Wizard

    pub async fn select_specialisation(&mut self, specialisation: Option<&str>) {
        self.selected_doctor = None;
        self.available_slots.clear();

        let Some(name) = specialisation.filter(|s| !s.is_empty()) else {
            self.selected_specialisation = None;
            self.doctors.clear();
            return;
        };

        self.selected_specialisation = Some(name.to_string());
        match self.service.list_by_specialisation(name).await {
            Ok(doctors) => self.doctors = doctors,
            Err(e) => {
                error!("Error loading doctors for {}: {}", name, e);
                self.doctors.clear();
            }
        }
    }

    /// Pick a doctor from the loaded list. Unknown ids clear the selection.
    pub async fn select_doctor(&mut self, doctor_id: i64) {
        self.selected_doctor = self.doctors.iter().find(|d| d.id == doctor_id).cloned();
        self.refresh_available_slots().await;
    }

    pub async fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
        self.refresh_available_slots().await;
    }

    async fn refresh_available_slots(&mut self) {
        self.available_slots.clear();
        if let (Some(doctor), Some(date)) = (&self.selected_doctor, self.selected_date) {
            self.available_slots = self.service.list_available_slots(doctor.id, date).await;
        }
    }

    pub fn on_slot_change(&mut self, slot: &str) {
        self.selected_slot = Some(slot.to_string());
        if let Some((start, end)) = parse_slot(slot) {
            self.selected_start_time = start;
            self.selected_end_time = end;
        }
    }

    pub fn on_update_slot_change(&mut self, slot: &str) {
        if let Some(option) = find_slot_option(slot) {
            self.selected_update_start_time = option.start_time.to_string();
            self.selected_update_end_time = option.end_time.to_string();
        }
    }

    // Booking, update, cancellation

    pub async fn book(&mut self, form: &BookingForm, today: NaiveDate) -> Result<(), ClientError> {
        self.clear_messages();

        let request = form
            .validate(self.selected_doctor.as_ref(), today)
            .map_err(|message| self.reject(message))?;

        match self.service.book(&request).await {
            Ok(appointment) => {
                self.success_message = Some(format!("Appointment booked successfully! ID: {}", appointment.id));
                self.appointments.push(appointment);
                Ok(())
            }
            Err(e) => {
                self.error_message = Some(describe_failure(&e, "Backend endpoint not found. Check URL."));
                Err(e)
            }
        }
    }

    pub async fn update(&mut self, form: &UpdateForm) -> Result<(), ClientError> {
        self.clear_messages();

        let (id, request) = form.validate().map_err(|message| self.reject(message))?;
        self.check_identity(id, &request.patient_email, &request.doctor_name)?;

        match self.service.update(id, &request).await {
            Ok(appointment) => {
                self.success_message = Some("Appointment updated successfully!".to_string());
                if let Some(existing) = self.appointments.iter_mut().find(|a| a.id == id) {
                    *existing = appointment;
                }
                Ok(())
            }
            Err(e) => {
                self.error_message = Some(describe_failure(&e, "Failed to update appointment. Please check the ID."));
                Err(e)
            }
        }
    }

    pub async fn cancel(&mut self, form: &CancelForm) -> Result<(), ClientError> {
        self.clear_messages();

        let (id, info) = form.validate().map_err(|message| self.reject(message))?;
        self.check_identity(id, &info.patient_email, &info.doctor_name)?;

        match self.service.cancel(id, &info).await {
            Ok(ack) => {
                debug!("Cancel response: {}", ack);
                self.success_message = Some("Appointment cancelled successfully!".to_string());
                self.appointments.retain(|a| a.id != id);
                Ok(())
            }
            Err(e) => {
                self.error_message = Some(describe_failure(&e, "Appointment not found with the provided ID."));
                Err(e)
            }
        }
    }

    // Listing

    pub async fn load_patient_appointments(&mut self, patient_id: i64) -> Result<(), ClientError> {
        self.clear_messages();
        let result = self.service.list_by_patient(patient_id).await;
        self.apply_listing(result, "Patient not found or no appointments exist for this patient ID.")
    }

    pub async fn load_doctor_appointments(&mut self, doctor_id: i64) -> Result<(), ClientError> {
        self.clear_messages();
        let result = self.service.list_by_doctor(doctor_id).await;
        self.apply_listing(result, "Doctor not found or no appointments exist for this doctor ID.")
    }

    fn apply_listing(
        &mut self,
        result: Result<Vec<Appointment>, ClientError>,
        not_found: &str,
    ) -> Result<(), ClientError> {
        match result {
            Ok(appointments) => {
                self.success_message = Some(format!("Loaded {} appointments", appointments.len()));
                self.appointments = appointments;
                Ok(())
            }
            Err(e) => {
                self.error_message = Some(describe_failure(&e, not_found));
                Err(e)
            }
        }
    }

    fn reject(&mut self, message: String) -> ClientError {
        self.error_message = Some(message.clone());
        ClientError::Validation(vec![message])
    }

    /// Advisory double-entry check against the locally loaded copy. Unknown
    /// appointments are left for the backend to judge.
    fn check_identity(&mut self, id: i64, patient_email: &str, doctor_name: &str) -> Result<(), ClientError> {
        let Some(appointment) = self.appointments.iter().find(|a| a.id == id) else {
            return Ok(());
        };

        let email_matches = appointment
            .patient_email
            .as_deref()
            .map_or(true, |email| email.eq_ignore_ascii_case(patient_email));
        let doctor_matches = appointment
            .doctor_name
            .as_deref()
            .map_or(true, |name| name.eq_ignore_ascii_case(doctor_name));

        if email_matches && doctor_matches {
            Ok(())
        } else {
            Err(self.reject(format!("Entered details do not match appointment {}", id)))
        }
    }
}

fn describe_failure(err: &ClientError, not_found: &str) -> String {
    match err {
        ClientError::Connectivity(_) => "Cannot connect to backend. Check if the appointment service is running.".to_string(),
        ClientError::NotFound(_) => not_found.to_string(),
        ClientError::Server(message) => format!("Backend server error: {}", message),
        ClientError::Conflict(message) => format!("{} Please choose a different slot or date.", message),
        other => other.to_string(),
    }
}
