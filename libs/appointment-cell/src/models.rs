// libs/appointment-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_models::auth::string_or_number;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub slot: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_email: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub slot: String,
    pub patient_name: String,
    pub patient_email: String,
    pub doctor_name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdateRequest {
    pub appointment_id: i64,
    pub new_date: NaiveDate,
    pub new_slot: String,
    pub patient_name: String,
    pub patient_email: String,
    pub doctor_name: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCancelInfo {
    pub patient_name: String,
    pub doctor_name: String,
    pub patient_email: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

// ==============================================================================
// SLOTS
// ==============================================================================

pub const SPECIALISATIONS: [&str; 4] = ["Cardiology", "Pediatrician", "Neurologist", "Orthologist"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOption {
    pub value: &'static str,
    pub label: &'static str,
    pub start_time: &'static str,
    pub end_time: &'static str,
}

pub const SLOT_OPTIONS: [SlotOption; 6] = [
    SlotOption { value: "09:00-10:00", label: "09:00 AM - 10:00 AM", start_time: "09:00", end_time: "10:00" },
    SlotOption { value: "10:00-11:00", label: "10:00 AM - 11:00 AM", start_time: "10:00", end_time: "11:00" },
    SlotOption { value: "11:00-12:00", label: "11:00 AM - 12:00 PM", start_time: "11:00", end_time: "12:00" },
    SlotOption { value: "14:00-15:00", label: "02:00 PM - 03:00 PM", start_time: "14:00", end_time: "15:00" },
    SlotOption { value: "15:00-16:00", label: "03:00 PM - 04:00 PM", start_time: "15:00", end_time: "16:00" },
    SlotOption { value: "16:00-17:00", label: "04:00 PM - 05:00 PM", start_time: "16:00", end_time: "17:00" },
];

pub fn find_slot_option(value: &str) -> Option<&'static SlotOption> {
    SLOT_OPTIONS.iter().find(|option| option.value == value)
}

/// Split an `"HH:MM-HH:MM"` slot into its start and end. Anything past a
/// second `-` is ignored; a missing or blank side means it is not a slot.
pub fn parse_slot(slot: &str) -> Option<(String, String)> {
    let mut parts = slot.split('-').map(str::trim);
    let start = parts.next().filter(|s| !s.is_empty())?;
    let end = parts.next().filter(|s| !s.is_empty())?;
    Some((start.to_string(), end.to_string()))
}

// ==============================================================================
// FORMS
// ==============================================================================

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Patient-entered booking fields; the doctor comes from the wizard selection.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub patient_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub slot: String,
    pub patient_name: String,
    pub patient_email: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

impl BookingForm {
    pub fn validate(&self, doctor: Option<&DoctorSummary>, today: NaiveDate) -> Result<AppointmentRequest, String> {
        let (Some(patient_id), Some(doctor), Some(date)) = (self.patient_id, doctor, self.date) else {
            return Err("Please fill all required fields and select a doctor".to_string());
        };

        let required = [&self.slot, &self.patient_name, &self.patient_email, &self.start_time, &self.end_time];
        if !required.iter().all(|field| filled(field)) {
            return Err("Please fill all required fields and select a doctor".to_string());
        }

        if date < today {
            return Err("Appointment date cannot be in the past".to_string());
        }

        Ok(AppointmentRequest {
            patient_id,
            doctor_id: doctor.id,
            date,
            slot: self.slot.clone(),
            patient_name: self.patient_name.trim().to_string(),
            patient_email: self.patient_email.trim().to_string(),
            doctor_name: doctor.name.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            reason: Some(self.reason.trim()).filter(|r| !r.is_empty()).map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateForm {
    pub id: Option<i64>,
    pub new_date: Option<NaiveDate>,
    pub new_slot: String,
    pub patient_name: String,
    pub patient_email: String,
    pub doctor_name: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

impl UpdateForm {
    pub fn validate(&self) -> Result<(i64, AppointmentUpdateRequest), String> {
        let required = [
            &self.new_slot,
            &self.patient_name,
            &self.patient_email,
            &self.doctor_name,
            &self.start_time,
            &self.end_time,
            &self.reason,
        ];
        let (Some(id), Some(new_date)) = (self.id, self.new_date) else {
            return Err("Please fill all required fields for update".to_string());
        };
        if !required.iter().all(|field| filled(field)) {
            return Err("Please fill all required fields for update".to_string());
        }

        Ok((
            id,
            AppointmentUpdateRequest {
                appointment_id: id,
                new_date,
                new_slot: self.new_slot.clone(),
                patient_name: self.patient_name.trim().to_string(),
                patient_email: self.patient_email.trim().to_string(),
                doctor_name: self.doctor_name.trim().to_string(),
                start_time: self.start_time.clone(),
                end_time: self.end_time.clone(),
                reason: self.reason.trim().to_string(),
            },
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelForm {
    pub id: Option<i64>,
    pub patient_name: String,
    pub doctor_name: String,
    pub patient_email: String,
    pub date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

impl CancelForm {
    pub fn validate(&self) -> Result<(i64, AppointmentCancelInfo), String> {
        let required = [
            &self.patient_name,
            &self.doctor_name,
            &self.patient_email,
            &self.start_time,
            &self.end_time,
            &self.reason,
        ];
        let (Some(id), Some(date)) = (self.id, self.date) else {
            return Err("Please fill all required fields for cancellation".to_string());
        };
        if !required.iter().all(|field| filled(field)) {
            return Err("Please fill all required fields for cancellation".to_string());
        }

        Ok((
            id,
            AppointmentCancelInfo {
                patient_name: self.patient_name.trim().to_string(),
                doctor_name: self.doctor_name.trim().to_string(),
                patient_email: self.patient_email.trim().to_string(),
                date,
                start_time: self.start_time.clone(),
                end_time: self.end_time.clone(),
                reason: self.reason.trim().to_string(),
            },
        ))
    }
}
