use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use shared_models::error::ClientError;
use shared_models::forms::FormErrors;
use shared_utils::validation::parse_positive_id;

pub const MAX_TEXT_LENGTH: usize = 1000;
pub const SUMMARY_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_id: Option<i64>,
    pub notes: String,
    pub prescription: String,
    pub appointment_id: i64,
    pub patient_id: i64,
}

impl Consultation {
    /// Checks applied right before a consultation is sent. All problems are
    /// reported together.
    pub fn validate(&self) -> Result<(), ClientError> {
        let mut errors = Vec::new();

        let notes = self.notes.trim();
        if notes.is_empty() {
            errors.push("Consultation notes are required".to_string());
        } else if notes.chars().count() > MAX_TEXT_LENGTH {
            errors.push(format!("Consultation notes cannot exceed {} characters", MAX_TEXT_LENGTH));
        }

        let prescription = self.prescription.trim();
        if prescription.is_empty() {
            errors.push("Prescription is required".to_string());
        } else if prescription.chars().count() > MAX_TEXT_LENGTH {
            errors.push(format!("Prescription cannot exceed {} characters", MAX_TEXT_LENGTH));
        }

        if self.patient_id <= 0 {
            errors.push("Valid patient ID is required".to_string());
        }
        if self.appointment_id <= 0 {
            errors.push("Valid appointment ID is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Validation(errors))
        }
    }

    pub fn display_summary(&self) -> ConsultationSummary {
        ConsultationSummary {
            consultation: self.clone(),
            short_notes: shorten(&self.notes),
            short_prescription: shorten(&self.prescription),
        }
    }
}

fn shorten(text: &str) -> String {
    if text.chars().count() > SUMMARY_LENGTH {
        let head: String = text.chars().take(SUMMARY_LENGTH).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// List-row view of a consultation with long text cut down.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationSummary {
    pub consultation: Consultation,
    pub short_notes: String,
    pub short_prescription: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationStats {
    pub total: usize,
    pub latest: Option<Consultation>,
    /// Distinct appointment ids in first-seen order.
    pub appointment_ids: Vec<i64>,
}

impl ConsultationStats {
    pub fn from_history(history: &[Consultation]) -> Self {
        let mut seen = BTreeSet::new();
        let appointment_ids = history
            .iter()
            .map(|c| c.appointment_id)
            .filter(|id| seen.insert(*id))
            .collect();

        Self {
            total: history.len(),
            latest: history.last().cloned(),
            appointment_ids,
        }
    }
}

// Form

/// Raw consultation form input. Ids arrive as typed text.
#[derive(Debug, Clone, Default)]
pub struct ConsultationForm {
    pub notes: String,
    pub prescription: String,
    pub appointment_id: String,
    pub patient_id: String,
}

impl ConsultationForm {
    pub fn validate(&self) -> Result<Consultation, FormErrors> {
        let mut errors = FormErrors::new();
        errors.check("notes", required_text("Notes", &self.notes));
        errors.check("prescription", required_text("Prescription", &self.prescription));
        let appointment_id = numeric_id(&mut errors, "appointmentId", "Appointment Id", &self.appointment_id);
        let patient_id = numeric_id(&mut errors, "patientId", "Patient Id", &self.patient_id);
        errors.into_result()?;

        Ok(Consultation {
            consultation_id: None,
            notes: self.notes.trim().to_string(),
            prescription: self.prescription.trim().to_string(),
            appointment_id: appointment_id.unwrap_or_default(),
            patient_id: patient_id.unwrap_or_default(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn required_text(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(format!("{} cannot exceed {} characters", label, MAX_TEXT_LENGTH));
    }
    Ok(())
}

fn numeric_id(errors: &mut FormErrors, field: &'static str, label: &str, raw: &str) -> Option<i64> {
    if raw.trim().is_empty() {
        errors.add(field, format!("{} is required", label));
        return None;
    }
    let id = parse_positive_id(raw);
    if id.is_none() {
        errors.add(field, format!("{} must be a valid positive number", label));
    }
    id
}

/// Parse the patient-id search box.
pub fn parse_patient_search(input: &str) -> Result<i64, String> {
    if input.trim().is_empty() {
        return Err("Please enter a Patient ID".to_string());
    }
    parse_positive_id(input).ok_or_else(|| "Please enter a valid positive number for Patient ID".to_string())
}
