use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_SLOTS_PER_DAY: usize = 8;

/// First and last hour a bookable slot may start at.
const FIRST_SLOT_HOUR: u32 = 9;
const LAST_SLOT_HOUR: u32 = 17;

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// Time-slot set for one doctor on one date. `(doctor_id, date)` is the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(rename = "doctorID")]
    pub doctor_id: i64,
    pub date: NaiveDate,
    #[serde(rename = "timeSlots", default)]
    pub time_slots: Vec<String>,
    #[serde(rename = "doctorName", default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl Availability {
    pub fn new(doctor_id: i64, date: NaiveDate, time_slots: Vec<String>) -> Self {
        Self {
            doctor_id,
            date,
            time_slots,
            doctor_name: None,
            specialty: None,
        }
    }

    pub fn key(&self) -> (i64, NaiveDate) {
        (self.doctor_id, self.date)
    }
}

// ==============================================================================
// SLOT LABELS
// ==============================================================================

/// 12-hour label for a whole hour, e.g. `9:00 AM` or `1:00 PM`.
pub fn format_hour(hour: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:00 {}", display, period)
}

/// Hourly labels from `9:00 AM - 10:00 AM` to `5:00 PM - 6:00 PM`.
pub fn time_slot_labels() -> Vec<String> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .map(|hour| format!("{} - {}", format_hour(hour), format_hour(hour + 1)))
        .collect()
}

// ==============================================================================
// FORM
// ==============================================================================

/// Add/update form state. Selected slots keep their click order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityForm {
    pub doctor_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub selected_slots: Vec<String>,
}

impl AvailabilityForm {
    /// Prefill from an existing record.
    pub fn from_availability(availability: &Availability) -> Self {
        Self {
            doctor_id: Some(availability.doctor_id),
            date: Some(availability.date),
            selected_slots: availability.time_slots.clone(),
        }
    }

    pub fn toggle_slot(&mut self, slot: &str) {
        match self.selected_slots.iter().position(|s| s == slot) {
            Some(index) => {
                self.selected_slots.remove(index);
            }
            None => self.selected_slots.push(slot.to_string()),
        }
    }

    pub fn is_slot_selected(&self, slot: &str) -> bool {
        self.selected_slots.iter().any(|s| s == slot)
    }

    pub fn validate(&self, today: NaiveDate) -> Result<Availability, String> {
        let (Some(doctor_id), Some(date)) = (self.doctor_id.filter(|id| *id > 0), self.date) else {
            return Err("Please fill in all fields and select time slots".to_string());
        };
        if self.selected_slots.is_empty() {
            return Err("Please fill in all fields and select time slots".to_string());
        }
        if date < today {
            return Err("Availability date cannot be in the past".to_string());
        }
        if self.selected_slots.len() > MAX_SLOTS_PER_DAY {
            return Err(format!("Too many time slots selected (maximum {} per day)", MAX_SLOTS_PER_DAY));
        }

        Ok(Availability::new(doctor_id, date, self.selected_slots.clone()))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
