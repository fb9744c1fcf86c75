use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use shared_models::auth::Role;
use shared_models::forms::FormErrors;
use shared_utils::validation::{
    is_valid_email, is_valid_mobile, validate_date_of_birth, validate_full_name, validate_password,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub user_email: String,
    pub phone: String,
    pub age: u32,
    pub password: String,
    pub role: Role,
}

/// Raw input of the patient and doctor login forms.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// `email_label` differs between the patient and the doctor form.
    pub fn validate(&self, email_label: &str) -> Result<LoginRequest, FormErrors> {
        let mut errors = FormErrors::new();

        if self.email.trim().is_empty() {
            errors.add("email", format!("{} is required", email_label));
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "Please enter a valid email address");
        }

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        errors.into_result()?;
        Ok(LoginRequest {
            user_email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self, today: NaiveDate) -> Result<RegisterRequest, FormErrors> {
        let mut errors = FormErrors::new();

        errors.check("fullName", validate_full_name(&self.full_name));

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "Please enter a valid email address");
        }

        if self.phone.trim().is_empty() {
            errors.add("phone", "Phone number is required");
        } else if !is_valid_mobile(&self.phone) {
            errors.add("phone", "Please enter a valid 10-digit Indian mobile number");
        }

        errors.check("dateOfBirth", validate_date_of_birth(self.date_of_birth, today));
        errors.check("password", validate_password(&self.password));

        errors.into_result()?;
        let age = self.date_of_birth.map(|dob| age_on(dob, today)).unwrap_or_default();

        Ok(RegisterRequest {
            name: self.full_name.trim().to_string(),
            user_email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            age,
            password: self.password.clone(),
            role: Role::Patient,
        })
    }
}

/// Completed years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
    }

    fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 10, 1),
            password: "Secret123".to_string(),
        }
    }

    #[test]
    fn test_registration_builds_patient_request() {
        let request = valid_registration().validate(today()).unwrap();

        assert_eq!(request.role, Role::Patient);
        assert_eq!(request.age, 34);
        assert_eq!(request.user_email, "asha@example.com");

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["userEmail"], "asha@example.com");
        assert_eq!(body["role"], "PATIENT");
    }

    #[test]
    fn test_registration_reports_every_invalid_field() {
        let form = RegistrationForm {
            full_name: "A".to_string(),
            email: "bad".to_string(),
            phone: "12345".to_string(),
            date_of_birth: None,
            password: "weak".to_string(),
        };

        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get("phone"), Some("Please enter a valid 10-digit Indian mobile number"));
        assert_eq!(errors.get("dateOfBirth"), Some("Date of birth is required"));
    }

    #[test]
    fn test_login_form_labels() {
        let errors = LoginForm::new("", "").validate("Doctor ID/Email").unwrap_err();
        assert_eq!(errors.get("email"), Some("Doctor ID/Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let request = LoginForm::new(" asha@example.com ", "pw").validate("Email").unwrap();
        assert_eq!(request.user_email, "asha@example.com");
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let birth = NaiveDate::from_ymd_opt(2000, 9, 15).unwrap();
        assert_eq!(age_on(birth, today()), 25);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2025, 9, 14).unwrap()), 24);
    }
}
