use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("mobile pattern compiles"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name pattern compiles"));
static POSITIVE_INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("digits pattern compiles"));

pub const MAX_AGE_YEARS: i32 = 120;

pub fn is_valid_email(email: &str) -> bool {
    if !EMAIL_RE.is_match(email) || email.contains("..") {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => {
            (1..=64).contains(&local.len()) && (4..=253).contains(&domain.len())
        }
        None => false,
    }
}

/// Ten-digit Indian mobile number.
pub fn is_valid_mobile(phone: &str) -> bool {
    MOBILE_RE.is_match(phone)
}

pub fn validate_full_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err("Full name is required".to_string())
    } else if trimmed.chars().count() < 2 {
        Err("Full name must be at least 2 characters".to_string())
    } else if !NAME_RE.is_match(name) {
        Err("Full name can only contain letters and spaces".to_string())
    } else {
        Ok(())
    }
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .to_string(),
        );
    }

    Ok(())
}

pub fn validate_date_of_birth(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> Result<(), String> {
    let Some(birth) = date_of_birth else {
        return Err("Date of birth is required".to_string());
    };

    if birth > today {
        Err("Date of birth cannot be in the future".to_string())
    } else if today.year() - birth.year() > MAX_AGE_YEARS {
        Err("Please enter a valid date of birth".to_string())
    } else {
        Ok(())
    }
}

/// Parse a form field that must hold a positive whole number.
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if !POSITIVE_INT_RE.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("asha.rao@clinic.in"));
        assert!(!is_valid_email("asha..rao@clinic.in"));
        assert!(!is_valid_email("asha@a.b"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email(&format!("{}@clinic.in", "a".repeat(65))));
    }

    #[test]
    fn test_mobile_rules() {
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("5876543210"));
        assert!(!is_valid_mobile("987654321"));
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_full_name("Asha Rao").is_ok());
        assert_eq!(validate_full_name("  ").unwrap_err(), "Full name is required");
        assert_eq!(validate_full_name("A").unwrap_err(), "Full name must be at least 2 characters");
        assert!(validate_full_name("R2-D2").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Secret123").is_ok());
        assert_eq!(validate_password("").unwrap_err(), "Password is required");
        assert!(validate_password("Sh0rt").is_err());
        assert!(validate_password("alllowercase1").is_err());
    }

    #[test]
    fn test_date_of_birth_rules() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        assert!(validate_date_of_birth(NaiveDate::from_ymd_opt(1990, 1, 1), today).is_ok());
        assert_eq!(validate_date_of_birth(None, today).unwrap_err(), "Date of birth is required");
        assert!(validate_date_of_birth(NaiveDate::from_ymd_opt(2026, 1, 1), today).is_err());
        assert!(validate_date_of_birth(NaiveDate::from_ymd_opt(1890, 1, 1), today).is_err());
    }

    #[test]
    fn test_positive_id() {
        assert_eq!(parse_positive_id(" 7 "), Some(7));
        assert_eq!(parse_positive_id("0"), None);
        assert_eq!(parse_positive_id("-3"), None);
        assert_eq!(parse_positive_id("12a"), None);
        assert_eq!(parse_positive_id(""), None);
    }
}
