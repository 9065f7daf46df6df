//! CPF value object.
//!
//! A CPF is the eleven digit Brazilian taxpayer number. The last two digits
//! are check digits computed with a mod-11 weighted sum over the preceding
//! digits.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::config::CPF_LENGTH;
use crate::errors::{AppError, AppResult};

/// Accepts bare digits or the `000.000.000-00` mask
static CPF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}\.?\d{3}\.?\d{3}-?\d{2}$").expect("valid CPF pattern"));

/// Validated CPF, stored as bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    /// Parse and validate a CPF, stripping the optional mask.
    pub fn parse(raw: &str) -> AppResult<Self> {
        if !is_valid(raw) {
            return Err(AppError::invalid_field("cpf", "Invalid CPF"));
        }
        Ok(Self(digits_of(raw)))
    }

    /// Rebuild a CPF already validated on its way into storage.
    pub fn from_stored(digits: String) -> Self {
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Cpf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check format, repeated digits and both check digits.
pub fn is_valid(raw: &str) -> bool {
    if !CPF_PATTERN.is_match(raw) {
        return false;
    }

    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != CPF_LENGTH || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let first = check_digit(&digits[..9]);
    let second = check_digit(&digits[..10]);
    digits[9] == first && digits[10] == second
}

/// Custom validator hook for request DTOs.
pub fn validate_cpf(raw: &str) -> Result<(), ValidationError> {
    if is_valid(raw) {
        Ok(())
    } else {
        let mut error = ValidationError::new("cpf");
        error.message = Some("Invalid CPF".into());
        Err(error)
    }
}

fn check_digit(digits: &[u32]) -> u32 {
    let first_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (first_weight - i as u32))
        .sum();
    match sum % 11 {
        0 | 1 => 0,
        rest => 11 - rest,
    }
}

fn digits_of(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpfs() {
        assert!(is_valid("03619966087"));
        assert!(is_valid("52998224725"));
        assert!(is_valid("12345678909"));
    }

    #[test]
    fn test_masked_cpf_is_normalized() {
        let cpf = Cpf::parse("036.199.660-87").unwrap();
        assert_eq!(cpf.as_str(), "03619966087");
    }

    #[test]
    fn test_wrong_check_digit() {
        assert!(!is_valid("03619966088"));
        assert!(!is_valid("52998224735"));
    }

    #[test]
    fn test_repeated_digits_rejected() {
        assert!(!is_valid("11111111111"));
        assert!(!is_valid("00000000000"));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(!is_valid("0361996608"));
        assert!(!is_valid("036199660870"));
        assert!(!is_valid("abcdefghijk"));
    }

    #[test]
    fn test_parse_error_names_field() {
        match Cpf::parse("123") {
            Err(AppError::Validation { details, .. }) => assert!(details.contains_key("cpf")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
