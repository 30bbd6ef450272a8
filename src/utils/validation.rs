use regex::Regex;
use std::sync::LazyLock;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("mobile pattern is valid"));

/// Ten-digit Indian mobile number, optionally prefixed with `+91` or `0`.
fn mobile_digits(mobile: &str) -> Option<String> {
    let digits: String = mobile.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits
        .strip_prefix("+91")
        .or_else(|| digits.strip_prefix('0'))
        .unwrap_or(&digits);
    MOBILE_RE.is_match(digits).then(|| digits.to_string())
}

/// Bare ten digits for a recognisable mobile number; anything else
/// (landlines, partial numbers) is kept as typed.
pub fn normalize_mobile(mobile: &str) -> String {
    mobile_digits(mobile).unwrap_or_else(|| mobile.trim().to_string())
}

pub fn validate_email(email: &str) -> bool {
    validator::validate_email(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_numbers() {
        assert_eq!(mobile_digits("9876543210").as_deref(), Some("9876543210"));
        assert!(mobile_digits("+91 98765 43210").is_some());
        assert!(mobile_digits("09876543210").is_some());
        assert!(mobile_digits("1234567890").is_none());
        assert!(mobile_digits("98765").is_none());
        assert!(mobile_digits("98765432101").is_none());
    }

    #[test]
    fn mobile_numbers_are_normalized_not_refused() {
        assert_eq!(normalize_mobile("+91 98765 43210"), "9876543210");
        assert_eq!(normalize_mobile("09876543210"), "9876543210");
        assert_eq!(normalize_mobile("02345678901"), "02345678901");
        assert_eq!(normalize_mobile(" 12345 "), "12345");
    }

    #[test]
    fn email_addresses() {
        assert!(validate_email("gramsevak@gomewadi.in"));
        assert!(!validate_email("gramsevak"));
        assert!(!validate_email("@gomewadi.in"));
    }
}
