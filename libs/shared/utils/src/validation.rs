use regex::Regex;
use uuid::Uuid;

/// Contact numbers are stored as bare 11-digit strings, no country prefix.
pub fn validate_phone(phone: &str) -> bool {
    let phone_regex = Regex::new(r"^[0-9]{11}$").unwrap();

    phone_regex.is_match(phone)
}

pub fn validate_uuid(uuid_str: &str) -> bool {
    Uuid::parse_str(uuid_str).is_ok()
}
