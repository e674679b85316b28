//! Identifier generation
//!
//! Event, guest and job ids are UUIDv4 strings. Synthesized tables use a
//! `table_` prefix so they stay distinguishable from caller-supplied ids.

use rand::Rng;
use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse UUID from string
pub fn parse(s: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(s)
}

/// Fresh identifier for a synthesized table
pub fn table_id() -> String {
    format!("table_{}", Uuid::new_v4().simple())
}

/// Random 16-character hex code handed to a guest for check-in
pub fn check_in_code() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_id_is_prefixed_and_unique() {
        let a = table_id();
        let b = table_id();
        assert!(a.starts_with("table_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_check_in_code_is_hex() {
        let code = check_in_code();
        assert_eq!(code.len(), 16);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = generate();
        assert_eq!(parse(&id.to_string()).unwrap(), id);
        assert!(parse("not-a-uuid").is_err());
    }
}
