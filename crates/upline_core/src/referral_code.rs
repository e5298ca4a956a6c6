//! Referral code normalization and candidate generation.

use uuid::Uuid;

/// Length of generated referral codes.
pub const CODE_LENGTH: usize = 8;

/// Attempts before code allocation gives up.
///
/// Collisions on an 8-char hex-alphabet code are already rare; the bound
/// turns a pathological collision loop into a reported error.
pub const MAX_CODE_ATTEMPTS: u32 = 10;

/// Canonical comparison form for referral codes: trimmed and uppercased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Generate one candidate code for a member: a fragment of the member id as
/// seed plus a random suffix, truncated to [`CODE_LENGTH`] uppercase
/// alphanumerics.
pub fn code_candidate(member_id: Uuid) -> String {
    let seed: String = member_id
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(4)
        .collect();
    let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
    let mut candidate = format!("{seed}{suffix}");
    candidate.truncate(CODE_LENGTH);
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_uppercases() {
        assert_eq!(normalize_code("  ab12cd34 "), "AB12CD34");
        assert_eq!(normalize_code("AB12CD34"), "AB12CD34");
    }

    #[test]
    fn candidates_are_fixed_length_uppercase_alphanumeric() {
        let member = Uuid::new_v4();
        for _ in 0..32 {
            let code = code_candidate(member);
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
            assert_eq!(code, code.to_uppercase());
        }
    }

    #[test]
    fn candidates_share_member_seed_but_vary() {
        let member = Uuid::new_v4();
        let a = code_candidate(member);
        let b = code_candidate(member);
        assert_eq!(a[..4], b[..4]);
        // Random suffixes almost surely differ.
        assert_ne!(a, b);
    }
}
