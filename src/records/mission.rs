//! Mission outcome encodings.
//!
//! Two targets are derived from the free-text status, each computed on its own:
//!
//! | status (case-insensitive) | `MissionSuccess` | `MissionSuccessProb` |
//! |---------------------------|------------------|----------------------|
//! | contains "success", no "failure" | 1 | 1.0 |
//! | contains "partial" (otherwise)   | 0 | 0.5 |
//! | anything else                    | 0 | 0.0 |
//! | absent                           | absent | absent |
//!
//! A status cell that is empty or only whitespace counts as absent: cells are trimmed when
//! the record is read, so `"  "` never reaches these encoders.

fn is_clean_success(status_lower: &str) -> bool {
    status_lower.contains("success") && !status_lower.contains("failure")
}

/// Binary encoding of a mission status.
pub fn encode_mission_status(status: Option<&str>) -> Option<u8> {
    let status_lower = status?.to_lowercase();
    Some(u8::from(is_clean_success(&status_lower)))
}

/// Three-level probability encoding of a mission status.
pub fn encode_mission_probability(status: Option<&str>) -> Option<f64> {
    let status_lower = status?.to_lowercase();
    let prob = if is_clean_success(&status_lower) {
        1.0
    } else if status_lower.contains("partial") {
        0.5
    } else {
        0.0
    };
    Some(prob)
}

#[cfg(test)]
mod mission_tests {
    use super::*;

    #[test]
    fn test_success() {
        assert_eq!(encode_mission_status(Some("Success")), Some(1));
        assert_eq!(encode_mission_probability(Some("SUCCESS")), Some(1.0));
    }

    #[test]
    fn test_partial_failure() {
        assert_eq!(encode_mission_status(Some("Partial Failure")), Some(0));
        assert_eq!(encode_mission_probability(Some("Partial Failure")), Some(0.5));
    }

    #[test]
    fn test_failures() {
        for status in ["Failure", "Prelaunch Failure", "Success after failure"] {
            assert_eq!(encode_mission_status(Some(status)), Some(0));
            assert_eq!(encode_mission_probability(Some(status)), Some(0.0));
        }
    }

    #[test]
    fn test_partial_success_counts_as_success() {
        assert_eq!(encode_mission_status(Some("Partial Success")), Some(1));
        assert_eq!(encode_mission_probability(Some("Partial Success")), Some(1.0));
    }

    #[test]
    fn test_absent_status_is_not_failure() {
        assert_eq!(encode_mission_status(None), None);
        assert_eq!(encode_mission_probability(None), None);
        assert_ne!(encode_mission_status(None), encode_mission_status(Some("Failure")));
    }
}
