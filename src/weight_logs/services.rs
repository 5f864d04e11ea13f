/// Note on weigh-ins written by a profile save.
pub const PROFILE_NOTE: &str = "Updated from profile";

/// Whether a profile save records a weigh-in: only when an existing profile
/// had a different weight. Creating a profile logs nothing.
pub fn weight_changed(previous: Option<f64>, new: f64) -> bool {
    previous.is_some_and(|old| old != new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_changed_existing_weight_counts() {
        assert!(!weight_changed(None, 70.0));
        assert!(!weight_changed(Some(70.0), 70.0));
        assert!(weight_changed(Some(70.0), 69.5));
        assert!(weight_changed(Some(70.0), 70.1));
    }
}
