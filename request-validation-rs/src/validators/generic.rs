//! Generic validators

/// Validate that a value is in an allowed list (exact, case-sensitive)
pub fn one_of<T: PartialEq<U>, U>(value: &T, allowed: &[U]) -> bool {
    allowed.iter().any(|candidate| value == candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_of() {
        let roles = vec!["admin".to_string(), "user".to_string(), "guest".to_string()];

        assert!(one_of(&"admin", &roles));
        assert!(one_of(&"guest", &roles));
        assert!(!one_of(&"Admin", &roles));
        assert!(!one_of(&"", &roles));
        assert!(!one_of(&"user", &Vec::<String>::new()));
    }
}
