use uuid::Uuid;

const UPLOAD_PREFIX: &str = "images/";

/// Fresh object key for a single image upload.
pub fn new_upload_key() -> String {
    format!("{}{}", UPLOAD_PREFIX, Uuid::new_v4())
}

/// Whether `key` has the shape of a key handed out by [`new_upload_key`].
pub fn is_upload_key(key: &str) -> bool {
    key.strip_prefix(UPLOAD_PREFIX)
        .is_some_and(|id| Uuid::parse_str(id).is_ok())
}

#[cfg(test)]
mod image_tests {
    use super::*;

    #[test]
    fn issued_keys_are_recognised() {
        let key = new_upload_key();
        assert!(key.starts_with("images/"));
        assert!(is_upload_key(&key));
        assert_ne!(key, new_upload_key());
    }

    #[test]
    fn foreign_keys_are_not() {
        assert!(!is_upload_key("images/../../etc/passwd"));
        assert!(!is_upload_key("photos/6f1c1c3e-8d3a-4c55-9d2a-0f6f8c7b2a11"));
        assert!(!is_upload_key(""));
    }
}
