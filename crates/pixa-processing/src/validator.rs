/// Validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: '{extension}' (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: '{content_type}' (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },
}

/// Extract the normalized extension tag from a declared filename.
///
/// The tag is everything after the last `.`, lower-cased. A filename with no
/// dot yields an empty tag, which no allow-list accepts.
pub fn extension_tag(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) => filename[idx + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Upload validator
///
/// Checks a file's declared name extension and declared content type against
/// an allow-list, plus the byte-length cap. Both name and content type are
/// client-supplied and trusted as declared; no byte sniffing happens here, so
/// mislabeled payloads surface later at decode time.
pub struct UploadValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    /// Validate the declared filename and content type.
    ///
    /// The extension check runs first and short-circuits; a rejected extension
    /// never reaches the content-type check. On success, returns the extension
    /// tag used downstream to name stored files.
    pub fn validate(&self, filename: &str, content_type: &str) -> Result<String, ValidationError> {
        let extension = self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        Ok(extension)
    }

    /// Validate file extension, returning the normalized tag
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let extension = extension_tag(filename);

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    /// Validate declared content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate the fully-read byte length against the upload cap
    pub fn validate_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> UploadValidator {
        UploadValidator::new(
            5 * 1024 * 1024,
            vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
            vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        )
    }

    #[test]
    fn test_extension_tag_after_last_dot() {
        assert_eq!(extension_tag("photo.png"), "png");
        assert_eq!(extension_tag("archive.tar.png"), "png");
        assert_eq!(extension_tag("photo.PNG"), "png");
        assert_eq!(extension_tag(".png"), "png");
    }

    #[test]
    fn test_extension_tag_no_dot_is_empty() {
        assert_eq!(extension_tag("noextension"), "");
        assert_eq!(extension_tag(""), "");
    }

    #[test]
    fn test_validate_ok_returns_tag() {
        let validator = test_validator();
        assert_eq!(validator.validate("a.jpg", "image/jpeg").unwrap(), "jpg");
        assert_eq!(validator.validate("a.jpeg", "image/jpeg").unwrap(), "jpeg");
        assert_eq!(validator.validate("a.png", "image/png").unwrap(), "png");
        assert_eq!(validator.validate("a.webp", "image/webp").unwrap(), "webp");
    }

    #[test]
    fn test_validate_uppercase_extension_normalized() {
        let validator = test_validator();
        assert_eq!(validator.validate("a.JPG", "image/jpeg").unwrap(), "jpg");
    }

    #[test]
    fn test_validate_rejects_bad_extension() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate("a.gif", "image/png"),
            Err(ValidationError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_extension() {
        let validator = test_validator();
        let err = validator.validate("noextension", "image/png").unwrap_err();
        match err {
            ValidationError::InvalidExtension { extension, .. } => {
                assert_eq!(extension, "");
            }
            other => panic!("expected InvalidExtension, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_check_short_circuits_content_type() {
        let validator = test_validator();
        // Both checks would fail, but the extension failure wins.
        assert!(matches!(
            validator.validate("a.exe", "application/octet-stream"),
            Err(ValidationError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_content_type() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate("a.png", "image/gif"),
            Err(ValidationError::InvalidContentType { .. })
        ));
        assert!(matches!(
            validator.validate("a.png", "text/plain"),
            Err(ValidationError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_validate_content_type_case_insensitive() {
        let validator = test_validator();
        assert!(validator.validate("a.png", "IMAGE/PNG").is_ok());
    }

    #[test]
    fn test_validate_size_ok() {
        let validator = test_validator();
        assert!(validator.validate_size(1024).is_ok());
    }

    #[test]
    fn test_validate_size_at_limit_ok() {
        let validator = test_validator();
        assert!(validator.validate_size(5 * 1024 * 1024).is_ok());
    }

    #[test]
    fn test_validate_size_over_limit() {
        let validator = test_validator();
        let err = validator.validate_size(5 * 1024 * 1024 + 1).unwrap_err();
        match err {
            ValidationError::FileTooLarge { size, max } => {
                assert_eq!(size, 5 * 1024 * 1024 + 1);
                assert_eq!(max, 5 * 1024 * 1024);
            }
            other => panic!("expected FileTooLarge, got {:?}", other),
        }
    }
}
