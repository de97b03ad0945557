//! Operator command settings

use serde::Deserialize;

use super::error::ValidationError;

/// Largest page the user listing will request in one query.
pub const MAX_USER_PAGE_SIZE: u32 = 1000;

/// Settings for the admin commands.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Users fetched per page by `users` when no `--page-size` is given
    #[serde(default = "default_user_page_size")]
    pub user_page_size: u32,
}

impl AdminConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_page_size(self.user_page_size)
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            user_page_size: default_user_page_size(),
        }
    }
}

/// Check a page size against `1..=MAX_USER_PAGE_SIZE`.
pub fn validate_page_size(size: u32) -> Result<(), ValidationError> {
    if size == 0 || size > MAX_USER_PAGE_SIZE {
        return Err(ValidationError::InvalidPageSize {
            actual: size,
            max: MAX_USER_PAGE_SIZE,
        });
    }
    Ok(())
}

fn default_user_page_size() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_size_is_valid() {
        let config = AdminConfig::default();
        assert_eq!(config.user_page_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn page_size_bounds() {
        assert!(validate_page_size(1).is_ok());
        assert!(validate_page_size(MAX_USER_PAGE_SIZE).is_ok());
        assert_eq!(
            validate_page_size(0),
            Err(ValidationError::InvalidPageSize { actual: 0, max: 1000 })
        );
        assert!(validate_page_size(1001).is_err());
    }
}
