use serde::Deserialize;

use crate::config::PaginationConfig;
use crate::database::models::PageRequest;

/// `?page=&size=` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageParams {
    /// Applies configured defaults and caps the page size
    pub fn to_window(&self, config: &PaginationConfig) -> PageRequest {
        let size = self
            .size
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));
        PageRequest::new(self.page.unwrap_or(0), size)
    }
}

/// True when an optional text field is missing or blank
pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_page_size: 20,
            max_page_size: 100,
        }
    }

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(PageParams::default().to_window(&config()), PageRequest::new(0, 20));
    }

    #[test]
    fn size_is_capped() {
        let params = PageParams {
            page: Some(3),
            size: Some(10_000),
        };
        assert_eq!(params.to_window(&config()), PageRequest::new(3, 100));

        let zero = PageParams {
            page: None,
            size: Some(0),
        };
        assert_eq!(zero.to_window(&config()).size, 1);
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(&None));
        assert!(is_blank(&Some("  ".to_string())));
        assert!(!is_blank(&Some("x".to_string())));
    }
}
