use crate::types::TabId;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("Tab {0} no longer exists")]
    TabGone(TabId),

    #[error("Browser host unavailable: {0}")]
    HostUnavailable(String),

    #[error("Persisted store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tab_gone() {
        let err = EngineError::TabGone(TabId(17));
        assert_eq!(err.to_string(), "Tab 17 no longer exists");
    }

    #[test]
    fn test_display_host_unavailable() {
        let err = EngineError::HostUnavailable("query timed out".into());
        assert_eq!(err.to_string(), "Browser host unavailable: query timed out");
    }

    #[test]
    fn test_display_store_unavailable() {
        let err = EngineError::StoreUnavailable("settings read failed".into());
        assert_eq!(
            err.to_string(),
            "Persisted store unavailable: settings read failed"
        );
    }

    #[test]
    fn test_display_invalid_pattern() {
        let err = EngineError::InvalidPattern {
            pattern: "[unclosed".into(),
            reason: "unclosed character class".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid pattern '[unclosed': unclosed character class"
        );
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
