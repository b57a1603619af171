//! Toast categories.

use serde::{Deserialize, Serialize};

/// Category of a toast, used by the UI to pick its styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Short label for text-only renderers.
    pub fn label(&self) -> &str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

impl std::fmt::Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_info() {
        assert_eq!(ToastKind::default(), ToastKind::Info);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ToastKind::Success).unwrap(), "\"success\"");
        let kind: ToastKind = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(kind, ToastKind::Error);
    }
}
