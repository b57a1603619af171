//! Admin credential gate.
//!
//! Checks a submitted username/password pair against the configured admin
//! credentials and flips the session flag on success. Rendering the form and
//! carrying the session across requests belong to the web layer.

/// Where a successful login is sent.
pub const DASHBOARD_LOCATION: &str = "admin_dashboard";

/// Error shown on the re-rendered form, whichever field was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials!";

/// Per-visitor session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    admin_logged_in: bool,
}

impl AdminSession {
    pub fn is_admin(&self) -> bool {
        self.admin_logged_in
    }

    pub fn log_out(&mut self) {
        self.admin_logged_in = false;
    }
}

/// Result of a login form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Credentials matched; redirect to `location`.
    Redirect { location: String },
    /// Credentials did not match; re-render the form with `error`.
    Rejected { error: String },
}

/// Fixed admin credentials.
///
/// A gate built without a password rejects every attempt.
#[derive(Debug, Clone)]
pub struct AdminGate {
    username: String,
    password: Option<String>,
}

impl AdminGate {
    pub fn new(username: &str, password: Option<&str>) -> Self {
        Self {
            username: username.to_string(),
            password: password.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    /// Check a submission and update the session on an exact match.
    pub fn attempt(
        &self,
        session: &mut AdminSession,
        username: &str,
        password: &str,
    ) -> GateOutcome {
        let matched = match &self.password {
            Some(expected) => username == self.username && password == expected.as_str(),
            None => {
                log::warn!("Admin password not configured, rejecting login");
                false
            }
        };

        if matched {
            session.admin_logged_in = true;
            log::info!("Admin login accepted for {}", username);
            GateOutcome::Redirect {
                location: DASHBOARD_LOCATION.to_string(),
            }
        } else {
            log::info!("Admin login rejected for {}", username);
            GateOutcome::Rejected {
                error: INVALID_CREDENTIALS.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AdminGate {
        AdminGate::new("admin", Some("password123"))
    }

    #[test]
    fn test_exact_match_redirects_and_sets_flag() {
        let mut session = AdminSession::default();
        let outcome = gate().attempt(&mut session, "admin", "password123");
        assert_eq!(
            outcome,
            GateOutcome::Redirect {
                location: DASHBOARD_LOCATION.to_string()
            }
        );
        assert!(session.is_admin());
    }

    #[test]
    fn test_mismatch_is_generic_rejection() {
        for (user, pass) in [("admin", "wrong"), ("root", "password123"), ("", "")] {
            let mut session = AdminSession::default();
            let outcome = gate().attempt(&mut session, user, pass);
            assert_eq!(
                outcome,
                GateOutcome::Rejected {
                    error: INVALID_CREDENTIALS.to_string()
                }
            );
            assert!(!session.is_admin());
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let mut session = AdminSession::default();
        let outcome = gate().attempt(&mut session, "Admin", "password123");
        assert!(matches!(outcome, GateOutcome::Rejected { .. }));
    }

    #[test]
    fn test_unconfigured_password_rejects_everything() {
        let gate = AdminGate::new("admin", None);
        let mut session = AdminSession::default();
        assert!(matches!(
            gate.attempt(&mut session, "admin", ""),
            GateOutcome::Rejected { .. }
        ));

        let gate = AdminGate::new("admin", Some(""));
        assert!(matches!(
            gate.attempt(&mut session, "admin", ""),
            GateOutcome::Rejected { .. }
        ));
        assert!(!session.is_admin());
    }

    #[test]
    fn test_failed_attempt_keeps_existing_session() {
        let mut session = AdminSession::default();
        gate().attempt(&mut session, "admin", "password123");
        gate().attempt(&mut session, "admin", "nope");
        assert!(session.is_admin());

        session.log_out();
        assert!(!session.is_admin());
    }
}
