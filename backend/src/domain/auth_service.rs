//! Admin access gate in front of the record-keeper. Three failed attempts
//! arm a 30-second cooldown; a success resets the counter. Attempt state
//! lives in the service value owned by the caller's session, not in a
//! global.

use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::ConfigResolver;
use crate::domain::commands::auth::{LoginAttempt, LoginOutcome};

const MAX_ATTEMPTS: u32 = 3;
const COOLDOWN: Duration = Duration::from_secs(30);

#[derive(Default)]
struct GateState {
    failed_attempts: u32,
    last_attempt: Option<Instant>,
}

/// Service validating admin logins against the layered configuration.
#[derive(Clone)]
pub struct AuthService {
    resolver: ConfigResolver,
    state: Arc<Mutex<GateState>>,
    cooldown: Duration,
}

impl AuthService {
    pub fn new(resolver: ConfigResolver) -> Self {
        Self::with_cooldown(resolver, COOLDOWN)
    }

    /// Create a service with a custom cooldown (for testing).
    pub fn with_cooldown(resolver: ConfigResolver, cooldown: Duration) -> Self {
        Self {
            resolver,
            state: Arc::new(Mutex::new(GateState::default())),
            cooldown,
        }
    }

    /// Validate one login attempt, applying the attempt limit and cooldown.
    pub fn validate_login(&self, attempt: LoginAttempt) -> LoginOutcome {
        let mut state = self.state.lock().unwrap();

        // Too many failures: refuse to evaluate until the cooldown passes.
        if state.failed_attempts >= MAX_ATTEMPTS {
            let elapsed = state
                .last_attempt
                .map(|at| at.elapsed())
                .unwrap_or(self.cooldown);
            if elapsed < self.cooldown {
                let remaining = (self.cooldown - elapsed).as_secs().max(1);
                warn!("Login locked out, {}s of cooldown remaining", remaining);
                return LoginOutcome {
                    success: false,
                    message: format!(
                        "Too many failed attempts. Please try again in {} seconds.",
                        remaining
                    ),
                    attempts_remaining: None,
                    cooldown_seconds: Some(remaining),
                };
            }
            state.failed_attempts = 0;
        }

        state.last_attempt = Some(Instant::now());

        let expected = self.resolver.admin_credentials();
        if attempt.username == expected.username && attempt.password == expected.password {
            info!("🔓 Admin login successful for '{}'", attempt.username);
            state.failed_attempts = 0;
            return LoginOutcome {
                success: true,
                message: format!("Welcome, {}!", attempt.username),
                attempts_remaining: None,
                cooldown_seconds: None,
            };
        }

        state.failed_attempts += 1;
        let remaining_attempts = MAX_ATTEMPTS.saturating_sub(state.failed_attempts);
        info!("🔒 Admin login failed ({} attempts remaining)", remaining_attempts);

        LoginOutcome {
            success: false,
            message: format!(
                "Incorrect username or password. {} attempts remaining.",
                remaining_attempts
            ),
            attempts_remaining: Some(remaining_attempts),
            cooldown_seconds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn service_with_creds(cooldown: Duration) -> (AuthService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("secrets.yaml"),
            "admin_username: keeper\nadmin_password: open sesame\n",
        )
        .unwrap();
        let resolver = ConfigResolver::for_data_directory(temp_dir.path());
        (AuthService::with_cooldown(resolver, cooldown), temp_dir)
    }

    fn attempt(username: &str, password: &str) -> LoginAttempt {
        LoginAttempt {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn correct_credentials_pass() {
        let (service, _temp_dir) = service_with_creds(COOLDOWN);

        let outcome = service.validate_login(attempt("keeper", "open sesame"));
        assert!(outcome.success);
        assert_eq!(outcome.cooldown_seconds, None);
    }

    #[test]
    fn wrong_password_counts_down_attempts() {
        let (service, _temp_dir) = service_with_creds(COOLDOWN);

        let first = service.validate_login(attempt("keeper", "nope"));
        assert!(!first.success);
        assert_eq!(first.attempts_remaining, Some(2));

        let second = service.validate_login(attempt("keeper", "nope"));
        assert_eq!(second.attempts_remaining, Some(1));
    }

    #[test]
    fn third_failure_arms_the_cooldown() {
        let (service, _temp_dir) = service_with_creds(COOLDOWN);

        for _ in 0..3 {
            service.validate_login(attempt("keeper", "nope"));
        }

        // Even the correct password is not evaluated while locked out.
        let locked = service.validate_login(attempt("keeper", "open sesame"));
        assert!(!locked.success);
        assert!(locked.cooldown_seconds.is_some());
        assert!(locked.message.contains("Too many failed attempts"));
    }

    #[test]
    fn cooldown_expiry_reenables_attempts() {
        let (service, _temp_dir) = service_with_creds(Duration::from_millis(10));

        for _ in 0..3 {
            service.validate_login(attempt("keeper", "nope"));
        }
        std::thread::sleep(Duration::from_millis(20));

        let outcome = service.validate_login(attempt("keeper", "open sesame"));
        assert!(outcome.success);
    }

    #[test]
    fn success_resets_the_failure_counter() {
        let (service, _temp_dir) = service_with_creds(COOLDOWN);

        service.validate_login(attempt("keeper", "nope"));
        service.validate_login(attempt("keeper", "nope"));
        assert!(service.validate_login(attempt("keeper", "open sesame")).success);

        // Counter restarted: a new failure reports two attempts left again.
        let outcome = service.validate_login(attempt("keeper", "nope"));
        assert_eq!(outcome.attempts_remaining, Some(2));
    }

    #[test]
    fn defaults_apply_when_config_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = ConfigResolver::for_data_directory(temp_dir.path());
        let service = AuthService::new(resolver);

        let outcome = service.validate_login(attempt("admin", "default_local_password"));
        assert!(outcome.success);
    }
}
