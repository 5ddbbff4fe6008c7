//! Login and registration page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::{PageError, api_failure};
use crate::routes::Route;
use crate::state::store::SessionStore;

pub const AUTH_FAILED: &str = "Authentication failed.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Trim the email and require both fields.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Login rules plus a non-blank display name.
pub fn validate_register_input(
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<(String, String, String), &'static str> {
    let (email, password) = validate_login_input(email, password)?;
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err("Enter a display name.");
    }
    Ok((email, password, display_name.to_owned()))
}

impl LoginForm {
    #[must_use]
    pub fn login(email: &str, password: &str) -> Self {
        Self { mode: AuthMode::Login, email: email.to_owned(), password: password.to_owned(), ..Self::default() }
    }

    #[must_use]
    pub fn register(email: &str, password: &str, display_name: &str) -> Self {
        Self {
            mode: AuthMode::Register,
            email: email.to_owned(),
            password: password.to_owned(),
            display_name: display_name.to_owned(),
        }
    }

    /// Submit the form; on success the caller navigates to the returned route.
    ///
    /// # Errors
    ///
    /// Returns an inline message for invalid input or a rejected attempt.
    pub async fn submit(&self, store: &SessionStore) -> Result<Route, PageError> {
        let result = match self.mode {
            AuthMode::Login => {
                let (email, password) =
                    validate_login_input(&self.email, &self.password).map_err(|m| PageError::Message(m.to_owned()))?;
                store.login(&email, &password).await
            }
            AuthMode::Register => {
                let (email, password, display_name) =
                    validate_register_input(&self.email, &self.password, &self.display_name)
                        .map_err(|m| PageError::Message(m.to_owned()))?;
                store.register(&email, &password, &display_name).await
            }
        };
        result.map(|_| Route::Blog).map_err(|err| api_failure(&err, AUTH_FAILED))
    }
}
