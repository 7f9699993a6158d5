use thiserror::Error;

/// Identity provider failures, independent of the provider implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no account found for this email")]
    UserNotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("password too weak")]
    WeakPassword,

    #[error("identity provider error: {0}")]
    Provider(String),
}

/// User-initiated flows that surface identity errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    SignIn,
    Register,
    PasswordReset,
}

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

impl AuthError {
    /// Message shown to the user for this error in the given flow.
    pub fn user_message(&self, flow: AuthFlow) -> String {
        let specific = match (flow, self) {
            (AuthFlow::SignIn, AuthError::UserNotFound) => "No account found with that email.",
            (AuthFlow::SignIn, AuthError::WrongPassword) => "Incorrect password. Try again.",
            (AuthFlow::SignIn | AuthFlow::Register, AuthError::InvalidEmail) => {
                "Please enter a valid email address."
            }
            (AuthFlow::Register, AuthError::EmailAlreadyInUse) => {
                "This email is already registered."
            }
            (AuthFlow::Register, AuthError::WeakPassword) => {
                "Password should be at least 6 characters."
            }
            (AuthFlow::PasswordReset, AuthError::UserNotFound) => {
                "No account found with this email."
            }
            (AuthFlow::PasswordReset, other) => return other.to_string(),
            _ => GENERIC_MESSAGE,
        };
        specific.to_string()
    }
}
