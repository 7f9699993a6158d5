use streamverse_shared::{AuthError, AuthFlow, Profile};
use tracing::{info, warn};

use crate::error::Result;
use crate::events::Notice;
use crate::router::Route;
use crate::state::App;

/// Result of a sign-in, registration or reset attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub notice: Notice,
    /// Where the page goes after the notice is dismissed.
    pub route: Option<Route>,
}

impl AuthOutcome {
    pub fn succeeded(&self) -> bool {
        self.route.is_some()
    }
}

/// Create the account, store its profile and send the user on to sign-in.
pub async fn register(app: &App, name: &str, email: &str, password: &str) -> AuthOutcome {
    let result = async {
        let session = app.identity().create_account(email, password).await?;
        let profile = Profile {
            name: name.trim().to_string(),
            email: session.email.clone().unwrap_or_default(),
        };
        app.backend()
            .write_profile(&session.uid, &profile)
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok::<_, AuthError>(session)
    }
    .await;

    match result {
        Ok(session) => {
            info!(uid = %session.uid.short(), "registration complete");
            AuthOutcome {
                notice: Notice::success("Account Created Successfully!", "Welcome to StreamVerse"),
                route: Some(Route::Login),
            }
        }
        Err(e) => {
            warn!(error = %e, "registration failed");
            AuthOutcome {
                notice: Notice::error("Registration Failed", e.user_message(AuthFlow::Register)),
                route: None,
            }
        }
    }
}

pub async fn login(app: &App, email: &str, password: &str) -> AuthOutcome {
    match app.identity().sign_in(email, password).await {
        Ok(_) => AuthOutcome {
            notice: Notice::success("Login Successful!", "Welcome back to StreamVerse"),
            route: Some(Route::Home),
        },
        Err(e) => {
            warn!(error = %e, "sign-in failed");
            AuthOutcome {
                notice: Notice::error("Login Failed", e.user_message(AuthFlow::SignIn)),
                route: None,
            }
        }
    }
}

pub async fn logout(app: &App) -> Result<Route> {
    app.identity().sign_out().await?;
    Ok(Route::Login)
}

pub async fn reset_password(app: &App, email: &str) -> AuthOutcome {
    match app.identity().send_password_reset(email).await {
        Ok(()) => AuthOutcome {
            notice: Notice::success("Reset Link Sent!", "Check your email to reset your password."),
            route: Some(Route::Login),
        },
        Err(e) => {
            warn!(error = %e, "password reset failed");
            AuthOutcome {
                notice: Notice::error("Error", e.user_message(AuthFlow::PasswordReset)),
                route: None,
            }
        }
    }
}
