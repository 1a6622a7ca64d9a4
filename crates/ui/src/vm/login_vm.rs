use quiz_core::model::Identity;
use services::AuthService;

use crate::state::ViewError;

pub const LOGIN_OK: &str = "Login successful!";
pub const REGISTER_OK: &str = "Account created!";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginMessage {
    Ok(String),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginAction {
    Login,
    Register,
}

/// Email/password form shared by sign-in and registration.
#[derive(Clone, Debug, Default)]
pub struct LoginVm {
    pub email: String,
    pub password: String,
    message: Option<LoginMessage>,
    identity: Option<Identity>,
}

impl LoginVm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn message(&self) -> Option<&LoginMessage> {
        self.message.as_ref()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Greeting for the signed-in user.
    #[must_use]
    pub fn greeting(&self) -> Option<String> {
        self.identity
            .as_ref()
            .map(|identity| format!("Hello, {}!", identity.display_name()))
    }

    /// # Errors
    ///
    /// Returns `ViewError` with the service message; it is also kept in
    /// `message()`.
    pub async fn submit(
        &mut self,
        auth: &AuthService,
        action: LoginAction,
    ) -> Result<&Identity, ViewError> {
        self.message = None;
        let result = match action {
            LoginAction::Login => auth.login(&self.email, &self.password).await,
            LoginAction::Register => auth.register(&self.email, &self.password).await,
        };
        match result {
            Ok(identity) => {
                let ok = match action {
                    LoginAction::Login => LOGIN_OK,
                    LoginAction::Register => REGISTER_OK,
                };
                self.message = Some(LoginMessage::Ok(ok.to_string()));
                self.password.clear();
                Ok(self.identity.insert(identity))
            }
            Err(err) => {
                let view_error = ViewError::from_error(&err);
                self.message = Some(LoginMessage::Error(view_error.message().to_string()));
                self.identity = None;
                Err(view_error)
            }
        }
    }
}
