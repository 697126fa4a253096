use validator::Validate;

pub const MISSING_CREDENTIALS: &str = "username and password are required";

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "username and password are required"))]
    pub username: String,
    #[validate(length(min = 1, message = "username and password are required"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        LoginForm {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The single inline error the login screen shows, if any.
    pub fn error(&self) -> Option<&'static str> {
        self.validate().err().map(|_| MISSING_CREDENTIALS)
    }
}
