use secrecy::SecretString;
use strum::{Display, EnumString};

/// Username/password pair for the login call.
///
/// The core never persists these; the client keeps a copy only so that
/// [`AlarmClient::refresh_session`](crate::AlarmClient::refresh_session)
/// can log in again.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    /// Overrides the client's default country for this login.
    pub country: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            country: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Wire shape used to reach the remote API.
///
/// Determines how an [`Operation`](crate::Operation) is composed into an
/// HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApiFlavor {
    /// `POST {base}` with `{operationName, variables, query}`.
    #[default]
    GraphQl,
    /// `{verb} {base}{path}` with the variables as the JSON body.
    Rest,
}
