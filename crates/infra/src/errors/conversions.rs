//! Conversions from external infrastructure errors into domain errors.

use accountstack_domain::AccountStackError;
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AccountStackError);

impl From<InfraError> for AccountStackError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AccountStackError> for InfraError {
    fn from(value: AccountStackError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAccountStackError {
    fn into_domain(self) -> AccountStackError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → AccountStackError */
/* -------------------------------------------------------------------------- */

impl IntoAccountStackError for KeyringError {
    fn into_domain(self) -> AccountStackError {
        match self {
            KeyringError::NoEntry => AccountStackError::Auth("keychain entry not found".into()),
            KeyringError::BadEncoding(_) => {
                AccountStackError::Auth("credential in keychain is not valid UTF-8".into())
            }
            KeyringError::TooLong(name, limit) => AccountStackError::Auth(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            KeyringError::Invalid(attr, reason) => {
                AccountStackError::Auth(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            KeyringError::PlatformFailure(err) => {
                AccountStackError::Auth(format!("keychain platform error: {err}"))
            }
            KeyringError::NoStorageAccess(err) => {
                AccountStackError::Auth(format!("unable to access secure storage: {err}"))
            }
            other => AccountStackError::Auth(other.to_string()),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AccountStackError */
/* -------------------------------------------------------------------------- */

impl IntoAccountStackError for HttpError {
    fn into_domain(self) -> AccountStackError {
        if self.is_builder() {
            return AccountStackError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_timeout() {
            return AccountStackError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AccountStackError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => AccountStackError::Auth(message),
                400..=499 => AccountStackError::InvalidInput(message),
                _ => AccountStackError::Network(message),
            };
        }

        AccountStackError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
