//! HTTP Basic credentials (`Authorization: Basic base64(email:password)`).

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("authorization header is not of the form '<scheme> <credentials>'")]
    Malformed,

    #[error("authorization scheme is not Basic")]
    UnsupportedScheme,

    #[error("credentials are not valid base64-encoded UTF-8")]
    InvalidEncoding,

    #[error("credentials are missing the ':' separator")]
    MissingSeparator,

    #[error("credentials carry an empty user name")]
    EmptyUsername,
}

/// Decoded Basic credentials. The user name is an email address.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    email: String,
    password: String,
}

impl BasicCredentials {
    /// Decode the raw value of an `Authorization` header.
    ///
    /// The scheme is matched case-insensitively. The password is everything
    /// after the first `:`, so passwords may themselves contain colons.
    pub fn parse(header_value: &str) -> Result<Self, CredentialsError> {
        let (scheme, payload) = header_value
            .trim()
            .split_once(' ')
            .ok_or(CredentialsError::Malformed)?;

        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(CredentialsError::UnsupportedScheme);
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| CredentialsError::InvalidEncoding)?;
        let decoded = String::from_utf8(bytes).map_err(|_| CredentialsError::InvalidEncoding)?;

        let (email, password) = decoded
            .split_once(':')
            .ok_or(CredentialsError::MissingSeparator)?;

        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl core::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn decodes_email_and_password() {
        let creds = BasicCredentials::parse(&header("joe@smith.com:joepassword")).unwrap();
        assert_eq!(creds.email(), "joe@smith.com");
        assert_eq!(creds.password(), "joepassword");
    }

    #[test]
    fn password_may_contain_colons() {
        let creds = BasicCredentials::parse(&header("a@b.io:pa:ss:word")).unwrap();
        assert_eq!(creds.password(), "pa:ss:word");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let value = format!("bAsIc {}", STANDARD.encode("a@b.io:x"));
        assert!(BasicCredentials::parse(&value).is_ok());
    }

    #[test]
    fn bearer_tokens_are_rejected() {
        assert_eq!(
            BasicCredentials::parse("Bearer abc.def.ghi"),
            Err(CredentialsError::UnsupportedScheme)
        );
    }

    #[test]
    fn rejects_bad_base64_missing_separator_and_empty_user() {
        assert_eq!(BasicCredentials::parse("Basic"), Err(CredentialsError::Malformed));
        assert_eq!(
            BasicCredentials::parse("Basic %%%not-base64%%%"),
            Err(CredentialsError::InvalidEncoding)
        );
        assert_eq!(
            BasicCredentials::parse(&header("no-separator")),
            Err(CredentialsError::MissingSeparator)
        );
        assert_eq!(
            BasicCredentials::parse(&header(":password")),
            Err(CredentialsError::EmptyUsername)
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let creds = BasicCredentials::parse(&header("a@b.io:hunter2")).unwrap();
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("a@b.io"));
        assert!(!rendered.contains("hunter2"));
    }
}
