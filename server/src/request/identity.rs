use axum::http::{HeaderName, HeaderValue};
use axum_extra::headers::{Error, Header};

static CLIENT_EMAIL: HeaderName = HeaderName::from_static("x-client-email");

/// Email of the authenticated caller, forwarded by the upstream authenticator.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClientEmailHeader(String);

impl ClientEmailHeader {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Header for ClientEmailHeader {
    fn name() -> &'static HeaderName {
        &CLIENT_EMAIL
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(Error::invalid)?;
        let email = value.to_str().map_err(|_| Error::invalid())?.trim();
        if email.is_empty() {
            return Err(Error::invalid());
        }
        Ok(Self(email.to_string()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            values.extend(std::iter::once(value));
        }
    }
}
