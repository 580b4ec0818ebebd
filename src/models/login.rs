//! Login request construction and credential encoding
//!
//! A [`LoginRequest`] holds the plain credential as the caller typed it (with the
//! password already uppercased). It has to go through [`LoginRequest::encode`]
//! before it can be sent: the identity client only accepts an
//! [`EncodedLoginRequest`].

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

/// Which identifier the user logs in with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// National identity number
    NationalId,
    Username,
}

impl Credential {
    /// Wire name of the identifier field for this credential
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Credential::NationalId => "cpf",
            Credential::Username => "username",
        }
    }
}

/// Plain login request, built per attempt
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    credential: Credential,
    identifier: String,
    password: String,
    brand: String,
}

impl LoginRequest {
    /// Build a login request for the given credential kind.
    ///
    /// The password is case-normalized to uppercase here, so every request that
    /// reaches the provider carries an uppercase password.
    #[must_use]
    pub fn new(credential: Credential, identifier: &str, password: &str, brand: &str) -> Self {
        Self {
            credential,
            identifier: identifier.to_string(),
            password: password.to_uppercase(),
            brand: brand.to_string(),
        }
    }

    #[must_use]
    pub fn by_national_id(national_id: &str, password: &str, brand: &str) -> Self {
        Self::new(Credential::NationalId, national_id, password, brand)
    }

    #[must_use]
    pub fn by_username(username: &str, password: &str, brand: &str) -> Self {
        Self::new(Credential::Username, username, password, brand)
    }

    #[must_use]
    pub const fn credential(&self) -> Credential {
        self.credential
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Encode the credential payload for transmission.
    ///
    /// Identifier and password are Base64-encoded (standard alphabet, padded);
    /// the brand is sent as-is.
    #[must_use]
    pub fn encode(self) -> EncodedLoginRequest {
        EncodedLoginRequest {
            credential: self.credential,
            identifier: general_purpose::STANDARD.encode(self.identifier.as_bytes()),
            password: general_purpose::STANDARD.encode(self.password.as_bytes()),
            brand: self.brand,
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("credential", &self.credential)
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .field("brand", &self.brand)
            .finish()
    }
}

/// Login request in its transmitted form
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedLoginRequest {
    credential: Credential,
    identifier: String,
    password: String,
    brand: String,
}

impl EncodedLoginRequest {
    #[must_use]
    pub const fn credential(&self) -> Credential {
        self.credential
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }
}

impl Serialize for EncodedLoginRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(self.credential.field_name(), &self.identifier)?;
        map.serialize_entry("password", &self.password)?;
        map.serialize_entry("brand", &self.brand)?;
        map.end()
    }
}

impl std::fmt::Debug for EncodedLoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedLoginRequest")
            .field("credential", &self.credential)
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .field("brand", &self.brand)
            .finish()
    }
}
