//! Authorization subjects and the context they are grouped in.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseError;

/// A subject a request was authenticated as, conventionally `issuer:subject`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuthorizationSubject(String);

impl AuthorizationSubject {
    /// Creates a subject, rejecting empty or blank ids.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ParseError::EmptyAuthorizationSubject);
        }
        Ok(Self(id))
    }

    /// Returns the subject id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the issuer part before the first `:`, if any.
    pub fn issuer(&self) -> Option<&str> {
        self.0.split_once(':').map(|(issuer, _)| issuer)
    }
}

impl std::fmt::Display for AuthorizationSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AuthorizationSubject {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for AuthorizationSubject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AuthorizationSubject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// The subjects a signal is authorized with, plus how they were obtained.
///
/// Serialized as `{"type": "...", "subjects": ["issuer:subject", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    #[serde(rename = "type")]
    pub context_type: String,
    pub subjects: Vec<AuthorizationSubject>,
}

impl AuthorizationContext {
    pub const UNSPECIFIED: &'static str = "unspecified";
    pub const PRE_AUTHENTICATED_HTTP: &'static str = "pre-authenticated-http";
    pub const PRE_AUTHENTICATED_CONNECTION: &'static str = "pre-authenticated-connection";

    /// Creates a context of the given type.
    pub fn new(
        context_type: impl Into<String>,
        subjects: impl IntoIterator<Item = AuthorizationSubject>,
    ) -> Self {
        Self {
            context_type: context_type.into(),
            subjects: subjects.into_iter().collect(),
        }
    }

    /// Returns an unspecified context without subjects.
    pub fn empty() -> Self {
        Self::new(Self::UNSPECIFIED, [])
    }

    /// Parses the JSON text form of a context.
    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json)
            .map_err(|e| ParseError::InvalidAuthorizationContext(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn first_subject(&self) -> Option<&AuthorizationSubject> {
        self.subjects.first()
    }

    pub fn contains(&self, subject: &AuthorizationSubject) -> bool {
        self.subjects.contains(subject)
    }
}

impl Default for AuthorizationContext {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_rejects_blank_ids() {
        assert_eq!(
            AuthorizationSubject::new("  "),
            Err(ParseError::EmptyAuthorizationSubject)
        );
        assert!(AuthorizationSubject::new("").is_err());
    }

    #[test]
    fn subject_exposes_issuer() {
        let subject: AuthorizationSubject = "google:alice".parse().unwrap();
        assert_eq!(subject.issuer(), Some("google"));
        assert_eq!(subject.to_string(), "google:alice");

        let plain = AuthorizationSubject::new("nobody").unwrap();
        assert_eq!(plain.issuer(), None);
    }

    #[test]
    fn context_json_uses_type_and_subjects_fields() {
        let context = AuthorizationContext::new(
            AuthorizationContext::PRE_AUTHENTICATED_HTTP,
            [
                AuthorizationSubject::new("nginx:alice").unwrap(),
                AuthorizationSubject::new("nginx:bob").unwrap(),
            ],
        );

        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "pre-authenticated-http",
                "subjects": ["nginx:alice", "nginx:bob"]
            })
        );
        assert_eq!(context.len(), 2);
        assert_eq!(context.first_subject().unwrap().as_str(), "nginx:alice");
    }

    #[test]
    fn context_parsing_rejects_empty_subjects() {
        let result =
            AuthorizationContext::from_json_str(r#"{"type":"unspecified","subjects":[""]}"#);
        assert!(matches!(
            result,
            Err(ParseError::InvalidAuthorizationContext(_))
        ));
    }

    #[test]
    fn context_parsing_requires_type() {
        let result = AuthorizationContext::from_json_str(r#"{"subjects":["a:b"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn default_context_is_empty() {
        let context = AuthorizationContext::default();
        assert!(context.is_empty());
        assert_eq!(context.context_type, AuthorizationContext::UNSPECIFIED);
    }
}
