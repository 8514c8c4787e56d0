//! Filters headers crossing the boundary to external systems.

use std::collections::HashMap;

use crate::definition::{DittoHeaderDefinition, HeaderDefinition};
use crate::error::HeaderError;
use crate::headers::DittoHeaders;
use crate::map::CaseInsensitiveHeaders;
use crate::message::MessageHeaderDefinition;

/// Translates between external headers (HTTP, connections) and
/// [`DittoHeaders`] according to a set of header definitions.
#[derive(Debug, Clone)]
pub struct HeaderTranslator {
    definitions: HashMap<&'static str, &'static dyn HeaderDefinition>,
}

impl HeaderTranslator {
    /// Creates a translator over the given definitions. Later definitions
    /// replace earlier ones with the same key.
    pub fn new<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = &'static dyn HeaderDefinition>,
    {
        let definitions = definitions
            .into_iter()
            .map(|definition| (definition.key(), definition))
            .collect();
        Self { definitions }
    }

    /// Translator knowing all Ditto and message headers.
    pub fn ditto() -> Self {
        let ditto = DittoHeaderDefinition::all()
            .iter()
            .map(|d| d as &'static dyn HeaderDefinition);
        let message = MessageHeaderDefinition::all()
            .iter()
            .map(|d| d as &'static dyn HeaderDefinition);
        Self::new(ditto.chain(message))
    }

    pub fn definition(&self, key: &str) -> Option<&'static dyn HeaderDefinition> {
        self.definitions.get(key.to_lowercase().as_str()).copied()
    }

    /// Reads headers received from an external source.
    ///
    /// Headers that may not be set externally are dropped, unknown headers
    /// are kept and all others are validated.
    #[tracing::instrument(skip_all)]
    pub fn from_external_headers<I, K, V>(&self, headers: I) -> Result<DittoHeaders, HeaderError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut accepted = CaseInsensitiveHeaders::new();
        for (key, value) in headers {
            let key = key.into();
            let value = value.into();
            match self.definition(&key) {
                Some(definition) if !definition.should_read_from_external() => {
                    tracing::debug!(header = %key, "dropping header not readable from external");
                }
                Some(definition) => {
                    definition.validate_value(&value).inspect_err(|_| {
                        metrics::counter!("headers_validation_failures_total", "header" => definition.key())
                            .increment(1);
                    })?;
                    accepted.insert(key, value);
                }
                None => {
                    accepted.insert(key, value);
                }
            }
        }
        Ok(DittoHeaders::from_validated(accepted))
    }

    /// Returns the headers that may be passed on to external recipients.
    pub fn to_external_headers(&self, headers: &DittoHeaders) -> CaseInsensitiveHeaders {
        headers
            .iter()
            .filter(|(key, _)| match self.definition(key) {
                Some(definition) => definition.should_write_to_external(),
                None => true,
            })
            .collect()
    }

    /// Keeps only headers with a known definition.
    pub fn retain_known_headers(&self, headers: &DittoHeaders) -> DittoHeaders {
        let known = headers
            .iter()
            .filter(|(key, _)| self.definition(key).is_some())
            .collect();
        DittoHeaders::from_validated(known)
    }
}

impl Default for HeaderTranslator {
    fn default() -> Self {
        Self::ditto()
    }
}
