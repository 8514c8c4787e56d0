//! Policy events.

use common::PolicyId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::Event;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PolicyEvent {
    #[serde(rename = "policies.events:policyCreated")]
    PolicyCreated { policy: Value },

    #[serde(rename = "policies.events:policyModified")]
    PolicyModified { policy: Value },

    #[serde(rename = "policies.events:policyDeleted")]
    PolicyDeleted,
}

impl Event for PolicyEvent {
    type EntityId = PolicyId;

    const ENTITY_ID_FIELD: &'static str = "policyId";

    const TYPES: &'static [&'static str] = &[
        "policies.events:policyCreated",
        "policies.events:policyModified",
        "policies.events:policyDeleted",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            PolicyEvent::PolicyCreated { .. } => "policies.events:policyCreated",
            PolicyEvent::PolicyModified { .. } => "policies.events:policyModified",
            PolicyEvent::PolicyDeleted => "policies.events:policyDeleted",
        }
    }
}
