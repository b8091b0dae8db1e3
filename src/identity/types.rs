//! Validated identity inputs and the instance ID value.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdentityError;

/// A host identifier in hyphenated UUID form, kept exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostId(String);

impl HostId {
    /// Validates a host ID.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidArgument`] unless `raw` is a
    /// hyphenated 8-4-4-4-12 UUID.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        if raw.is_empty() {
            return Err(IdentityError::invalid("host id", "must not be empty"));
        }
        // Uuid::parse_str also takes simple, braced and urn forms.
        if raw.len() != 36 || Uuid::parse_str(raw).is_err() {
            return Err(IdentityError::invalid("host id", format!("{raw:?} is not a UUID")));
        }
        Ok(Self(raw.to_string()))
    }

    /// The host ID as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An agent name usable as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentName(String);

impl AgentName {
    /// Validates an agent name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidArgument`] if `raw` is empty, is `.`
    /// or `..`, or contains a path separator or NUL.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        if raw.is_empty() {
            return Err(IdentityError::invalid("agent name", "must not be empty"));
        }
        if raw == "." || raw == ".." {
            return Err(IdentityError::invalid("agent name", format!("{raw:?} is reserved")));
        }
        if raw.contains(['/', '\\', '\0']) {
            return Err(IdentityError::invalid(
                "agent name",
                format!("{raw:?} must not contain path separators"),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// The agent name as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A persisted instance identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Builds an instance ID from record contents, stripping surrounding
    /// whitespace. The contents are not otherwise validated.
    pub(crate) fn from_record(contents: &str) -> Self {
        Self(contents.trim().to_string())
    }

    pub(crate) fn generated(id: String) -> Self {
        Self(id)
    }

    /// Record file contents for this ID.
    pub(crate) fn to_record(&self) -> String {
        format!("{}\n", self.0)
    }

    /// The ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_id_accepts_hyphenated_uuid_in_either_case() {
        assert!(HostId::parse("11111111-1111-1111-1111-111111111111").is_ok());
        let upper = HostId::parse("ABCDEF01-2345-6789-ABCD-EF0123456789").unwrap();
        assert_eq!(upper.as_str(), "ABCDEF01-2345-6789-ABCD-EF0123456789");
    }

    #[test]
    fn host_id_rejects_other_forms() {
        for raw in [
            "",
            "not-a-uuid",
            "11111111111111111111111111111111",
            "{11111111-1111-1111-1111-111111111111}",
            "11111111-1111-1111-1111-11111111111g",
            "../1111-1111-1111-1111-111111111111",
        ] {
            assert!(
                matches!(HostId::parse(raw), Err(IdentityError::InvalidArgument { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn agent_name_rejects_path_tricks() {
        for raw in ["", ".", "..", "a/b", "a\\b", "nul\0"] {
            assert!(AgentName::parse(raw).is_err(), "{raw:?} should be rejected");
        }
        assert_eq!(AgentName::parse("metrics-agent").unwrap().as_str(), "metrics-agent");
    }

    #[test]
    fn instance_id_trims_record_contents() {
        let id = InstanceId::from_record("  abc \n\n");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(id.to_record(), "abc\n");
        assert_eq!(InstanceId::from_record(" \n").as_str(), "");
    }
}
