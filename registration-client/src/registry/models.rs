//! Registry data models.
//!
//! JSON field names follow the registration service API (camelCase, enum values in
//! SCREAMING_SNAKE_CASE).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dataspace participant as known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    /// Participant identity (DID).
    pub did: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Connector endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Protocols the participant's connector speaks (e.g. `ids-multipart`).
    #[serde(default)]
    pub supported_protocols: Vec<String>,
    /// Onboarding state.
    pub status: ParticipantStatus,
}

/// Onboarding state of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    /// Registration accepted, checks still running.
    OnboardingInProgress,
    /// Member of the dataspace.
    Authorized,
    /// Registration refused.
    Denied,
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OnboardingInProgress => "ONBOARDING_IN_PROGRESS",
            Self::Authorized => "AUTHORIZED",
            Self::Denied => "DENIED",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_from_service_json() {
        let json = r#"{
            "did": "did:web:participant.example.com",
            "name": "Example Corp",
            "url": "https://connector.example.com/api/ids",
            "supportedProtocols": ["ids-multipart"],
            "status": "ONBOARDING_IN_PROGRESS"
        }"#;

        let participant: ParticipantDto = serde_json::from_str(json).unwrap();
        assert_eq!(participant.did, "did:web:participant.example.com");
        assert_eq!(participant.name.as_deref(), Some("Example Corp"));
        assert_eq!(participant.supported_protocols, vec!["ids-multipart"]);
        assert_eq!(participant.status, ParticipantStatus::OnboardingInProgress);
    }

    #[test]
    fn test_participant_optional_fields() {
        let json = r#"{"did":"did:web:a","status":"DENIED"}"#;

        let participant: ParticipantDto = serde_json::from_str(json).unwrap();
        assert!(participant.name.is_none());
        assert!(participant.url.is_none());
        assert!(participant.supported_protocols.is_empty());

        let out = serde_json::to_string(&participant).unwrap();
        assert!(!out.contains("name"));
        assert!(out.contains("\"supportedProtocols\":[]"));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let json = r#"{"did":"did:web:a","status":"SUSPENDED"}"#;
        assert!(serde_json::from_str::<ParticipantDto>(json).is_err());
    }

    #[test]
    fn test_status_display_matches_wire_format() {
        for status in [
            ParticipantStatus::OnboardingInProgress,
            ParticipantStatus::Authorized,
            ParticipantStatus::Denied,
        ] {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{status}\""));
        }
    }
}
