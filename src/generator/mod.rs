//! Configuration generation pipeline: validate a form snapshot, build the
//! typed intent, render CLI text, hash it.

pub mod error;
pub mod ipv4;
pub mod render;
pub mod rules;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::{ConfigForm, DeviceConfigIntent};

pub use error::{FieldError, ValidationError, ValidationReport};

/// Output of a successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedConfig {
    pub intent: DeviceConfigIntent,
    pub config_text: String,
    pub config_hash: String,
}

/// SHA-256 of the rendered text, lowercase hex
pub fn config_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Validate `form` from scratch and render it when every rule passes.
pub fn generate(form: &ConfigForm) -> Result<RenderedConfig, ValidationReport> {
    let report = rules::validate_form(form);
    if !report.is_valid() {
        tracing::debug!("Generation rejected: {} field error(s)", report.errors.len());
        return Err(report);
    }

    let intent = rules::build_intent(form).map_err(|e| ValidationReport { errors: vec![e] })?;
    let config_text = render::render(&intent);
    let config_hash = config_hash(&config_text);
    tracing::debug!("Rendered {} config for {} ({})", intent.device_type.as_str(), intent.hostname, config_hash);

    Ok(RenderedConfig {
        intent,
        config_text,
        config_hash,
    })
}

/// Where a form editing session stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Form is being edited; holds the errors of the last rejected submit
    Editing(Option<ValidationReport>),
    Rendered(RenderedConfig),
}

/// Tracks one form through edit/submit cycles.
///
/// Submitting always re-validates; any field change drops a previous render.
/// Library-level counterpart of the form flow for embedders; the HTTP
/// handlers are stateless and call [`generate`] directly.
#[derive(Debug, Clone)]
pub struct GenerationSession {
    state: SessionState,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Editing(None),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn rendered(&self) -> Option<&RenderedConfig> {
        match &self.state {
            SessionState::Rendered(r) => Some(r),
            SessionState::Editing(_) => None,
        }
    }

    /// A form field changed: the previous output no longer applies
    pub fn field_changed(&mut self) {
        if matches!(self.state, SessionState::Rendered(_)) {
            self.state = SessionState::Editing(None);
        }
    }

    pub fn submit(&mut self, form: &ConfigForm) -> &SessionState {
        self.state = match generate(form) {
            Ok(rendered) => SessionState::Rendered(rendered),
            Err(report) => SessionState::Editing(Some(report)),
        };
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PortForm;

    fn sw1_form() -> ConfigForm {
        ConfigForm {
            device_type: "switch".into(),
            hostname: "SW1".into(),
            vlan_id: "10".into(),
            vlan_ip: "10.0.0.1".into(),
            vlan_subnet: "24".into(),
            dhcp_enable_global: false,
            ports: vec![PortForm {
                port_id: "GE1/0/1".into(),
                mode: "access".into(),
                poe_enabled: true,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_end_to_end() {
        let rendered = generate(&sw1_form()).unwrap();
        let expected = [
            "system-view",
            "sysname SW1",
            "vlan 10",
            "exit",
            "interface Vlan-interface10",
            " ip address 10.0.0.1 255.255.255.0",
            "exit",
            "interface GE1/0/1",
            " port link-type access",
            " port access vlan 10",
            " poe enable",
            "exit",
            "exit",
            "save force",
        ];
        assert_eq!(rendered.config_text.lines().collect::<Vec<_>>(), expected);
        assert_eq!(rendered.config_hash, config_hash(&rendered.config_text));
        assert_eq!(rendered.config_hash.len(), 64);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let a = generate(&sw1_form()).unwrap();
        let b = generate(&sw1_form()).unwrap();
        assert_eq!(a.config_text, b.config_text);
        assert_eq!(a.config_hash, b.config_hash);
    }

    #[test]
    fn test_config_hash_known_value() {
        assert_eq!(
            config_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_generate_rejects_invalid_form() {
        let mut form = sw1_form();
        form.hostname = "-bad-".into();
        form.vlan_ip = "10.0.0.0".into();
        let report = generate(&form).unwrap_err();
        assert_eq!(report.errors.len(), 2);
        assert!(report.get("hostname").is_some());
        assert!(report.get("vlan_ip").is_some());
    }

    #[test]
    fn test_session_transitions() {
        let mut session = GenerationSession::new();
        assert_eq!(session.state(), &SessionState::Editing(None));

        let mut bad = sw1_form();
        bad.vlan_id = "0".into();
        assert!(matches!(session.submit(&bad), SessionState::Editing(Some(_))));
        assert!(session.rendered().is_none());

        assert!(matches!(session.submit(&sw1_form()), SessionState::Rendered(_)));
        assert!(session.rendered().is_some());

        session.field_changed();
        assert_eq!(session.state(), &SessionState::Editing(None));
    }

    #[test]
    fn test_resubmit_revalidates() {
        let mut session = GenerationSession::new();
        session.submit(&sw1_form());
        let mut bad = sw1_form();
        bad.ports[0].port_id = "bogus".into();
        assert!(matches!(session.submit(&bad), SessionState::Editing(Some(_))));
    }
}
