//! Centralized capture/projection options with TOML preset support.
//!
//! All tweakable settings (lens, capture buffers, recording, keybindings)
//! are consolidated here. Options serialize to/from TOML so a capture setup
//! can be saved and restored.

mod capture;
mod keybindings;
mod persistence;
mod projection;

use std::path::Path;

pub use capture::{CaptureOptions, CaptureTiming};
pub use keybindings::KeybindingOptions;
pub use persistence::PersistenceOptions;
pub use projection::ProjectionOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::OmniError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[capture]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Lens selection and field-of-view control.
    pub projection: ProjectionOptions,
    /// Cube-map capture and reprojection buffers.
    pub capture: CaptureOptions,
    /// Image-sequence recording.
    pub persistence: PersistenceOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, OmniError> {
        let mut opts: Self = toml::from_str(content)
            .map_err(|e| OmniError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, OmniError> {
        let content = std::fs::read_to_string(path).map_err(OmniError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), OmniError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| OmniError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(OmniError::Io)?;
        }
        std::fs::write(path, content).map_err(OmniError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;
    use crate::lens::LensKind;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[projection]
lens = "stereographic"
fov = 200.0
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.projection.lens, LensKind::Stereographic);
        assert_eq!(opts.projection.fov, 200.0);
        // Everything else should be default
        assert_eq!(opts.projection.pixel_pitch, 1.0);
        assert_eq!(opts.capture.cubemap_size, 2048);
        assert_eq!(opts.capture.timing, CaptureTiming::AfterScene);
        assert!(!opts.persistence.enabled);
        assert_eq!(opts.persistence.frame_rate, 25);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Options::from_toml("[capture]\ncubemap_size = \"big\"");
        assert!(matches!(err, Err(OmniError::OptionsParse(_))));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyH"),
            Some(KeyAction::ResetOrientation)
        );
        assert_eq!(opts.keybindings.lookup("Tab"), Some(KeyAction::NextLens));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_are_searchable() {
        let toml_str = r#"
[keybindings.bindings]
reset_orientation = "KeyR"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyR"),
            Some(KeyAction::ResetOrientation)
        );
        assert_eq!(opts.keybindings.lookup("KeyH"), None);
    }

    #[test]
    fn rebinding_replaces_the_old_key() {
        let mut bindings = KeybindingOptions::default();
        bindings.bind(KeyAction::ToggleOverlay, "KeyV");
        assert_eq!(bindings.lookup("KeyV"), Some(KeyAction::ToggleOverlay));
        assert_eq!(bindings.lookup("KeyO"), None);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("omnicam-options-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.capture.cubemap_size = 512;
        opts.persistence.enabled = true;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("projection"));
        assert!(props.contains_key("capture"));
        assert!(props.contains_key("persistence"));
        assert!(!props.contains_key("keybindings"));

        let capture = &props["capture"]["properties"];
        assert!(capture.get("cubemap_size").is_some());
        assert!(capture.get("resize_poll_secs").is_none());
    }
}
