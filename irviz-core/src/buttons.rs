use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::{Error, Registry};

/// Protocol used for buttons without a binding
pub const DEFAULT_PROTOCOL: &str = "NEC";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ButtonGroup {
    Streaming,
    Basic,
    Navigation,
    Directional,
    Playback,
    Number,
    Color,
    Advanced,
    Smart,
    System,
    Gaming,
    Picture,
    Audio,
    Connectivity,
}

/// Every button of the remote, with its display name
pub const BUTTONS: &[(u8, &str, ButtonGroup)] = {
    use self::ButtonGroup::*;
    &[
        (0x01, "YouTube", Streaming),
        (0x02, "Netflix", Streaming),
        (0x03, "Amazon Prime", Streaming),
        (0x04, "HBO Max", Streaming),
        (0x10, "Power", Basic),
        (0x11, "Volume Up", Basic),
        (0x12, "Volume Down", Basic),
        (0x13, "Mute", Basic),
        (0x14, "Channel Up", Basic),
        (0x15, "Channel Down", Basic),
        (0x20, "Home", Navigation),
        (0x21, "Menu", Navigation),
        (0x22, "Back", Navigation),
        (0x23, "Exit", Navigation),
        (0x24, "Options", Navigation),
        (0x25, "Input", Navigation),
        (0x26, "Source", Navigation),
        (0x30, "Up", Directional),
        (0x31, "Down", Directional),
        (0x32, "Left", Directional),
        (0x33, "Right", Directional),
        (0x34, "OK", Directional),
        (0x35, "Enter", Directional),
        (0x40, "Play", Playback),
        (0x41, "Pause", Playback),
        (0x42, "Stop", Playback),
        (0x43, "Fast Forward", Playback),
        (0x44, "Rewind", Playback),
        (0x45, "Record", Playback),
        (0x50, "0", Number),
        (0x51, "1", Number),
        (0x52, "2", Number),
        (0x53, "3", Number),
        (0x54, "4", Number),
        (0x55, "5", Number),
        (0x56, "6", Number),
        (0x57, "7", Number),
        (0x58, "8", Number),
        (0x59, "9", Number),
        (0x5A, "Dash", Number),
        (0x60, "Red", Color),
        (0x61, "Green", Color),
        (0x62, "Yellow", Color),
        (0x63, "Blue", Color),
        (0x70, "Info", Advanced),
        (0x71, "Guide", Advanced),
        (0x72, "Settings", Advanced),
        (0x73, "CC", Advanced),
        (0x74, "Subtitles", Advanced),
        (0x75, "SAP", Advanced),
        (0x76, "Audio", Advanced),
        (0x77, "Sleep", Advanced),
        (0x78, "Picture Mode", Advanced),
        (0x79, "Aspect", Advanced),
        (0x7A, "Zoom", Advanced),
        (0x7B, "P.Size", Advanced),
        (0x80, "Voice", Smart),
        (0x81, "Mic", Smart),
        (0x82, "Live TV", Smart),
        (0x83, "Stream", Smart),
        (0x90, "Display", System),
        (0x91, "Status", System),
        (0x92, "Help", System),
        (0x93, "E-Manual", System),
        (0xA0, "Game Mode", Gaming),
        (0xB0, "Motion", Picture),
        (0xB1, "Backlight", Picture),
        (0xB2, "Brightness", Picture),
        (0xC0, "Sound Mode", Audio),
        (0xC1, "Sync", Audio),
        (0xC2, "Sound Output", Audio),
        (0xD0, "Multi View", Connectivity),
        (0xD1, "PIP", Connectivity),
        (0xD2, "Screen Mirror", Connectivity),
    ]
};

pub fn button_name(code: u8) -> Option<&'static str> {
    BUTTONS
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, name, _)| *name)
}

pub fn button_group(code: u8) -> Option<ButtonGroup> {
    BUTTONS
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, _, group)| *group)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(*c, ' ' | '_' | '-' | '.'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find a button by name, ignoring case and separators ("fast_forward",
/// "Fast Forward" and "fastforward" are the same button)
pub fn button_by_name(name: &str) -> Option<u8> {
    let wanted = normalize(name);
    BUTTONS
        .iter()
        .find(|(_, n, _)| normalize(n) == wanted)
        .map(|(code, _, _)| *code)
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct ButtonBinding {
    pub button_code: u8,
    pub protocol: String,
    pub code: u32,
}

impl ButtonBinding {
    pub fn new(button_code: u8, protocol: &str, code: u32) -> Self {
        ButtonBinding {
            button_code,
            protocol: protocol.to_string(),
            code,
        }
    }
}

pub fn builtin_bindings() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding::new(0x10, "NEC", 0x0000_0001),
        ButtonBinding::new(0x11, "NEC", 0x0000_0002),
        ButtonBinding::new(0x12, "NEC", 0x0000_0003),
        ButtonBinding::new(0x14, "RC5", 0x0000_0005),
        ButtonBinding::new(0x15, "RC5", 0x0000_0006),
        ButtonBinding::new(0x20, "NEC", 0x0000_0010),
        ButtonBinding::new(0x01, "RC6", 0x1234_5678),
        ButtonBinding::new(0x02, "RC6", 0x1234_5679),
        ButtonBinding::new(0x03, "RC6", 0x1234_567A),
        ButtonBinding::new(0x04, "RC6", 0x1234_567B),
        ButtonBinding::new(0x25, "Phillips", 0x0000_0020),
        ButtonBinding::new(0x26, "Phillips", 0x0000_0020),
    ]
}

/// Button code to (protocol, code) table.
///
/// Lookups never fail: a button without a binding resolves to the default
/// protocol with code zero. Such lookups are logged and counted, see
/// [`ButtonMap::unmapped_lookups`].
#[derive(Debug)]
pub struct ButtonMap {
    bindings: Vec<ButtonBinding>,
    default_protocol: String,
    unmapped: AtomicU64,
}

impl ButtonMap {
    /// Later bindings for the same button replace earlier ones
    pub fn new(bindings: Vec<ButtonBinding>, default_protocol: &str) -> Self {
        let mut deduped: Vec<ButtonBinding> = Vec::with_capacity(bindings.len());

        for binding in bindings {
            match deduped
                .iter()
                .position(|b| b.button_code == binding.button_code)
            {
                Some(i) => deduped[i] = binding,
                None => deduped.push(binding),
            }
        }

        ButtonMap {
            bindings: deduped,
            default_protocol: default_protocol.to_string(),
            unmapped: AtomicU64::new(0),
        }
    }

    pub fn builtin() -> Self {
        ButtonMap::new(builtin_bindings(), DEFAULT_PROTOCOL)
    }

    pub fn default_protocol(&self) -> &str {
        &self.default_protocol
    }

    pub fn binding(&self, button_code: u8) -> Option<&ButtonBinding> {
        self.bindings.iter().find(|b| b.button_code == button_code)
    }

    /// Resolve a button to the protocol name and code it transmits
    pub fn resolve_button(&self, button_code: u8) -> (&str, u32) {
        match self.binding(button_code) {
            Some(binding) => (binding.protocol.as_str(), binding.code),
            None => {
                self.unmapped.fetch_add(1, Ordering::Relaxed);
                log::warn!(
                    "No binding for button {:#04x} ({}), using {} with code 0",
                    button_code,
                    button_name(button_code).unwrap_or("unknown"),
                    self.default_protocol,
                );
                (self.default_protocol.as_str(), 0)
            }
        }
    }

    /// Number of lookups that fell back to the default protocol
    pub fn unmapped_lookups(&self) -> u64 {
        self.unmapped.load(Ordering::Relaxed)
    }

    /// Check that every binding, and the default, names a known protocol
    pub fn validate(&self, registry: &Registry) -> Result<(), Error> {
        registry.get_protocol(&self.default_protocol)?;

        for binding in &self.bindings {
            registry.get_protocol(&binding.protocol)?;
        }

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ButtonBinding> {
        self.bindings.iter()
    }
}

impl Clone for ButtonMap {
    fn clone(&self) -> Self {
        ButtonMap::new(self.bindings.clone(), &self.default_protocol)
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        ButtonMap::builtin()
    }
}
