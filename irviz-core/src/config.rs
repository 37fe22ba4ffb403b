use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buttons::{builtin_bindings, DEFAULT_PROTOCOL};
use crate::protocol::builtin_protocols;
use crate::{ButtonBinding, ButtonMap, Error, ProtocolSpec, Registry, SamplerConfig};

/// Protocol and button tables, as loaded from JSON.
///
/// Sections missing from the file keep their builtin contents.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub protocols: Vec<ProtocolSpec>,
    pub buttons: Vec<ButtonBinding>,
    pub default_protocol: String,
    pub carrier: SamplerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config::builtin()
    }
}

impl Config {
    pub fn builtin() -> Self {
        Config {
            protocols: builtin_protocols(),
            buttons: builtin_bindings(),
            default_protocol: DEFAULT_PROTOCOL.to_string(),
            carrier: SamplerConfig::default(),
        }
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config = Config::from_reader(BufReader::new(file))?;

        log::info!(
            "Loaded {}: {} protocols, {} buttons",
            path.display(),
            config.protocols.len(),
            config.buttons.len(),
        );

        Ok(config)
    }

    /// Validate the tables and build the lookup structures
    pub fn build(self) -> Result<(Registry, ButtonMap, SamplerConfig), Error> {
        let registry = Registry::new(self.protocols)?;
        let buttons = ButtonMap::new(self.buttons, &self.default_protocol);
        buttons.validate(&registry)?;

        Ok((registry, buttons, self.carrier))
    }
}
