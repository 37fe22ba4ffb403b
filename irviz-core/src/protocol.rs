use serde::{Deserialize, Serialize};

use crate::Error;

/// Timing constants of a pulse-distance IR protocol. All durations in µs.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct ProtocolSpec {
    /// Registry key
    pub name: String,
    /// Display name, defaults to `name`
    #[serde(default)]
    pub title: Option<String>,
    pub header_mark_us: u32,
    pub header_space_us: u32,
    pub bit_mark_us: u32,
    pub zero_space_us: u32,
    pub one_space_us: u32,
    /// Space following the header mark of a repeat frame
    #[serde(default)]
    pub repeat_space_us: Option<u32>,
    /// Number of data bits after the header
    pub bit_count: u8,
}

pub const MAX_BITS: u8 = 32;

impl ProtocolSpec {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn space_for_bit(&self, bit: u8) -> u32 {
        if bit & 1 == 1 {
            self.one_space_us
        } else {
            self.zero_space_us
        }
    }

    /// Mask selecting the bits this protocol transmits
    pub fn code_mask(&self) -> u32 {
        if self.bit_count >= MAX_BITS {
            u32::MAX
        } else {
            (1u32 << self.bit_count) - 1
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::invalid(&self.name, "empty name"));
        }
        if self.bit_count == 0 {
            return Err(Error::invalid(&self.name, "bit count is zero"));
        }
        if self.bit_count > MAX_BITS {
            return Err(Error::invalid(&self.name, "bit count exceeds 32"));
        }

        let durations = [
            self.header_mark_us,
            self.header_space_us,
            self.bit_mark_us,
            self.zero_space_us,
            self.one_space_us,
        ];

        if durations.iter().any(|d| *d == 0) || self.repeat_space_us == Some(0) {
            return Err(Error::invalid(&self.name, "zero duration"));
        }

        Ok(())
    }
}

fn builtin_spec(
    name: &str,
    title: Option<&str>,
    timing: [u32; 5],
    repeat_space_us: Option<u32>,
    bit_count: u8,
) -> ProtocolSpec {
    let [header_mark_us, header_space_us, bit_mark_us, zero_space_us, one_space_us] = timing;

    ProtocolSpec {
        name: name.to_string(),
        title: title.map(str::to_string),
        header_mark_us,
        header_space_us,
        bit_mark_us,
        zero_space_us,
        one_space_us,
        repeat_space_us,
        bit_count,
    }
}

/// The reference protocol table
pub fn builtin_protocols() -> Vec<ProtocolSpec> {
    vec![
        builtin_spec("NEC", None, [9000, 4500, 560, 560, 1690], Some(2250), 32),
        // Manchester coded on the wire, shown here with equal spaces
        builtin_spec("RC5", None, [889, 889, 889, 889, 889], None, 14),
        builtin_spec("RC6", None, [2666, 889, 444, 444, 1333], None, 20),
        builtin_spec("Sony", Some("Sony SIRC"), [2400, 600, 600, 600, 1200], None, 12),
        builtin_spec("Phillips", None, [9000, 4500, 560, 560, 1690], None, 32),
    ]
}

/// Immutable set of protocols, looked up by name
#[derive(Debug, Clone)]
pub struct Registry {
    protocols: Vec<ProtocolSpec>,
}

impl Registry {
    /// Build a registry, validating every entry
    pub fn new(protocols: Vec<ProtocolSpec>) -> Result<Self, Error> {
        for (i, spec) in protocols.iter().enumerate() {
            spec.validate()?;

            if protocols[..i]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&spec.name))
            {
                return Err(Error::invalid(&spec.name, "duplicate name"));
            }
        }

        Ok(Registry { protocols })
    }

    pub fn builtin() -> Self {
        Registry {
            protocols: builtin_protocols(),
        }
    }

    /// Look up a protocol. Names compare ASCII case-insensitively.
    pub fn get_protocol(&self, name: &str) -> Result<&ProtocolSpec, Error> {
        self.protocols
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownProtocol(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_protocol(name).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtocolSpec> {
        self.protocols.iter()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        let registry = Registry::new(builtin_protocols()).unwrap();
        assert_eq!(registry.iter().count(), 5);
    }

    #[test]
    fn bit_counts() {
        let registry = Registry::builtin();
        let bits = |name| registry.get_protocol(name).unwrap().bit_count;

        assert_eq!(bits("NEC"), 32);
        assert_eq!(bits("Phillips"), 32);
        assert_eq!(bits("RC5"), 14);
        assert_eq!(bits("RC6"), 20);
        assert_eq!(bits("Sony"), 12);
    }

    #[test]
    fn only_nec_repeats() {
        let registry = Registry::builtin();
        let repeating: Vec<_> = registry
            .iter()
            .filter(|spec| spec.repeat_space_us.is_some())
            .map(|spec| spec.name.as_str())
            .collect();

        assert_eq!(repeating, ["NEC"]);
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = Registry::builtin();
        assert_eq!(registry.get_protocol("rc6").unwrap().name, "RC6");
        assert_eq!(registry.get_protocol("sony").unwrap().title(), "Sony SIRC");
    }

    #[test]
    fn unknown_protocol() {
        let registry = Registry::builtin();
        match registry.get_protocol("Sharp") {
            Err(Error::UnknownProtocol(name)) => assert_eq!(name, "Sharp"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_bits() {
        let mut spec = builtin_protocols().remove(0);
        spec.bit_count = 0;

        assert!(matches!(
            Registry::new(vec![spec]),
            Err(Error::InvalidProtocol { .. })
        ));
    }

    #[test]
    fn rejects_zero_duration() {
        let mut spec = builtin_protocols().remove(3);
        spec.one_space_us = 0;
        assert!(matches!(spec.validate(), Err(Error::InvalidProtocol { .. })));

        let mut spec = builtin_protocols().remove(0);
        spec.repeat_space_us = Some(0);
        assert!(matches!(spec.validate(), Err(Error::InvalidProtocol { .. })));
    }

    #[test]
    fn rejects_duplicates() {
        let mut protocols = builtin_protocols();
        let mut dup = protocols[1].clone();
        dup.name = "rc5".into();
        protocols.push(dup);

        assert!(Registry::new(protocols).is_err());
    }

    #[test]
    fn code_mask() {
        let registry = Registry::builtin();
        assert_eq!(registry.get_protocol("NEC").unwrap().code_mask(), u32::MAX);
        assert_eq!(registry.get_protocol("Sony").unwrap().code_mask(), 0xFFF);
    }
}
