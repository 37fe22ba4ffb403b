use serde::{Deserialize, Serialize};

use crate::{ButtonMap, Error, ProtocolSpec, Registry};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum EventKind {
    /// Carrier on
    Mark,
    /// Carrier off
    Space,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct TimelineEvent {
    /// Start, relative to the start of the transmission
    pub offset_us: u64,
    pub duration_us: u32,
    pub kind: EventKind,
    /// Data bit this event belongs to, `None` for header and repeat events
    pub bit: Option<u8>,
}

impl TimelineEvent {
    pub fn end_us(&self) -> u64 {
        self.offset_us + u64::from(self.duration_us)
    }

    pub fn is_mark(&self) -> bool {
        self.kind == EventKind::Mark
    }
}

/// Ordered mark/space events of one transmission
#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
    total_duration_us: u64,
}

impl Timeline {
    fn with_capacity(capacity: usize) -> Self {
        Timeline {
            events: Vec::with_capacity(capacity),
            total_duration_us: 0,
        }
    }

    fn push(&mut self, kind: EventKind, duration_us: u32, bit: Option<u8>) {
        self.events.push(TimelineEvent {
            offset_us: self.total_duration_us,
            duration_us,
            kind,
            bit,
        });
        self.total_duration_us += u64::from(duration_us);
    }

    fn extend_last(&mut self, duration_us: u32) {
        if let Some(last) = self.events.last_mut() {
            last.duration_us = last.duration_us.saturating_add(duration_us);
            self.total_duration_us = last.end_us();
        }
    }

    /// Rebuild a timeline from alternating durations, starting with a mark.
    /// A zero duration joins its neighbours into one event, so the result
    /// still alternates.
    pub fn from_durations<I>(durations: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut timeline = Timeline::default();
        let mut kind = EventKind::Mark;

        for duration in durations {
            if duration > 0 {
                let same_level = timeline.events.last().map_or(false, |last| last.kind == kind);

                if same_level {
                    timeline.extend_last(duration);
                } else {
                    timeline.push(kind, duration, None);
                }
            }
            kind = match kind {
                EventKind::Mark => EventKind::Space,
                EventKind::Space => EventKind::Mark,
            };
        }

        timeline
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total_duration_us(&self) -> u64 {
        self.total_duration_us
    }

    pub fn marks(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(|ev| ev.is_mark())
    }

    pub fn first_mark(&self) -> Option<&TimelineEvent> {
        self.marks().next()
    }

    /// This timeline followed by `other`
    pub fn then(&self, other: &Timeline) -> Timeline {
        let mut events = Vec::with_capacity(self.len() + other.len());
        events.extend_from_slice(&self.events);
        events.extend(other.events.iter().map(|ev| TimelineEvent {
            offset_us: ev.offset_us + self.total_duration_us,
            ..*ev
        }));

        Timeline {
            events,
            total_duration_us: self.total_duration_us + other.total_duration_us,
        }
    }
}

/// Expand a code into the timeline of one frame.
///
/// Bits are sent most significant first. Only the low `bit_count` bits of
/// `code` are transmitted.
pub fn encode(spec: &ProtocolSpec, code: u32) -> Result<Timeline, Error> {
    spec.validate()?;

    let mut timeline = Timeline::with_capacity(2 + 2 * usize::from(spec.bit_count));

    timeline.push(EventKind::Mark, spec.header_mark_us, None);
    timeline.push(EventKind::Space, spec.header_space_us, None);

    for i in (0..spec.bit_count).rev() {
        let bit = ((code >> i) & 1) as u8;
        timeline.push(EventKind::Mark, spec.bit_mark_us, Some(bit));
        timeline.push(EventKind::Space, spec.space_for_bit(bit), Some(bit));
    }

    log::debug!(
        "{} {:#010x}: {} events, {} us",
        spec.name,
        code & spec.code_mask(),
        timeline.len(),
        timeline.total_duration_us,
    );

    Ok(timeline)
}

/// The short frame sent while a button is held
pub fn generate_repeat_frame(spec: &ProtocolSpec) -> Result<Timeline, Error> {
    spec.validate()?;

    let repeat_space_us = spec
        .repeat_space_us
        .ok_or_else(|| Error::invalid(&spec.name, "no repeat frame"))?;

    let mut timeline = Timeline::with_capacity(2);
    timeline.push(EventKind::Mark, spec.header_mark_us, None);
    timeline.push(EventKind::Space, repeat_space_us, None);

    Ok(timeline)
}

/// Result of encoding a button press
#[derive(Debug, Clone, PartialEq)]
pub struct Transmission {
    pub button_code: u8,
    pub protocol: String,
    pub code: u32,
    pub timeline: Timeline,
}

/// Encodes with an injected registry and button table
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    registry: &'a Registry,
    buttons: &'a ButtonMap,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a Registry, buttons: &'a ButtonMap) -> Self {
        Encoder { registry, buttons }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn encode_named(&self, protocol: &str, code: u32) -> Result<Timeline, Error> {
        encode(self.registry.get_protocol(protocol)?, code)
    }

    pub fn repeat_named(&self, protocol: &str) -> Result<Timeline, Error> {
        generate_repeat_frame(self.registry.get_protocol(protocol)?)
    }

    pub fn encode_button(&self, button_code: u8) -> Result<Transmission, Error> {
        let (protocol, code) = self.buttons.resolve_button(button_code);
        let timeline = self.encode_named(protocol, code)?;

        Ok(Transmission {
            button_code,
            protocol: protocol.to_string(),
            code,
            timeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nec() -> ProtocolSpec {
        Registry::builtin().get_protocol("NEC").unwrap().clone()
    }

    #[test]
    fn nec_power() {
        let timeline = encode(&nec(), 0x0000_0001).unwrap();
        let events = timeline.events();

        assert_eq!(events.len(), 66);

        assert_eq!(events[0].kind, EventKind::Mark);
        assert_eq!(events[0].duration_us, 9000);
        assert_eq!(events[0].offset_us, 0);
        assert_eq!(events[1].kind, EventKind::Space);
        assert_eq!(events[1].duration_us, 4500);
        assert_eq!(events[1].offset_us, 9000);

        let last_mark = &events[64];
        let last_space = &events[65];
        assert_eq!((last_mark.kind, last_mark.duration_us, last_mark.bit), (EventKind::Mark, 560, Some(1)));
        assert_eq!((last_space.kind, last_space.duration_us), (EventKind::Space, 1690));

        assert_eq!(timeline.total_duration_us(), 9000 + 4500 + 31 * 1120 + 2250);
        assert_eq!(timeline.total_duration_us(), last_space.end_us());
    }

    #[test]
    fn sony_msb() {
        let registry = Registry::builtin();
        let sony = registry.get_protocol("Sony").unwrap();
        let timeline = encode(sony, 0x800).unwrap();
        let events = timeline.events();

        assert_eq!(events.len(), 26);
        assert_eq!((events[0].duration_us, events[1].duration_us), (2400, 600));
        assert_eq!((events[2].duration_us, events[3].duration_us), (600, 1200));
        assert_eq!(events[2].bit, Some(1));

        for pair in events[4..].chunks(2) {
            assert_eq!((pair[0].duration_us, pair[1].duration_us), (600, 600));
            assert_eq!(pair[0].bit, Some(0));
        }
    }

    #[test]
    fn truncates_wide_codes() {
        let registry = Registry::builtin();
        let rc5 = registry.get_protocol("RC5").unwrap();

        assert_eq!(encode(rc5, 1 << 14).unwrap(), encode(rc5, 0).unwrap());
        assert_eq!(encode(rc5, 0xFFFF_0003).unwrap(), encode(rc5, 0x0003).unwrap());
    }

    #[test]
    fn zero_bits_is_invalid() {
        let mut spec = nec();
        spec.bit_count = 0;

        assert!(matches!(encode(&spec, 1), Err(Error::InvalidProtocol { .. })));
    }

    #[test]
    fn repeat_frame() {
        let timeline = generate_repeat_frame(&nec()).unwrap();
        let durations: Vec<_> = timeline.events().iter().map(|ev| (ev.kind, ev.duration_us)).collect();

        assert_eq!(durations, [(EventKind::Mark, 9000), (EventKind::Space, 2250)]);
        assert_eq!(timeline.total_duration_us(), 11_250);
    }

    #[test]
    fn repeat_frame_needs_repeat_space() {
        let registry = Registry::builtin();
        let rc6 = registry.get_protocol("RC6").unwrap();

        assert!(matches!(generate_repeat_frame(rc6), Err(Error::InvalidProtocol { .. })));
    }

    #[test]
    fn then_shifts_offsets() {
        let spec = nec();
        let frame = encode(&spec, 0xFF).unwrap();
        let repeat = generate_repeat_frame(&spec).unwrap();
        let joined = frame.then(&repeat);

        assert_eq!(joined.len(), 68);
        assert_eq!(joined.total_duration_us(), frame.total_duration_us() + 11_250);
        assert_eq!(joined.events()[66].offset_us, frame.total_duration_us());
        assert_eq!(joined.events()[67].end_us(), joined.total_duration_us());
    }

    #[test]
    fn from_durations_alternates() {
        let timeline = Timeline::from_durations(vec![100, 200, 0, 0, 300]);
        let kinds: Vec<_> = timeline.events().iter().map(|ev| ev.kind).collect();

        assert_eq!(kinds, [EventKind::Mark, EventKind::Space, EventKind::Mark]);
        assert_eq!(timeline.total_duration_us(), 600);
    }

    #[test]
    fn zero_duration_joins_neighbours() {
        let timeline = Timeline::from_durations(vec![100, 0, 200, 50]);
        let events: Vec<_> = timeline
            .events()
            .iter()
            .map(|ev| (ev.kind, ev.offset_us, ev.duration_us))
            .collect();

        assert_eq!(
            events,
            [(EventKind::Mark, 0, 300), (EventKind::Space, 300, 50)]
        );
        assert_eq!(timeline.total_duration_us(), 350);

        let leading = Timeline::from_durations(vec![0, 400, 100]);
        assert_eq!(leading.events()[0].kind, EventKind::Space);
        assert_eq!(leading.len(), 2);
    }

    #[test]
    fn encoder_resolves_buttons() {
        let registry = Registry::builtin();
        let buttons = ButtonMap::builtin();
        let encoder = Encoder::new(&registry, &buttons);

        let tx = encoder.encode_button(0x14).unwrap();
        assert_eq!(tx.protocol, "RC5");
        assert_eq!(tx.code, 5);
        assert_eq!(tx.timeline.len(), 30);

        let tx = encoder.encode_button(0x99).unwrap();
        assert_eq!((tx.protocol.as_str(), tx.code), ("NEC", 0));
        assert_eq!(buttons.unmapped_lookups(), 1);

        assert!(matches!(encoder.encode_named("Sharp", 1), Err(Error::UnknownProtocol(_))));
    }
}
