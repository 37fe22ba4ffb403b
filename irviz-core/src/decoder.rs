//! Reads codes back out of clean timelines.
//!
//! Durations have to match the protocol exactly; there is no tolerance
//! window and no protocol detection.

use crate::{EventKind, Error, ProtocolSpec, TimelineEvent};

fn expect(
    event: Option<&TimelineEvent>,
    kind: EventKind,
    duration_us: u32,
    what: &str,
) -> Result<(), Error> {
    match event {
        Some(ev) if ev.kind == kind && ev.duration_us == duration_us => Ok(()),
        Some(ev) => Err(Error::Malformed(format!(
            "{}: expected {:?} {}us, got {:?} {}us at {}us",
            what, kind, duration_us, ev.kind, ev.duration_us, ev.offset_us
        ))),
        None => Err(Error::Malformed(format!("{}: timeline ended", what))),
    }
}

/// Decode the first frame of `events`. Trailing events, such as repeat
/// frames, are ignored.
pub fn decode(spec: &ProtocolSpec, events: &[TimelineEvent]) -> Result<u32, Error> {
    spec.validate()?;

    if spec.one_space_us == spec.zero_space_us {
        return Err(Error::Malformed(format!(
            "{} bits can not be told apart by space length",
            spec.name
        )));
    }

    let mut iter = events.iter();

    expect(iter.next(), EventKind::Mark, spec.header_mark_us, "header mark")?;
    expect(iter.next(), EventKind::Space, spec.header_space_us, "header space")?;

    let mut code = 0u32;

    for n in 0..spec.bit_count {
        let what = format!("bit {}", n);
        expect(iter.next(), EventKind::Mark, spec.bit_mark_us, &what)?;

        let space = iter
            .next()
            .filter(|ev| ev.kind == EventKind::Space)
            .ok_or_else(|| Error::Malformed(format!("{}: missing space", what)))?;

        let bit = if space.duration_us == spec.one_space_us {
            1
        } else if space.duration_us == spec.zero_space_us {
            0
        } else {
            return Err(Error::Malformed(format!(
                "{}: space of {}us",
                what, space.duration_us
            )));
        };

        code = (code << 1) | bit;
    }

    Ok(code)
}
