use std::convert::TryFrom;
use std::fs::File;
use std::io;
use std::io::ErrorKind::InvalidData;
use std::path::Path;

use irviz_core::Timeline;
use vcd::{self, SimulationCommand, TimescaleUnit, Value};

/// Idle time appended after each timeline
const FRAME_GAP_US: u64 = 2000;

pub struct VcdWriter<W: io::Write> {
    vcd: vcd::Writer<W>,
    timestamp: u64,
    wire_id: vcd::IdCode,
}

impl<W: io::Write> VcdWriter<W> {
    pub fn new(writer: W) -> Self {
        let vcd = vcd::Writer::new(writer);

        Self {
            vcd,
            timestamp: 0,
            wire_id: vcd::IdCode::FIRST,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        let writer = &mut self.vcd;

        // Write the header, one tick per microsecond
        writer.timescale(1, TimescaleUnit::US)?;
        writer.add_module("top")?;

        let id = writer.add_wire(1, "ir")?;
        self.wire_id = id;

        writer.upscope()?;
        writer.enddefinitions()?;

        // Write the initial values
        writer.begin(SimulationCommand::Dumpvars)?;
        writer.change_scalar(id, Value::V0)?;
        writer.end()?;

        Ok(())
    }

    /// Marks are written high, spaces low
    pub fn write_timeline(&mut self, timeline: &Timeline) -> io::Result<()> {
        for ev in timeline.events() {
            self.write_value(ev.offset_us, ev.is_mark())?;
        }

        // Close the last space so its length survives
        self.vcd.timestamp(self.timestamp + timeline.total_duration_us())?;

        self.add_offset(timeline.total_duration_us() + FRAME_GAP_US);

        Ok(())
    }

    pub fn write_value(&mut self, ts: u64, high: bool) -> io::Result<()> {
        let offseted_ts = self.timestamp + ts;

        self.vcd.timestamp(offseted_ts)?;
        let value = if high { Value::V1 } else { Value::V0 };
        self.vcd.change_scalar(self.wire_id, value)?;

        Ok(())
    }

    pub fn add_offset(&mut self, offset: u64) {
        self.timestamp += offset;
    }
}

fn us_per_tick(timescale: Option<(u32, TimescaleUnit)>) -> io::Result<(u64, u64)> {
    // (numerator, denominator)
    match timescale {
        None => Ok((1, 1)),
        Some((n, TimescaleUnit::S)) => Ok((u64::from(n) * 1_000_000, 1)),
        Some((n, TimescaleUnit::MS)) => Ok((u64::from(n) * 1_000, 1)),
        Some((n, TimescaleUnit::US)) => Ok((u64::from(n), 1)),
        Some((n, TimescaleUnit::NS)) => Ok((u64::from(n), 1_000)),
        Some((_, unit)) => Err(io::Error::new(
            InvalidData,
            format!("unsupported timescale {:?}", unit),
        )),
    }
}

/// Read the `top.ir` wire back into a timeline.
///
/// The timeline starts at the first high level. The trailing space ends at
/// the last timestamp in the file.
pub fn read_timeline<R: io::Read>(reader: R) -> io::Result<Timeline> {
    let mut parser = vcd::Parser::new(reader);

    // Parse the header and find the wire
    let header = parser.parse_header()?;
    let wire = header
        .find_var(&["top", "ir"])
        .ok_or_else(|| io::Error::new(InvalidData, "no wire top.ir"))?
        .code;

    log::debug!("timescale: {:?}", header.timescale);
    let (num, den) = us_per_tick(header.timescale)?;

    let mut current_ts = 0;
    let mut edges: Vec<(u64, bool)> = Vec::new();

    for command_result in parser {
        use vcd::Command::*;
        let command = command_result?;
        match command {
            ChangeScalar(i, v) if i == wire => {
                let high = v == Value::V1;
                let level_changed = edges.last().map_or(high, |(_, prev)| *prev != high);

                if level_changed {
                    edges.push((current_ts, high));
                }
            }
            Timestamp(ts) => current_ts = ts,
            _ => (),
        }
    }

    let ends = edges
        .iter()
        .skip(1)
        .map(|(ts, _)| *ts)
        .chain(std::iter::once(current_ts));

    let durations = edges
        .iter()
        .zip(ends)
        .map(|((start, _), end)| {
            let ticks = end.saturating_sub(*start);
            ticks
                .checked_mul(num)
                .and_then(|scaled| u32::try_from(scaled / den).ok())
                .ok_or_else(|| io::Error::new(InvalidData, "pulse too long"))
        })
        .collect::<io::Result<Vec<u32>>>()?;

    Ok(Timeline::from_durations(durations))
}

pub fn vcdfile_to_timeline(path: &Path) -> io::Result<Timeline> {
    let file = File::open(path)?;
    read_timeline(io::BufReader::new(file))
}
