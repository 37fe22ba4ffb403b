//! Text rendering of timelines and carrier samples.

use irviz_core::{EventKind, Timeline, WaveformSample};

/// Events listed before the list is cut short
pub const LISTED_EVENTS: usize = 10;

pub fn format_code(code: u32) -> String {
    format!("0x{:08X}", code)
}

/// Integer with thousands separators, `38000` -> `38,000`
pub fn format_hz(hz: u32) -> String {
    let digits = hz.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

pub fn format_ms(us: u64) -> String {
    format!("{:.2}", us as f64 / 1000.0)
}

/// Labels in timeline order. Data bits are numbered from the first bit sent.
pub fn event_labels(timeline: &Timeline) -> Vec<String> {
    let mut bit_index = 0;

    timeline
        .events()
        .iter()
        .map(|ev| match (ev.kind, ev.bit) {
            (EventKind::Mark, None) => "Header Mark".to_string(),
            (EventKind::Space, None) => "Header Space".to_string(),
            (EventKind::Mark, Some(bit)) => {
                let label = format!("Bit {} ({})", bit_index, bit);
                bit_index += 1;
                label
            }
            (EventKind::Space, Some(bit)) => format!("Space ({})", bit),
        })
        .collect()
}

pub fn event_list(timeline: &Timeline, max: usize) -> Vec<String> {
    let mut lines: Vec<String> = timeline
        .events()
        .iter()
        .zip(event_labels(timeline))
        .take(max)
        .map(|(ev, label)| {
            format!(
                "{:>8}ms: {} ({}\u{3bc}s)",
                format_ms(ev.offset_us),
                label,
                ev.duration_us
            )
        })
        .collect();

    if timeline.len() > max {
        lines.push(format!("... {} more events", timeline.len() - max));
    }

    lines.push(format!("Total: {}ms", format_ms(timeline.total_duration_us())));
    lines
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub width: f64,
    pub kind: EventKind,
}

/// Lay out events as bars proportional to their duration over `canvas_width`
pub fn timing_bars(timeline: &Timeline, canvas_width: f64) -> Vec<Bar> {
    let total_ms = timeline.total_duration_us() as f64 / 1000.0;
    if total_ms <= 0.0 {
        return Vec::new();
    }

    let scale = canvas_width / total_ms;
    let mut x = 0.0;

    timeline
        .events()
        .iter()
        .map(|ev| {
            let width = f64::from(ev.duration_us) / 1000.0 * scale;
            let bar = Bar { x, width, kind: ev.kind };
            x += width;
            bar
        })
        .collect()
}

/// Two row graph, marks on top and spaces below
pub fn timing_graph(timeline: &Timeline, columns: usize) -> String {
    let bars = timing_bars(timeline, columns as f64);
    let mut high = String::with_capacity(columns);
    let mut low = String::with_capacity(columns);

    for col in 0..columns {
        let center = col as f64 + 0.5;
        let mark = bars
            .iter()
            .find(|bar| bar.x <= center && center < bar.x + bar.width)
            .map_or(false, |bar| bar.kind == EventKind::Mark);

        high.push(if mark { '#' } else { ' ' });
        low.push(if mark { ' ' } else { '_' });
    }

    format!("Mark (High) |{}|\nSpace (Low) |{}|", high, low)
}

/// Plot samples, one column per sample, `rows` lines high
pub fn wave_plot(samples: &[WaveformSample], rows: usize) -> String {
    let rows = rows.max(2);
    let mut grid = vec![vec![' '; samples.len()]; rows];

    for (col, sample) in samples.iter().enumerate() {
        let level = (1.0 - sample.amplitude) / 2.0 * (rows - 1) as f64;
        let row = (level.round() as usize).min(rows - 1);
        grid[row][col] = '*';
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every `n`th sample, so that at most `columns` remain
pub fn decimate(samples: Vec<WaveformSample>, columns: usize) -> Vec<WaveformSample> {
    if columns == 0 || samples.len() <= columns {
        return samples;
    }

    let step = (samples.len() + columns - 1) / columns;
    samples.into_iter().step_by(step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use irviz_core::{encode, generate_repeat_frame, Registry};

    fn timeline(name: &str, code: u32) -> Timeline {
        encode(Registry::builtin().get_protocol(name).unwrap(), code).unwrap()
    }

    #[test]
    fn code_is_padded_hex() {
        assert_eq!(format_code(1), "0x00000001");
        assert_eq!(format_code(0x1234_567A), "0x1234567A");
    }

    #[test]
    fn hz_grouping() {
        assert_eq!(format_hz(38_000), "38,000");
        assert_eq!(format_hz(1_000_000), "1,000,000");
        assert_eq!(format_hz(999), "999");
        assert_eq!(format_hz(0), "0");
    }

    #[test]
    fn ms_two_decimals() {
        assert_eq!(format_ms(9000), "9.00");
        assert_eq!(format_ms(1690), "1.69");
        assert_eq!(format_ms(67_500), "67.50");
    }

    #[test]
    fn labels() {
        let labels = event_labels(&timeline("Sony", 0x800));

        assert_eq!(labels[0], "Header Mark");
        assert_eq!(labels[1], "Header Space");
        assert_eq!(labels[2], "Bit 0 (1)");
        assert_eq!(labels[3], "Space (1)");
        assert_eq!(labels[24], "Bit 11 (0)");
    }

    #[test]
    fn list_is_cut_after_ten() {
        let tl = timeline("NEC", 1);
        let lines = event_list(&tl, LISTED_EVENTS);

        assert_eq!(lines.len(), 12);
        assert_eq!(lines[10], "... 56 more events");
        assert_eq!(lines[11], format!("Total: {}ms", format_ms(tl.total_duration_us())));
        assert!(lines[1].ends_with("Header Space (4500\u{3bc}s)"));
        assert!(lines[1].trim_start().starts_with("9.00ms"));
    }

    #[test]
    fn short_list_is_complete() {
        let repeat = generate_repeat_frame(Registry::builtin().get_protocol("NEC").unwrap()).unwrap();
        let lines = event_list(&repeat, LISTED_EVENTS);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "Total: 11.25ms");
    }

    #[test]
    fn bars_fill_canvas() {
        let tl = timeline("RC6", 0x1234_5678);
        let bars = timing_bars(&tl, 360.0);

        assert_eq!(bars.len(), tl.len());
        let last = bars.last().unwrap();
        assert!((last.x + last.width - 360.0).abs() < 1e-9);

        let expected = 2.666 * (360.0 / (tl.total_duration_us() as f64 / 1000.0));
        assert!((bars[0].width - expected).abs() < 1e-9);
        assert!(timing_bars(&Timeline::default(), 360.0).is_empty());
    }

    #[test]
    fn graph_starts_high() {
        let graph = timing_graph(&timeline("NEC", 0), 40);
        let rows: Vec<_> = graph.lines().collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("Mark (High) |#"));
        assert!(rows[1].starts_with("Space (Low) | "));
    }

    #[test]
    fn plot_shape() {
        let samples = vec![
            WaveformSample { time_sec: 0.0, amplitude: 1.0 },
            WaveformSample { time_sec: 1.0, amplitude: 0.0 },
            WaveformSample { time_sec: 2.0, amplitude: -1.0 },
        ];
        let plot = wave_plot(&samples, 3);

        assert_eq!(plot, "*  \n * \n  *");
    }

    #[test]
    fn decimation() {
        let samples: Vec<_> = (0..400)
            .map(|i| WaveformSample { time_sec: f64::from(i), amplitude: 0.0 })
            .collect();

        let kept = decimate(samples.clone(), 80);
        assert_eq!(kept.len(), 80);
        assert_eq!(kept[1].time_sec, 5.0);
        assert_eq!(decimate(samples, 0).len(), 400);
    }
}
