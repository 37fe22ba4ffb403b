use anyhow::Context as _;
use irviz_core::buttons::button_name;
use irviz_core::{frame, Timeline};

use crate::display;
use crate::Context;

pub const GRAPH_COLUMNS: usize = 72;

fn print_timeline(protocol: &str, code: u32, timeline: &Timeline, ctx: &Context) {
    println!("Protocol:  {}", protocol);
    println!("Code:      {}", display::format_code(code));
    println!("Frequency: {} Hz", display::format_hz(ctx.carrier.frequency_hz));
    println!("Duration:  {} ms", display::format_ms(timeline.total_duration_us()));
    println!();

    for line in display::event_list(timeline, display::LISTED_EVENTS) {
        println!("{}", line);
    }

    println!();
    println!("{}", display::timing_graph(timeline, GRAPH_COLUMNS));
}

/// Encode `code` with a named protocol, followed by `repeats` repeat frames
pub fn encode(ctx: &Context, protocol: &str, code: u32, repeats: u32, pack: bool) -> anyhow::Result<()> {
    let encoder = ctx.encoder();
    let spec = ctx.registry.get_protocol(protocol)?;

    let code = if pack { frame::pack_for(&spec.name, code) } else { code };
    let mut timeline = encoder.encode_named(&spec.name, code)?;

    if repeats > 0 {
        let repeat = encoder
            .repeat_named(&spec.name)
            .with_context(|| format!("{} has no repeat frame", spec.title()))?;

        for _ in 0..repeats {
            timeline = timeline.then(&repeat);
        }
    }

    log::info!("Encoded {} events", timeline.len());
    print_timeline(spec.title(), code, &timeline, ctx);

    Ok(())
}

pub fn press(ctx: &Context, button_code: u8) -> anyhow::Result<()> {
    let tx = ctx.encoder().encode_button(button_code)?;
    let title = ctx.registry.get_protocol(&tx.protocol)?.title();

    println!(
        "Button:    {} ({:#04x})",
        button_name(button_code).unwrap_or("unknown"),
        button_code
    );
    print_timeline(title, tx.code, &tx.timeline, ctx);

    Ok(())
}

pub fn carrier(
    ctx: &Context,
    button_code: u8,
    fraction: Option<f64>,
    samples: Option<usize>,
    raw: bool,
) -> anyhow::Result<()> {
    let tx = ctx.encoder().encode_button(button_code)?;

    let mut config = ctx.carrier;
    if let Some(fraction) = fraction {
        config.fraction = fraction;
    }
    if let Some(samples) = samples {
        config.sample_cap = samples;
    }

    let samples: Vec<_> = config.sample(&tx.timeline)?.collect();
    let shown_us = samples.len() as u64 * 1_000_000 / u64::from(config.sample_rate_hz.max(1));

    println!(
        "{}kHz Carrier (first {}ms shown, {} samples)",
        config.frequency_hz / 1000,
        display::format_ms(shown_us),
        samples.len()
    );

    if raw {
        for sample in &samples {
            println!("{:.7}\t{:+.6}", sample.time_sec, sample.amplitude);
        }
    } else {
        let plotted = display::decimate(samples, GRAPH_COLUMNS);
        println!("{}", display::wave_plot(&plotted, 9));
    }

    Ok(())
}
