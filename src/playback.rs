use std::path::Path;

use anyhow::Context as _;
use irviz_core::buttons::button_name;
use irviz_core::decoder::decode;

use crate::display;
use crate::vcdutils::vcdfile_to_timeline;
use crate::Context;

/// Decode a vcd file with `protocol` and report the buttons bound to the code
pub fn command(ctx: &Context, protocol: &str, path: &Path) -> anyhow::Result<()> {
    let spec = ctx.registry.get_protocol(protocol)?;
    let timeline =
        vcdfile_to_timeline(path).with_context(|| format!("reading {}", path.display()))?;

    log::info!(
        "Replay of {}: {} events, {} ms",
        path.display(),
        timeline.len(),
        display::format_ms(timeline.total_duration_us())
    );

    let code = decode(spec, timeline.events())?;
    println!("{}: {}", spec.title(), display::format_code(code));

    let mut matched = false;
    for binding in ctx.buttons.iter() {
        if binding.code == code && binding.protocol.eq_ignore_ascii_case(&spec.name) {
            println!(
                "  button {:#04x} {}",
                binding.button_code,
                button_name(binding.button_code).unwrap_or("unknown")
            );
            matched = true;
        }
    }

    if !matched {
        log::warn!("No button bound to {} {}", spec.name, display::format_code(code));
    }

    Ok(())
}
