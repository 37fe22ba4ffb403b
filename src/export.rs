use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context as _;

use crate::vcdutils::VcdWriter;
use crate::Context;

/// Write the timeline of a button press to a vcd file
pub fn command_export(ctx: &Context, button_code: u8, path: &Path) -> anyhow::Result<()> {
    let tx = ctx.encoder().encode_button(button_code)?;

    log::info!("Export {} {:#010x} to {}", tx.protocol, tx.code, path.display());

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    {
        let mut vcd = VcdWriter::new(&mut out);
        vcd.init()?;
        vcd.write_timeline(&tx.timeline)?;
    }

    out.flush()?;

    Ok(())
}
