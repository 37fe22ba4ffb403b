use std::convert::TryFrom;
use std::path::PathBuf;

use anyhow::{anyhow, Context as _};
use structopt::StructOpt;

use irviz_core::buttons::{button_by_name, button_group, button_name};
use irviz_core::{ButtonMap, Config, Encoder, Registry, SamplerConfig};

mod display;
mod export;
mod irsend;
mod playback;
mod vcdutils;

#[derive(Debug, StructOpt)]
#[structopt(name = "irviz", about = "IR remote signal viewer")]
struct Opt {
    /// Protocol and button tables (JSON). Defaults to the builtin tables
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(short, long)]
    debug: bool,
    #[structopt(subcommand)]
    cmd: CliCommand,
}

#[derive(StructOpt, Debug)]
enum CliCommand {
    /// Encode a code with a protocol
    Encode {
        protocol: String,
        #[structopt(parse(try_from_str = parse_code))]
        code: u32,
        /// Append repeat frames
        #[structopt(long, default_value = "0")]
        repeat: u32,
        /// Pack the code into the RC5/RC6 frame layout first
        #[structopt(long)]
        pack: bool,
    },
    /// Encode a button press. Buttons by code (0x10) or name (power)
    Press { button: String },
    /// Show the carrier inside the first mark of a button press
    Carrier {
        button: String,
        /// Share of the first mark to show, 0..1
        #[structopt(long)]
        fraction: Option<f64>,
        /// Maximum number of samples
        #[structopt(long)]
        samples: Option<usize>,
        /// Print samples instead of plotting them
        #[structopt(long)]
        raw: bool,
    },
    /// List protocols
    Protocols,
    /// List button bindings
    Buttons,
    /// Write a button press to a vcd file
    Export {
        button: String,
        #[structopt(parse(from_os_str))]
        path: PathBuf,
    },
    /// Decode a vcd file
    Replay {
        protocol: String,
        #[structopt(parse(from_os_str))]
        path: PathBuf,
    },
}

/// Tables shared by the commands
pub struct Context {
    pub registry: Registry,
    pub buttons: ButtonMap,
    pub carrier: SamplerConfig,
}

impl Context {
    fn load(path: Option<&PathBuf>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => {
                Config::from_path(path).with_context(|| format!("loading {}", path.display()))?
            }
            None => Config::builtin(),
        };

        let (registry, buttons, carrier) = config.build()?;

        Ok(Context {
            registry,
            buttons,
            carrier,
        })
    }

    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.registry, &self.buttons)
    }
}

fn parse_code(s: &str) -> Result<u32, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

/// Hex button code (`0x10`) or button name (`power`, `5`)
fn parse_button(s: &str) -> anyhow::Result<u8> {
    if s.starts_with("0x") || s.starts_with("0X") {
        let code = parse_code(s)?;
        return u8::try_from(code).map_err(|_| anyhow!("button code out of range: {}", s));
    }

    button_by_name(s).ok_or_else(|| anyhow!("unknown button: {}", s))
}

fn list_protocols(ctx: &Context) {
    println!("name      bits  header        bit mark  0/1 space    repeat");
    for spec in ctx.registry.iter() {
        let repeat = spec
            .repeat_space_us
            .map_or_else(|| "-".to_string(), |us| format!("{}us", us));

        println!(
            "{:<9} {:>4}  {:>5}/{:<5}us  {:>5}us  {:>5}/{:<5}us  {}",
            spec.name,
            spec.bit_count,
            spec.header_mark_us,
            spec.header_space_us,
            spec.bit_mark_us,
            spec.zero_space_us,
            spec.one_space_us,
            repeat
        );
    }
}

fn list_buttons(ctx: &Context) {
    for binding in ctx.buttons.iter() {
        println!(
            "{:#04x}  {:<14} {:<9} {}  {:?}",
            binding.button_code,
            button_name(binding.button_code).unwrap_or("unknown"),
            binding.protocol,
            display::format_code(binding.code),
            button_group(binding.button_code),
        );
    }
    println!("unbound buttons use {}", ctx.buttons.default_protocol());
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let loglevel = if opt.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(loglevel)).init();

    let ctx = Context::load(opt.config.as_ref())?;

    match opt.cmd {
        CliCommand::Encode {
            protocol,
            code,
            repeat,
            pack,
        } => irsend::encode(&ctx, &protocol, code, repeat, pack),
        CliCommand::Press { button } => irsend::press(&ctx, parse_button(&button)?),
        CliCommand::Carrier {
            button,
            fraction,
            samples,
            raw,
        } => irsend::carrier(&ctx, parse_button(&button)?, fraction, samples, raw),
        CliCommand::Protocols => {
            list_protocols(&ctx);
            Ok(())
        }
        CliCommand::Buttons => {
            list_buttons(&ctx);
            Ok(())
        }
        CliCommand::Export { button, path } => {
            export::command_export(&ctx, parse_button(&button)?, &path)
        }
        CliCommand::Replay { protocol, path } => playback::command(&ctx, &protocol, &path),
    }
}
