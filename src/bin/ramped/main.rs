//! ramped - offline renderer for the bundled nodes
//!
//! Run with: cargo run --bin ramped -- render chorus --param depth=0.8 --out chorus.wav

mod analysis;
mod cli;
mod render;

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use ramped_dsp::automation::AutomationEvent;
use ramped_dsp::nodes::NodeKind;
use ramped_dsp::preset::NodePreset;
use ramped_dsp::MAX_BLOCK_SIZE;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command, RenderArgs};
use render::RenderConfig;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Args::parse().command {
        Command::List => list(),
        Command::Render(args) => run_render(args),
    }
}

fn list() -> color_eyre::Result<()> {
    for kind in NodeKind::all() {
        println!("{} ({})", kind, kind.name());
        for def in kind.parameters() {
            println!(
                "  {:<22} default {:>8}  range {} .. {}",
                def.identifier, def.default, def.min, def.max
            );
        }
    }
    Ok(())
}

fn build_preset(args: &RenderArgs) -> color_eyre::Result<NodePreset> {
    let mut preset = match (&args.preset, args.kind) {
        (Some(path), kind) => {
            let preset = NodePreset::load(path)
                .wrap_err_with(|| format!("loading preset {}", path.display()))?;
            if let Some(kind) = kind {
                if kind != preset.kind {
                    bail!("preset is for {}, but {} was requested", preset.kind, kind);
                }
            }
            preset
        }
        (None, Some(kind)) => NodePreset::new("command line", kind),
        (None, None) => bail!("give a node kind or --preset"),
    };

    for (identifier, value) in &args.params {
        preset.values.insert(identifier.clone(), *value);
    }
    for point in &args.automation {
        let event = AutomationEvent::new(point.value, point.start, point.ramp)
            .wrap_err_with(|| format!("automation for {}", point.identifier))?;
        preset
            .automation
            .entry(point.identifier.clone())
            .or_default()
            .push(event);
    }
    Ok(preset)
}

fn run_render(args: RenderArgs) -> color_eyre::Result<()> {
    if args.block_size == 0 || args.block_size > MAX_BLOCK_SIZE {
        bail!("block size must be 1..={MAX_BLOCK_SIZE}");
    }
    if !(args.seconds.is_finite() && args.seconds > 0.0) {
        bail!("length must be a positive number of seconds");
    }

    let preset = build_preset(&args)?;
    let mut node = preset.instantiate().wrap_err("configuring node")?;
    let mut automation = preset.automation()?;

    let config = RenderConfig {
        channels: args.channels,
        sample_rate: args.sample_rate as f64,
        frames: (args.seconds * args.sample_rate as f64).round() as usize,
        block_size: args.block_size,
        tone_hz: args.tone,
    };
    node.init(config.channels, config.sample_rate)
        .wrap_err("initializing node")?;

    tracing::info!(
        kind = %preset.kind,
        frames = config.frames,
        sample_rate = config.sample_rate,
        "rendering"
    );
    let output = render::render(node.as_mut(), &mut automation, &config)?;
    node.deinit();

    let report = analysis::analyze(output.channel(0), config.sample_rate as f32);
    println!("kind:     {}", preset.kind);
    println!("peak:     {:.4}", report.peak);
    println!("rms:      {:.4}", report.rms);
    match report.dominant_hz {
        Some(hz) => println!("dominant: {hz:.1} Hz"),
        None => println!("dominant: -"),
    }

    if let Some(path) = &args.out {
        output
            .write_wav(path, args.sample_rate)
            .wrap_err_with(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
