use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ramped_dsp::nodes::NodeKind;

#[derive(Parser, Debug)]
#[command(author, version, about = "Offline renderer for ramped_dsp nodes")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List node kinds and their parameters
    List,

    /// Render a node to a WAV file and print a short analysis
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Node kind (chorus, flanger, phase_distortion_oscillator, korg_low_pass_filter)
    #[arg(value_name = "KIND", required_unless_present = "preset")]
    pub kind: Option<NodeKind>,

    /// JSON preset to start from
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Parameter override, IDENTIFIER=VALUE (repeatable)
    #[arg(long = "param", value_name = "ID=VALUE", value_parser = parse_assignment)]
    pub params: Vec<(String, f32)>,

    /// Automation point, IDENTIFIER=VALUE@START[:RAMP] in seconds (repeatable)
    #[arg(long = "automate", value_name = "ID=VALUE@START[:RAMP]", value_parser = parse_automation)]
    pub automation: Vec<AutomationArg>,

    /// Length in seconds
    #[arg(long, default_value_t = 2.0)]
    pub seconds: f64,

    #[arg(long, default_value_t = 48_000)]
    pub sample_rate: u32,

    #[arg(long, default_value_t = 2)]
    pub channels: usize,

    /// Frames per process call
    #[arg(long, default_value_t = 512)]
    pub block_size: usize,

    /// Frequency of the sine fed into effect nodes
    #[arg(long, default_value_t = 220.0)]
    pub tone: f32,

    /// Output WAV path
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutomationArg {
    pub identifier: String,
    pub value: f32,
    pub start: f64,
    pub ramp: f64,
}

fn parse_assignment(s: &str) -> Result<(String, f32), String> {
    let (identifier, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected IDENTIFIER=VALUE, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("bad value in '{s}': {e}"))?;
    Ok((identifier.trim().to_string(), value))
}

fn parse_automation(s: &str) -> Result<AutomationArg, String> {
    let (assignment, timing) = s
        .split_once('@')
        .ok_or_else(|| format!("expected IDENTIFIER=VALUE@START[:RAMP], got '{s}'"))?;
    let (identifier, value) = parse_assignment(assignment)?;

    let (start, ramp) = match timing.split_once(':') {
        Some((start, ramp)) => (start, ramp),
        None => (timing, "0"),
    };
    let start = start
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad start time in '{s}': {e}"))?;
    let ramp = ramp
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad ramp time in '{s}': {e}"))?;

    Ok(AutomationArg {
        identifier,
        value,
        start,
        ramp,
    })
}
