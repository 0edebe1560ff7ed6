use ramped_dsp::automation::Automation;
use ramped_dsp::io::AudioBuffer;
use ramped_dsp::nodes::DspNode;
use ramped_dsp::Result;

/// Offline render settings.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub channels: usize,
    pub sample_rate: f64,
    pub frames: usize,
    pub block_size: usize,
    pub tone_hz: f32,
}

/// Sine test tone at half scale on every channel.
pub fn test_tone(config: &RenderConfig) -> AudioBuffer {
    let step = std::f32::consts::TAU * config.tone_hz / config.sample_rate as f32;
    AudioBuffer::from_fn(config.channels, config.frames, |_, frame| {
        0.5 * (step * frame as f32).sin()
    })
}

/// Run `node` over the whole length in `block_size` chunks, applying
/// automation sample-accurately. The node must already be initialized.
pub fn render(
    node: &mut dyn DspNode,
    automation: &mut Automation,
    config: &RenderConfig,
) -> Result<AudioBuffer> {
    let input = test_tone(config);
    let mut output = AudioBuffer::new(config.channels, config.frames);
    let inputs = input.channels();
    let mut outputs = output.channels_mut();

    let mut position = 0;
    while position < config.frames {
        let frames = config.block_size.min(config.frames - position);
        let events = automation.schedule_block(
            config.sample_rate,
            0.0,
            position as f64,
            frames as u32,
        );
        node.process_with_events(events, &inputs, &mut outputs, frames, position)?;
        position += frames;
    }

    Ok(output)
}
