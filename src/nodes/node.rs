use std::ops::Range;

use rtrb::Consumer;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::ramper::{ramp_samples, ParameterRamper};
use crate::error::{Error, Result};
use crate::nodes::factory::NodeKind;
use crate::nodes::handle::{parameter_queue, ParameterEvent, ParameterHandle, Ramp};
use crate::nodes::param::{self, ParameterAddress, ParameterDef};

/*
Node Lifecycle
==============

Every node runs the same small state machine:

    ┌───────────────┐  init(ch, sr)   ┌─────────────┐
    │ Uninitialized │ ──────────────► │ Initialized │ ◄─┐ process(frames, offset)
    └───────────────┘                 └─────────────┘ ──┘
            ▲                                │
            └────────────  deinit() ─────────┘

- `init` validates the channel count and sample rate, converts the ramp
  time to samples, then lets the node allocate its sample-rate dependent
  buffers. Calling it again re-allocates: the node releases what it had
  before building the new buffers. Validation happens first, so a
  rejected re-init keeps the old buffers and configuration.
- `process` is checked: calling it while uninitialized returns
  `NotInitialized` rather than rendering garbage. A zero-frame block is a
  no-op that touches neither the buffers nor the ramps.
- `deinit` releases the buffers. Parameter targets survive, so a node can
  be re-initialized at a new sample rate and keep its settings.

Threading
---------

`process` runs on the audio thread. Parameter changes from another thread
go through a `ParameterHandle` (lock-free SPSC queue) that the node drains
at the top of each non-empty block. `init`/`deinit` take `&mut self`, so
they cannot overlap a `process` call on the same node; the host must not
call them while a block is in flight.

Buffers
-------

Audio buffers belong to the host. `process` borrows one slice per channel
for input and output and only touches `offset .. offset + frames` of each.
*/

/// Default parameter glide time in seconds.
pub const DEFAULT_RAMP_SECONDS: f64 = 0.02;

/// Construction-time configuration shared by all node types.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSettings {
    /// Glide time applied to non-immediate parameter changes.
    pub ramp_seconds: f64,
}

impl NodeSettings {
    pub fn with_ramp_seconds(ramp_seconds: f64) -> Result<Self> {
        if !ramp_seconds.is_finite() || ramp_seconds < 0.0 {
            return Err(Error::invalid(format!(
                "ramp time must be a non-negative number of seconds, got {ramp_seconds}"
            )));
        }
        Ok(Self { ramp_seconds })
    }
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            ramp_seconds: DEFAULT_RAMP_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeState {
    Uninitialized,
    Initialized { channel_count: usize, sample_rate: f64 },
}

/// A parameter change pinned to a frame inside the block being processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledParameter {
    /// Frames from the start of the block.
    pub offset: u32,
    pub address: ParameterAddress,
    pub value: f32,
    pub ramp: Ramp,
}

/// Lifecycle and parameter state shared by every node type.
///
/// Concrete nodes embed one of these and expose it through
/// [`DspNode::core`]; the trait's provided methods do the rest.
pub struct NodeCore {
    name: &'static str,
    params: &'static [ParameterDef],
    rampers: Vec<ParameterRamper>,
    settings: NodeSettings,
    state: NodeState,
    rx: Consumer<ParameterEvent>,
    handle: Option<ParameterHandle>,
    #[cfg(debug_assertions)]
    clamped: u64,
}

impl NodeCore {
    pub fn new(name: &'static str, params: &'static [ParameterDef], settings: NodeSettings) -> Self {
        let (handle, rx) = parameter_queue(params);
        let rampers = params
            .iter()
            .map(|def| ParameterRamper::new(def.default))
            .collect();

        Self {
            name,
            params,
            rampers,
            settings,
            state: NodeState::Uninitialized,
            rx,
            handle: Some(handle),
            #[cfg(debug_assertions)]
            clamped: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &'static [ParameterDef] {
        self.params
    }

    pub fn settings(&self) -> NodeSettings {
        self.settings
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, NodeState::Initialized { .. })
    }

    pub fn channel_count(&self) -> usize {
        match self.state {
            NodeState::Initialized { channel_count, .. } => channel_count,
            NodeState::Uninitialized => 0,
        }
    }

    pub fn sample_rate(&self) -> Option<f64> {
        match self.state {
            NodeState::Initialized { sample_rate, .. } => Some(sample_rate),
            NodeState::Uninitialized => None,
        }
    }

    /// Check an `init` configuration without changing any state. Returns
    /// the ramp length in samples.
    pub fn check_config(&self, channel_count: usize, sample_rate: f64) -> Result<u32> {
        if channel_count == 0 {
            return Err(Error::invalid("channel count must be at least 1"));
        }
        ramp_samples(self.settings.ramp_seconds, sample_rate)
    }

    /// Validate and enter the initialized state.
    pub fn init(&mut self, channel_count: usize, sample_rate: f64) -> Result<()> {
        let ramp = self.check_config(channel_count, sample_rate)?;

        for ramper in &mut self.rampers {
            ramper.set_ramp_duration(ramp);
        }
        self.state = NodeState::Initialized {
            channel_count,
            sample_rate,
        };

        tracing::debug!(
            node = self.name,
            channel_count,
            sample_rate,
            ramp_samples = ramp,
            "node initialized"
        );
        Ok(())
    }

    pub fn deinit(&mut self) {
        if self.is_initialized() {
            tracing::debug!(node = self.name, "node deinitialized");
        }
        self.state = NodeState::Uninitialized;
    }

    /// Set a parameter from the thread that owns the node.
    pub fn set_parameter(
        &mut self,
        address: ParameterAddress,
        value: f32,
        immediate: bool,
    ) -> Result<()> {
        let index = param::index_of(self.params, address)?;
        let def = &self.params[index];
        if !value.is_finite() {
            return Err(Error::invalid(format!(
                "{} must be finite, got {value}",
                def.identifier
            )));
        }

        let clamped = def.clamp(value);
        if clamped != value {
            tracing::debug!(
                node = self.name,
                parameter = def.identifier,
                requested = value,
                clamped,
                "parameter value clamped"
            );
            #[cfg(debug_assertions)]
            {
                self.clamped += 1;
            }
        }

        let ramp = if immediate { Ramp::Immediate } else { Ramp::Default };
        self.apply(index, clamped, ramp);
        Ok(())
    }

    /// Target value of a parameter (what it is ramping towards).
    pub fn get_parameter(&self, address: ParameterAddress) -> Result<f32> {
        let index = param::index_of(self.params, address)?;
        Ok(self.rampers[index].target())
    }

    /// Number of out-of-range values clamped by `set_parameter`.
    #[cfg(debug_assertions)]
    pub fn clamped_count(&self) -> u64 {
        self.clamped
    }

    pub fn ramper(&self, index: usize) -> &ParameterRamper {
        &self.rampers[index]
    }

    /// Advance one parameter by a sample and read it.
    #[inline]
    pub fn tick(&mut self, index: usize) -> f32 {
        self.rampers[index].tick()
    }

    pub fn take_handle(&mut self) -> Option<ParameterHandle> {
        self.handle.take()
    }

    /// Apply everything queued by the control thread. Realtime-safe.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.rx.pop() {
            self.apply_event(event.address, event.value, event.ramp);
        }
    }

    pub(crate) fn apply_event(&mut self, address: ParameterAddress, value: f32, ramp: Ramp) {
        if let Ok(index) = param::index_of(self.params, address) {
            let value = self.params[index].clamp(value);
            self.apply(index, value, ramp);
        }
    }

    fn apply(&mut self, index: usize, value: f32, ramp: Ramp) {
        let ramper = &mut self.rampers[index];
        let ramp = if self.params[index].ramped {
            ramp
        } else {
            Ramp::Immediate
        };

        match ramp {
            Ramp::Immediate => ramper.set_immediate(value),
            Ramp::Default => ramper.ramp_to(value),
            Ramp::Samples(samples) => ramper.set_target(value, samples),
        }
    }

    /// Check that the host buffers cover the requested region.
    pub fn validate_block(
        &self,
        needs_input: bool,
        inputs: &[&[f32]],
        outputs: &[&mut [f32]],
        frame_count: usize,
        buffer_offset: usize,
    ) -> Result<()> {
        let channels = self.channel_count();
        let end = buffer_offset
            .checked_add(frame_count)
            .ok_or_else(|| Error::invalid("buffer offset overflows"))?;

        if outputs.len() < channels {
            return Err(Error::invalid(format!(
                "{} expects {channels} output channels, got {}",
                self.name,
                outputs.len()
            )));
        }
        if outputs[..channels].iter().any(|out| out.len() < end) {
            return Err(Error::invalid(format!(
                "output buffer shorter than offset {buffer_offset} + {frame_count} frames"
            )));
        }

        if needs_input {
            if inputs.len() < channels {
                return Err(Error::invalid(format!(
                    "{} expects {channels} input channels, got {}",
                    self.name,
                    inputs.len()
                )));
            }
            if inputs[..channels].iter().any(|input| input.len() < end) {
                return Err(Error::invalid(format!(
                    "input buffer shorter than offset {buffer_offset} + {frame_count} frames"
                )));
            }
        }

        Ok(())
    }
}

/// Common interface for every processing node.
///
/// Implementors supply the algorithm (`allocate`, `release`, `render`) and
/// access to their [`NodeCore`]; lifecycle checks, parameter access and the
/// control queue come from the provided methods.
pub trait DspNode: Send {
    fn kind(&self) -> NodeKind;

    fn core(&self) -> &NodeCore;

    fn core_mut(&mut self) -> &mut NodeCore;

    /// Build sample-rate dependent state. Any previous allocation has
    /// already been released.
    fn allocate(&mut self, channel_count: usize, sample_rate: f64);

    /// Drop sample-rate dependent state.
    fn release(&mut self);

    /// Render `range` of the host buffers. Bounds are already validated.
    fn render(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], range: Range<usize>);

    /// Whether `render` reads from `inputs`. Generators return false.
    fn consumes_input(&self) -> bool {
        true
    }

    fn parameters(&self) -> &'static [ParameterDef] {
        self.core().params()
    }

    fn is_initialized(&self) -> bool {
        self.core().is_initialized()
    }

    /// A rejected configuration leaves the node exactly as it was.
    fn init(&mut self, channel_count: usize, sample_rate: f64) -> Result<()> {
        self.core().check_config(channel_count, sample_rate)?;
        if self.is_initialized() {
            self.release();
        }
        self.core_mut().init(channel_count, sample_rate)?;
        self.allocate(channel_count, sample_rate);
        Ok(())
    }

    fn deinit(&mut self) {
        if self.is_initialized() {
            self.release();
        }
        self.core_mut().deinit();
    }

    /// Process `frame_count` frames starting at `buffer_offset`.
    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frame_count: usize,
        buffer_offset: usize,
    ) -> Result<()> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        if frame_count == 0 {
            return Ok(());
        }

        let needs_input = self.consumes_input();
        self.core()
            .validate_block(needs_input, inputs, outputs, frame_count, buffer_offset)?;

        self.core_mut().drain_events();
        self.render(inputs, outputs, buffer_offset..buffer_offset + frame_count);
        Ok(())
    }

    /// Process a block, applying each scheduled change exactly at its frame.
    ///
    /// `events` must be sorted by offset and every offset must fall inside
    /// the block.
    fn process_with_events(
        &mut self,
        events: &[ScheduledParameter],
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frame_count: usize,
        buffer_offset: usize,
    ) -> Result<()> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        if frame_count == 0 {
            return Ok(());
        }

        let mut previous = 0;
        for event in events {
            let offset = event.offset as usize;
            if offset >= frame_count || offset < previous {
                return Err(Error::invalid(format!(
                    "event offset {offset} out of order or outside {frame_count}-frame block"
                )));
            }
            param::index_of(self.parameters(), event.address)?;
            previous = offset;
        }

        let needs_input = self.consumes_input();
        self.core()
            .validate_block(needs_input, inputs, outputs, frame_count, buffer_offset)?;

        let mut position = 0;
        for event in events {
            let offset = event.offset as usize;
            if offset > position {
                self.process(inputs, outputs, offset - position, buffer_offset + position)?;
                position = offset;
            }
            self.core_mut()
                .apply_event(event.address, event.value, event.ramp);
        }
        if position < frame_count {
            self.process(
                inputs,
                outputs,
                frame_count - position,
                buffer_offset + position,
            )?;
        }
        Ok(())
    }

    fn set_parameter(&mut self, address: ParameterAddress, value: f32, immediate: bool) -> Result<()> {
        self.core_mut().set_parameter(address, value, immediate)
    }

    fn get_parameter(&self, address: ParameterAddress) -> Result<f32> {
        self.core().get_parameter(address)
    }

    /// Hand out the control-thread side of the parameter queue. Only the
    /// first call returns a handle.
    fn take_handle(&mut self) -> Option<ParameterHandle> {
        self.core_mut().take_handle()
    }
}
