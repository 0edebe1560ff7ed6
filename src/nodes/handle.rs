use rtrb::{Consumer, Producer, RingBuffer};

use crate::error::{Error, Result};
use crate::nodes::param::{self, ParameterAddress, ParameterDef};

/// Capacity of the control → audio parameter queue.
pub const PARAMETER_QUEUE_SIZE: usize = 256;

/// How a parameter change should reach its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ramp {
    /// Use the node's configured ramp time.
    Default,
    /// Jump on the next sample.
    Immediate,
    /// Ramp over an explicit number of samples.
    Samples(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterEvent {
    pub address: ParameterAddress,
    pub value: f32,
    pub ramp: Ramp,
}

/// Control-thread side of a node's parameter queue.
///
/// The handle validates and clamps every change before it crosses the
/// queue, so the audio thread only ever sees in-range values. It is the
/// single writer; the node is the single reader and drains the queue at
/// the top of each block.
pub struct ParameterHandle {
    tx: Producer<ParameterEvent>,
    params: &'static [ParameterDef],
}

pub(crate) fn parameter_queue(
    params: &'static [ParameterDef],
) -> (ParameterHandle, Consumer<ParameterEvent>) {
    let (tx, rx) = RingBuffer::<ParameterEvent>::new(PARAMETER_QUEUE_SIZE);
    (ParameterHandle { tx, params }, rx)
}

impl ParameterHandle {
    pub fn parameters(&self) -> &'static [ParameterDef] {
        self.params
    }

    /// Queue a change. `immediate` bypasses ramping.
    pub fn set_parameter(
        &mut self,
        address: ParameterAddress,
        value: f32,
        immediate: bool,
    ) -> Result<()> {
        let ramp = if immediate { Ramp::Immediate } else { Ramp::Default };
        self.send(address, value, ramp)
    }

    /// Queue a change that ramps over exactly `samples` samples.
    pub fn ramp_parameter(
        &mut self,
        address: ParameterAddress,
        value: f32,
        samples: u32,
    ) -> Result<()> {
        self.send(address, value, Ramp::Samples(samples))
    }

    /// Number of events that can still be queued.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }

    fn send(&mut self, address: ParameterAddress, value: f32, ramp: Ramp) -> Result<()> {
        let def = param::find(self.params, address)?;
        if !value.is_finite() {
            return Err(Error::invalid(format!(
                "{} must be finite, got {value}",
                def.identifier
            )));
        }

        let clamped = def.clamp(value);
        if clamped != value {
            tracing::debug!(
                parameter = def.identifier,
                requested = value,
                clamped,
                "parameter value clamped"
            );
        }

        let event = ParameterEvent {
            address,
            value: clamped,
            ramp,
        };
        self.tx.push(event).map_err(|_| {
            tracing::warn!(parameter = def.identifier, "parameter queue full");
            Error::QueueFull { address }
        })
    }
}
