//! Timed parameter automation.
//!
//! A lane is a sorted list of [`AutomationEvent`]s for one parameter,
//! expressed in seconds on the lane's own timeline. Each block, the lane is
//! asked which changes land inside it and answers with
//! [`ScheduledParameter`]s ready for
//! [`DspNode::process_with_events`](crate::nodes::DspNode::process_with_events).
//!
//! Events may carry a curve (`ramp_taper`, `ramp_skew`). Nodes only ramp
//! linearly, so curved events are flattened by [`evaluate_automation`] into
//! short linear pieces before they are scheduled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::nodes::handle::Ramp;
use crate::nodes::node::ScheduledParameter;
use crate::nodes::param::ParameterAddress;

/// Ramp length given to points recorded by [`replace_automation`].
pub const RECORDED_RAMP_SECONDS: f64 = 0.01;

/// Step length used when a lane flattens curved events.
pub const CURVE_RESOLUTION_SECONDS: f64 = 0.01;

#[cfg(feature = "serde")]
fn linear_taper() -> f32 {
    1.0
}

/// Glide to `target_value`, starting at `start_time` and lasting
/// `ramp_duration` seconds.
///
/// The shape of the glide is `x^taper` blended toward its mirror image
/// `1 - (1 - x)^(1/taper)` by `skew` (0 keeps the power curve, 1 uses the
/// mirror). Taper 1 with skew 0 is a straight line.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutomationEvent {
    pub target_value: f32,
    pub start_time: f64,
    pub ramp_duration: f64,
    #[cfg_attr(feature = "serde", serde(default = "linear_taper"))]
    pub ramp_taper: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ramp_skew: f32,
}

impl AutomationEvent {
    /// A linear event.
    pub fn new(target_value: f32, start_time: f64, ramp_duration: f64) -> Result<Self> {
        let event = Self {
            target_value,
            start_time,
            ramp_duration,
            ramp_taper: 1.0,
            ramp_skew: 0.0,
        };
        event.validate()?;
        Ok(event)
    }

    /// Same event with a curved ramp. `taper` must be positive, `skew` in
    /// `[0, 1]`.
    pub fn with_curve(mut self, taper: f32, skew: f32) -> Result<Self> {
        self.ramp_taper = taper;
        self.ramp_skew = skew;
        self.validate()?;
        Ok(self)
    }

    /// Check every field. Events built through [`new`](Self::new) already
    /// pass; deserialized ones need this.
    pub fn validate(&self) -> Result<()> {
        let Self {
            target_value,
            start_time,
            ramp_duration,
            ramp_taper,
            ramp_skew,
        } = *self;
        if !target_value.is_finite() {
            return Err(Error::invalid(format!(
                "automation target must be finite, got {target_value}"
            )));
        }
        if !start_time.is_finite() || start_time < 0.0 {
            return Err(Error::invalid(format!(
                "automation start time must be >= 0, got {start_time}"
            )));
        }
        if !ramp_duration.is_finite() || ramp_duration < 0.0 {
            return Err(Error::invalid(format!(
                "automation ramp duration must be >= 0, got {ramp_duration}"
            )));
        }
        if !(ramp_taper.is_finite() && ramp_taper > 0.0) {
            return Err(Error::invalid(format!(
                "automation taper must be positive, got {ramp_taper}"
            )));
        }
        if !(0.0..=1.0).contains(&ramp_skew) {
            return Err(Error::invalid(format!(
                "automation skew must be within 0..=1, got {ramp_skew}"
            )));
        }
        Ok(())
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.ramp_duration
    }

    pub fn is_linear(&self) -> bool {
        self.ramp_taper == 1.0 && self.ramp_skew == 0.0
    }

    /// Value `elapsed` seconds into the ramp when it started from `from`.
    /// Clamped to the end of the ramp.
    pub fn value_at(&self, from: f32, elapsed: f64) -> f32 {
        if self.ramp_duration <= 0.0 || elapsed >= self.ramp_duration {
            return self.target_value;
        }
        let x = (elapsed / self.ramp_duration).max(0.0);
        let shape = if self.is_linear() {
            x
        } else {
            let taper = f64::from(self.ramp_taper);
            let skew = f64::from(self.ramp_skew);
            let power = x.powf(taper);
            let mirror = 1.0 - (1.0 - x).powf(1.0 / taper);
            power * (1.0 - skew) + mirror * skew
        };
        let from = f64::from(from);
        (from + (f64::from(self.target_value) - from) * shape) as f32
    }
}

/// Flatten curved events into linear ones `resolution` seconds long.
///
/// `points` must be sorted by start time. Linear events pass through
/// untouched. A curved event starts from wherever the previous event left
/// the value (`initial_value` for the first) and is cut off where the next
/// event begins. Each piece targets the curve's value at the end of its
/// step.
pub fn evaluate_automation(
    initial_value: f32,
    points: &[AutomationEvent],
    resolution: f64,
) -> Result<Vec<AutomationEvent>> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(Error::invalid(format!(
            "automation resolution must be positive, got {resolution}"
        )));
    }

    let mut result = Vec::with_capacity(points.len());
    let mut value = initial_value;

    for (index, point) in points.iter().enumerate() {
        let next_start = points.get(index + 1).map(|next| next.start_time);
        let stop = next_start.map_or(point.end_time(), |next| next.min(point.end_time()));

        if point.is_linear() || point.ramp_duration <= 0.0 {
            result.push(*point);
        } else {
            let span = (stop - point.start_time).max(0.0);
            // Tolerance keeps 1.0 / 0.1 from turning into 11 steps
            let steps = ((span / resolution) - 1e-9).ceil().max(0.0) as usize;
            for step in 0..steps {
                let begin = point.start_time + step as f64 * resolution;
                let end = (begin + resolution).min(stop);
                result.push(AutomationEvent {
                    target_value: point.value_at(value, end - point.start_time),
                    start_time: begin,
                    ramp_duration: end - begin,
                    ramp_taper: 1.0,
                    ramp_skew: 0.0,
                });
            }
        }

        let elapsed = next_start.map_or(f64::INFINITY, |next| next - point.start_time);
        value = point.value_at(value, elapsed);
    }

    Ok(result)
}

/// All automation for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationLane {
    address: ParameterAddress,
    events: Vec<AutomationEvent>,
}

impl AutomationLane {
    /// Curves in `events` are scheduled as if linear; see
    /// [`with_curves`](Self::with_curves).
    pub fn new(address: ParameterAddress, mut events: Vec<AutomationEvent>) -> Self {
        events.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        Self { address, events }
    }

    /// Lane whose curved events are flattened at
    /// [`CURVE_RESOLUTION_SECONDS`], starting the first curve from
    /// `initial_value`.
    pub fn with_curves(
        address: ParameterAddress,
        initial_value: f32,
        events: Vec<AutomationEvent>,
    ) -> Result<Self> {
        let sorted = Self::new(address, events);
        let events = evaluate_automation(initial_value, &sorted.events, CURVE_RESOLUTION_SECONDS)?;
        Ok(Self { address, events })
    }

    pub fn address(&self) -> ParameterAddress {
        self.address
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Overwrite `[start, stop]` with freshly recorded points.
    pub fn replace(&mut self, new_points: &[(f64, f32)], start: f64, stop: f64) {
        self.events = replace_automation(&self.events, new_points, start, stop);
    }

    /// Collect the changes that apply to one block into `out`.
    ///
    /// `sample_time` is the host position of the block's first frame and
    /// `start_time` the host time (seconds) at which the lane's timeline
    /// begins. Does not allocate once `out` has grown to fit.
    ///
    /// - Events already under way collapse into the latest one, emitted at
    ///   offset 0 with whatever is left of its ramp (0 if it has finished).
    /// - Events starting inside the block are emitted at their frame with
    ///   their full ramp.
    /// - Later events are left for later blocks.
    pub fn schedule_block(
        &self,
        sample_rate: f64,
        start_time: f64,
        sample_time: f64,
        frames: u32,
        out: &mut Vec<ScheduledParameter>,
    ) {
        if frames == 0 || sample_rate <= 0.0 {
            return;
        }

        let block_start = sample_time / sample_rate - start_time;
        let block_end = block_start + frames as f64 / sample_rate;

        let past = self
            .events
            .partition_point(|event| event.start_time <= block_start);

        if let Some(latest) = past.checked_sub(1).map(|index| &self.events[index]) {
            let remaining = ((latest.end_time() - block_start) * sample_rate).round().max(0.0);
            out.push(self.scheduled(0, latest.target_value, remaining as u32));
        }

        for event in self.events[past..]
            .iter()
            .take_while(|event| event.start_time < block_end)
        {
            let offset = ((event.start_time - block_start) * sample_rate).round() as u32;
            let ramp = (event.ramp_duration * sample_rate).round() as u32;
            out.push(self.scheduled(offset.min(frames - 1), event.target_value, ramp));
        }
    }

    fn scheduled(&self, offset: u32, value: f32, ramp_frames: u32) -> ScheduledParameter {
        ScheduledParameter {
            offset,
            address: self.address,
            value,
            ramp: Ramp::Samples(ramp_frames),
        }
    }
}

/// Lanes for several parameters of one node.
#[derive(Debug, Clone, Default)]
pub struct Automation {
    lanes: Vec<AutomationLane>,
    scratch: Vec<ScheduledParameter>,
}

impl Automation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_lane(&mut self, lane: AutomationLane) {
        self.lanes.retain(|existing| existing.address != lane.address);
        self.lanes.push(lane);
    }

    pub fn lane(&self, address: ParameterAddress) -> Option<&AutomationLane> {
        self.lanes.iter().find(|lane| lane.address == address)
    }

    pub fn lanes(&self) -> &[AutomationLane] {
        &self.lanes
    }

    /// Changes for every lane in one block, ordered by frame offset.
    pub fn schedule_block(
        &mut self,
        sample_rate: f64,
        start_time: f64,
        sample_time: f64,
        frames: u32,
    ) -> &[ScheduledParameter] {
        self.scratch.clear();
        for lane in &self.lanes {
            lane.schedule_block(sample_rate, start_time, sample_time, frames, &mut self.scratch);
        }
        // Stable: equal offsets keep lane order
        self.scratch.sort_by_key(|event| event.offset);
        &self.scratch
    }
}

/// Replace every point starting in `[start, stop]` with `new_points`
/// (`(time, value)` pairs), each given a [`RECORDED_RAMP_SECONDS`] ramp.
/// The result is sorted by start time.
pub fn replace_automation(
    points: &[AutomationEvent],
    new_points: &[(f64, f32)],
    start: f64,
    stop: f64,
) -> Vec<AutomationEvent> {
    let mut result: Vec<AutomationEvent> = points
        .iter()
        .filter(|point| point.start_time < start || point.start_time > stop)
        .copied()
        .collect();

    result.extend(new_points.iter().map(|&(time, value)| AutomationEvent {
        target_value: value,
        start_time: time,
        ramp_duration: RECORDED_RAMP_SECONDS,
        ramp_taper: 1.0,
        ramp_skew: 0.0,
    }));

    result.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    result
}
