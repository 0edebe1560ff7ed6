use proptest::prelude::*;
use ramped_dsp::dsp::{ramp_samples, ParameterRamper};

fn value() -> impl Strategy<Value = f32> {
    -20_000.0f32..20_000.0
}

proptest! {
    #[test]
    fn lands_exactly_on_target(start in value(), target in value(), duration in 1u32..4096) {
        let mut ramper = ParameterRamper::new(start);
        ramper.set_target(target, duration);

        let mut last = start;
        for _ in 0..duration {
            last = ramper.tick();
        }
        prop_assert_eq!(last, target);
        prop_assert!(!ramper.is_ramping());
        prop_assert_eq!(ramper.tick(), target);
    }

    #[test]
    fn monotonic_without_overshoot(start in value(), target in value(), duration in 1u32..4096) {
        let mut ramper = ParameterRamper::new(start);
        ramper.set_target(target, duration);
        let (lo, hi) = if start <= target { (start, target) } else { (target, start) };

        let mut previous = start;
        for _ in 0..duration {
            let v = ramper.tick();
            prop_assert!(v >= lo && v <= hi, "{} outside [{}, {}]", v, lo, hi);
            if start <= target {
                prop_assert!(v >= previous);
            } else {
                prop_assert!(v <= previous);
            }
            previous = v;
        }
    }

    #[test]
    fn retarget_starts_from_in_flight_value(
        start in value(),
        first in value(),
        second in value(),
        duration in 2u32..2048,
        split in 0.0f64..1.0,
    ) {
        let mut ramper = ParameterRamper::new(start);
        ramper.set_target(first, duration);
        let elapsed = ((duration as f64 * split) as u32).clamp(1, duration - 1);
        ramper.advance(elapsed);
        let in_flight = ramper.value();

        ramper.set_target(second, duration);
        let (lo, hi) = if in_flight <= second { (in_flight, second) } else { (second, in_flight) };
        for _ in 0..duration {
            let v = ramper.tick();
            prop_assert!(v >= lo && v <= hi);
        }
        prop_assert_eq!(ramper.value(), second);
    }

    #[test]
    fn advance_matches_ticks(start in value(), target in value(), duration in 1u32..4096, steps in 0u32..5000) {
        let mut ticked = ParameterRamper::new(start);
        let mut advanced = ParameterRamper::new(start);
        ticked.set_target(target, duration);
        advanced.set_target(target, duration);

        for _ in 0..steps {
            ticked.tick();
        }
        advanced.advance(steps);
        prop_assert_eq!(ticked.value(), advanced.value());
        prop_assert_eq!(ticked.remaining(), advanced.remaining());
    }

    #[test]
    fn non_finite_target_keeps_value_finite(
        start in value(),
        target in value(),
        bad in prop_oneof![Just(f32::NAN), Just(f32::INFINITY), Just(f32::NEG_INFINITY)],
        duration in 0u32..512,
        elapsed in 0u32..512,
    ) {
        let mut ramper = ParameterRamper::new(start);
        ramper.set_target(target, duration);
        ramper.advance(elapsed);
        let before = ramper.value();

        ramper.set_target(bad, duration);
        prop_assert_eq!(ramper.value(), before);
        for _ in 0..duration {
            prop_assert!(ramper.tick().is_finite());
        }
        prop_assert_eq!(ramper.value(), target);
    }

    #[test]
    fn extreme_finite_ramps_stay_finite(
        start in prop::num::f32::NORMAL,
        target in prop::num::f32::NORMAL,
        duration in 1u32..64,
    ) {
        let mut ramper = ParameterRamper::new(start);
        ramper.set_target(target, duration);
        for _ in 0..duration {
            prop_assert!(ramper.tick().is_finite());
        }
        prop_assert_eq!(ramper.value(), target);
    }

    #[test]
    fn ramp_samples_never_negative(seconds in 0.0f64..10.0, sample_rate in 1.0f64..192_000.0) {
        let samples = ramp_samples(seconds, sample_rate).unwrap();
        prop_assert!((samples as f64 - seconds * sample_rate).abs() <= 0.5 + 1e-6);
    }
}

#[test]
fn nan_target_does_not_panic_mid_ramp() {
    let mut ramper = ParameterRamper::new(0.0);
    ramper.set_target(1.0, 100);
    ramper.advance(10);
    ramper.set_target(f32::NAN, 100);
    ramper.set_immediate(f32::INFINITY);
    let v = ramper.tick();
    assert!(v.is_finite());
    assert!(v > 0.0 && v < 1.0);
}

#[test]
fn ramp_samples_rejects_bad_input() {
    assert!(ramp_samples(-0.1, 48_000.0).is_err());
    assert!(ramp_samples(f64::NAN, 48_000.0).is_err());
    assert!(ramp_samples(0.1, 0.0).is_err());
}
