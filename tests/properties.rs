//! Property tests for the simulation invariants

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use island_navigator::RotationMode;
use island_navigator::settings::{VesselSettings, WorldSettings};
use island_navigator::sim::{Side, Turn, Vessel, WorldGenerator, damping_for_speed};

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![
        Just(Side::Left),
        Just(Side::Right),
        Just(Side::Forward),
        Just(Side::Backward),
    ]
}

fn turn() -> impl Strategy<Value = Turn> {
    prop_oneof![Just(Turn::Clockwise), Just(Turn::CounterClockwise)]
}

fn axis_exclusive(v: &Vessel) -> bool {
    let lr = v.force(Side::Left).magnitude > 0.0 && v.force(Side::Right).magnitude > 0.0;
    let fb = v.force(Side::Forward).magnitude > 0.0 && v.force(Side::Backward).magnitude > 0.0;
    !lr && !fb
}

proptest! {
    #[test]
    fn opposing_forces_never_both_nonzero(presses in prop::collection::vec(side(), 0..400)) {
        let settings = VesselSettings::default();
        let mut v = Vessel::new(&settings, Vec2::ZERO);
        for side in presses {
            v.increase_force(side, &settings);
            prop_assert!(axis_exclusive(&v));
            for s in Side::ALL {
                let m = v.force(s).magnitude;
                prop_assert!((0.0..=settings.max_force).contains(&m));
            }
        }
    }

    #[test]
    fn holding_one_side_converges(
        presses in prop::collection::vec(side(), 0..300),
        held in side(),
    ) {
        let settings = VesselSettings::default();
        let mut v = Vessel::new(&settings, Vec2::ZERO);
        for side in presses {
            v.increase_force(side, &settings);
        }
        let steps = (settings.max_force / settings.force_increment) as usize + 1;
        for _ in 0..steps {
            v.increase_force(held, &settings);
        }
        prop_assert_eq!(v.force(held.opposite()).magnitude, 0.0);
        prop_assert!(v.force(held).magnitude > 0.0);
    }

    #[test]
    fn damping_never_increases_with_speed(a in 0.0f32..50.0, b in 0.0f32..50.0) {
        let settings = VesselSettings::default();
        let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(damping_for_speed(fast, &settings) <= damping_for_speed(slow, &settings) + 1e-6);
    }

    #[test]
    fn emergency_damping_brakes_harder(
        over in 0.0f32..100.0,
        under in 0.0f32..1.0,
    ) {
        let settings = VesselSettings::default();
        let fast = settings.emergency_speed + 1e-3 + over;
        let slow = settings.warning_speed * under;
        prop_assert!(damping_for_speed(fast, &settings) <= damping_for_speed(slow, &settings));
    }

    #[test]
    fn keyed_heading_stays_in_range(
        turns in prop::collection::vec(turn(), 0..500),
        step in 0.01f32..400.0,
    ) {
        let settings = VesselSettings { rotation_step: step, ..Default::default() };
        let mut v = Vessel::new(&settings, Vec2::ZERO);
        for t in turns {
            v.rotate(t, &settings);
            prop_assert!((0.0..360.0).contains(&v.heading));
        }
    }

    #[test]
    fn force_driven_heading_stays_in_range(
        forces in prop::collection::vec((0.0f32..100.0, 0.0f32..100.0), 1..300),
    ) {
        let settings = VesselSettings { rotation: RotationMode::ForceDriven, ..Default::default() };
        let mut v = Vessel::new(&settings, Vec2::ZERO);
        v.undock();
        for (left, right) in forces {
            v.set_force(Side::Left, left, &settings);
            v.set_force(Side::Right, right, &settings);
            v.integrate(Vec2::ZERO, &settings);
            prop_assert!((0.0..360.0).contains(&v.heading));
            prop_assert!(v.angular_vel.abs() <= settings.max_angular_velocity);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn target_island_keeps_its_distance(seed in any::<u64>()) {
        let settings = WorldSettings::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let features = WorldGenerator::new(&settings, Vec2::ZERO, 30.0).generate(&mut rng);
        let targets: Vec<_> = features.iter().filter(|f| f.kind.is_target()).collect();
        prop_assert_eq!(targets.len(), 1);
        let target = targets[0];
        for f in features.iter().filter(|f| !f.kind.is_target()) {
            prop_assert!(f.pos.distance(target.pos) >= settings.min_feature_distance);
        }
    }
}
