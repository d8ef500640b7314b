use pedometer_core::engine::{SIMULATED_MAX_STEPS, SimulatedSteps};
use pedometer_core::{PedometerEngine, TickOutcome};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn seeded_simulation_matches_step_distribution() {
    let mut engine = PedometerEngine::new(SimulatedSteps::new(StdRng::seed_from_u64(20_261_019)));
    engine.start();

    let mut contributing = 0u64;
    let mut previous = 0u64;
    for _ in 0..1_000 {
        match engine.tick() {
            TickOutcome::Stepped { total, added } => {
                assert!((1..=SIMULATED_MAX_STEPS).contains(&added));
                assert_eq!(total, previous + u64::from(added));
                previous = total;
                contributing += 1;
            }
            TickOutcome::NoStep => {}
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    // ~70% of ticks contribute, each adding 1-3 steps (mean 2).
    assert!((600..=800).contains(&contributing), "contributing={contributing}");
    let total = engine.step_count();
    assert!(total >= contributing && total <= contributing * 3);
    assert!((1_100..=1_700).contains(&total), "total={total}");
}

#[test]
fn same_seed_same_sequence() {
    let run = || {
        let mut engine = PedometerEngine::new(SimulatedSteps::new(StdRng::seed_from_u64(3)));
        engine.start();
        (0..200).map(|_| engine.tick()).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
