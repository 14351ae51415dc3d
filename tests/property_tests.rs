use std::f64::consts::PI;

use bodies::simulation::body::{Body, BodyId, BodyKind, Velocity};
use bodies::simulation::engine::{collide_bodies, separate_bodies};
use bodies::simulation::genome::{Genome, read_genome, replicate_genome};
use bodies::simulation::geometric_utils::{clamp_within, distance};
use bodies::simulation::params::{Params, Settings};
use bodies::simulation::prng::Prng;
use bodies::simulation::vitals::Vitals;
use geo::Coord;
use proptest::prelude::*;

fn create_test_params() -> Params {
    Params {
        width: 1000.0,
        height: 1000.0,
        ..Params::default()
    }
}

fn disc(id: u64, x: f64, y: f64, radius: f64, velocity: Velocity) -> Body {
    let pos = Coord { x, y };
    Body {
        id: BodyId(id),
        kind: BodyKind::Organism,
        genome: Genome::default(),
        hue: 0.0,
        pos,
        mass: PI * radius * radius,
        radius,
        velocity,
        vitals: Vitals::from_parts(100.0, 0.0, 0.0, f64::INFINITY),
        spikes: Vec::new(),
        next_pos: pos,
        last_collided: None,
    }
}

prop_compose! {
    fn arb_genome()(bytes in prop::collection::vec(any::<u8>(), 0..96)) -> Genome {
        Genome::from(bytes)
    }
}

/// Coordinates biased towards the arena walls.
fn arb_axis() -> impl Strategy<Value = f64> {
    prop_oneof![0.0f64..60.0, 940.0f64..1000.0, 0.0f64..1000.0]
}

prop_compose! {
    fn arb_velocity()(angle in 0.0f64..1.0, speed in 0.0f64..50.0) -> Velocity {
        Velocity::new(angle, speed)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_prng_stays_in_unit_interval(state in any::<u64>()) {
        let mut prng = Prng::from_state(state);
        for _ in 0..32 {
            let value = prng.rand();
            prop_assert!((0.0..1.0).contains(&value), "draw {} escaped [0, 1)", value);
        }
    }

    #[test]
    fn test_genome_hex_round_trip(genome in arb_genome()) {
        let text = genome.to_hex();
        prop_assert_eq!(Genome::from_hex(&text).unwrap(), genome);
    }

    #[test]
    fn test_one_spike_per_spike_control_byte(genome in arb_genome()) {
        let settings = Settings::new(create_test_params());
        let commands = read_genome(&genome, &settings);
        let spike_genes = genome.as_bytes().iter().filter(|&&byte| byte == 0xF1).count();

        prop_assert_eq!(commands.spikes.len(), spike_genes);
        prop_assert!((0.0..1.0).contains(&commands.hue));
        for spike in &commands.spikes {
            prop_assert!((0.0..1.0).contains(&spike.angle));
        }
    }

    #[test]
    fn test_replicated_genomes_build_valid_bodies(
        genome in arb_genome(),
        seed in 1u64..2_147_483_646,
        volatility in 0.0f64..10.0
    ) {
        let settings = Settings::new(Params { volatility, ..create_test_params() });
        let mut prng = Prng::from_state(seed);
        let child = replicate_genome(&genome, &mut prng, &settings);
        let body = Body::from_genome(
            BodyId(0),
            child,
            Coord { x: 500.0, y: 500.0 },
            Velocity::default(),
            &settings,
        );

        prop_assert!(body.mass >= settings.min_mass);
        prop_assert!(body.radius >= settings.params.min_radius);
        prop_assert!(body.vitals.upkeep.is_finite() && body.vitals.upkeep >= 0.0);
        for pair in body.spikes.windows(2) {
            prop_assert!(pair[0].length >= pair[1].length, "spikes must be longest first");
        }
    }

    #[test]
    fn test_drain_invariants(
        calories in 0.0f64..1e6,
        dies_at in 0.0f64..1e3,
        amount in -1e3f64..2e6
    ) {
        let mut vitals = Vitals::from_parts(calories, 0.0, dies_at, f64::INFINITY);
        let drained = vitals.drain(amount);

        prop_assert!(drained >= 0.0);
        prop_assert!(drained <= calories);
        prop_assert!(vitals.calories >= 0.0);
        prop_assert!((calories - drained - vitals.calories).abs() < 1e-6);
        prop_assert_eq!(vitals.is_dead(), vitals.calories < dies_at);
    }

    #[test]
    fn test_separation_resolves_overlap(
        ax in arb_axis(),
        ay in arb_axis(),
        dx in -60.0f64..60.0,
        dy in -60.0f64..60.0,
        ar in 2.0f64..40.0,
        br in 2.0f64..40.0,
        mass_factor in 0.01f64..100.0
    ) {
        let settings = Settings::new(create_test_params());
        let mut a = disc(
            0,
            clamp_within(ax, ar, 1000.0),
            clamp_within(ay, ar, 1000.0),
            ar,
            Velocity::default(),
        );
        let mut b = disc(
            1,
            clamp_within(ax + dx, br, 1000.0),
            clamp_within(ay + dy, br, 1000.0),
            br,
            Velocity::default(),
        );
        a.mass *= mass_factor;

        prop_assert!(separate_bodies(&mut a, &mut b, &settings));
        prop_assert!(distance(a.pos, b.pos) >= ar + br - 1e-6);
        for body in [&a, &b] {
            prop_assert!(body.pos.x >= body.radius && body.pos.x <= 1000.0 - body.radius);
            prop_assert!(body.pos.y >= body.radius && body.pos.y <= 1000.0 - body.radius);
        }
    }

    #[test]
    fn test_collision_conserves_momentum(
        dx in 1.0f64..20.0,
        dy in -20.0f64..20.0,
        ar in 2.0f64..30.0,
        br in 2.0f64..30.0,
        va in arb_velocity(),
        vb in arb_velocity()
    ) {
        let mut a = disc(0, 500.0, 500.0, ar, va);
        let mut b = disc(1, 500.0 + dx, 500.0 + dy, br, vb);

        let before = a.velocity.components() * a.mass + b.velocity.components() * b.mass;
        collide_bodies(&mut a, &mut b);
        let after = a.velocity.components() * a.mass + b.velocity.components() * b.mass;

        let scale = 1.0 + before.x.abs() + before.y.abs();
        prop_assert!((before.x - after.x).abs() < 1e-9 * scale);
        prop_assert!((before.y - after.y).abs() < 1e-9 * scale);
    }
}
