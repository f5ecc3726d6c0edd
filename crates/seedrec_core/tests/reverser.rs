//! End-to-end seed recovery scenarios.

use rayon::iter::ParallelIterator;
use seedrec_core::{
    BooleanCall, DoubleCall, FloatCall, IntCall, IntRangeCall, JavaRandom, Lcg, LongCall, Random,
    Reverser, SeedCall, SolveError,
};
use std::collections::HashSet;

const GROUND_TRUTH: u64 = 0x1234_5678_9ABC;

#[test]
fn canonical_java_sequence() {
    let mut random = JavaRandom::new(42);
    random.scramble();
    assert_eq!(random.random().seed(), (42 ^ 0x5DEECE66D) & ((1 << 48) - 1));

    let values: Vec<i32> = (0..5).map(|_| random.next_int()).collect();
    assert_eq!(
        values,
        vec![-1170105035, 234785527, -1360544799, 205897768, 1325134812]
    );
}

#[test]
fn recovers_seed_from_single_long() {
    let value = JavaRandom::new(GROUND_TRUTH).next_long();

    let mut reverser = Reverser::new();
    reverser.add_call(LongCall::exact(value));

    let solutions = reverser.solve_java().unwrap();
    assert_eq!(solutions.stats().seed_calls, 2);

    let seeds: Vec<u64> = Iterator::collect(solutions);
    assert!(seeds.contains(&GROUND_TRUTH));
    for &seed in &seeds {
        assert_eq!(JavaRandom::new(seed).next_long(), value);
    }
}

#[test]
fn single_long_soundness_for_fixed_value() {
    let value = -3_700_000_000i64;

    let mut reverser = Reverser::new();
    reverser.add_call(LongCall::exact(value));

    for seed in reverser.solve_java().unwrap() {
        assert_eq!(JavaRandom::new(seed).next_long(), value);
    }
}

#[test]
fn recovers_seed_from_two_floats() {
    let mut unknown = JavaRandom::new(GROUND_TRUTH);
    let first = unknown.next_float();
    let second = unknown.next_float();

    let mut reverser = Reverser::new();
    reverser.add_call(FloatCall::exact(first));
    reverser.add_call(FloatCall::exact(second));

    let seeds: Vec<u64> = Iterator::collect(reverser.solve_java().unwrap());
    assert!(seeds.contains(&GROUND_TRUTH));
    for &seed in &seeds {
        let mut replay = JavaRandom::new(seed);
        assert_eq!(replay.next_float(), first);
        assert_eq!(replay.next_float(), second);
    }
}

#[test]
fn float_range_yields_seeds_inside_bounds() {
    let mut reverser = Reverser::new();
    reverser.add_call(FloatCall::new(0.25, 0.5));

    for seed in reverser.solve_java().unwrap().take(40) {
        let value = JavaRandom::new(seed).next_float();
        assert!((0.25..=0.5).contains(&value));
    }
}

#[test]
fn exclusive_float_range_is_strict() {
    let mut reverser = Reverser::new();
    reverser.add_call(FloatCall::exclusive(0.5, 0.75, true, true));

    for seed in reverser.solve_java().unwrap().take(40) {
        let value = JavaRandom::new(seed).next_float();
        assert!(value > 0.5 && value < 0.75);
    }
}

#[test]
fn recovers_seed_from_single_double() {
    let value = JavaRandom::new(GROUND_TRUTH).next_double();

    let mut reverser = Reverser::new();
    reverser.add_call(DoubleCall::exact(value));
    let solutions = reverser.solve_java().unwrap();
    assert_eq!(solutions.stats().seed_calls, 2);

    let seeds: Vec<u64> = Iterator::collect(solutions);
    assert!(seeds.contains(&GROUND_TRUTH));
    for &seed in &seeds {
        assert_eq!(JavaRandom::new(seed).next_double(), value);
    }
}

#[test]
fn mixed_transcript_with_gap() {
    let mut unknown = JavaRandom::new(GROUND_TRUTH);
    let first = unknown.next_int();
    unknown.random_mut().skip(1).unwrap();
    let second = unknown.next_int();

    let mut reverser = Reverser::new();
    reverser.add_call(IntCall::new(first - 3, first + 3));
    reverser.skip();
    reverser.add_call(IntCall::exact(second));

    let seeds: HashSet<u64> = Iterator::collect(reverser.solve_java().unwrap());
    assert!(seeds.contains(&GROUND_TRUTH));
    for &seed in &seeds {
        let mut replay = JavaRandom::new(seed);
        let a = replay.next_int();
        assert!((first - 3..=first + 3).contains(&a));
        replay.random_mut().skip(1).unwrap();
        assert_eq!(replay.next_int(), second);
    }
}

#[test]
fn filter_only_calls_validate_without_joining_the_lattice() {
    let mut unknown = JavaRandom::new(GROUND_TRUTH);
    let first = unknown.next_int();
    unknown.random_mut().skip(1).unwrap();
    let second = unknown.next_int();

    let mut constrained = Reverser::new();
    constrained.add_call(IntCall::new(first - 3, first + 3));
    constrained.skip();
    constrained.add_call(IntCall::exact(second));
    let constrained_seeds: HashSet<u64> = Iterator::collect(constrained.solve_java().unwrap());

    let mut filtered = Reverser::new();
    filtered.add_filter(IntCall::new(first - 3, first + 3));
    filtered.skip();
    filtered.add_call(IntCall::exact(second));
    let filtered_solutions = filtered.solve_java().unwrap();
    assert_eq!(filtered_solutions.stats().seed_calls, 1);
    let filtered_seeds: HashSet<u64> = Iterator::collect(filtered_solutions);

    assert_eq!(constrained_seeds, filtered_seeds);
    assert!(filtered_seeds.contains(&GROUND_TRUTH));
}

#[test]
fn boolean_int_and_ranged_int_transcript() {
    let mut unknown = JavaRandom::new(GROUND_TRUTH);
    let flag = unknown.next_boolean();
    let word = unknown.next_int();
    let byte = unknown.next_int_bounded(256);

    let mut reverser = Reverser::new();
    reverser.add_call(BooleanCall::new(flag));
    reverser.add_call(IntCall::exact(word));
    reverser.add_call(IntRangeCall::exact(256, byte).unwrap());

    let seeds: Vec<u64> = Iterator::collect(reverser.solve_java().unwrap());
    assert!(seeds.contains(&GROUND_TRUTH));
    for &seed in &seeds {
        let mut replay = JavaRandom::new(seed);
        assert_eq!(replay.next_boolean(), flag);
        assert_eq!(replay.next_int(), word);
        assert_eq!(replay.next_int_bounded(256), byte);
    }
}

/// A 16-bit modulus makes the whole state space brute-forceable, so
/// completeness can be checked exactly.
fn toy_lcg() -> Lcg {
    Lcg::new(5, 3, 1 << 16)
}

fn brute_force<F: Fn(&mut Random) -> bool>(lcg: Lcg, accept: F) -> HashSet<u64> {
    (0..lcg.modulus())
        .filter(|&seed| {
            let mut random = Random::new(lcg, seed);
            accept(&mut random)
        })
        .collect()
}

#[test]
fn toy_lcg_enumeration_is_exhaustive() {
    let lcg = toy_lcg();

    let mut reverser = Reverser::new();
    reverser.add_call(SeedCall::new(100, 2000));
    reverser.add_call(SeedCall::new(5000, 9000));

    let solved: HashSet<u64> = Iterator::collect(reverser.solve(&lcg).unwrap());
    let expected = brute_force(lcg, |random| {
        let first = random.next_seed();
        let second = random.next_seed();
        (100..=2000).contains(&first) && (5000..=9000).contains(&second)
    });

    assert_eq!(solved, expected);
    assert!(!solved.is_empty());
}

#[test]
fn toy_lcg_with_leading_and_interior_skips() {
    let lcg = toy_lcg();

    let mut reverser = Reverser::new();
    reverser.skip();
    reverser.add_call(SeedCall::new(0, 3000));
    reverser.skip_by(2);
    reverser.add_call(SeedCall::new(60000, 65535));

    let solved: HashSet<u64> = Iterator::collect(reverser.solve(&lcg).unwrap());
    let expected = brute_force(lcg, |random| {
        random.next_seed();
        let first = random.next_seed();
        random.next_seed();
        random.next_seed();
        let second = random.next_seed();
        first <= 3000 && second >= 60000
    });

    assert_eq!(solved, expected);
    assert!(!solved.is_empty());
}

#[test]
fn parallel_traversal_finds_the_same_seeds() {
    let lcg = toy_lcg();

    let mut reverser = Reverser::new();
    reverser.add_call(SeedCall::new(100, 20000));
    reverser.add_call(SeedCall::new(5000, 30000));

    let sequential: HashSet<u64> = Iterator::collect(reverser.solve(&lcg).unwrap());
    let parallel: HashSet<u64> = ParallelIterator::collect(reverser.solve(&lcg).unwrap());

    assert_eq!(sequential, parallel);
    assert!(!sequential.is_empty());
}

#[test]
fn empty_transcripts_are_rejected() {
    assert!(matches!(
        Reverser::new().solve_java(),
        Err(SolveError::InvalidArgument(_))
    ));

    let mut filters_only = Reverser::new();
    filters_only.add_filter(IntCall::exact(7));
    assert!(matches!(
        filters_only.solve_java(),
        Err(SolveError::InvalidArgument(_))
    ));
}

#[test]
fn rewinds_to_the_pre_call_state() {
    // The returned seed is the state *before* the first update, even when
    // the transcript starts with a gap.
    let mut unknown = JavaRandom::new(GROUND_TRUTH);
    unknown.random_mut().skip(1).unwrap();
    let first = unknown.next_int();
    let second = unknown.next_int();

    let mut reverser = Reverser::new();
    reverser.skip();
    reverser.add_call(IntCall::exact(first));
    reverser.add_call(IntCall::exact(second));

    let seeds: Vec<u64> = Iterator::collect(reverser.solve_java().unwrap());
    assert!(seeds.contains(&GROUND_TRUTH));
    for &seed in &seeds {
        let mut replay = JavaRandom::new(seed);
        replay.random_mut().skip(1).unwrap();
        assert_eq!(replay.next_int(), first);
        assert_eq!(replay.next_int(), second);
    }
}
