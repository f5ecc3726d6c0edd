//! Reverse engineers the possible states of an LCG-based RNG from an
//! ordered transcript of bounded observations.
//!
//! `solve` translates the transcript into an integer-lattice enumeration:
//! each seed call pins the state at its absolute update index to a window,
//! the affine relation `state_i = a^i * s + o_i (mod m)` turns those windows
//! into a box around a lattice, LLL (after per-axis rescaling, since the
//! reduction is scale sensitive) produces a short basis, and branch-and-
//! bound walks every lattice point inside the box. Candidates are then
//! replayed against the full transcript, filters included, and survivors
//! are rewound to the initial seed.

use crate::calls::RandomCall;
use crate::error::{Result, SolveError};
use crate::lattice::{LllConfig, LLL};
use crate::lcg::{Lcg, Random};
use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::simplex::LinearProgramBuilder;
use crate::vector::{Vector, VectorRead, VectorWrite};
use crate::enumeration::{TreeNode, VertexIter};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use rayon::iter::plumbing::{bridge_unindexed, Folder, UnindexedConsumer, UnindexedProducer};
use rayon::iter::ParallelIterator;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
struct CallEntry {
    index: i64,
    call: RandomCall,
    filter_only: bool,
}

/// Timing and size breakdown of one `solve` setup.
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    /// Lattice dimension: seed calls contributing constraints.
    pub seed_calls: usize,
    /// Seconds building the lattice, offsets and bounds.
    pub build_seconds: f64,
    /// Seconds spent rescaling and LLL-reducing the basis.
    pub reduce_seconds: f64,
    /// Seconds measuring polytope widths and ordering the rows.
    pub order_seconds: f64,
}

/// Accumulates a transcript of calls and solves for consistent seeds.
#[derive(Debug, Clone, Default)]
pub struct Reverser {
    calls: Vec<CallEntry>,
    index_provider: i64,
}

impl Reverser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call; it constrains the lattice and is replay-checked.
    pub fn add_call(&mut self, call: impl Into<RandomCall>) -> &mut Self {
        self.add_entry(call.into(), false)
    }

    /// Append a call used only to eliminate false positives; it does not
    /// participate in the lattice.
    pub fn add_filter(&mut self, call: impl Into<RandomCall>) -> &mut Self {
        self.add_entry(call.into(), true)
    }

    /// Skip one seed update between calls.
    pub fn skip(&mut self) -> &mut Self {
        self.skip_by(1)
    }

    /// Skip several seed updates between calls.
    pub fn skip_by(&mut self, step: i64) -> &mut Self {
        self.index_provider += step;
        self
    }

    fn add_entry(&mut self, call: RandomCall, filter_only: bool) -> &mut Self {
        let skips = call.skips();
        self.calls.push(CallEntry {
            index: self.index_provider,
            call,
            filter_only,
        });
        self.index_provider += skips;
        self
    }

    /// Solve against the Java LCG.
    pub fn solve_java(&self) -> Result<Solutions> {
        self.solve(&Lcg::JAVA)
    }

    /// Every initial seed consistent with the transcript, as a lazy
    /// sequence traversable sequentially or in parallel.
    pub fn solve(&self, lcg: &Lcg) -> Result<Solutions> {
        let mut stats = SolveStats::default();
        let start = Instant::now();

        // Flatten the non-filter calls into seed calls at absolute indices.
        let mut seed_entries = Vec::new();
        for entry in &self.calls {
            if entry.index < 0 {
                return Err(SolveError::InvalidArgument(
                    "call indices must not be negative".into(),
                ));
            }
            if entry.filter_only {
                continue;
            }
            for (offset, seed_call) in entry.call.to_seed().into_iter().enumerate() {
                if seed_call.min_seed() > seed_call.max_seed() {
                    return Err(SolveError::InvalidArgument(
                        "call bounds are inverted".into(),
                    ));
                }
                seed_entries.push((entry.index + offset as i64, seed_call));
            }
        }

        let num_calls = seed_entries.len();
        stats.seed_calls = num_calls;
        if num_calls == 0 {
            return Err(SolveError::InvalidArgument(
                "the transcript has no lattice-contributing calls".into(),
            ));
        }
        if seed_entries.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
            return Err(SolveError::InvalidArgument(
                "seed calls must sit at strictly increasing indices".into(),
            ));
        }

        // Lattice basis plus the affine offset of each constrained state.
        let modulus = BigInt::from(lcg.modulus());
        let multiplier = BigInt::from(lcg.multiplier());

        let mut basis = Matrix::new(num_calls + 1, num_calls);
        let mut offset = Vector::zero(num_calls);
        let mut min = Vector::zero(num_calls);
        let mut max = Vector::zero(num_calls);

        let mut random = Random::new(*lcg, 0);
        for i in 0..num_calls {
            let (index, seed_call) = &seed_entries[i];
            if i != 0 {
                random.skip(index - seed_entries[i - 1].0)?;
            }

            let power = multiplier.modpow(&BigInt::from(*index), &modulus);
            basis.set(0, i, Rational::from_int(power));
            basis.set(i + 1, i, Rational::from_int(modulus.clone()));

            offset.set(i, Rational::from_int(random.seed()));
            min.set(i, Rational::from_int(seed_call.min_seed()));
            max.set(i, Rational::from_int(seed_call.max_seed()));
        }

        // Center the box on the lattice.
        min.sub_assign(&offset);
        max.sub_assign(&offset);
        stats.build_seconds = start.elapsed().as_secs_f64();

        // Normalize per-axis scale before reducing; LLL is scale sensitive.
        let reduce_start = Instant::now();
        let side_lengths =
            Vector::from_fn(num_calls, |i| &(max.get(i) - min.get(i)) + &Rational::one());

        let mut lcm = BigInt::one();
        for i in 0..num_calls {
            let length = side_lengths.get(i).numerator();
            lcm = length * &lcm / lcm.gcd(length);
        }

        let scaling = Matrix::of_diagonal(&Vector::from_fn(num_calls, |i| {
            &Rational::from_int(lcm.clone()) / side_lengths.get(i)
        }));
        let scaled = scaling.mul(&basis);
        let reduced = LLL::reduce(&scaled, &LllConfig::strong());
        let basis = scaling.inverse().mul(&reduced);
        stats.reduce_seconds = reduce_start.elapsed().as_secs_f64();

        // The polytope is the translated box itself.
        let mut builder = LinearProgramBuilder::new();
        builder.add_bounded_basis(&min, &Matrix::identity(num_calls), &max);
        let program = builder.build()?;

        // Order the inverse-basis rows by the width of the polytope along
        // them, narrowest first, so the tree branches as little as possible.
        let order_start = Instant::now();
        let basis_inverse = basis.inverse();
        let mut widths = Vec::with_capacity(num_calls);
        for i in 0..basis_inverse.height() {
            let gradient = basis_inverse.row(i).to_vector();
            let low = program.minimize(&gradient).dot(&gradient);
            let high = program.maximize(&gradient).dot(&gradient);
            widths.push(&high - &low);
        }

        let mut order: Vec<usize> = (0..basis_inverse.height()).collect();
        order.sort_by(|&a, &b| widths[a].cmp(&widths[b]));

        let sorted_inverse = Matrix::from_fn(
            basis_inverse.width(),
            basis_inverse.height(),
            |col, row| basis_inverse.get(col, order[row]).clone(),
        );

        let mut unsort = vec![0; order.len()];
        for (position, &original) in order.iter().enumerate() {
            unsort[original] = position;
        }
        stats.order_seconds = order_start.elapsed().as_secs_f64();

        // The first enumerated coordinate is the state at the first seed
        // call's index; rewinding from there reaches the initial seed even
        // when filter-only entries precede it.
        let to_start = lcg.of_step(-(seed_entries[0].0 + 1))?;
        let root = TreeNode::root(Arc::new(sorted_inverse), program);

        Ok(Solutions {
            vertices: VertexIter::new(root),
            context: Arc::new(SolveContext {
                basis,
                offset,
                unsort,
                lcg: *lcg,
                to_start,
                calls: self.calls.clone(),
            }),
            stats,
        })
    }
}

/// Shared immutable state for mapping enumerated vertices back to seeds.
#[derive(Debug)]
struct SolveContext {
    basis: Matrix,
    offset: Vector,
    unsort: Vec<usize>,
    lcg: Lcg,
    to_start: Lcg,
    calls: Vec<CallEntry>,
}

impl SolveContext {
    /// Vertex (in sorted coordinates) to validated initial seed.
    fn finish(&self, vertex: Vector) -> Option<u64> {
        let size = vertex.len();
        let unsorted = Vector::from_fn(size, |i| vertex.get(self.unsort[i]).clone());
        let states = self.basis.mul_vector(&unsorted).plus(&self.offset);

        // First component: the state right after the first call's first
        // update, canonicalized into [0, modulus).
        let modulus = BigInt::from(self.lcg.modulus());
        let seed = states.get(0).numerator().mod_floor(&modulus).to_u64()?;

        // Replay the full transcript, filters included, from the start.
        let mut validator = Random::new(self.lcg, self.to_start.next(seed));
        let mut previous: Option<&CallEntry> = None;
        for entry in &self.calls {
            let mut gap = entry.index;
            if let Some(previous) = previous {
                gap -= previous.index + previous.call.skips();
            }
            if validator.skip(gap).is_err() {
                return None;
            }
            if !entry.call.validate(&mut validator) {
                return None;
            }
            previous = Some(entry);
        }

        Some(self.to_start.next(seed))
    }
}

/// Lazy sequence of recovered initial seeds.
///
/// Iterates sequentially via [`Iterator`] and in parallel via rayon's
/// [`ParallelIterator`]; under parallel traversal the output order is
/// unspecified. False positives of the lattice relaxation are dropped by
/// replay validation, so the sequence may be empty.
#[derive(Debug)]
pub struct Solutions {
    vertices: VertexIter,
    context: Arc<SolveContext>,
    stats: SolveStats,
}

impl Solutions {
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }
}

impl Iterator for Solutions {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            let vertex = self.vertices.next()?;
            if let Some(seed) = self.context.finish(vertex) {
                return Some(seed);
            }
        }
    }
}

impl ParallelIterator for Solutions {
    type Item = u64;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<u64>,
    {
        bridge_unindexed(
            SeedProducer {
                vertices: self.vertices,
                context: self.context,
            },
            consumer,
        )
    }
}

/// Work-splitting producer: splitting hands half of the unexpanded tree to
/// the new producer, while the shared context stays behind an `Arc`.
struct SeedProducer {
    vertices: VertexIter,
    context: Arc<SolveContext>,
}

impl UnindexedProducer for SeedProducer {
    type Item = u64;

    fn split(mut self) -> (Self, Option<Self>) {
        match self.vertices.try_split() {
            Some(front) => {
                let context = Arc::clone(&self.context);
                (
                    SeedProducer {
                        vertices: front,
                        context,
                    },
                    Some(self),
                )
            }
            None => (self, None),
        }
    }

    fn fold_with<F>(self, mut folder: F) -> F
    where
        F: Folder<u64>,
    {
        for vertex in self.vertices {
            if let Some(seed) = self.context.finish(vertex) {
                folder = folder.consume(seed);
                if folder.full() {
                    break;
                }
            }
        }
        folder
    }
}
