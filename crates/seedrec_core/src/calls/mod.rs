//! The closed family of observable RNG calls.
//!
//! Every variant knows how many seed updates it consumes, how to translate
//! its domain observation into bit-range constraints on post-update seeds,
//! and how to replay-check a candidate cursor. The family is a closed enum;
//! the pipeline never grows new variants at runtime.

pub mod java;

use crate::lcg::Random;
use java::{BooleanCall, DoubleCall, FloatCall, IntCall, IntRangeCall, LongCall};

/// Direct `[min, max]` constraint on one post-update seed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCall {
    min: i64,
    max: i64,
}

impl SeedCall {
    pub const SKIPS: i64 = 1;

    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn min_seed(&self) -> i64 {
        self.min
    }

    pub fn max_seed(&self) -> i64 {
        self.max
    }

    pub fn validate(&self, random: &mut Random) -> bool {
        let value = random.next_seed() as i64;
        self.min <= value && value <= self.max
    }
}

/// One observed RNG call.
#[derive(Debug, Clone, PartialEq)]
pub enum RandomCall {
    Seed(SeedCall),
    Boolean(BooleanCall),
    Int(IntCall),
    IntRange(IntRangeCall),
    Long(LongCall),
    Float(FloatCall),
    Double(DoubleCall),
}

impl RandomCall {
    /// Number of seed updates this call consumes.
    pub fn skips(&self) -> i64 {
        match self {
            Self::Seed(_) => SeedCall::SKIPS,
            Self::Boolean(_) => BooleanCall::SKIPS,
            Self::Int(_) => IntCall::SKIPS,
            Self::IntRange(_) => IntRangeCall::SKIPS,
            Self::Long(_) => LongCall::SKIPS,
            Self::Float(_) => FloatCall::SKIPS,
            Self::Double(_) => DoubleCall::SKIPS,
        }
    }

    /// Bit-range constraints on the post-update seeds, in call order.
    ///
    /// May return fewer entries than `skips` when a later sub-update carries
    /// no recoverable information.
    pub fn to_seed(&self) -> Vec<SeedCall> {
        match self {
            Self::Seed(call) => vec![*call],
            Self::Boolean(call) => call.to_seed(),
            Self::Int(call) => call.to_seed(),
            Self::IntRange(call) => call.to_seed(),
            Self::Long(call) => call.to_seed(),
            Self::Float(call) => call.to_seed(),
            Self::Double(call) => call.to_seed(),
        }
    }

    /// Advance the cursor by `skips` updates and check the produced domain
    /// value against the original constraint.
    pub fn validate(&self, random: &mut Random) -> bool {
        match self {
            Self::Seed(call) => call.validate(random),
            Self::Boolean(call) => call.validate(random),
            Self::Int(call) => call.validate(random),
            Self::IntRange(call) => call.validate(random),
            Self::Long(call) => call.validate(random),
            Self::Float(call) => call.validate(random),
            Self::Double(call) => call.validate(random),
        }
    }
}

macro_rules! from_call {
    ($($variant:ident($type:ty);)*) => {$(
        impl From<$type> for RandomCall {
            fn from(call: $type) -> Self {
                Self::$variant(call)
            }
        }
    )*};
}

from_call! {
    Seed(SeedCall);
    Boolean(BooleanCall);
    Int(IntCall);
    IntRange(IntRangeCall);
    Long(LongCall);
    Float(FloatCall);
    Double(DoubleCall);
}
