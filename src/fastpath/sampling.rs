//! Deterministic bounded sampling.
//!
//! The RNG is seeded explicitly — never from the wall clock or process
//! entropy — so a fixed seed and fixed inputs give bit-identical reports.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::defaults::RANDOM_TAIL_FRACTION;
use crate::types::CellValue;

/// Result of bounding a working set.
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    pub values: Vec<CellValue>,
    /// True when sampling actually reduced the input.
    pub applied: bool,
    pub original_len: usize,
}

impl SampleOutcome {
    /// sampled / original, in (0, 1]; 1.0 when nothing was dropped.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_len == 0 {
            1.0
        } else {
            self.values.len() as f64 / self.original_len as f64
        }
    }
}

/// Bound `values` to at most `limit` entries.
///
/// Stratified systematic sampling with a random start covers the whole
/// index range evenly; roughly 10% of the budget goes to uniform random
/// picks so distribution tails survive. Original ordering is preserved
/// and the output never exceeds `limit`.
pub fn sample_values(values: &[CellValue], limit: usize, seed: u64) -> SampleOutcome {
    let original_len = values.len();
    if original_len <= limit || limit == 0 {
        return SampleOutcome {
            values: values.to_vec(),
            applied: false,
            original_len,
        };
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let random_budget = ((limit as f64) * RANDOM_TAIL_FRACTION) as usize;
    let systematic_budget = limit - random_budget;

    let mut picked: BTreeSet<usize> = BTreeSet::new();
    let stride = original_len / systematic_budget;
    let start = rng.gen_range(0..stride.max(1));
    let mut index = start;
    while index < original_len && picked.len() < systematic_budget {
        picked.insert(index);
        index += stride.max(1);
    }
    for _ in 0..random_budget {
        picked.insert(rng.gen_range(0..original_len));
    }

    let sampled: Vec<CellValue> = picked
        .into_iter()
        .take(limit)
        .map(|i| values[i].clone())
        .collect();

    SampleOutcome {
        values: sampled,
        applied: true,
        original_len,
    }
}

/// Bounded reservoir over a stream of values (algorithm R).
///
/// Used by the streaming evaluator: the reservoir holds a uniform sample
/// of everything seen so far without materializing the stream.
pub struct ReservoirSampler {
    capacity: usize,
    seen: usize,
    rng: StdRng,
    buffer: Vec<CellValue>,
}

impl ReservoirSampler {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            capacity: capacity.max(1),
            seen: 0,
            rng: StdRng::seed_from_u64(seed),
            buffer: Vec::new(),
        }
    }

    pub fn push(&mut self, value: CellValue) {
        self.seen += 1;
        if self.buffer.len() < self.capacity {
            self.buffer.push(value);
        } else {
            let j = self.rng.gen_range(0..self.seen);
            if j < self.capacity {
                self.buffer[j] = value;
            }
        }
    }

    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn values(&self) -> &[CellValue] {
        &self.buffer
    }

    pub fn into_values(self) -> Vec<CellValue> {
        self.buffer
    }
}
