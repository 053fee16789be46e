//! Synthetic record generation with per-call unique identifiers.
//!
//! Identifiers are drawn by rejection sampling from `[0, IDENTIFIER_SPACE)`.
//! Uniqueness holds within a single [`generate`] call only; the pool that
//! enforces it is dropped when the call returns.

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use crate::record::AtmRecord;

/// Exclusive upper bound of the identifier range.
pub const IDENTIFIER_SPACE: u64 = 99_999_999;

/// Default number of draws allowed per record before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1_000;

/// Errors produced while generating records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// More records were requested than there are distinct identifiers.
    #[error("cannot generate {requested} unique records: identifier space holds only {capacity}")]
    CountExceedsSpace {
        /// Number of records requested.
        requested: usize,
        /// Number of distinct identifiers available.
        capacity: u64,
    },
    /// Every draw for one record collided with an identifier already in use.
    #[error("identifier pool exhausted: {attempts} draws collided after {generated} records")]
    PoolExhausted {
        /// Draws spent on the failing record.
        attempts: u32,
        /// Records successfully generated before the failure.
        generated: usize,
    },
}

/// Tuning for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Maximum draws per record, including the first.
    pub max_attempts: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS }
    }
}

/// Identifiers already handed out during one generation call.
#[derive(Debug)]
pub struct IdentifierPool {
    used: HashSet<u64>,
    max_attempts: u32,
}

impl IdentifierPool {
    /// Creates an empty pool sized for `capacity` identifiers.
    #[must_use]
    pub fn with_capacity(capacity: usize, max_attempts: u32) -> Self {
        Self { used: HashSet::with_capacity(capacity), max_attempts }
    }

    /// Draws a fresh identifier and records it in the pool.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::PoolExhausted`] if `max_attempts` consecutive
    /// draws all hit identifiers already in the pool.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Result<u64, GenerateError> {
        for _ in 0..self.max_attempts {
            let candidate = draw_candidate(rng);
            if self.used.insert(candidate) {
                return Ok(candidate);
            }
        }
        tracing::warn!(
            attempts = self.max_attempts,
            pool_size = self.used.len(),
            "identifier pool exhausted"
        );
        Err(GenerateError::PoolExhausted {
            attempts: self.max_attempts,
            generated: self.used.len(),
        })
    }
}

/// Floors a continuous uniform draw from `[0, IDENTIFIER_SPACE)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn draw_candidate<R: Rng>(rng: &mut R) -> u64 {
    let sample: f64 = rng.random_range(0.0..IDENTIFIER_SPACE as f64);
    (sample.floor() as u64).min(IDENTIFIER_SPACE - 1)
}

/// Generates `count` copies of `template`, each with a unique identifier.
///
/// The caller owns the randomness: pass a seeded RNG for reproducible output.
///
/// # Errors
///
/// Returns [`GenerateError::CountExceedsSpace`] if `count` is larger than
/// [`IDENTIFIER_SPACE`], or [`GenerateError::PoolExhausted`] if a record could
/// not find a free identifier within `options.max_attempts` draws.
pub fn generate<R: Rng>(
    template: &AtmRecord,
    count: usize,
    rng: &mut R,
    options: &GeneratorOptions,
) -> Result<Vec<AtmRecord>, GenerateError> {
    if !u64::try_from(count).is_ok_and(|c| c <= IDENTIFIER_SPACE) {
        return Err(GenerateError::CountExceedsSpace {
            requested: count,
            capacity: IDENTIFIER_SPACE,
        });
    }

    let mut pool = IdentifierPool::with_capacity(count, options.max_attempts);
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let identifier = pool.draw(rng)?;
        records.push(template.with_identifier(identifier));
    }

    tracing::debug!(count, "generated records");
    Ok(records)
}
