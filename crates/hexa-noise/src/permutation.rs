//! Permutation tables: the seeded lookup driving gradient selection.
//!
//! A table is a permutation of `0..=255` stored twice in a row, so that the
//! nested `p[p[i] + j]` lookups of the samplers never need a wrap check.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::NoiseError;

/// Number of distinct entries in a permutation table.
pub const PERMUTATION_SIZE: usize = 256;

/// An immutable permutation of `0..=255` with a doubled lookup view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationTable {
    p: [u8; PERMUTATION_SIZE * 2],
}

impl PermutationTable {
    /// Builds a table from a caller-shuffled sequence.
    ///
    /// Accepts either the 256 base values or a 512-entry table whose second
    /// half repeats the first. The engine never reshuffles the input.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::InvalidArgument`] for any other length, a value
    /// outside `0..=255`, a repeated value, or a 512-entry table whose halves
    /// differ.
    pub fn from_values(values: &[i32]) -> Result<Self, NoiseError> {
        let base = match values.len() {
            PERMUTATION_SIZE => values,
            len if len == PERMUTATION_SIZE * 2 => {
                let (head, tail) = values.split_at(PERMUTATION_SIZE);
                if head != tail {
                    return Err(NoiseError::InvalidArgument(
                        "second half of a 512-entry permutation must repeat the first half"
                            .to_string(),
                    ));
                }
                head
            }
            len => {
                return Err(NoiseError::InvalidArgument(format!(
                    "permutation must have {PERMUTATION_SIZE} or {} entries, got {len}",
                    PERMUTATION_SIZE * 2
                )));
            }
        };

        let mut seen = [false; PERMUTATION_SIZE];
        let mut p = [0_u8; PERMUTATION_SIZE * 2];
        for (i, &raw) in base.iter().enumerate() {
            let value = u8::try_from(raw).map_err(|_| {
                NoiseError::InvalidArgument(format!(
                    "permutation value {raw} at index {i} is outside 0..=255"
                ))
            })?;
            if std::mem::replace(&mut seen[value as usize], true) {
                return Err(NoiseError::InvalidArgument(format!(
                    "permutation value {value} appears more than once"
                )));
            }
            p[i] = value;
            p[i + PERMUTATION_SIZE] = value;
        }

        Ok(Self { p })
    }

    /// The identity permutation `0, 1, ..., 255`.
    pub fn identity() -> Self {
        let mut p = [0_u8; PERMUTATION_SIZE * 2];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = (i % PERMUTATION_SIZE) as u8;
        }
        Self { p }
    }

    /// A Fisher-Yates shuffle of the identity driven by a ChaCha8 stream.
    ///
    /// Identical seeds give identical tables on every platform.
    pub fn shuffled(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut base: [u8; PERMUTATION_SIZE] = std::array::from_fn(|i| i as u8);
        for i in (1..PERMUTATION_SIZE).rev() {
            let j = rng.random_range(0..=i);
            base.swap(i, j);
        }

        let mut p = [0_u8; PERMUTATION_SIZE * 2];
        p[..PERMUTATION_SIZE].copy_from_slice(&base);
        p[PERMUTATION_SIZE..].copy_from_slice(&base);
        Self { p }
    }

    /// The 256 base values, in the order they were supplied.
    pub fn values(&self) -> &[u8] {
        &self.p[..PERMUTATION_SIZE]
    }

    /// The base values widened to `i32`, the form callers pass in.
    pub fn to_vec(&self) -> Vec<i32> {
        self.values().iter().map(|&v| i32::from(v)).collect()
    }

    /// Doubled-table lookup. `index` must be below 512.
    #[inline]
    pub(crate) fn hash(&self, index: usize) -> usize {
        self.p[index] as usize
    }
}

impl Default for PermutationTable {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_values() -> Vec<i32> {
        (0..256).collect()
    }

    fn assert_invalid(result: Result<PermutationTable, NoiseError>) {
        assert!(
            matches!(result, Err(NoiseError::InvalidArgument(_))),
            "expected InvalidArgument, got {result:?}"
        );
    }

    #[test]
    fn test_store_round_trip() {
        let values = PermutationTable::shuffled(7).to_vec();
        let table = PermutationTable::from_values(&values).unwrap();
        assert_eq!(table.to_vec(), values);
    }

    #[test]
    fn test_identity_matches_from_values() {
        let table = PermutationTable::from_values(&identity_values()).unwrap();
        assert_eq!(table, PermutationTable::identity());
    }

    #[test]
    fn test_doubled_input_accepted() {
        let base = PermutationTable::shuffled(3).to_vec();
        let doubled: Vec<i32> = base.iter().chain(base.iter()).copied().collect();
        let table = PermutationTable::from_values(&doubled).unwrap();
        assert_eq!(table.to_vec(), base);
    }

    #[test]
    fn test_doubled_input_with_mismatched_halves_rejected() {
        let mut doubled: Vec<i32> = (0..256).chain(0..256).collect();
        doubled.swap(300, 301);
        assert_invalid(PermutationTable::from_values(&doubled));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_invalid(PermutationTable::from_values(&[]));
        assert_invalid(PermutationTable::from_values(&(0..255).collect::<Vec<i32>>()));
        assert_invalid(PermutationTable::from_values(&(0..257).collect::<Vec<i32>>()));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut values = identity_values();
        values[10] = 256;
        assert_invalid(PermutationTable::from_values(&values));

        let mut values = identity_values();
        values[0] = -1;
        assert_invalid(PermutationTable::from_values(&values));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut values = identity_values();
        values[5] = 4;
        assert_invalid(PermutationTable::from_values(&values));
    }

    #[test]
    fn test_shuffled_is_permutation() {
        let table = PermutationTable::shuffled(42);
        let mut sorted = table.values().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..=255).collect::<Vec<u8>>());
    }

    #[test]
    fn test_shuffled_is_deterministic_per_seed() {
        assert_eq!(PermutationTable::shuffled(9), PermutationTable::shuffled(9));
        assert_ne!(PermutationTable::shuffled(9), PermutationTable::shuffled(10));
    }

    #[test]
    fn test_doubled_view_mirrors_base() {
        let table = PermutationTable::shuffled(1);
        for i in 0..PERMUTATION_SIZE {
            assert_eq!(table.hash(i), table.hash(i + PERMUTATION_SIZE));
        }
        // Highest index the samplers can reach.
        assert_eq!(table.hash(511), table.hash(255));
    }
}
