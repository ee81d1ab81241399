//! Enumeration of cop configurations.
//!
//! A configuration is a sorted multiset of k vertex IDs. All
//! `C(N+k-1, k)` of them are generated in lexicographic order into one
//! flat byte array of stride k, so a configuration ID is just an index
//! and tuple lookup is a binary search over k-byte slices.

use crate::error::SolverError;

/// Upper bound on the supported cop count.
pub const MAX_COPS: usize = 256;

/// Number of sorted k-multisets over `{0..n-1}`: `C(n+k-1, k)`.
///
/// # Errors
/// [`SolverError::ConfigurationOverflow`] when the binomial (or an
/// intermediate product) exceeds 64-bit range.
pub fn configuration_count(n: usize, k: usize) -> Result<usize, SolverError> {
    debug_assert!(n >= 1 && k >= 1);
    let overflow = || SolverError::ConfigurationOverflow { n, k };

    let nn = n + k - 1;
    let kk = k.min(nn - k);
    let mut res: u128 = 1;
    for i in 1..=kk {
        // Exact at every step: res holds C(nn, i) after multiplying by
        // (nn - i + 1) and dividing by i.
        res = res
            .checked_mul((nn - i + 1) as u128)
            .ok_or_else(overflow)?
            / i as u128;
    }
    if res > u64::MAX as u128 {
        return Err(overflow());
    }
    usize::try_from(res).map_err(|_| overflow())
}

// ============================================================================
// ConfigTable
// ============================================================================

/// The full lex-ordered table of sorted k-cop placements.
#[derive(Clone, Debug)]
pub struct ConfigTable {
    n: usize,
    k: usize,
    count: usize,
    /// `count * k` bytes; entry `c` occupies `bytes[c*k..(c+1)*k]`.
    bytes: Box<[u8]>,
}

impl ConfigTable {
    /// Generates every configuration with the lexicographic odometer:
    /// start at all zeros; to advance, bump the rightmost entry below
    /// `n - 1` and reset everything to its right to the new value.
    ///
    /// # Errors
    /// [`SolverError::CopCountOutOfRange`] for `k` outside `1..=256`,
    /// [`SolverError::ConfigurationOverflow`] when the table would not be
    /// addressable.
    pub fn generate(n: usize, k: usize) -> Result<Self, SolverError> {
        if k < 1 || k > MAX_COPS {
            return Err(SolverError::CopCountOutOfRange { k });
        }
        debug_assert!(n >= 1);

        let count = configuration_count(n, k)?;
        let total = count
            .checked_mul(k)
            .ok_or(SolverError::ConfigurationOverflow { n, k })?;

        let mut bytes = vec![0u8; total];
        let mut current = vec![0u8; k];
        let mut written = 0usize;
        loop {
            bytes[written * k..(written + 1) * k].copy_from_slice(&current);
            written += 1;

            // Rightmost entry that can still be incremented.
            let mut p = k;
            while p > 0 && current[p - 1] == (n - 1) as u8 {
                p -= 1;
            }
            if p == 0 {
                break;
            }
            current[p - 1] += 1;
            let v = current[p - 1];
            for slot in &mut current[p..] {
                *slot = v;
            }
        }
        debug_assert_eq!(written, count, "odometer count disagrees with binomial");

        Ok(Self {
            n,
            k,
            count,
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Number of configurations (M).
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when the table is empty (never the case for valid inputs).
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Cops per configuration.
    #[inline(always)]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Vertex count the table was generated over.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// The sorted cop tuple of configuration `c_id`.
    #[inline(always)]
    pub fn get(&self, c_id: usize) -> &[u8] {
        debug_assert!(c_id < self.count);
        &self.bytes[c_id * self.k..(c_id + 1) * self.k]
    }

    /// Binary-searches a sorted tuple; returns its configuration ID, or
    /// `None` if absent (e.g. the tuple is not sorted).
    #[inline]
    pub fn find(&self, tuple: &[u8]) -> Option<usize> {
        debug_assert_eq!(tuple.len(), self.k);
        let (mut lo, mut hi) = (0usize, self.count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.get(mid).cmp(tuple) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    /// Whether configuration `c_id` has a cop standing on vertex `r`.
    /// The tuple is sorted, so this is a short scan with early exit.
    #[inline(always)]
    pub fn occupies(&self, c_id: usize, r: u8) -> bool {
        for &c in self.get(c_id) {
            if c == r {
                return true;
            }
            if c > r {
                return false;
            }
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    #[test]
    fn counts_match_closed_form() {
        assert_eq!(configuration_count(3, 1).unwrap(), 3);
        assert_eq!(configuration_count(3, 2).unwrap(), 6); // C(4,2)
        assert_eq!(configuration_count(4, 2).unwrap(), 10); // C(5,2)
        assert_eq!(configuration_count(10, 3).unwrap(), 220); // C(12,3)
        assert_eq!(configuration_count(1, 1).unwrap(), 1);
        assert_eq!(configuration_count(1, 5).unwrap(), 1);
    }

    #[test]
    fn count_overflow_is_detected() {
        let err = configuration_count(254, 256).unwrap_err();
        assert!(matches!(err, SolverError::ConfigurationOverflow { .. }));
    }

    #[test]
    fn generate_rejects_cop_counts_out_of_range() {
        assert!(matches!(
            ConfigTable::generate(5, 0).unwrap_err(),
            SolverError::CopCountOutOfRange { k: 0 }
        ));
        assert!(matches!(
            ConfigTable::generate(5, 257).unwrap_err(),
            SolverError::CopCountOutOfRange { k: 257 }
        ));
    }

    #[test]
    fn table_is_strictly_lex_sorted() {
        let t = ConfigTable::generate(6, 3).unwrap();
        assert_eq!(t.len(), configuration_count(6, 3).unwrap());
        for c in 1..t.len() {
            assert!(t.get(c - 1) < t.get(c), "entries {} and {c} out of order", c - 1);
        }
    }

    #[test]
    fn every_entry_is_non_decreasing() {
        let t = ConfigTable::generate(7, 4).unwrap();
        for c in 0..t.len() {
            let tuple = t.get(c);
            for i in 1..tuple.len() {
                assert!(tuple[i - 1] <= tuple[i]);
            }
        }
    }

    #[test]
    fn first_and_last_entries() {
        let t = ConfigTable::generate(5, 2).unwrap();
        assert_eq!(t.get(0), &[0, 0]);
        assert_eq!(t.get(t.len() - 1), &[4, 4]);
    }

    #[test]
    fn find_roundtrips_every_id() {
        let t = ConfigTable::generate(9, 3).unwrap();
        for c in 0..t.len() {
            assert_eq!(t.find(t.get(c)), Some(c));
        }
    }

    #[test]
    fn find_rejects_absent_tuples() {
        let t = ConfigTable::generate(6, 2).unwrap();
        // Unsorted tuples never appear in the table.
        assert_eq!(t.find(&[3, 1]), None);
    }

    #[test]
    fn find_on_random_sorted_tuples() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);
        let t = ConfigTable::generate(11, 3).unwrap();
        for _ in 0..500 {
            let mut tuple = [0u8; 3];
            for slot in &mut tuple {
                *slot = rng.random_range(0..11) as u8;
            }
            tuple.sort_unstable();
            let id = t.find(&tuple).expect("every sorted tuple is enumerated");
            assert_eq!(t.get(id), tuple);
        }
    }

    #[test]
    fn occupies_matches_linear_scan() {
        let t = ConfigTable::generate(8, 3).unwrap();
        for c in 0..t.len() {
            for r in 0..8u8 {
                assert_eq!(t.occupies(c, r), t.get(c).contains(&r));
            }
        }
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let a = ConfigTable::generate(10, 2).unwrap();
        let b = ConfigTable::generate(10, 2).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }

    #[test]
    fn single_vertex_table() {
        let t = ConfigTable::generate(1, 3).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(0), &[0, 0, 0]);
        assert!(t.occupies(0, 0));
    }
}
