//! Recombination tables.
//!
//! For every offspring genotype `k` a [`RecombinationTable`] stores the
//! sparse surface `P(k | mom, dad)`. Tables depend only on the locus count
//! and the [`RecombinationMap`], are built once, and are read-only afterwards
//! so they can be shared between trials.
//!
//! ## Gamete formation as a two-state chain
//!
//! A gamete is formed by walking the loci left to right while copying from
//! one parent at a time. The parent being copied is a hidden state
//! `s ∈ {mom, dad}` with `P(s_1) = 1/2`; between locus `i` and `i + 1` the
//! copier switches with probability `r_i`. State `s` is only admissible at
//! locus `i` if the offspring carries parent `s`'s allele there, so the
//! forward recursion
//!
//! ```text
//! α_1(s)     = ½ · compat(s, 1)
//! α_{i+1}(s) = compat(s, i+1) · Σ_{s'} α_i(s') · trans(s' → s)
//! P(k | mom, dad) = Σ_s α_L(s)
//! ```
//!
//! handles identical parents, impossible offspring and every crossover
//! pattern uniformly. A triple is structurally zero when some locus carries
//! an allele neither parent has; those triples are never visited.

use crate::base::genotype::is_set;
use crate::base::{DenseMatrix, Genotype, GenotypeSpace, MAX_LOCI, SparseMatrix};
use crate::errors::SimError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Largest locus count accepted by [`RecombinationTable::by_mask_enumeration`],
/// which materializes a dense `N^3` tensor.
pub const MAX_ENUMERATION_LOCI: usize = 8;

/// Default cap on the stored entries of one table (`N * 3^L` for a map with
/// no zero or one fractions). Ten loci fit; eleven do not.
pub const MAX_TABLE_ENTRIES: usize = 1 << 26;

/// Recombination fractions `r_1 .. r_{L-1}` between adjacent loci.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct RecombinationMap {
    fractions: Vec<f64>,
}

impl RecombinationMap {
    /// Create a map from per-junction recombination fractions.
    ///
    /// # Errors
    /// - [`SimError::InvalidParameter`] for more than `MAX_LOCI - 1` fractions
    /// - [`SimError::InvalidRecombinationFraction`] for the first fraction
    ///   that is NaN or outside [0, 1]
    pub fn new(fractions: Vec<f64>) -> Result<Self, SimError> {
        if fractions.len() >= MAX_LOCI {
            return Err(SimError::InvalidParameter(format!(
                "a map spans at most {MAX_LOCI} loci, got {}",
                fractions.len() + 1
            )));
        }
        if let Some((junction, value)) = fractions
            .iter()
            .enumerate()
            .find(|(_, r)| !(0.0..=1.0).contains(*r))
        {
            return Err(SimError::InvalidRecombinationFraction {
                junction,
                value: *value,
            });
        }
        Ok(Self { fractions })
    }

    /// Same fraction `r` at every junction of an `L`-locus map.
    pub fn uniform(loci: usize, r: f64) -> Result<Self, SimError> {
        if loci == 0 {
            return Err(SimError::InvalidParameter("a map needs at least one locus".into()));
        }
        Self::new(vec![r; loci - 1])
    }

    /// Number of loci the map spans (`fractions + 1`).
    #[inline]
    pub fn loci(&self) -> usize {
        self.fractions.len() + 1
    }

    #[inline]
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Fraction between locus `junction` and `junction + 1`.
    pub fn get(&self, junction: usize) -> Option<f64> {
        self.fractions.get(junction).copied()
    }
}

impl TryFrom<Vec<f64>> for RecombinationMap {
    type Error = SimError;

    fn try_from(fractions: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(fractions)
    }
}

impl From<RecombinationMap> for Vec<f64> {
    fn from(map: RecombinationMap) -> Self {
        map.fractions
    }
}

/// `P(target | mom, dad)` for a single gamete-formation event.
///
/// `map.loci()` defines `L`; genotype bits at or above `L` are ignored.
/// Identical parents transmit their genotype unchanged with probability
/// exactly one.
pub fn offspring_probability(
    target: Genotype,
    mom: Genotype,
    dad: Genotype,
    map: &RecombinationMap,
) -> f64 {
    let loci = map.loci();
    let mask = (1usize << loci) - 1;
    let (target, mom, dad) = (target & mask, mom & mask, dad & mask);

    if mom == dad {
        return if target == mom { 1.0 } else { 0.0 };
    }
    if (target ^ mom) & (target ^ dad) != 0 {
        return 0.0;
    }

    let compat = |parent: Genotype, locus: usize| -> f64 {
        if is_set(target, locus) == is_set(parent, locus) {
            1.0
        } else {
            0.0
        }
    };

    let mut alpha_mom = 0.5 * compat(mom, 0);
    let mut alpha_dad = 0.5 * compat(dad, 0);
    for (junction, &r) in map.fractions().iter().enumerate() {
        let locus = junction + 1;
        let stay = 1.0 - r;
        let next_mom = compat(mom, locus) * (alpha_mom * stay + alpha_dad * r);
        let next_dad = compat(dad, locus) * (alpha_dad * stay + alpha_mom * r);
        alpha_mom = next_mom;
        alpha_dad = next_dad;
        if alpha_mom == 0.0 && alpha_dad == 0.0 {
            return 0.0;
        }
    }
    (alpha_mom + alpha_dad).min(1.0)
}

/// Offspring-by-parents probability table for one `(L, map)` pair.
///
/// Invariants:
/// - for every `(mom, dad)`, `Σ_k table[k].get(mom, dad) = 1`;
/// - `table[k].get(mom, dad) == table[k].get(dad, mom)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct RecombinationTable {
    map: RecombinationMap,
    matrices: Vec<SparseMatrix>,
    #[serde(skip_serializing)]
    space: GenotypeSpace,
}

/// Serialized layout of a [`RecombinationTable`]; validated on the way in.
#[derive(Deserialize)]
struct TableParts {
    map: RecombinationMap,
    matrices: Vec<SparseMatrix>,
}

impl TryFrom<TableParts> for RecombinationTable {
    type Error = SimError;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.map, parts.matrices)
    }
}

impl RecombinationTable {
    /// Build the table for `loci` loci and the given fractions.
    ///
    /// This is the entry point drivers use; see [`RecombinationTableBuilder`]
    /// for options.
    ///
    /// # Errors
    /// - [`SimError::InvalidRecombinationFraction`] for a fraction outside [0, 1]
    /// - [`SimError::LengthMismatch`] unless `fractions.len() == loci - 1`
    /// - [`SimError::AllocationFailure`] if storage cannot be reserved
    pub fn build(loci: usize, fractions: &[f64]) -> Result<Self, SimError> {
        let map = RecombinationMap::new(fractions.to_vec())?;
        RecombinationTableBuilder::new(loci, map)?.build()
    }

    /// Reassemble a table from its map and per-offspring matrices, checking
    /// dimensions and entry bounds. Probability conservation is not
    /// re-verified here; see [`Self::conservation_error`].
    pub fn from_parts(
        map: RecombinationMap,
        matrices: Vec<SparseMatrix>,
    ) -> Result<Self, SimError> {
        let space = GenotypeSpace::new(map.loci())?;
        if matrices.len() != space.size() {
            return Err(SimError::LengthMismatch {
                expected: space.size(),
                actual: matrices.len(),
            });
        }
        for matrix in &matrices {
            if matrix.dim() != space.size() {
                return Err(SimError::LengthMismatch {
                    expected: space.size(),
                    actual: matrix.dim(),
                });
            }
            matrix.validate()?;
        }
        Ok(Self {
            map,
            matrices,
            space,
        })
    }

    /// Reference construction by enumerating crossover masks.
    ///
    /// Every mask `m` over the loci selects which parent each locus is copied
    /// from; its probability is half the product of stay/switch factors along
    /// the junctions. Cost is `O(N^3 L)` with a dense intermediate, so this is
    /// limited to [`MAX_ENUMERATION_LOCI`] and intended for cross-checking.
    pub fn by_mask_enumeration(map: &RecombinationMap) -> Result<Self, SimError> {
        let loci = map.loci();
        if loci > MAX_ENUMERATION_LOCI {
            return Err(SimError::InvalidParameter(format!(
                "mask enumeration is limited to {MAX_ENUMERATION_LOCI} loci, got {loci}"
            )));
        }
        let space = GenotypeSpace::new(loci)?;
        let n = space.size();

        let mask_probs: Vec<f64> = space
            .genotypes()
            .map(|mask| {
                0.5 * map
                    .fractions()
                    .iter()
                    .enumerate()
                    .map(|(i, r)| {
                        if is_set(mask, i) == is_set(mask, i + 1) {
                            1.0 - r
                        } else {
                            *r
                        }
                    })
                    .product::<f64>()
            })
            .collect();

        let mut dense = vec![DenseMatrix::zeros(n); n];
        for mom in space.genotypes() {
            for dad in space.genotypes() {
                for (mask, p) in mask_probs.iter().enumerate() {
                    let child = (mom & !mask) | (dad & mask);
                    let current = dense[child].get(mom, dad);
                    dense[child].set(mom, dad, current + p);
                }
            }
        }

        let matrices = dense
            .iter()
            .map(|m| {
                SparseMatrix::from_entries(
                    n,
                    (0..n).flat_map(|r| (0..n).map(move |c| (r, c, m.get(r, c).min(1.0)))),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_parts(map.clone(), matrices)
    }

    #[inline]
    pub fn space(&self) -> GenotypeSpace {
        self.space
    }

    #[inline]
    pub fn map(&self) -> &RecombinationMap {
        &self.map
    }

    /// Number of offspring genotypes (`N`).
    #[inline]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// The sparse surface for offspring genotype `k`.
    #[inline]
    pub fn get(&self, k: Genotype) -> Option<&SparseMatrix> {
        self.matrices.get(k)
    }

    /// `P(k | mom, dad)`, zero for any index outside the space.
    pub fn probability(&self, k: Genotype, mom: Genotype, dad: Genotype) -> f64 {
        self.matrices
            .get(k)
            .map(|m| m.get(mom, dad))
            .unwrap_or(0.0)
    }

    /// Offspring distribution of one parent pair.
    pub fn offspring_distribution(&self, mom: Genotype, dad: Genotype) -> Vec<f64> {
        self.matrices.iter().map(|m| m.get(mom, dad)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SparseMatrix> {
        self.matrices.iter()
    }

    pub(crate) fn matrices(&self) -> &[SparseMatrix] {
        &self.matrices
    }

    /// Total stored entries across all offspring genotypes.
    pub fn nnz(&self) -> usize {
        self.matrices.iter().map(SparseMatrix::nnz).sum()
    }

    /// Largest `|Σ_k P(k | mom, dad) - 1|` over all parent pairs.
    pub fn conservation_error(&self) -> f64 {
        let n = self.space.size();
        let mut sums = vec![0.0; n * n];
        for matrix in &self.matrices {
            for e in matrix.iter() {
                sums[e.row as usize * n + e.col as usize] += e.value;
            }
        }
        sums.iter().map(|s| (s - 1.0).abs()).fold(0.0, f64::max)
    }

    /// Largest `|P(k | mom, dad) - P(k | dad, mom)|` over all triples.
    pub fn symmetry_error(&self) -> f64 {
        self.matrices
            .iter()
            .flat_map(|m| {
                m.iter()
                    .map(move |e| (e.value - m.get(e.col as usize, e.row as usize)).abs())
            })
            .fold(0.0, f64::max)
    }
}

/// Builds a [`RecombinationTable`] with the forward recursion.
///
/// ```
/// use hapdyn_sim::evolution::{RecombinationMap, RecombinationTableBuilder};
///
/// let map = RecombinationMap::uniform(2, 0.25).unwrap();
/// let table = RecombinationTableBuilder::new(2, map).unwrap().build().unwrap();
///
/// // A recombinant from parents 00 and 11.
/// assert!((table.probability(0b01, 0b00, 0b11) - 0.125).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct RecombinationTableBuilder {
    space: GenotypeSpace,
    map: RecombinationMap,
    parallel: bool,
    max_entries: usize,
}

impl RecombinationTableBuilder {
    /// Prepare a builder for `loci` loci.
    ///
    /// # Errors
    /// Returns [`SimError::LengthMismatch`] unless the map spans exactly
    /// `loci` loci, and [`SimError::InvalidParameter`] for an unsupported
    /// locus count.
    pub fn new(loci: usize, map: RecombinationMap) -> Result<Self, SimError> {
        let space = GenotypeSpace::new(loci)?;
        if map.fractions().len() != loci - 1 {
            return Err(SimError::LengthMismatch {
                expected: loci - 1,
                actual: map.fractions().len(),
            });
        }
        Ok(Self {
            space,
            map,
            parallel: true,
            max_entries: MAX_TABLE_ENTRIES,
        })
    }

    /// Compute offspring genotypes on the rayon pool (default) or inline.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Refuse tables that may hold more than `max_entries` entries
    /// (default [`MAX_TABLE_ENTRIES`]).
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Upper bound on stored entries, `N * 3^L`, or `None` on overflow.
    pub fn entry_bound(&self) -> Option<usize> {
        3usize
            .checked_pow(self.space.loci() as u32)?
            .checked_mul(self.space.size())
    }

    /// Build the table. Either the whole table is returned or an error; a
    /// partially built table is never exposed.
    pub fn build(self) -> Result<RecombinationTable, SimError> {
        let _span = tracing::info_span!("recombination_table", loci = self.space.loci()).entered();
        let started = Instant::now();
        let n = self.space.size();

        let bound = self.entry_bound();
        match bound {
            Some(entries) if entries <= self.max_entries => {}
            _ => {
                return Err(SimError::AllocationFailure(format!(
                    "a {}-locus table needs up to {} entries, limit is {}",
                    self.space.loci(),
                    bound.map_or_else(|| "usize::MAX+".to_string(), |e| e.to_string()),
                    self.max_entries
                )));
            }
        }

        let matrices: Vec<SparseMatrix> = if self.parallel {
            (0..n)
                .into_par_iter()
                .map(|k| self.build_offspring(k))
                .collect::<Result<_, _>>()?
        } else {
            (0..n)
                .map(|k| self.build_offspring(k))
                .collect::<Result<_, _>>()?
        };

        let table = RecombinationTable {
            map: self.map,
            matrices,
            space: self.space,
        };
        tracing::debug!(
            loci = table.space.loci(),
            genotypes = n,
            entries = table.nnz(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built recombination table"
        );
        Ok(table)
    }

    /// The sparse surface for one offspring genotype.
    ///
    /// Only parent pairs that supply the offspring's allele at every locus
    /// are visited: with `a = k ^ mom` and `b = k ^ dad`, that is `a & b == 0`.
    /// There are `3^L` such ordered pairs, each unordered pair is evaluated
    /// once and mirrored.
    fn build_offspring(&self, target: Genotype) -> Result<SparseMatrix, SimError> {
        let full = self.space.full_mask();
        let capacity = 3usize.pow(self.space.loci() as u32);
        let mut matrix = SparseMatrix::with_capacity(self.space.size(), capacity)?;

        for a in 0..=full {
            let mom = target ^ a;
            let free = full & !a;
            let mut b = free;
            loop {
                let dad = target ^ b;
                if mom <= dad {
                    let p = offspring_probability(target, mom, dad, &self.map);
                    if p > 0.0 {
                        matrix.push_unsorted(mom, dad, p)?;
                        if mom != dad {
                            matrix.push_unsorted(dad, mom, p)?;
                        }
                    }
                }
                if b == 0 {
                    break;
                }
                b = (b - 1) & free;
            }
        }

        matrix.seal()?;
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(fractions: &[f64]) -> RecombinationMap {
        RecombinationMap::new(fractions.to_vec()).unwrap()
    }

    #[test]
    fn test_map_validation() {
        assert!(RecombinationMap::new(vec![0.0, 0.5, 1.0]).is_ok());
        assert_eq!(
            RecombinationMap::new(vec![0.1, 1.5]),
            Err(SimError::InvalidRecombinationFraction {
                junction: 1,
                value: 1.5
            })
        );
        assert!(RecombinationMap::new(vec![f64::NAN]).is_err());
        assert!(RecombinationMap::new(vec![-0.01]).is_err());
        assert_eq!(RecombinationMap::uniform(4, 0.1).unwrap().loci(), 4);
        assert!(RecombinationMap::uniform(0, 0.1).is_err());
    }

    #[test]
    fn test_map_length_is_capped() {
        assert!(matches!(
            RecombinationMap::new(vec![0.1; 64]),
            Err(SimError::InvalidParameter(_))
        ));
        assert!(RecombinationMap::new(vec![0.1; MAX_LOCI]).is_err());
        assert!(RecombinationMap::uniform(MAX_LOCI + 1, 0.1).is_err());

        let widest = RecombinationMap::new(vec![0.1; MAX_LOCI - 1]).unwrap();
        assert_eq!(widest.loci(), MAX_LOCI);
        assert!((offspring_probability(0, 0, 1, &widest) - 0.5).abs() < 1e-12);
        assert_eq!(offspring_probability(1, 0, 0, &widest), 0.0);
        assert!((offspring_probability(0, 0, 0, &widest) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_probability_two_locus_closed_form() {
        let r = 0.3;
        let m = map(&[r]);
        // Coupling parents 00 x 11: parental types (1 - r)/2, recombinants r/2.
        assert!((offspring_probability(0b00, 0b00, 0b11, &m) - (1.0 - r) / 2.0).abs() < 1e-12);
        assert!((offspring_probability(0b11, 0b00, 0b11, &m) - (1.0 - r) / 2.0).abs() < 1e-12);
        assert!((offspring_probability(0b01, 0b00, 0b11, &m) - r / 2.0).abs() < 1e-12);
        assert!((offspring_probability(0b10, 0b00, 0b11, &m) - r / 2.0).abs() < 1e-12);
        // Parents sharing locus 0 segregate only at locus 1.
        assert_eq!(offspring_probability(0b01, 0b01, 0b11, &m), 0.5);
        assert_eq!(offspring_probability(0b00, 0b01, 0b11, &m), 0.0);
    }

    #[test]
    fn test_identical_parents() {
        let m = map(&[0.5, 0.5, 0.5]);
        assert_eq!(offspring_probability(0b1010, 0b1010, 0b1010, &m), 1.0);
        assert_eq!(offspring_probability(0b1011, 0b1010, 0b1010, &m), 0.0);
    }

    #[test]
    fn test_single_locus() {
        let table = RecombinationTable::build(1, &[]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.probability(0, 0, 1), 0.5);
        assert_eq!(table.probability(1, 0, 1), 0.5);
        assert_eq!(table.probability(1, 1, 1), 1.0);
    }

    #[test]
    fn test_build_rejects_bad_input() {
        assert!(matches!(
            RecombinationTable::build(3, &[0.1]),
            Err(SimError::LengthMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            RecombinationTable::build(2, &[2.0]),
            Err(SimError::InvalidRecombinationFraction { junction: 0, .. })
        ));
        assert!(RecombinationTable::build(0, &[]).is_err());
    }

    #[test]
    fn test_entry_budget() {
        let builder = RecombinationTableBuilder::new(3, map(&[0.1, 0.2])).unwrap();
        assert_eq!(builder.entry_bound(), Some(8 * 27));
        assert!(matches!(
            builder.max_entries(8 * 27 - 1).build(),
            Err(SimError::AllocationFailure(_))
        ));

        let exact = RecombinationTableBuilder::new(3, map(&[0.1, 0.2]))
            .unwrap()
            .max_entries(8 * 27)
            .build()
            .unwrap();
        assert!(exact.conservation_error() < 1e-12);

        let wide_map = RecombinationMap::uniform(MAX_LOCI, 0.1).unwrap();
        let wide = RecombinationTableBuilder::new(MAX_LOCI, wide_map).unwrap();
        assert!(wide.entry_bound().unwrap() > MAX_TABLE_ENTRIES);
        assert!(matches!(wide.build(), Err(SimError::AllocationFailure(_))));
        assert!(matches!(
            RecombinationTable::build(11, &[0.1; 10]),
            Err(SimError::AllocationFailure(_))
        ));
    }

    #[test]
    fn test_conservation_and_symmetry() {
        let table = RecombinationTable::build(4, &[0.1, 0.35, 0.0]).unwrap();
        assert!(table.conservation_error() < 1e-12);
        assert_eq!(table.symmetry_error(), 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let m = map(&[0.05, 0.4, 0.25]);
        let par = RecombinationTableBuilder::new(4, m.clone()).unwrap().build().unwrap();
        let seq = RecombinationTableBuilder::new(4, m)
            .unwrap()
            .parallel(false)
            .build()
            .unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_skips_structural_zeros() {
        // Offspring 0b11 cannot come from 0b00 x 0b01: locus 1 allele is missing.
        let table = RecombinationTable::build(2, &[0.5]).unwrap();
        assert_eq!(table.probability(0b11, 0b00, 0b01), 0.0);
        // Every offspring surface holds exactly the 3^L compatible ordered pairs
        // when no fraction is zero.
        for k in table.space().genotypes() {
            assert_eq!(table.get(k).unwrap().nnz(), 9);
        }
    }

    #[test]
    fn test_zero_fraction_prunes_entries() {
        let table = RecombinationTable::build(2, &[0.0]).unwrap();
        // Recombinant 01 from 00 x 11 needs a switch.
        assert_eq!(table.probability(0b01, 0b00, 0b11), 0.0);
        assert!(table.get(0b01).unwrap().nnz() < 9);
    }

    #[test]
    fn test_mask_enumeration_agrees() {
        let m = map(&[0.2, 0.45]);
        let forward = RecombinationTable::build(3, m.fractions()).unwrap();
        let masks = RecombinationTable::by_mask_enumeration(&m).unwrap();
        for k in forward.space().genotypes() {
            for mom in forward.space().genotypes() {
                for dad in forward.space().genotypes() {
                    let a = forward.probability(k, mom, dad);
                    let b = masks.probability(k, mom, dad);
                    assert!((a - b).abs() < 1e-12, "P({k}|{mom},{dad}): {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_mask_enumeration_limit() {
        let m = RecombinationMap::uniform(MAX_ENUMERATION_LOCI + 1, 0.1).unwrap();
        assert!(RecombinationTable::by_mask_enumeration(&m).is_err());
    }

    #[test]
    fn test_from_parts_validates() {
        let table = RecombinationTable::build(2, &[0.25]).unwrap();
        let map = table.map().clone();
        let mut matrices = table.matrices().to_vec();
        matrices.pop();
        assert!(RecombinationTable::from_parts(map.clone(), matrices).is_err());

        let wrong_dim = vec![SparseMatrix::new(8); 4];
        assert!(RecombinationTable::from_parts(map, wrong_dim).is_err());
    }

    #[test]
    fn test_bincode_round_trip_validates() {
        let table = RecombinationTable::build(3, &[0.1, 0.2]).unwrap();
        let bytes = bincode::serialize(&table).unwrap();
        let restored: RecombinationTable = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_offspring_distribution_sums_to_one() {
        let table = RecombinationTable::build(3, &[0.3, 0.1]).unwrap();
        let dist = table.offspring_distribution(0b010, 0b101);
        assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(dist.len(), 8);
    }
}
