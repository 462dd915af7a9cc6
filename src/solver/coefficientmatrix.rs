use std::fmt;
use std::str::FromStr;

use crate::kernelexperienceerror::KernelExperienceError;
use crate::solver::lagtable::LagTable;

/// Storage strategy for the lower-triangular coefficient matrix K_ij = K((i-j)·dt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoefficientStrategy {
    /// Packed up to `PACKED_LIMIT` points, reversed above.
    #[default]
    Auto,

    /// Dense lower triangle, row-major, n(n+1)/2 values.
    /// Row i is stored contiguously as [K(i·dt), K((i-1)·dt), …, K(0)].
    Packed,

    /// A single reversed copy of the lag table, n values.
    /// Row i is the contiguous suffix of length i+1, the same sequence as
    /// the packed row.
    Reversed,
}

/// Largest grid for which `Auto` materializes the packed triangle (~64 MiB).
pub const PACKED_LIMIT: usize = 4096;

impl CoefficientStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoefficientStrategy::Auto => "auto",
            CoefficientStrategy::Packed => "packed",
            CoefficientStrategy::Reversed => "reversed",
        }
    }

    pub fn resolve(&self, n_points: usize) -> CoefficientStrategy {
        match self {
            CoefficientStrategy::Auto => {
                if n_points <= PACKED_LIMIT {
                    CoefficientStrategy::Packed
                } else {
                    CoefficientStrategy::Reversed
                }
            }
            other => *other,
        }
    }
}

impl fmt::Display for CoefficientStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoefficientStrategy {
    type Err = KernelExperienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(CoefficientStrategy::Auto),
            "packed" => Ok(CoefficientStrategy::Packed),
            "reversed" => Ok(CoefficientStrategy::Reversed),
            _ => Err(KernelExperienceError::invalid_argument(format!(
                "coefficient_strategy must be 'auto', 'packed' or 'reversed', got '{}'",
                s
            ))),
        }
    }
}

enum CoefficientStorage {
    Packed(Vec<f64>),
    Reversed(Vec<f64>),
}

/// Row access to K_ij for 0 ≤ j ≤ i; the upper triangle does not exist.
///
/// 兩種 storage 的 row 都是 unit-stride 的 `&[f64]`，內層迴圈可直接
/// auto-vectorize；且 `row(i)[j] == lag_table[i - j]` 完全相等。
pub struct CoefficientMatrix {
    n: usize,
    storage: CoefficientStorage,
}

impl CoefficientMatrix {
    pub fn new(lag_table: &LagTable, strategy: CoefficientStrategy) -> CoefficientMatrix {
        let lags = lag_table.values();
        let n = lags.len();
        let storage = match strategy.resolve(n) {
            CoefficientStrategy::Reversed => {
                CoefficientStorage::Reversed(lags.iter().rev().copied().collect())
            }
            _ => {
                let mut packed = Vec::with_capacity(n * (n + 1) / 2);
                for i in 0..n {
                    packed.extend(lags[..=i].iter().rev());
                }
                CoefficientStorage::Packed(packed)
            }
        };
        CoefficientMatrix { n, storage }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn strategy(&self) -> CoefficientStrategy {
        match self.storage {
            CoefficientStorage::Packed(_) => CoefficientStrategy::Packed,
            CoefficientStorage::Reversed(_) => CoefficientStrategy::Reversed,
        }
    }

    /// Row i: `[K_i0, K_i1, …, K_ii]`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        match &self.storage {
            CoefficientStorage::Packed(values) => {
                let start = i * (i + 1) / 2;
                &values[start..start + i + 1]
            }
            CoefficientStorage::Reversed(values) => &values[self.n - 1 - i..],
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.row(i)[j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::kernelevaluator::ScalarKernel;
    use crate::math::timegrid::TimeGrid;

    fn lag_table(n: usize) -> LagTable {
        let grid = TimeGrid::new((n - 1) as f64, n).unwrap();
        LagTable::build(&ScalarKernel::new(|t| 1.0 + t * t), &grid).unwrap()
    }

    #[test]
    fn auto_resolves_by_size() {
        assert_eq!(CoefficientStrategy::Auto.resolve(10), CoefficientStrategy::Packed);
        assert_eq!(CoefficientStrategy::Auto.resolve(PACKED_LIMIT + 1), CoefficientStrategy::Reversed);
        assert_eq!(CoefficientStrategy::Reversed.resolve(10), CoefficientStrategy::Reversed);
    }

    #[test]
    fn parses_strategy_tags() {
        for strategy in [CoefficientStrategy::Auto, CoefficientStrategy::Packed, CoefficientStrategy::Reversed] {
            assert_eq!(strategy.to_string().parse::<CoefficientStrategy>().unwrap(), strategy);
        }
        assert!(matches!(
            "dense".parse::<CoefficientStrategy>(),
            Err(KernelExperienceError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn rows_index_lag_table_by_difference() {
        let table = lag_table(9);
        for strategy in [CoefficientStrategy::Packed, CoefficientStrategy::Reversed] {
            let matrix = CoefficientMatrix::new(&table, strategy);
            assert_eq!(matrix.strategy(), strategy);
            for i in 0..9 {
                let row = matrix.row(i);
                assert_eq!(row.len(), i + 1);
                for j in 0..=i {
                    assert_eq!(row[j], table.get(i - j));
                }
            }
        }
    }

    #[test]
    fn packed_and_reversed_agree_exactly() {
        let table = lag_table(17);
        let packed = CoefficientMatrix::new(&table, CoefficientStrategy::Packed);
        let reversed = CoefficientMatrix::new(&table, CoefficientStrategy::Reversed);
        for i in 0..17 {
            assert_eq!(packed.row(i), reversed.row(i));
        }
    }

    #[test]
    fn last_row_ends_with_zero_lag() {
        let table = lag_table(5);
        let matrix = CoefficientMatrix::new(&table, CoefficientStrategy::Auto);
        assert_eq!(matrix.get(4, 4), table.get(0));
        assert_eq!(matrix.get(4, 0), table.get(4));
    }
}
