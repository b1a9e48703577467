//! Piecewise-linear sample tables for measured property data.

use crate::error::{MatterError, MatterResult};

/// A monotonic-in-temperature sample table with piecewise-linear lookup.
///
/// Below the first sample or above the last, `lookup` clamps to the
/// endpoint value instead of extrapolating.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolationTable {
    sample_t: Vec<f64>,
    sample_value: Vec<f64>,
}

impl InterpolationTable {
    /// Create a table from strictly increasing temperatures and their values.
    ///
    /// Fails with `InvalidTable` if the lengths differ, fewer than two
    /// samples are supplied, or `sample_t` is not strictly increasing.
    pub fn new(sample_t: Vec<f64>, sample_value: Vec<f64>) -> MatterResult<Self> {
        if sample_t.len() != sample_value.len() {
            return Err(MatterError::InvalidTable {
                what: "sample_t and sample_value lengths differ",
            });
        }
        if sample_t.len() < 2 {
            return Err(MatterError::InvalidTable {
                what: "at least two samples required",
            });
        }
        if sample_t.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(MatterError::InvalidTable {
                what: "sample_t must be strictly increasing",
            });
        }
        Ok(Self {
            sample_t,
            sample_value,
        })
    }

    /// Create a table from `(T, value)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> MatterResult<Self> {
        let (sample_t, sample_value) = pairs.iter().copied().unzip();
        Self::new(sample_t, sample_value)
    }

    pub fn len(&self) -> usize {
        self.sample_t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_t.is_empty()
    }

    /// Linear interpolation between the bracketing samples, clamped to the
    /// endpoint values outside the sampled interval.
    pub fn lookup(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        let n = self.sample_t.len();
        if t <= self.sample_t[0] {
            return self.sample_value[0];
        }
        if t >= self.sample_t[n - 1] {
            return self.sample_value[n - 1];
        }

        // First index with sample_t >= t; the guards above keep it in 1..n.
        let hi = self.sample_t.partition_point(|&s| s < t);
        let lo = hi - 1;
        let (t0, t1) = (self.sample_t[lo], self.sample_t[hi]);
        let (v0, v1) = (self.sample_value[lo], self.sample_value[hi]);
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> InterpolationTable {
        InterpolationTable::new(vec![100.0, 200.0, 400.0], vec![1.0, 3.0, 7.0]).unwrap()
    }

    #[test]
    fn exact_at_samples() {
        let t = table();
        assert_eq!(t.lookup(100.0), 1.0);
        assert_eq!(t.lookup(200.0), 3.0);
        assert_eq!(t.lookup(400.0), 7.0);
    }

    #[test]
    fn linear_between_samples() {
        let t = table();
        assert_eq!(t.lookup(150.0), 2.0);
        assert_eq!(t.lookup(300.0), 5.0);
    }

    #[test]
    fn clamps_outside_domain() {
        let t = table();
        assert_eq!(t.lookup(-1000.0), 1.0);
        assert_eq!(t.lookup(99.999), 1.0);
        assert_eq!(t.lookup(400.001), 7.0);
        assert_eq!(t.lookup(1e9), 7.0);
    }

    #[test]
    fn nan_passes_through() {
        assert!(table().lookup(f64::NAN).is_nan());
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = InterpolationTable::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, MatterError::InvalidTable { .. }));
    }

    #[test]
    fn rejects_single_sample() {
        let err = InterpolationTable::new(vec![1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, MatterError::InvalidTable { .. }));
    }

    #[test]
    fn rejects_non_increasing() {
        assert!(InterpolationTable::new(vec![1.0, 1.0], vec![0.0, 0.0]).is_err());
        assert!(InterpolationTable::new(vec![2.0, 1.0], vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn monotone_data_gives_monotone_lookup() {
        let t = InterpolationTable::new(
            vec![100.0, 200.0, 400.0, 800.0],
            vec![1.0, 1.0, 2.5, 10.0],
        )
        .unwrap();
        let mut last = f64::NEG_INFINITY;
        let mut probe = 50.0;
        while probe <= 900.0 {
            let v = t.lookup(probe);
            assert!(v >= last);
            last = v;
            probe += 12.5;
        }
    }

    #[test]
    fn from_pairs_roundtrip() {
        let t = InterpolationTable::from_pairs(&[(0.0, 10.0), (1.0, 20.0)]).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.lookup(0.5), 15.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn increasing_table() -> impl Strategy<Value = InterpolationTable> {
        prop::collection::vec((1e-3_f64..10.0, -100.0_f64..100.0), 2..20).prop_map(|pairs| {
            // Build strictly increasing temperatures from positive gaps.
            let mut t_acc = 0.0;
            let (ts, vs): (Vec<f64>, Vec<f64>) = pairs
                .into_iter()
                .map(|(gap, v)| {
                    t_acc += gap;
                    (t_acc, v)
                })
                .unzip();
            InterpolationTable::new(ts, vs).unwrap()
        })
    }

    proptest! {
        #[test]
        fn lookup_bounded_by_sample_values(table in increasing_table(), t in -10.0_f64..300.0) {
            let lo = table.sample_value.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = table.sample_value.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let v = table.lookup(t);
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }

        #[test]
        fn lookup_exact_at_every_sample(table in increasing_table()) {
            for (t, v) in table.sample_t.iter().zip(table.sample_value.iter()) {
                prop_assert!((table.lookup(*t) - v).abs() < 1e-12);
            }
        }
    }
}
