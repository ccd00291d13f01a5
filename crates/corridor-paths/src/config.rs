//! Build-time tuning knobs for the planner.

/// Multiplier applied to every heuristic value (`1 + 2^-20`). Keeps the
/// landmark bound from tripping over floating-point round-off.
pub(crate) const HEURISTIC_SCALE: f64 = 1.000_000_953_674_316_4;

/// Tuning constants used while building a [`Planner`](crate::Planner).
///
/// The defaults suit grids from a few dozen up to a few thousand cells per
/// side; smaller values are mostly useful in tests, where they force the
/// partition tree to split on tiny maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Corner sets smaller than this become a leaf whose vertices are linked
    /// pairwise.
    pub leaf_cutoff: usize,
    /// Target number of visible vertices per bucket on a split line.
    pub bucket_size: usize,
    /// Number of landmarks selected per connected component.
    pub landmarks: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            leaf_cutoff: 64,
            bucket_size: 32,
            landmarks: 16,
        }
    }
}

impl PlannerConfig {
    /// Set the leaf cutoff.
    pub fn with_leaf_cutoff(mut self, leaf_cutoff: usize) -> Self {
        self.leaf_cutoff = leaf_cutoff;
        self
    }

    /// Set the bucket size (values below 1 are treated as 1).
    pub fn with_bucket_size(mut self, bucket_size: usize) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    /// Set the number of landmarks per component.
    pub fn with_landmarks(mut self, landmarks: usize) -> Self {
        self.landmarks = landmarks;
        self
    }

    #[inline]
    pub(crate) fn bucket_len(&self) -> usize {
        self.bucket_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = PlannerConfig::default();
        assert_eq!(c.leaf_cutoff, 64);
        assert_eq!(c.bucket_size, 32);
        assert_eq!(c.landmarks, 16);
    }

    #[test]
    fn builder_and_clamp() {
        let c = PlannerConfig::default()
            .with_leaf_cutoff(4)
            .with_bucket_size(0)
            .with_landmarks(2);
        assert_eq!(c.leaf_cutoff, 4);
        assert_eq!(c.bucket_len(), 1);
        assert_eq!(c.landmarks, 2);
    }

    #[test]
    fn heuristic_scale_is_one_plus_two_to_minus_twenty() {
        assert_eq!(HEURISTIC_SCALE, 1.0 + (-20f64).exp2());
    }
}
