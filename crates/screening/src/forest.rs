//! Isolation forest - default classifier implementation
//!
//! Anomalous points are easier to isolate with random axis-aligned
//! splits, so they end up with shorter average path lengths across a
//! forest of random trees. Scores follow the standard normalization
//! `2^(-E[h(x)] / c(n))`; the contamination fraction decides how many of
//! the highest-scoring points count as anomalous.
//!
//! The RNG is seeded explicitly so that repeated evaluations over the
//! same history produce the same verdict.

use crate::classifier::{Classifier, Label};
use crate::config::ScreeningConfig;
use crate::feature::FeatureVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// Average unsuccessful-search path length in a binary search tree of
/// `n` points; normalizes raw path lengths into comparable scores.
fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * ((n - 1.0).ln() + EULER_MASCHERONI) - 2.0 * (n - 1.0) / n
}

enum Node {
    Leaf {
        size: usize,
    },
    Split {
        dim: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn build(points: &[[f64; 3]], depth: usize, max_depth: usize, rng: &mut StdRng) -> Node {
        if points.len() <= 1 || depth >= max_depth {
            return Node::Leaf {
                size: points.len(),
            };
        }

        // Only dimensions with spread can be split on.
        let splittable: Vec<usize> = (0..3)
            .filter(|&dim| {
                let (min, max) = bounds(points, dim);
                max > min
            })
            .collect();
        if splittable.is_empty() {
            return Node::Leaf {
                size: points.len(),
            };
        }

        let dim = splittable[rng.gen_range(0..splittable.len())];
        let (min, max) = bounds(points, dim);
        let value = rng.gen_range(min..max);

        let (left, right): (Vec<[f64; 3]>, Vec<[f64; 3]>) =
            points.iter().partition(|p| p[dim] < value);

        Node::Split {
            dim,
            value,
            left: Box::new(Node::build(&left, depth + 1, max_depth, rng)),
            right: Box::new(Node::build(&right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, point: &[f64; 3], depth: usize) -> f64 {
        match self {
            Node::Leaf { size } => depth as f64 + average_path_length(*size),
            Node::Split {
                dim,
                value,
                left,
                right,
            } => {
                if point[*dim] < *value {
                    left.path_length(point, depth + 1)
                } else {
                    right.path_length(point, depth + 1)
                }
            }
        }
    }
}

fn bounds(points: &[[f64; 3]], dim: usize) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points {
        min = min.min(p[dim]);
        max = max.max(p[dim]);
    }
    (min, max)
}

/// Isolation forest over payment feature vectors.
///
/// Trained from scratch on every call, per the gate's statelessness
/// contract.
pub struct IsolationForest {
    tree_count: usize,
    sample_size: usize,
    contamination: f64,
    seed: u64,
}

impl IsolationForest {
    pub fn new(tree_count: usize, sample_size: usize, contamination: f64, seed: u64) -> Self {
        Self {
            tree_count,
            sample_size,
            contamination,
            seed,
        }
    }

    pub fn from_config(config: &ScreeningConfig) -> Self {
        Self::new(
            config.tree_count,
            config.sample_size,
            config.contamination,
            config.seed,
        )
    }

    /// Anomaly scores in [0, 1] for every sample, higher = more isolated
    fn scores(&self, points: &[[f64; 3]]) -> Vec<f64> {
        let n = points.len();
        let sample_size = self.sample_size.min(n).max(2);
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut trees = Vec::with_capacity(self.tree_count);
        for _ in 0..self.tree_count {
            let subsample: Vec<[f64; 3]> =
                rand::seq::index::sample(&mut rng, n, sample_size)
                    .into_iter()
                    .map(|i| points[i])
                    .collect();
            trees.push(Node::build(&subsample, 0, max_depth, &mut rng));
        }

        let normalizer = average_path_length(sample_size);
        points
            .iter()
            .map(|point| {
                let avg_path: f64 = trees
                    .iter()
                    .map(|tree| tree.path_length(point, 0))
                    .sum::<f64>()
                    / trees.len() as f64;
                2f64.powf(-avg_path / normalizer)
            })
            .collect()
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::from_config(&ScreeningConfig::default())
    }
}

impl Classifier for IsolationForest {
    fn name(&self) -> &str {
        "IsolationForest"
    }

    fn label_newest(&self, samples: &[FeatureVector]) -> Label {
        if samples.len() < 2 {
            return Label::Normal;
        }
        let points: Vec<[f64; 3]> = samples.iter().map(FeatureVector::as_array).collect();
        let scores = self.scores(&points);

        let spread = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - scores.iter().cloned().fold(f64::INFINITY, f64::min);
        if spread < 1e-9 {
            // Nothing stands out in a uniform sample.
            return Label::Normal;
        }

        // The contamination fraction of highest scores is anomalous.
        // Clamped so a misconfigured contamination > 1.0 flags at most
        // every sample instead of indexing past the end.
        let cutoff_rank =
            ((self.contamination * scores.len() as f64).floor() as usize).clamp(1, scores.len());
        let mut ranked = scores.clone();
        ranked.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let threshold = ranked[cutoff_rank - 1];

        let newest = scores[scores.len() - 1];
        if newest >= threshold {
            Label::Anomalous
        } else {
            Label::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(amount: f64, balance: f64, ratio: f64) -> FeatureVector {
        FeatureVector {
            amount,
            prior_balance: balance,
            budget_ratio: ratio,
        }
    }

    fn typical_history() -> Vec<FeatureVector> {
        (0..12)
            .map(|i| {
                let amount = 100.0 + (i % 4) as f64 * 5.0;
                fv(amount, 1000.0 - amount, amount / 10_000.0)
            })
            .collect()
    }

    #[test]
    fn test_extreme_newest_is_anomalous() {
        let mut samples = typical_history();
        samples.push(fv(5000.0, 1000.0, 0.5));

        let forest = IsolationForest::default();
        assert_eq!(forest.label_newest(&samples), Label::Anomalous);
    }

    #[test]
    fn test_typical_newest_is_normal() {
        let mut samples = typical_history();
        // One historical outlier absorbs the contamination budget.
        samples.insert(0, fv(5000.0, 1000.0, 0.5));
        samples.push(fv(105.0, 895.0, 0.0105));

        let forest = IsolationForest::default();
        assert_eq!(forest.label_newest(&samples), Label::Normal);
    }

    #[test]
    fn test_uniform_samples_are_normal() {
        let samples = vec![fv(100.0, 500.0, 0.01); 10];
        let forest = IsolationForest::default();
        assert_eq!(forest.label_newest(&samples), Label::Normal);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let mut samples = typical_history();
        samples.push(fv(5000.0, 1000.0, 0.5));

        let forest = IsolationForest::default();
        let first = forest.label_newest(&samples);
        let second = forest.label_newest(&samples);
        assert_eq!(first, second);
    }

    #[test]
    fn test_contamination_above_one_flags_everything() {
        // Config files are not validated, so an out-of-range
        // contamination must degrade to "everything is anomalous"
        // rather than indexing out of bounds.
        let mut samples = typical_history();
        samples.push(fv(5000.0, 1000.0, 0.5));

        let forest = IsolationForest::new(10, 16, 1.5, 42);
        assert_eq!(forest.label_newest(&samples), Label::Anomalous);

        let typical = typical_history();
        assert_eq!(
            IsolationForest::new(10, 16, 1.5, 42).label_newest(&typical),
            Label::Anomalous
        );
    }

    #[test]
    fn test_too_few_samples_is_normal() {
        let forest = IsolationForest::default();
        assert_eq!(forest.label_newest(&[]), Label::Normal);
        assert_eq!(forest.label_newest(&[fv(1e9, 0.0, 1.0)]), Label::Normal);
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        // c(2) = 2*(ln(1) + gamma) - 2*1/2 = 2*gamma - 1
        let c2 = average_path_length(2);
        assert!((c2 - (2.0 * EULER_MASCHERONI - 1.0)).abs() < 1e-12);
        assert!(average_path_length(100) > average_path_length(10));
    }
}
