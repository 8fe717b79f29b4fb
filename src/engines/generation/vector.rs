use crate::engines::generation::genes::{Gene, GENE_COUNT, GENE_TABLE};
use crate::error::{EvobiasError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Complexity thresholds for continuous genes (gene, value above which it counts)
const COMPLEXITY_THRESHOLDS: [(Gene, f64); 7] = [
    (Gene::ExitRsiEnable, 0.5),
    (Gene::ExitMomoEnable, 0.5),
    (Gene::ExitStallEnable, 0.5),
    (Gene::ExitMaEnable, 0.5),
    (Gene::StackThreshold, 0.7),
    (Gene::BrainThreshold, 0.8),
    (Gene::VolumeWeight, 1.5),
];

/// Performance figures cached on a vector by the fitness evaluator.
///
/// They are recomputed every generation and are never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorMetrics {
    pub fitness: f64,
    pub win_rate: f64,
    pub sharpe_ratio: f64,
    pub trade_count: usize,
    pub complexity: u32,
}

impl Default for VectorMetrics {
    fn default() -> Self {
        Self {
            fitness: 0.0,
            win_rate: 0.5,
            sharpe_ratio: 0.0,
            trade_count: 0,
            complexity: 0,
        }
    }
}

/// A fixed-length set of named strategy parameters.
///
/// Every gene stays inside the range declared in the gene table: writes are
/// clamped, so there is no way to hold an out-of-range value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VectorRecord")]
pub struct ParameterVector {
    genes: Vec<f64>,
    metrics: VectorMetrics,
}

#[derive(Deserialize)]
struct VectorRecord {
    genes: Vec<f64>,
    #[serde(default)]
    metrics: VectorMetrics,
}

impl TryFrom<VectorRecord> for ParameterVector {
    type Error = EvobiasError;

    fn try_from(record: VectorRecord) -> Result<Self> {
        let mut vector = ParameterVector::from_genes(record.genes)?;
        vector.metrics = record.metrics;
        Ok(vector)
    }
}

impl ParameterVector {
    /// Draw every gene uniformly inside its declared range
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let genes = GENE_TABLE
            .iter()
            .map(|spec| spec.min + rng.gen::<f64>() * (spec.max - spec.min))
            .collect();

        Self {
            genes,
            metrics: VectorMetrics::default(),
        }
    }

    /// Build a vector from raw gene values, clamping each one.
    ///
    /// A gene count other than [`GENE_COUNT`] is a configuration error.
    pub fn from_genes(genes: Vec<f64>) -> Result<Self> {
        if genes.len() != GENE_COUNT {
            return Err(EvobiasError::GeneCount {
                expected: GENE_COUNT,
                actual: genes.len(),
            });
        }

        let genes = genes
            .into_iter()
            .zip(GENE_TABLE.iter())
            .map(|(value, spec)| spec.clamp(value))
            .collect();

        Ok(Self {
            genes,
            metrics: VectorMetrics::default(),
        })
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<f64> {
        self.genes
            .get(index)
            .copied()
            .ok_or(EvobiasError::InvalidIndex { index, len: GENE_COUNT })
    }

    /// Write a gene, silently clamping the value into range
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let spec = GENE_TABLE
            .get(index)
            .ok_or(EvobiasError::InvalidIndex { index, len: GENE_COUNT })?;
        self.genes[index] = spec.clamp(value);
        Ok(())
    }

    pub fn gene(&self, gene: Gene) -> f64 {
        self.genes[gene.index()]
    }

    pub fn set_gene(&mut self, gene: Gene, value: f64) {
        self.genes[gene.index()] = gene.spec().clamp(value);
    }

    pub fn extract_named(&self, name: &str) -> Result<f64> {
        Gene::from_name(name).map(|gene| self.gene(gene))
    }

    /// Perturb each gene with probability `rate` by `U(-1, 1) * magnitude`.
    pub fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        for (value, spec) in self.genes.iter_mut().zip(GENE_TABLE.iter()) {
            if rng.gen::<f64>() < rate {
                let delta = rng.gen_range(-1.0..1.0);
                *value = spec.clamp(*value + delta * spec.class.magnitude());
            }
        }
    }

    /// Two-point crossover.
    ///
    /// Genes inside `[lo, hi)` come from `other`, the rest from `self`. The
    /// offspring starts with fresh metrics; neither parent is touched.
    pub fn crossover<R: Rng>(&self, other: &ParameterVector, rng: &mut R) -> ParameterVector {
        let mut lo = rng.gen_range(0..GENE_COUNT);
        let mut hi = rng.gen_range(0..GENE_COUNT);
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }

        let genes = (0..GENE_COUNT)
            .map(|i| {
                if i < lo || i >= hi {
                    self.genes[i]
                } else {
                    other.genes[i]
                }
            })
            .collect();

        ParameterVector {
            genes,
            metrics: VectorMetrics::default(),
        }
    }

    /// Number of active optional tactics plus extreme thresholds (Occam count)
    pub fn complexity(&self) -> u32 {
        COMPLEXITY_THRESHOLDS
            .iter()
            .filter(|(gene, threshold)| self.gene(*gene) > *threshold)
            .count() as u32
    }

    /// Euclidean distance across the raw gene space
    pub fn distance(&self, other: &ParameterVector) -> f64 {
        self.genes
            .iter()
            .zip(other.genes.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    pub fn metrics(&self) -> &VectorMetrics {
        &self.metrics
    }

    pub fn fitness(&self) -> f64 {
        self.metrics.fitness
    }

    pub(crate) fn set_metrics(&mut self, metrics: VectorMetrics) {
        self.metrics = metrics;
    }
}
