use crate::engines::generation::genes::GENE_COUNT;
use crate::engines::generation::vector::ParameterVector;
use log::warn;
use rand::seq::index::sample;
use rand::Rng;

/// Keeps a population from collapsing onto a single point.
///
/// The score is the mean pairwise Euclidean distance divided by
/// `sqrt(GENE_COUNT)`. Gene ranges are not unit-scaled, so the score is a
/// heuristic and not bounded by 1.
pub struct DiversityMonitor {
    target: f64,
    injection_rate: f64,
}

impl DiversityMonitor {
    pub fn new(target: f64, injection_rate: f64) -> Self {
        Self {
            target,
            injection_rate,
        }
    }

    pub fn score(population: &[ParameterVector]) -> f64 {
        if population.len() < 2 {
            return 1.0;
        }

        let mut total = 0.0;
        let mut comparisons = 0usize;
        for i in 0..population.len() - 1 {
            for j in (i + 1)..population.len() {
                total += population[i].distance(&population[j]);
                comparisons += 1;
            }
        }

        (total / comparisons as f64) / (GENE_COUNT as f64).sqrt()
    }

    /// Number of individuals replaced when diversity is too low
    pub fn injection_count(&self, population_size: usize) -> usize {
        (population_size as f64 * self.injection_rate).round() as usize
    }

    /// Replace random bottom-half slots with fresh random vectors if the
    /// score falls under the target. Returns the number of injected vectors.
    pub fn enforce<R: Rng>(&self, population: &mut [ParameterVector], rng: &mut R) -> usize {
        let score = Self::score(population);
        if score >= self.target {
            return 0;
        }

        let half = population.len() / 2;
        let bottom = population.len() - half;
        let count = self.injection_count(population.len()).min(bottom);
        if count == 0 {
            return 0;
        }

        warn!(
            "Diversity {:.3} below target {:.2}, injecting {} random vectors",
            score, self.target, count
        );

        for offset in sample(rng, bottom, count).into_vec() {
            population[half + offset] = ParameterVector::random(rng);
        }

        count
    }
}
