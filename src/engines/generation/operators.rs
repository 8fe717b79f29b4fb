use crate::engines::generation::vector::ParameterVector;
use rand::Rng;

/// Tournament selection: pick best of K random candidates.
///
/// Ties keep the earlier draw. Returns the index of the winner so callers can
/// borrow instead of cloning.
pub fn tournament_selection<R: Rng>(
    population: &[ParameterVector],
    tournament_size: usize,
    rng: &mut R,
) -> usize {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].fitness();

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].fitness() > best_fitness {
            best_idx = idx;
            best_fitness = population[idx].fitness();
        }
    }

    best_idx
}

/// Crossover offspring from two tournament-selected parents
pub fn tournament_offspring<R: Rng>(
    population: &[ParameterVector],
    tournament_size: usize,
    rng: &mut R,
) -> ParameterVector {
    let parent1 = tournament_selection(population, tournament_size, rng);
    let parent2 = tournament_selection(population, tournament_size, rng);
    population[parent1].crossover(&population[parent2], rng)
}

/// Generate random population
pub fn random_population<R: Rng>(size: usize, rng: &mut R) -> Vec<ParameterVector> {
    (0..size).map(|_| ParameterVector::random(rng)).collect()
}

/// Number of elites carried over unchanged: `ceil(size * ratio)`, at least one
/// and never the whole population.
pub fn elite_count(population_size: usize, elitism_rate: f64) -> usize {
    let count = (population_size as f64 * elitism_rate).ceil() as usize;
    count.clamp(1, population_size.saturating_sub(1).max(1))
}
