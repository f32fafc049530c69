//! Simulated annealing over one project-period group.
//!
//! Starts from the greedy fill and explores two moves:
//!
//! - **swap**: exchange the employees of two filled slots
//! - **replace**: give a filled slot to an employee unused in the group
//!
//! Moves are accepted by the Metropolis criterion on the summed strategy
//! score. The best fill seen is returned, so the result is never worse
//! than the starting fill. The set of filled slots never changes.
//!
//! # Reference
//! Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{AnnealingConfig, CandidateScore};

/// Refines a group fill.
///
/// `table[slot][candidate]` is the strategy score of `candidate` for `slot`;
/// every row has the same width. `initial[slot]` is the candidate filling
/// the slot, or `None` if it was left empty. Candidates are distinct.
pub fn refine_group(
    table: &[Vec<CandidateScore>],
    initial: &[Option<usize>],
    config: &AnnealingConfig,
) -> Vec<Option<usize>> {
    let filled: Vec<usize> = (0..initial.len()).filter(|&s| initial[s].is_some()).collect();
    let width = table.first().map_or(0, Vec::len);
    if filled.is_empty() || width == 0 {
        return initial.to_vec();
    }

    let mut in_use = vec![false; width];
    for candidate in initial.iter().flatten() {
        in_use[*candidate] = true;
    }
    let free_count = width - filled.len();

    let mut current = initial.to_vec();
    let mut current_score = fill_score(table, &current);
    let mut best = current.clone();
    let mut best_score = current_score;

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut temperature = config.initial_temperature;

    for _ in 0..config.iterations {
        let slot = filled[rng.random_range(0..filled.len())];
        let Some(held) = current[slot] else {
            continue;
        };

        let swap = free_count == 0 || (filled.len() > 1 && rng.random_bool(0.5));
        if swap {
            let other = filled[rng.random_range(0..filled.len())];
            let Some(other_held) = current[other] else {
                continue;
            };
            if other == slot {
                temperature *= config.cooling_rate;
                continue;
            }
            let delta = table[slot][other_held] + table[other][held]
                - table[slot][held]
                - table[other][other_held];
            if accept(delta, temperature, &mut rng) {
                current[slot] = Some(other_held);
                current[other] = Some(held);
                current_score += delta;
            }
        } else {
            let free: Vec<usize> = (0..width).filter(|&c| !in_use[c]).collect();
            let replacement = free[rng.random_range(0..free.len())];
            let delta = table[slot][replacement] - table[slot][held];
            if accept(delta, temperature, &mut rng) {
                in_use[held] = false;
                in_use[replacement] = true;
                current[slot] = Some(replacement);
                current_score += delta;
            }
        }

        if current_score > best_score {
            best_score = current_score;
            best.clone_from(&current);
        }
        temperature *= config.cooling_rate;
    }

    log::debug!(
        "annealing: slots={} start={:.4} best={:.4}",
        filled.len(),
        fill_score(table, initial),
        best_score
    );
    best
}

/// Sum of scores over filled slots.
pub(crate) fn fill_score(table: &[Vec<CandidateScore>], fill: &[Option<usize>]) -> CandidateScore {
    fill.iter()
        .enumerate()
        .filter_map(|(slot, c)| c.map(|c| table[slot][c]))
        .sum()
}

fn accept(delta: f64, temperature: f64, rng: &mut SmallRng) -> bool {
    delta >= 0.0 || (temperature > 0.0 && rng.random::<f64>() < (delta / temperature).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> AnnealingConfig {
        AnnealingConfig {
            iterations: 200,
            initial_temperature: 1.0,
            cooling_rate: 0.98,
            seed,
        }
    }

    #[test]
    fn test_escapes_greedy_trap() {
        // Greedy gives slot 0 candidate 0 (10 > 9), leaving slot 1 with 0.
        let table = vec![vec![10.0, 9.0], vec![10.0, 0.0]];
        let greedy = vec![Some(0), Some(1)];

        let refined = refine_group(&table, &greedy, &config(1));
        assert_eq!(refined, vec![Some(1), Some(0)]);
        assert!((fill_score(&table, &refined) - 19.0).abs() < 1e-10);
    }

    #[test]
    fn test_uses_free_candidates() {
        let table = vec![vec![1.0, 0.0, 5.0]];
        let refined = refine_group(&table, &[Some(0)], &config(3));
        assert_eq!(refined, vec![Some(2)]);
    }

    #[test]
    fn test_never_worse_than_start() {
        let table = vec![
            vec![3.0, -1.0, 2.5, 0.0],
            vec![-2.0, 4.0, 1.0, 1.5],
            vec![0.5, 0.5, -3.0, 2.0],
        ];
        let start = vec![Some(0), Some(1), Some(3)];
        let start_score = fill_score(&table, &start);
        for seed in 0..10 {
            let refined = refine_group(&table, &start, &config(seed));
            assert!(fill_score(&table, &refined) >= start_score);
            // Distinct candidates.
            let mut used: Vec<usize> = refined.iter().flatten().copied().collect();
            used.sort_unstable();
            used.dedup();
            assert_eq!(used.len(), 3);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let table = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
        let start = vec![Some(0), Some(1)];
        assert_eq!(
            refine_group(&table, &start, &config(9)),
            refine_group(&table, &start, &config(9))
        );
    }

    #[test]
    fn test_empty_slots_untouched() {
        let table = vec![vec![1.0], vec![2.0]];
        let start = vec![Some(0), None];
        let refined = refine_group(&table, &start, &config(0));
        assert_eq!(refined[1], None);
        assert_eq!(refined[0], Some(0));

        assert_eq!(refine_group(&table, &[None, None], &config(0)), vec![None, None]);
    }
}
