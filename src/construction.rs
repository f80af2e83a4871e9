use crate::instance_data::InstanceData;
use crate::utils::lot_avg_cost;
use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;

/// Trivial fallback: a setup in every period. Feasible whenever total
/// capacity covers total demand.
pub fn naive(instance: &InstanceData) -> Vec<u8> {
    vec![1; instance.horizon]
}

/// Greedy randomized construction of a setup vector.
///
/// A cursor walks the horizon; at each position the candidate lots of
/// length 1..=l_max are ranked by approximate average unit cost, a
/// restricted candidate list keeps those within
/// `c_min + alpha * (c_max - c_min)`, and one lot length is drawn
/// uniformly from it. alpha = 0 is purely greedy, alpha = 1 admits every
/// candidate. When no lot fits within the period's capacity the period
/// gets a forced setup and the cursor advances by one; the resulting
/// vector may decode infeasible and is filtered by the driver.
pub fn greedy_randomized<T: Rng>(
    instance: &InstanceData,
    alpha: f64,
    l_max: usize,
    rng: &mut T,
) -> Vec<u8> {
    let horizon = instance.horizon;
    let mut setups = vec![0; horizon];
    let mut t = 0;

    while t < horizon {
        let mut candidates: Vec<(usize, f64)> = Vec::with_capacity(l_max);

        for len in 1..=l_max {
            let end = t + len - 1;
            if end >= horizon {
                break;
            }

            let lot_demand: f64 = instance.demand[t..=end].iter().sum();
            // The whole lot is produced at t in the approximation.
            if instance.capacity[t] + 1e-6 < lot_demand {
                continue;
            }

            candidates.push((len, lot_avg_cost(t, len, instance)));
        }

        if candidates.is_empty() {
            // No lot of any length fits; force a setup and move on.
            setups[t] = 1;
            t += 1;
            continue;
        }

        let c_min = candidates
            .iter()
            .map(|&(_, c)| OrderedFloat(c))
            .min()
            .unwrap()
            .0;
        let c_max = candidates
            .iter()
            .map(|&(_, c)| OrderedFloat(c))
            .max()
            .unwrap()
            .0;
        let threshold = c_min + alpha * (c_max - c_min + 1e-9);

        let rcl = candidates
            .iter()
            .filter(|&&(_, c)| c <= threshold)
            .map(|&(len, _)| len)
            .collect::<Vec<usize>>();

        let chosen = *rcl.choose(rng).unwrap();
        setups[t] = 1;
        t += chosen;
    }

    setups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::HashSet;

    fn two_period_instance(name: &str) -> InstanceData {
        // Lot of length 1 at t=0 averages 1.5, length 2 averages 1.75.
        InstanceData::new(
            name.to_string(),
            2,
            vec![10.0, 10.0],
            vec![5.0, 5.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![100.0, 100.0],
        )
        .unwrap()
    }

    #[test]
    fn naive_sets_up_every_period() {
        let instance = two_period_instance("ut-con-naive");
        assert_eq!(naive(&instance), vec![1, 1]);
    }

    #[test]
    fn alpha_zero_always_picks_the_cheapest_lot() {
        let instance = two_period_instance("ut-con-greedy");
        for seed in 0..32 {
            let mut rng = Pcg64::seed_from_u64(seed);
            let setups = greedy_randomized(&instance, 0.0, 2, &mut rng);
            assert_eq!(setups, vec![1, 1], "seed {seed}");
        }
    }

    #[test]
    fn alpha_one_reaches_every_candidate() {
        let instance = two_period_instance("ut-con-diverse");
        let mut seen = HashSet::new();
        for seed in 0..32 {
            let mut rng = Pcg64::seed_from_u64(seed);
            seen.insert(greedy_randomized(&instance, 1.0, 2, &mut rng));
        }
        assert!(seen.contains(&vec![1, 1]));
        assert!(seen.contains(&vec![1, 0]));
    }

    #[test]
    fn cursor_always_starts_with_a_setup() {
        let instance = two_period_instance("ut-con-first");
        let mut rng = Pcg64::seed_from_u64(1);
        let setups = greedy_randomized(&instance, 0.5, 2, &mut rng);
        assert_eq!(setups[0], 1);
    }

    #[test]
    fn insufficient_capacity_forces_single_period_setups() {
        let instance = InstanceData::new(
            "ut-con-forced".to_string(),
            2,
            vec![10.0, 10.0],
            vec![5.0, 5.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![5.0, 20.0],
        )
        .unwrap();

        let mut rng = Pcg64::seed_from_u64(3);
        // t=0 cannot host any lot (capacity 5 < demand 10): forced setup,
        // then a regular single-period lot at t=1.
        let setups = greedy_randomized(&instance, 0.3, 2, &mut rng);
        assert_eq!(setups, vec![1, 1]);
    }
}
