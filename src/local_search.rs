use crate::instance_data::InstanceData;
use crate::solution::Solution;
use std::time::Instant;

/// First-improvement hill-climbing over single-bit flips of the setup
/// vector, mutating `setups` in place and returning the best cost found.
///
/// Each sweep tries flipping every period in order; an improving flip is
/// kept and the sweep restarts from period 0, a non-improving flip is
/// reverted. Stops at a local optimum (a full sweep without improvement)
/// or once the deadline is hit, checked before each sweep and before each
/// flip. Overrun is bounded by one decode.
pub fn bit_flip(
    setups: &mut [u8],
    instance: &InstanceData,
    start: Instant,
    time_limit: f64,
) -> f64 {
    let mut best_cost = Solution::decode(setups, instance).cost;
    let mut improved = true;

    while improved {
        if start.elapsed().as_secs_f64() >= time_limit {
            break;
        }

        improved = false;
        for t in 0..instance.horizon {
            if start.elapsed().as_secs_f64() >= time_limit {
                break;
            }

            setups[t] ^= 1;
            let cost = Solution::decode(setups, instance).cost;
            if cost < best_cost {
                best_cost = cost;
                improved = true;
                break; // restart the sweep from period 0
            } else {
                setups[t] ^= 1;
            }
        }
    }

    best_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance_data::InstanceData;

    fn instance(name: &str) -> InstanceData {
        InstanceData::new(
            name.to_string(),
            4,
            vec![10.0, 10.0, 10.0, 10.0],
            vec![50.0, 50.0, 50.0, 50.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![40.0, 40.0, 40.0, 40.0],
        )
        .unwrap()
    }

    #[test]
    fn never_worse_than_the_starting_vector() {
        let inst = instance("ut-ls-mono");
        let mut setups = vec![1, 1, 1, 1];
        let initial = Solution::decode(&setups, &inst).cost;
        let improved = bit_flip(&mut setups, &inst, Instant::now(), 60.0);
        assert!(improved <= initial);
        // The returned cost matches the mutated vector.
        assert!((Solution::decode(&setups, &inst).cost - improved).abs() < 1e-9);
    }

    #[test]
    fn drops_setups_when_holding_is_cheaper() {
        // Setup cost 50 dwarfs holding; fewer setups must win.
        let inst = instance("ut-ls-drop");
        let mut setups = vec![1, 1, 1, 1];
        bit_flip(&mut setups, &inst, Instant::now(), 60.0);
        let n_setups: u8 = setups.iter().sum();
        assert!(n_setups < 4, "local search kept {setups:?}");
    }

    #[test]
    fn escapes_an_infeasible_start() {
        let inst = instance("ut-ls-repair");
        // No setups at all: everything unmet. Flipping any bit improves.
        let mut setups = vec![0, 0, 0, 0];
        let cost = bit_flip(&mut setups, &inst, Instant::now(), 60.0);
        let feasible = Solution::decode(&setups, &inst);
        assert!(feasible.is_feasible());
        assert!((feasible.cost - cost).abs() < 1e-9);
    }

    #[test]
    fn expired_deadline_changes_nothing() {
        let inst = instance("ut-ls-deadline");
        let mut setups = vec![1, 1, 1, 1];
        let initial = Solution::decode(&setups, &inst).cost;
        let cost = bit_flip(&mut setups, &inst, Instant::now(), 0.0);
        assert_eq!(setups, vec![1, 1, 1, 1]);
        assert!((cost - initial).abs() < 1e-9);
    }
}
