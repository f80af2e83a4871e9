use std::fs;
use std::io::Error;
use std::path::Path;

use clap::Args;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use rand_pcg::Pcg64;

use crate::instance_data::{write_instance, InstanceData};

const DEMAND_MEAN: f64 = 100.0;
const PROD_COST_RANGE: (i64, i64) = (10, 20);
const HOLD_COST_RANGE: (i64, i64) = (1, 5);
const SETUP_HOLD_RATIO_RANGE: (i64, i64) = (50, 150);
const CAPACITY_STD_FACTOR: f64 = 0.2;

/// Generates the benchmark grid of C-SILSP instances, one directory per
/// (horizon, tau, var) class.
#[derive(Debug, Args)]
pub struct Generate {
    /// Base seed; every instance derives its own deterministic seed
    #[clap(short, long, default_value = "20251112")]
    seed: u64,
    /// Planning horizon lengths, one class per value
    #[clap(long, value_delimiter = ',', default_value = "50,100,200,500")]
    horizons: Vec<usize>,
    /// Capacity tightness ratios (mean capacity / mean demand)
    #[clap(long, value_delimiter = ',', default_value = "1.5,2.0,5.0")]
    tau: Vec<f64>,
    /// Demand coefficients of variation
    #[clap(long, value_delimiter = ',', default_value = "0.2,0.8")]
    var: Vec<f64>,
    /// Instances per parameter combination
    #[clap(short = 'n', long, default_value = "10")]
    count: usize,
    /// Root directory for the generated classes
    #[clap(short, long, default_value = "instances_csilsp")]
    output: String,
}

impl Generate {
    pub fn generate(&self) -> Result<(), Error> {
        let mut total = 0;
        let mut seed_counter = 0u64;

        for &horizon in &self.horizons {
            for &tau in &self.tau {
                for &var in &self.var {
                    let class_name = format!("T{horizon}_tau{tau}_var{var}");
                    let class_dir = Path::new(&self.output).join(&class_name);
                    fs::create_dir_all(&class_dir)?;

                    for i in 1..=self.count {
                        let file_name = format!("inst_{i:02}.txt");
                        let instance = generate_instance(
                            format!("{class_name}/{file_name}"),
                            horizon,
                            tau,
                            var,
                            self.seed.wrapping_add(seed_counter),
                        );
                        seed_counter += 1;

                        let path = class_dir.join(&file_name);
                        write_instance(&instance, path.to_str().unwrap())?;
                        total += 1;
                    }
                }
            }
        }

        println!("generated {total} instances under {}", self.output);
        Ok(())
    }
}

/// Samples one instance. Costs are uniform integers, demand and capacity
/// are truncated normal draws; when the aggregate capacity falls short of
/// aggregate demand the capacities are rescaled with 10% slack so the
/// generated grid always admits a feasible plan.
pub fn generate_instance(
    name: String,
    horizon: usize,
    tau: f64,
    var: f64,
    seed: u64,
) -> InstanceData {
    let mut rng = Pcg64::seed_from_u64(seed);

    let prod_dist = Uniform::new_inclusive(PROD_COST_RANGE.0, PROD_COST_RANGE.1);
    let hold_dist = Uniform::new_inclusive(HOLD_COST_RANGE.0, HOLD_COST_RANGE.1);
    let ratio_dist = Uniform::new_inclusive(SETUP_HOLD_RATIO_RANGE.0, SETUP_HOLD_RATIO_RANGE.1);

    let production_cost = (0..horizon)
        .map(|_| prod_dist.sample(&mut rng) as f64)
        .collect::<Vec<f64>>();
    let holding_cost = (0..horizon)
        .map(|_| hold_dist.sample(&mut rng) as f64)
        .collect::<Vec<f64>>();
    // Setup cost is a multiple of the holding cost, tying the cost
    // structure together as in the benchmark design.
    let setup_cost = holding_cost
        .iter()
        .map(|h| h * ratio_dist.sample(&mut rng) as f64)
        .collect::<Vec<f64>>();

    let demand_dist =
        Normal::new(DEMAND_MEAN, DEMAND_MEAN * var).expect("cannot create normal dist");
    let demand = (0..horizon)
        .map(|_| demand_dist.sample(&mut rng).max(DEMAND_MEAN * 0.1).trunc())
        .collect::<Vec<f64>>();

    let mean_demand = demand.iter().sum::<f64>() / horizon as f64;
    let mean_capacity = mean_demand * tau;
    let capacity_dist = Normal::new(mean_capacity, mean_capacity * CAPACITY_STD_FACTOR)
        .expect("cannot create normal dist");
    let mut capacity = (0..horizon)
        .map(|_| capacity_dist.sample(&mut rng).max(0.0).trunc())
        .collect::<Vec<f64>>();

    let total_demand: f64 = demand.iter().sum();
    let total_capacity: f64 = capacity.iter().sum();
    if total_capacity < total_demand {
        let scale = if total_capacity > 0.0 {
            (total_demand / total_capacity) * 1.10
        } else {
            1.0
        };
        let floor = (mean_capacity * 0.1).trunc().max(1.0);
        for c in capacity.iter_mut() {
            *c = (*c * scale).trunc();
            if *c == 0.0 {
                *c = floor;
            }
        }
    }

    InstanceData::new(
        name,
        horizon,
        demand,
        setup_cost,
        production_cost,
        holding_cost,
        capacity,
    )
    .expect("generated arrays have the requested horizon")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_instance("ut-gen-a".to_string(), 50, 1.5, 0.8, 77);
        let b = generate_instance("ut-gen-a".to_string(), 50, 1.5, 0.8, 77);
        assert_eq!(a.demand, b.demand);
        assert_eq!(a.setup_cost, b.setup_cost);
        assert_eq!(a.capacity, b.capacity);

        let c = generate_instance("ut-gen-c".to_string(), 50, 1.5, 0.8, 78);
        assert_ne!(a.demand, c.demand);
    }

    #[test]
    fn arrays_match_the_horizon() {
        let inst = generate_instance("ut-gen-len".to_string(), 120, 2.0, 0.2, 1);
        assert_eq!(inst.horizon, 120);
        assert_eq!(inst.demand.len(), 120);
        assert_eq!(inst.setup_cost.len(), 120);
        assert_eq!(inst.production_cost.len(), 120);
        assert_eq!(inst.holding_cost.len(), 120);
        assert_eq!(inst.capacity.len(), 120);
    }

    #[test]
    fn aggregate_capacity_covers_aggregate_demand() {
        for seed in 0..20 {
            // tau = 1.0 forces the rescaling path often.
            let inst = generate_instance(format!("ut-gen-feas-{seed}"), 80, 1.0, 0.8, seed);
            assert!(
                inst.total_capacity() >= inst.total_demand(),
                "seed {seed}: C={} d={}",
                inst.total_capacity(),
                inst.total_demand()
            );
        }
    }

    #[test]
    fn demand_respects_the_floor() {
        let inst = generate_instance("ut-gen-floor".to_string(), 200, 1.5, 0.8, 3);
        assert!(inst.demand.iter().all(|&d| d >= DEMAND_MEAN * 0.1));
    }

    #[test]
    fn costs_stay_in_their_ranges() {
        let inst = generate_instance("ut-gen-costs".to_string(), 100, 2.0, 0.2, 9);
        assert!(inst
            .production_cost
            .iter()
            .all(|&p| (10.0..=20.0).contains(&p)));
        assert!(inst.holding_cost.iter().all(|&h| (1.0..=5.0).contains(&h)));
        for (s, h) in inst.setup_cost.iter().zip(inst.holding_cost.iter()) {
            let ratio = s / h;
            assert!((50.0..=150.0).contains(&ratio), "ratio {ratio}");
        }
    }
}
