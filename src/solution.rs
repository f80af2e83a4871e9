use crate::instance_data::InstanceData;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// Base of every infeasible score. Any feasible cost on realistic
/// instances is far below `BIGM / 2`, so comparing plain scores is enough
/// to rank feasible solutions ahead of infeasible ones.
pub const BIGM: f64 = 1e15;
/// Scales the violation magnitude on top of `BIGM`, keeping "less
/// infeasible" candidates comparable during search.
pub const PENALTY: f64 = 1e6;

const TOL: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct Plan {
    pub production: Vec<f64>,
    pub inventory: Vec<f64>,
}

/// A setup vector together with its decoded score. Feasible solutions
/// carry the production/inventory plan; infeasible ones only the
/// penalized score.
#[derive(Debug, Clone)]
pub struct Solution {
    pub setups: Vec<u8>,
    pub plan: Option<Plan>,
    pub cost: f64,
}

impl Solution {
    /// Decodes a setup vector into a plan and an exact cost, or a
    /// penalized score when the vector cannot cover demand.
    ///
    /// Backward pass: accumulate remaining demand R from the last period;
    /// each setup period produces min(C[t], R). Forward pass: inventory
    /// balance. Unmet demand or negative inventory yields
    /// `BIGM + violation * PENALTY` and no plan.
    pub fn decode(setups: &[u8], instance: &InstanceData) -> Self {
        let horizon = instance.horizon;
        let mut production = vec![0.0; horizon];

        let mut remaining = 0.0;
        for t in (0..horizon).rev() {
            remaining += instance.demand[t];
            if setups[t] == 1 {
                let produced = instance.capacity[t].min(remaining);
                production[t] = produced;
                remaining -= produced;
            }
        }

        if remaining > TOL {
            return Solution {
                setups: setups.to_vec(),
                plan: None,
                cost: BIGM + remaining * PENALTY,
            };
        }

        let mut inventory = vec![0.0; horizon];
        let mut stock = 0.0;
        for t in 0..horizon {
            stock += production[t] - instance.demand[t];
            if stock < -TOL {
                return Solution {
                    setups: setups.to_vec(),
                    plan: None,
                    cost: BIGM + stock.abs() * PENALTY,
                };
            }
            inventory[t] = stock;
        }

        let cost = (0..horizon)
            .map(|t| {
                instance.setup_cost[t] * f64::from(setups[t])
                    + instance.production_cost[t] * production[t]
                    + instance.holding_cost[t] * inventory[t]
            })
            .sum();

        Solution {
            setups: setups.to_vec(),
            plan: Some(Plan {
                production,
                inventory,
            }),
            cost,
        }
    }

    pub fn objective(&self) -> f64 {
        self.cost
    }

    pub fn is_feasible(&self) -> bool {
        self.cost < BIGM / 2.0
    }
}

impl PartialEq<Self> for Solution {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.cost) == OrderedFloat(other.cost)
    }
}
impl Eq for Solution {}

impl Ord for Solution {
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(self.cost).cmp(&OrderedFloat(other.cost))
    }
}

impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
