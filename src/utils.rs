use crate::instance_data::InstanceData;
use cached::proc_macro::cached;
use regex::Regex;
use std::fmt::Display;
use substring::Substring;

/// Approximate average unit cost of covering periods `start..start+len`
/// with a single lot produced entirely at `start`: the setup at `start`,
/// the lot's production cost, and holding for demand produced early and
/// kept until consumption. This is the ranking proxy of the constructor,
/// not the exact decode.
#[cached(
    key = "(String, usize, usize)",
    convert = r#"{ (instance.name.clone(), start, len) }"#
)]
pub fn lot_avg_cost(start: usize, len: usize, instance: &InstanceData) -> f64 {
    let end = start + len - 1;
    let setup_cost = instance.setup_cost[start];
    let prod_cost: f64 = (start..=end)
        .map(|k| instance.production_cost[k] * instance.demand[k])
        .sum();

    let mut hold_cost = 0.0;
    let mut cum = 0.0;
    for k in start + 1..=end {
        cum += instance.demand[k];
        hold_cost += instance.holding_cost[k] * cum;
    }

    let lot_demand: f64 = instance.demand[start..=end].iter().sum();
    (setup_cost + prod_cost + hold_cost) / (lot_demand + 1e-9)
}

/// Tunable parameters encoded in an instance-class directory name,
/// e.g. "T50_tau1.5_var0.2".
#[derive(Debug, Clone, Default)]
pub struct ClassParams {
    pub horizon: Option<usize>,
    pub tau: Option<f64>,
    pub var: Option<f64>,
}

pub fn parse_class_name(class_name: &str) -> ClassParams {
    let horizon_re = Regex::new(r"^T\d+$").unwrap();
    let tau_re = Regex::new(r"^tau[0-9.]+$").unwrap();
    let var_re = Regex::new(r"^var[0-9.]+$").unwrap();

    let mut params = ClassParams::default();
    for tok in class_name.split('_') {
        if horizon_re.is_match(tok) {
            params.horizon = tok.substring(1, tok.len()).parse().ok();
        } else if tau_re.is_match(tok) {
            params.tau = tok.substring(3, tok.len()).parse().ok();
        } else if var_re.is_match(tok) {
            params.var = tok.substring(3, tok.len()).parse().ok();
        }
    }
    params
}

/// Renders an optional summary field; absent values become empty cells.
pub fn opt_field<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_class_name() {
        let params = parse_class_name("T50_tau1.5_var0.2");
        assert_eq!(params.horizon, Some(50));
        assert_eq!(params.tau, Some(1.5));
        assert_eq!(params.var, Some(0.2));
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let params = parse_class_name("T200_extra_var0.8");
        assert_eq!(params.horizon, Some(200));
        assert_eq!(params.tau, None);
        assert_eq!(params.var, Some(0.8));
    }

    #[test]
    fn garbage_yields_no_params() {
        let params = parse_class_name("instances");
        assert!(params.horizon.is_none() && params.tau.is_none() && params.var.is_none());
    }

    #[test]
    fn lot_cost_includes_setup_production_and_holding() {
        let instance = InstanceData::new(
            "ut-lotcost".to_string(),
            2,
            vec![10.0, 10.0],
            vec![5.0, 5.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![100.0, 100.0],
        )
        .unwrap();

        // Lot of one period: (5 + 10) / 10.
        assert!((lot_avg_cost(0, 1, &instance) - 1.5).abs() < 1e-6);
        // Two periods produced at t=0: (5 + 20 + 10) / 20.
        assert!((lot_avg_cost(0, 2, &instance) - 1.75).abs() < 1e-6);
    }

    #[test]
    fn opt_field_renders_empty_for_none() {
        assert_eq!(opt_field(&Some(1.5)), "1.5");
        assert_eq!(opt_field::<f64>(&None), "");
    }
}
