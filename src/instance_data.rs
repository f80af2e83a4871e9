use itertools::Itertools;
use std::fs;
use std::io::{Error, ErrorKind, Write};

/// One C-SILSP instance: a planning horizon of `horizon` periods with
/// per-period demand, costs and production capacity. Immutable after load.
#[derive(Debug, Clone)]
pub struct InstanceData {
    pub name: String,
    pub horizon: usize,
    pub demand: Vec<f64>,
    pub setup_cost: Vec<f64>,
    pub production_cost: Vec<f64>,
    pub holding_cost: Vec<f64>,
    pub capacity: Vec<f64>,
}

impl InstanceData {
    pub fn new(
        name: String,
        horizon: usize,
        demand: Vec<f64>,
        setup_cost: Vec<f64>,
        production_cost: Vec<f64>,
        holding_cost: Vec<f64>,
        capacity: Vec<f64>,
    ) -> Result<Self, Error> {
        let lists = [
            ("demand", demand.len()),
            ("setup cost", setup_cost.len()),
            ("production cost", production_cost.len()),
            ("holding cost", holding_cost.len()),
            ("capacity", capacity.len()),
        ];
        for (label, len) in lists {
            if len != horizon {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("{name}: {label} has {len} entries, expected T={horizon}"),
                ));
            }
        }

        Ok(Self {
            name,
            horizon,
            demand,
            setup_cost,
            production_cost,
            holding_cost,
            capacity,
        })
    }

    pub fn total_demand(&self) -> f64 {
        self.demand.iter().sum()
    }

    pub fn total_capacity(&self) -> f64 {
        self.capacity.iter().sum()
    }
}

/// Parses the line-oriented instance format:
/// line 1 is T, lines 2-6 hold T whitespace-separated numbers each, in
/// order: demand, setup cost, production cost, holding cost, capacity.
/// Blank lines are ignored.
pub fn parse_instance(name: &str, contents: &str) -> Result<InstanceData, Error> {
    let lines = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<&str>>();

    if lines.len() < 6 {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("{name}: expected 6 non-empty lines, found {}", lines.len()),
        ));
    }

    let horizon = lines[0].parse::<usize>().map_err(|_| {
        Error::new(
            ErrorKind::InvalidData,
            format!("{name}: cannot parse T from {:?}", lines[0]),
        )
    })?;

    let parse_row = |line: &str, label: &str| -> Result<Vec<f64>, Error> {
        line.split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| {
                    Error::new(
                        ErrorKind::InvalidData,
                        format!("{name}: cannot parse {label} entry {tok:?}"),
                    )
                })
            })
            .collect()
    };

    let demand = parse_row(lines[1], "demand")?;
    let setup_cost = parse_row(lines[2], "setup cost")?;
    let production_cost = parse_row(lines[3], "production cost")?;
    let holding_cost = parse_row(lines[4], "holding cost")?;
    let capacity = parse_row(lines[5], "capacity")?;

    InstanceData::new(
        name.to_string(),
        horizon,
        demand,
        setup_cost,
        production_cost,
        holding_cost,
        capacity,
    )
}

pub fn read_instance(path: &str) -> Result<InstanceData, Error> {
    let contents = fs::read_to_string(path)?;
    parse_instance(path, &contents)
}

/// Writes an instance in the same format `parse_instance` reads.
pub fn write_instance(instance: &InstanceData, path: &str) -> Result<(), Error> {
    let mut file = fs::File::create(path)?;
    writeln!(file, "{}", instance.horizon)?;
    for row in [
        &instance.demand,
        &instance.setup_cost,
        &instance.production_cost,
        &instance.holding_cost,
        &instance.capacity,
    ] {
        writeln!(file, "{}", row.iter().join(" "))?;
    }
    Ok(())
}
