#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::process;

use riskpath::compare::{ComparisonConfig, run_comparison};
use riskpath::predict::{Prediction, validate_path};
use riskpath::preprocess::{SurveySchema, load_survey};
use riskpath::regress::LinearPredictor;
use riskpath::simulate::{DEFAULT_AGENT_COUNT, PredictionModel};

#[derive(Parser, Debug)]
#[clap(
    name = "riskpath",
    version,
    about = "Estimates financial risk tolerance from a decision survey, comparing an \
             agent-based simulation against a linear regression."
)]
struct Args {
    /// A choice path to score: one '0'/'1' digit per decision question, in
    /// question order. Without it, the predictor comparison runs instead.
    #[clap(value_name = "PATH")]
    path: Option<String>,

    /// Survey responses CSV.
    #[clap(long, default_value = "survey_responses.csv")]
    data: PathBuf,

    /// Number of agents to simulate per training run.
    #[clap(long, default_value_t = DEFAULT_AGENT_COUNT)]
    agents: usize,

    /// Train/test rounds for the comparison.
    #[clap(long, default_value_t = 20)]
    rounds: usize,

    /// Fraction of rows used for training in each comparison round.
    #[clap(long, default_value_t = 0.8)]
    train_fraction: f64,

    /// Seed for the random source; omit for an entropy-seeded run.
    #[clap(long)]
    seed: Option<u64>,

    /// Print the trained prediction table as JSON (sorted by path).
    #[clap(long)]
    dump_table: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let schema = SurveySchema::default();
    let data = load_survey(&args.data, &schema)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match args.path {
        Some(path) => {
            // Reject a malformed path before spending time on training.
            validate_path(&path, data.num_decision_points())?;

            let agent_model = PredictionModel::train(&data, args.agents, &mut rng)?;
            let linear_model = LinearPredictor::fit(&data)?;

            match agent_model.predict(&path)? {
                Prediction::Score(score) => {
                    println!("Simulated agent prediction: {score:.2}");
                }
                Prediction::NoData => {
                    println!("Simulated agent prediction: no simulated agent took this path");
                }
            }
            println!(
                "Linear regression prediction: {:.2}",
                linear_model.predict(&path)?
            );

            if args.dump_table {
                print_table(&agent_model)?;
            }
        }
        None => {
            let config = ComparisonConfig {
                rounds: args.rounds,
                train_fraction: args.train_fraction,
                agent_count: args.agents,
            };
            let report = run_comparison(&data, &config, &mut rng)?;
            println!("{report}");
        }
    }

    Ok(())
}

fn print_table(model: &PredictionModel) -> Result<(), Box<dyn Error>> {
    let sorted: BTreeMap<&str, &Vec<i64>> = model
        .table()
        .iter()
        .map(|(path, bucket)| (path.as_str(), bucket))
        .collect();
    println!("{}", serde_json::to_string_pretty(&sorted)?);
    Ok(())
}
