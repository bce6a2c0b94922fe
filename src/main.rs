use cardano_compass::config::CompassConfig;
use cardano_compass::flow::RewardFlow;
use cardano_compass::history::{self, ChartKind, FileHistorySource, HISTORY_DAYS};
use cardano_compass::locale::{self, ParameterField};
use cardano_compass::palette::Evaluation;
use cardano_compass::price::{self, FilePriceSource, FixedPrice};
use cardano_compass::{
    estimate_rewards, parse_answer, project_series, telemetry, weights, CompassError,
    EconomicParameters, FeeModel, Questionnaire, Scenario, QUESTIONS,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "compass",
    about = "Explore Cardano's reward model: attitude scoring, reward estimates and reserve projections",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score questionnaire answers and print the evaluation colors
    Score(ScoreArgs),
    /// Estimate staking rewards for a stake
    Estimate(EstimateArgs),
    /// Project reserve, treasury and rewards over many epochs
    Project(ProjectArgs),
    /// Print the reward distribution graph
    Flow(FlowArgs),
    /// Print the price or market-cap history from a cached market chart
    History(HistoryArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Comma-separated answers in question order: a(gree), n(eutral), d(isagree), s(kip)
    #[arg(long, value_delimiter = ',')]
    answers: Vec<String>,
}

#[derive(Args, Debug)]
struct ParameterArgs {
    /// Start from a preset (positive, neutral, negative)
    #[arg(long)]
    scenario: Option<Scenario>,
    /// Monetary expansion rate, e.g. 0,003
    #[arg(long, value_parser = parse_rho)]
    rho: Option<f64>,
    /// Treasury ratio
    #[arg(long, value_parser = parse_unit)]
    tau: Option<f64>,
    /// Participation rate
    #[arg(long, value_parser = parse_unit)]
    theta: Option<f64>,
    /// Fees (fraction of rewards, or ADA per epoch with the flat model)
    #[arg(long, value_parser = parse_number)]
    fees: Option<f64>,
    /// Stake in ADA
    #[arg(long, value_parser = parse_number)]
    stake: Option<f64>,
}

impl ParameterArgs {
    fn resolve(&self) -> EconomicParameters {
        let base = EconomicParameters::default();
        let mut params = self.scenario.map_or(base, |s| s.apply(&base));
        if let Some(rho) = self.rho {
            params.rho = rho;
        }
        if let Some(tau) = self.tau {
            params.tau = tau;
        }
        if let Some(theta) = self.theta {
            params.theta = theta;
        }
        if let Some(fees) = self.fees {
            params.fees = fees;
        }
        if let Some(stake) = self.stake {
            params.stake_amount = stake;
        }
        params
    }
}

#[derive(Args, Debug)]
struct EstimateArgs {
    #[command(flatten)]
    params: ParameterArgs,
    /// Live ADA price in USD
    #[arg(long, value_parser = parse_number, conflicts_with = "price_file")]
    price: Option<f64>,
    /// Cached CoinGecko simple/price response to read the live price from
    #[arg(long)]
    price_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    #[command(flatten)]
    params: ParameterArgs,
    /// Number of epochs to project
    #[arg(long)]
    epochs: Option<u32>,
    /// Initial reserve in ADA
    #[arg(long, value_parser = parse_number)]
    initial_reserve: Option<f64>,
    /// Fee model: fractional or flat
    #[arg(long)]
    fee_model: Option<FeeModel>,
    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct FlowArgs {
    /// Only show what flows out of and into this node
    #[arg(long)]
    from: Option<u8>,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Cached CoinGecko market_chart response
    #[arg(long)]
    file: PathBuf,
    /// Series to print: price or market-cap
    #[arg(long, default_value_t = ChartKind::Price)]
    chart: ChartKind,
}

fn parse_number(text: &str) -> Result<f64, String> {
    locale::parse_decimal(text).map_err(|err| err.to_string())
}

fn parse_rho(text: &str) -> Result<f64, String> {
    parse_field(text, ParameterField::RHO)
}

fn parse_unit(text: &str) -> Result<f64, String> {
    parse_field(text, ParameterField::TAU)
}

fn parse_field(text: &str, field: ParameterField) -> Result<f64, String> {
    let value = parse_number(text)?;
    Ok(field.commit(text, value))
}

fn run_score(args: ScoreArgs) -> Result<(), CompassError> {
    let mut questionnaire = Questionnaire::new(weights());
    questionnaire.start();
    for (index, token) in args.answers.iter().take(QUESTIONS.len()).enumerate() {
        questionnaire.answer(index, parse_answer(token)?);
    }

    let (answered, total) = questionnaire.progress();
    let score = questionnaire.score();
    let evaluation = Evaluation::from_scores(&score);
    println!("answered {answered}/{total}");
    for dimension in &evaluation.dimensions {
        println!(
            "{:<18} {:>6.2}  {}",
            dimension.label, dimension.score, dimension.color
        );
    }
    println!("overall color      {}", evaluation.overall);
    Ok(())
}

async fn run_estimate(args: EstimateArgs, config: &CompassConfig) -> Result<(), CompassError> {
    let params = args.params.resolve();
    let policy = config.price.retry_policy();
    let live_price = match (args.price, args.price_file) {
        (Some(value), _) => price::fetch_live_price(&FixedPrice(value), &policy).await,
        (None, Some(path)) => price::fetch_live_price(&FilePriceSource::new(path), &policy).await,
        (None, None) => None,
    };

    let Some(estimate) = estimate_rewards(&params, live_price) else {
        println!("reward estimate unavailable: no live price");
        return Ok(());
    };
    let fiat = estimate.in_fiat();
    println!("live price: ${}", estimate.price);
    for ((label, ada), (_, usd)) in estimate.horizons().into_iter().zip(fiat.horizons()) {
        println!(
            "{label:<18} {:.2} - {:.2} ADA  ({:.2} - {:.2} USD)",
            ada.min, ada.max, usd.min, usd.max
        );
    }
    Ok(())
}

fn run_project(args: ProjectArgs, config: &CompassConfig) -> Result<(), CompassError> {
    let params = args.params.resolve();
    let horizon = args.epochs.unwrap_or(config.projection.horizon_epochs);
    let initial_reserve = args
        .initial_reserve
        .unwrap_or(config.projection.initial_reserve);
    let fee_model = args.fee_model.unwrap_or(config.projection.fee_model);
    info!(?params, horizon, %fee_model, "projecting reserve");

    let series = project_series(&params, initial_reserve, horizon, fee_model);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }
    println!(
        "{:>5}  {:<10}  {:>20}  {:>18}  {:>16}",
        "epoch", "date", "reserve", "treasury", "rewards"
    );
    for point in &series {
        println!(
            "{:>5}  {:<10}  {:>20.0}  {:>18.0}  {:>16.0}",
            point.epoch_index, point.date, point.reserve, point.treasury, point.rewards
        );
    }
    Ok(())
}

fn run_flow(args: FlowArgs) {
    let flow = RewardFlow::default();
    let nodes: Vec<_> = match args.from {
        Some(id) => flow.node(id).into_iter().collect(),
        None => flow.nodes().iter().collect(),
    };
    for node in nodes {
        println!("[{}] {}", node.id, node.label);
        for target in flow.downstream(node.id) {
            println!("    -> [{}] {}", target.id, target.label);
        }
        if args.from.is_some() {
            for source in flow.upstream(node.id) {
                println!("    <- [{}] {}", source.id, source.label);
            }
            if let Some(text) = flow.describe(node.label) {
                println!("    {}", text.definition);
                println!("    {}", text.description);
            }
        }
    }
}

async fn run_history(args: HistoryArgs, config: &CompassConfig) -> Result<(), CompassError> {
    let policy = config.price.retry_policy();
    let Some(series) = history::fetch_history(&FileHistorySource::new(&args.file), &policy).await
    else {
        println!("{} history unavailable", args.chart);
        return Ok(());
    };
    let points = series.select(args.chart);
    info!(chart = %args.chart, points = points.len(), days = HISTORY_DAYS, "loaded history");
    for point in points {
        println!("{}  {:>20}", point.date, locale::format_decimal(point.value));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), CompassError> {
    let config = CompassConfig::load()?;
    telemetry::init(&config.log_level)?;

    match Cli::parse().command {
        Command::Score(args) => run_score(args),
        Command::Estimate(args) => run_estimate(args, &config).await,
        Command::Project(args) => run_project(args, &config),
        Command::History(args) => run_history(args, &config).await,
        Command::Flow(args) => {
            run_flow(args);
            Ok(())
        }
    }
}
