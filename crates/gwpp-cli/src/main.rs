use gwpp::experiment::{ExperimentConfig, default_configs, run_experiments};
use gwpp::generate::{RandomNetworkOptions, paper_network, random_network_seeded};
use gwpp::io::NetworkDocument;
use gwpp::{Gwpp, Label, Network, Solution, SolveOptions, best_values, best_values_for};
use serde::Serialize;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Gwpp(gwpp::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Gwpp(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<gwpp::Error> for CliError {
    fn from(value: gwpp::Error) -> Self {
        Self::Gwpp(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Solve,
    Label,
    Paper,
    Generate,
    Bench,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solve" => Ok(Self::Solve),
            "label" => Ok(Self::Label),
            "paper" => Ok(Self::Paper),
            "generate" => Ok(Self::Generate),
            "bench" => Ok(Self::Bench),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    out: Option<String>,
    pretty: bool,
    verbose: bool,
    quiet: bool,
    config: Option<String>,
    max_iterations: Option<usize>,
    deadline_ms: Option<u64>,
    strict: bool,
    targets: Vec<String>,
    seed: u64,
    nodes: Option<usize>,
    probability: Option<f64>,
    paths: Option<usize>,
    instances: Option<usize>,
}

#[derive(Serialize)]
struct PaperOut<'a> {
    contraction: &'a Solution,
    label_correcting: &'a Label,
}

fn usage() -> &'static str {
    "gwpp\n\
\n\
USAGE:\n\
  gwpp [solve] [--config <json>] [--max-iterations <n>] [--deadline-ms <ms>] [--strict] [--pretty] [<path>|-]\n\
  gwpp label [--target <node>]... [--pretty] [<path>|-]\n\
  gwpp paper [--strict] [--pretty]\n\
  gwpp generate [--nodes <n>] [--probability <p>] [--paths <k>] [--seed <s>] [--out <path>] [--pretty]\n\
  gwpp bench [--instances <n> --nodes <n> --paths <k> --probability <p>] [--seed <s>] [--out <path>]\n\
\n\
GLOBAL:\n\
  -v, --verbose   debug logging (stderr)\n\
  -q, --quiet     errors only\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the network document is read from stdin.\n\
  - A network document is {\"source\", \"sink\", \"arcs\": [{\"from\", \"to\", \"capacity\", \"loss\"}]}.\n\
  - bench runs the sixteen published configurations unless a grid is given.\n\
  - RUST_LOG overrides the default log level when neither -v nor -q is set.\n\
"
}

fn value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parsed<'a, T: FromStr>(it: &mut impl Iterator<Item = &'a String>) -> Result<T, CliError> {
    value(it)?
        .parse::<T>()
        .map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--quiet" | "-q" => args.quiet = true,
            "--strict" => args.strict = true,
            "--config" => args.config = Some(value(&mut it)?.clone()),
            "--out" => args.out = Some(value(&mut it)?.clone()),
            "--target" => args.targets.push(value(&mut it)?.clone()),
            "--max-iterations" => args.max_iterations = Some(parsed(&mut it)?),
            "--deadline-ms" => args.deadline_ms = Some(parsed(&mut it)?),
            "--seed" => args.seed = parsed(&mut it)?,
            "--nodes" => args.nodes = Some(parsed(&mut it)?),
            "--paths" => args.paths = Some(parsed(&mut it)?),
            "--instances" => args.instances = Some(parsed(&mut it)?),
            "--probability" => args.probability = Some(parsed(&mut it)?),
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            word => {
                if !command_seen && args.input.is_none() {
                    if let Ok(command) = word.parse::<Command>() {
                        args.command = command;
                        command_seen = true;
                        continue;
                    }
                }
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(word.to_string());
            }
        }
    }

    if args.verbose && args.quiet {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_network(input: Option<&str>) -> Result<Network, CliError> {
    let text = read_input(input)?;
    let doc = NetworkDocument::from_json_str(&text)?;
    Ok(Network::try_from(doc)?)
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    match out {
        None => std::io::stdout().lock().write_all(text.as_bytes())?,
        Some(path) => std::fs::write(path, text)?,
    }
    Ok(())
}

fn solve_options(args: &Args) -> Result<SolveOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => SolveOptions::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SolveOptions::default(),
    };
    if let Some(n) = args.max_iterations {
        options = options.with_max_iterations(n);
    }
    if let Some(ms) = args.deadline_ms {
        options = options.with_oracle_deadline_ms(ms);
    }
    if args.strict {
        options = options.with_strict_oracle(true);
    }
    options.validate()?;
    Ok(options)
}

fn experiment_grid(args: &Args) -> Result<Vec<ExperimentConfig>, CliError> {
    match (args.instances, args.nodes, args.paths, args.probability) {
        (None, None, None, None) => Ok(default_configs()),
        (instances, Some(nodes), Some(paths), Some(probability)) => {
            let instances = instances.unwrap_or(1);
            Ok(vec![ExperimentConfig::new(instances, nodes, paths, probability)])
        }
        _ => Err(CliError::Usage(usage())),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let out = args.out.as_deref();
    match args.command {
        Command::Solve => {
            let mut network = read_network(args.input.as_deref())?;
            let solution = Gwpp::from_options(solve_options(&args)?).solve(&mut network)?;
            tracing::info!(
                iterations = solution.iterations,
                bottleneck = solution.bottleneck,
                "solved"
            );
            write_json(&solution, args.pretty, out)
        }
        Command::Label => {
            let network = read_network(args.input.as_deref())?;
            if args.targets.is_empty() {
                write_json(&best_values(&network)?, args.pretty, out)
            } else {
                let targets: Vec<&str> = args.targets.iter().map(String::as_str).collect();
                write_json(&best_values_for(&network, &targets)?, args.pretty, out)
            }
        }
        Command::Paper => {
            let network = paper_network()?;
            let labels = best_values_for(&network, &[network.sink()])?;
            let (solution, _) = Gwpp::from_options(solve_options(&args)?).solve_cloned(&network)?;
            let Some(label) = labels.first() else {
                return Err(CliError::Gwpp(gwpp::Error::MissingNode {
                    node: network.sink().to_string(),
                }));
            };
            let report = PaperOut {
                contraction: &solution,
                label_correcting: label,
            };
            write_json(&report, args.pretty, out)
        }
        Command::Generate => {
            let defaults = RandomNetworkOptions::default();
            let options = RandomNetworkOptions {
                nodes: args.nodes.unwrap_or(defaults.nodes),
                probability: args.probability.unwrap_or(defaults.probability),
                paths: args.paths.unwrap_or(defaults.paths),
            };
            let network = random_network_seeded(&options, args.seed)?;
            write_json(&NetworkDocument::from(&network), args.pretty, out)
        }
        Command::Bench => {
            let configs = experiment_grid(&args)?;
            let solver = Gwpp::from_options(solve_options(&args)?);
            let stats = run_experiments(&configs, &solver, args.seed)?;
            write_json(&stats, true, out)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    setup_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
