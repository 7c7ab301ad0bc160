//! Failure Domains - command line front end
//!
//! Builds a cluster topology from the command line, places the replicas of
//! one range, and reports the worst-case domain failures that still leave a
//! quorum standing.

use clap::{Arg, ArgAction, Command};
use failure_domains::report::{self, OutputFormat, RenderOptions};
use failure_domains::{Config, Error, LevelSpec, Result, Simulator};
use tracing::warn;

const DEFAULT_NAMES: [&str; 4] = ["Region", "Data Center", "Availability Zone", "Node"];

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let matches = Command::new("Failure Domains")
        .version("0.1.0")
        .about("Worst-case failure domain analysis for a replicated range")
        .arg(
            Arg::new("levels")
                .short('l')
                .long("levels")
                .value_name("COUNTS")
                .help("Comma-separated domains per parent, outermost level first")
                .default_value("3,3,3,3"),
        )
        .arg(
            Arg::new("names")
                .long("names")
                .value_name("NAMES")
                .help("Comma-separated level names, outermost level first"),
        )
        .arg(
            Arg::new("replication-factor")
                .short('r')
                .long("replication-factor")
                .value_name("COUNT")
                .help("Number of replicas of the range (made odd, 1 to 99)")
                .default_value("3"),
        )
        .arg(
            Arg::new("granularity")
                .short('g')
                .long("granularity")
                .value_name("LEVEL")
                .help("Shallowest level whose domains may fail as a whole, 0 disables failures")
                .default_value("1"),
        )
        .arg(
            Arg::new("sweep")
                .long("sweep")
                .help("Report every granularity from the outermost level to single nodes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("show-empty")
                .long("show-empty")
                .help("Include domains that hold no replicas")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .help("Print the traversal order of the failure search")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let counts = parse_counts(string_arg(&matches, "levels")?)?;
    let names: Vec<String> = matches
        .get_one::<String>("names")
        .map(|s| s.split(',').map(|n| n.trim().to_string()).collect())
        .unwrap_or_default();
    let levels = build_levels(&counts, &names);

    let replication_factor = parse_count(string_arg(&matches, "replication-factor")?)?;
    let granularity = parse_count(string_arg(&matches, "granularity")?)?;
    let format: OutputFormat = string_arg(&matches, "format")?.parse()?;

    let raw = Config::new(levels, replication_factor, granularity);
    // No earlier run to step away from, so an even factor rounds up.
    let config = raw.normalized(0);
    if config != raw {
        warn!(
            replication_factor = config.replication_factor,
            granularity = config.failure_granularity,
            levels = ?config.levels.iter().map(|l| l.child_count).collect::<Vec<_>>(),
            "adjusted configuration to allowed bounds"
        );
    }

    let simulator = Simulator::new(config);
    let reports = if matches.get_flag("sweep") {
        simulator.sweep()?
    } else {
        vec![simulator.run()?]
    };

    let options = RenderOptions {
        show_empty: matches.get_flag("show-empty"),
        show_trace: matches.get_flag("trace"),
    };
    println!("{}", report::render(&reports, format, &options)?);
    Ok(())
}

fn string_arg<'a>(matches: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidArgument(format!("missing --{}", id)))
}

fn parse_count(value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("not a count: {}", value)))
}

fn parse_counts(value: &str) -> Result<Vec<usize>> {
    value.split(',').map(parse_count).collect()
}

fn build_levels(counts: &[usize], names: &[String]) -> Vec<LevelSpec> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| match names.get(i).filter(|n| !n.is_empty()) {
            Some(name) => LevelSpec::new(name.clone(), count),
            None if names.is_empty() && counts.len() == DEFAULT_NAMES.len() => {
                LevelSpec::new(DEFAULT_NAMES[i], count)
            }
            None => LevelSpec::unnamed(i + 1, count),
        })
        .collect()
}
