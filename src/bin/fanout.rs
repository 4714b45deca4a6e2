//! The fanout executable fires a batch of concurrent GET requests at a target, prints every
//! result, and reports how long the batch took.
//!
//! `fanout [--target URL] [--count N] [--wait-secs S] [--limit N] [--pool POOL]
//!     [--request-timeout-secs S] [--config FILE] [--verbose]`
//!
//!     --target defaults to http://localhost:37337 and --count defaults to 100.
//!     --limit caps the number of requests in flight at once, using the given --pool
//!     (naive, shared or rayon).
//!     --config reads a JSON batch config; command line flags override its values.
//!     --verbose logs every worker thread as it starts.
//!     Prints an error and returns a non-zero exit code if the batch times out.

use std::path::Path;
use std::process::exit;
use std::time::Duration;
use clap::{crate_version, App, Arg, ArgMatches};
use fanout::{BatchConfig, BatchRunner, FanoutError, PoolKind, Result};
use tracing::{Level};
use tracing_subscriber::{FmtSubscriber};

const DEFAULT_TARGET: &str = "http://localhost:37337";
const DEFAULT_COUNT: &str = "100";

/// ['Opt'] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    config: BatchConfig,
}

impl Opt {
    /// builds the batch config from the command line, starting from the `--config` file if given
    /// # Errors
    /// returns [`FanoutError::Parsing`] if one of the parameters is invalid
    fn build(matches: &ArgMatches) -> Result<Opt> {
        let mut config = match matches.value_of("config") {
            Some(path) => BatchConfig::from_file(Path::new(path))?,
            None => BatchConfig::new(DEFAULT_TARGET, parse_num("count", DEFAULT_COUNT)?),
        };

        if let Some(target) = matches.value_of("target") {
            config.target = target.to_string();
        }
        if let Some(count) = matches.value_of("count") {
            config.count = parse_num("count", count)?;
        }
        if let Some(secs) = matches.value_of("wait-secs") {
            config.wait_timeout = parse_secs("wait-secs", secs)?;
        }
        if let Some(secs) = matches.value_of("request-timeout-secs") {
            config.request_timeout = Some(parse_secs("request-timeout-secs", secs)?);
        }
        if let Some(pool) = matches.value_of("pool") {
            config.pool = pool.parse::<PoolKind>()?;
        }
        if let Some(limit) = matches.value_of("limit") {
            config.concurrency_limit = Some(parse_num("limit", limit)?);
        }
        config.validate()?;

        Ok(Opt { config })
    }
}

fn main() {
    let matches = App::new("fanout")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("fires a batch of concurrent requests at a target and times it")
        .arg(Arg::with_name("target")
            .long("target")
            .value_name("URL")
            .help("the URL every request is sent to [default: http://localhost:37337]"))
        .arg(Arg::with_name("count")
            .long("count")
            .short("n")
            .value_name("N")
            .help("number of requests to make [default: 100]"))
        .arg(Arg::with_name("wait-secs")
            .long("wait-secs")
            .value_name("SECONDS")
            .help("how long to wait for each result before giving up [default: 2]"))
        .arg(Arg::with_name("limit")
            .long("limit")
            .value_name("N")
            .help("maximum number of requests in flight at once"))
        .arg(Arg::with_name("pool")
            .long("pool")
            .value_name("POOL")
            .possible_values(&PoolKind::NAMES)
            .help("the thread pool used with --limit"))
        .arg(Arg::with_name("request-timeout-secs")
            .long("request-timeout-secs")
            .value_name("SECONDS")
            .help("timeout applied to each request by the HTTP client"))
        .arg(Arg::with_name("config")
            .long("config")
            .value_name("FILE")
            .help("reads the batch config from a JSON file"))
        .arg(Arg::with_name("verbose")
            .long("verbose")
            .short("v")
            .help("logs every worker thread as it starts"))
        .get_matches();

    // configure a subscriber that will log messages to STDERR
    if matches.is_present("verbose") {
        subscriber_config(Level::INFO);
    } else {
        subscriber_config(Level::WARN);
    }

    let opt = match Opt::build(&matches) {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    if let Err(e) = run(opt) {
        eprintln!("{}", e);
        exit(1);
    }
}

/// runs the batch and prints every result followed by a summary
fn run(opt: Opt) -> Result<()> {
    let runner = BatchRunner::http(opt.config)?;
    let report = runner.run()?;

    for outcome in &report.results {
        println!("{}", outcome);
    }
    println!("made {} requests", report.len());
    println!("took {:.3} seconds", report.elapsed.as_secs_f64());
    Ok(())
}

fn parse_num(name: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| FanoutError::Parsing(format!("could not parse {} into a number for --{}", value, name)))
}

fn parse_secs(name: &str, value: &str) -> Result<Duration> {
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(Duration::from_secs_f64(secs)),
        _ => Err(FanoutError::Parsing(format!("could not parse {} into seconds for --{}", value, name))),
    }
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config(level: Level) {
    let subscriber = FmtSubscriber::builder()
        // the results themselves go to stdout
        .with_max_level(level)
        // log to stderr instead of stdout
        .with_writer(std::io::stderr)
        // completes the builder.
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
