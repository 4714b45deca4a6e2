//! this binary starts a local target for the fanout client: every request gets the same body
//! to see the list of options, type: `fanout-server --help`

use std::net::SocketAddr;
use std::process::exit;
use clap::{crate_version, App, Arg, value_t};
use fanout::{BodyServer, FanoutError, Result, SharedQueueThreadPool, ThreadPool};
use tracing::{info, Level};
use tracing_subscriber::{FmtSubscriber};

const DEFAULT_ADDRESS: &str = "127.0.0.1:37337";
const DEFAULT_BODY: &str = "ok";
const DEFAULT_THREADS: u32 = 8;

/// ['Opt'] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    addr: SocketAddr,
    body: String,
    threads: u32,
}

impl Opt {
    /// validates the `addr` parameter is a valid IP address and PORT
    /// # Errors
    /// returns [`FanoutError::Parsing`] if one of the parameters is invalid
    fn build(addr: &str, body: &str, threads: u32) -> Result<Opt> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| FanoutError::Parsing(format!("could not parse {} into an IP address and port", &addr)))?;

        Ok(Opt { addr, body: body.to_string(), threads })
    }
}

fn main() {
    // set up a tracing subscriber to log to STDERR
    subscriber_config();

    let matches = App::new("fanout-server")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("answers every HTTP request with a fixed body")
        .arg(Arg::with_name("addr")
            .long("addr")
            .value_name("IP_ADDR:PORT")
            .help("sets the IP_ADDR:PORT that the server listens on")
            .default_value(DEFAULT_ADDRESS))
        .arg(Arg::with_name("body")
            .long("body")
            .value_name("TEXT")
            .help("the body sent back for every request")
            .default_value(DEFAULT_BODY))
        .arg(Arg::with_name("threads")
            .long("threads")
            .value_name("N")
            .help("number of threads serving connections"))
        .get_matches();

    let addr = matches.value_of("addr").unwrap_or(DEFAULT_ADDRESS);
    let body = matches.value_of("body").unwrap_or(DEFAULT_BODY);
    let threads = value_t!(matches, "threads", u32).unwrap_or(DEFAULT_THREADS);
    let opt = match Opt::build(addr, body, threads) {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    // start the server
    if let Err(e) = run(opt) {
        eprintln!("{}", e);
        exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    info!("fanout-server {}", env!("CARGO_PKG_VERSION"));
    info!("Serving {:?} with {} threads", opt.body, opt.threads);

    let pool = SharedQueueThreadPool::new(opt.threads)?;
    BodyServer::new(opt.body, pool).run(opt.addr)
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        // log to stderr instead of stdout
        .with_writer(std::io::stderr)
        // completes the builder.
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
