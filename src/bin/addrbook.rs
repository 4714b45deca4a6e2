//! The addrbook executable writes an address book in one of three formats, then reads it back.
//!
//! `addrbook save --format FORMAT --path PATH [--input FILE]`
//!
//!     Writes the sample book (or the JSON book in --input) to PATH, reads it back and prints it.
//!     FORMAT is one of json, literal or shelf. A shelf is a directory.
//!
//! `addrbook load --format FORMAT --path PATH`
//!
//!     Reads a previously saved book from PATH and prints it.
//!     Prints an error and returns a non-zero exit code if a record is missing a name field.

use std::path::PathBuf;
use std::process::exit;
use clap::{crate_version, App, Arg, SubCommand, ArgMatches};
use fanout::{AddressBook, FanoutError, FormatKind, Result};
use tracing::{info, Level};
use tracing_subscriber::{FmtSubscriber};

/// the action requested on the command line
#[derive(Debug)]
enum Action {
    Save { input: Option<PathBuf> },
    Load,
}

/// ['Opt'] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    format: FormatKind,
    path: PathBuf,
    action: Action,
}

impl Opt {
    /// validates the `format` parameter
    /// # Errors
    /// returns [`FanoutError::Parsing`] if one of the parameters is invalid
    fn build(args: &ArgMatches, action: Action) -> Result<Opt> {
        let format = args
            .value_of("format")
            .ok_or_else(|| FanoutError::Parsing("--format is required".to_string()))?
            .parse()?;
        let path = args
            .value_of("path")
            .map(PathBuf::from)
            .ok_or_else(|| FanoutError::Parsing("--path is required".to_string()))?;
        Ok(Opt { format, path, action })
    }
}

fn main() {
    // configure a subscriber that will log messages to STDERR
    subscriber_config();

    let format_arg = Arg::with_name("format")
        .long("format")
        .value_name("FORMAT")
        .possible_values(&FormatKind::NAMES)
        .required(true)
        .help("how the book is stored");
    let path_arg = Arg::with_name("path")
        .long("path")
        .value_name("PATH")
        .required(true)
        .help("where the book is stored");

    let matches = App::new("addrbook")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("saves and loads an address book as json, literal text or a key-value shelf")
        .subcommands(vec![
            SubCommand::with_name("save")
                .about("Saves an address book, then reads it back")
                .arg(format_arg.clone())
                .arg(path_arg.clone())
                .arg(Arg::with_name("input")
                    .long("input")
                    .value_name("FILE")
                    .help("a JSON address book to save instead of the sample")),
            SubCommand::with_name("load")
                .about("Loads a saved address book")
                .arg(format_arg)
                .arg(path_arg),
        ])
        .get_matches();

    let opt = match parse_options(&matches) {
        Ok(opt) => opt,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    if let Err(e) = run(opt) {
        eprintln!("{}", e);
        exit(1);
    }
}

/// parses the matches from the command line into an [`Opt`] struct
fn parse_options(matches: &ArgMatches) -> Result<Opt> {
    match matches.subcommand() {
        ("save", Some(args)) => {
            let input = args.value_of("input").map(PathBuf::from);
            Opt::build(args, Action::Save { input })
        }
        ("load", Some(args)) => Opt::build(args, Action::Load),
        _ => Err(FanoutError::Parsing("expected a `save` or `load` command".to_string())),
    }
}

fn run(opt: Opt) -> Result<()> {
    let format = opt.format.format();
    if let Action::Save { input } = opt.action {
        let book = match input {
            Some(input) => AddressBook::from_json_file(&input)?,
            None => AddressBook::sample(),
        };
        format.save(&book, &opt.path)?;
        info!("saved {} people as {} to {:?}", book.len(), format.name(), opt.path);
    }

    let book = format.load(&opt.path)?;
    print!("{}", book);
    Ok(())
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
