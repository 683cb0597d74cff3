//! cfgtree command line

use anyhow::{bail, Context, Result};
use cfgtree_core::{change_me, ConfigTree, TreeConfig};
use cfgtree_model::{JsonPayloadParser, ParseOptions, Payload, PayloadParser};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let payload = Arg::new("payload")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Parsed configuration payload (JSON)");

    let parse_flags = [
        Arg::new("single")
            .long("single")
            .action(ArgAction::SetTrue)
            .help("Keep the entry file only, ignore includes"),
        Arg::new("no-comments")
            .long("no-comments")
            .action(ArgAction::SetTrue)
            .help("Drop comment nodes"),
        Arg::new("catch-errors")
            .long("catch-errors")
            .action(ArgAction::SetTrue)
            .help("Accept payloads that report parse errors"),
        Arg::new("ignore")
            .long("ignore")
            .action(ArgAction::Append)
            .value_name("DIRECTIVE")
            .help("Drop directives with this name (repeatable)"),
    ];

    Command::new("cfgtree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and edit parsed configuration trees by path")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More logging (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .global(true)
                .help("Tree configuration (TOML)"),
        )
        .subcommand(
            Command::new("show")
                .about("List included files and every indexed path")
                .arg(payload.clone())
                .args(parse_flags.clone()),
        )
        .subcommand(
            Command::new("get")
                .about("Print the value at a path")
                .arg(payload.clone())
                .arg(Arg::new("path").required(true).help("Indexed path, e.g. /http/server/listen"))
                .args(parse_flags.clone()),
        )
        .subcommand(
            Command::new("render")
                .about("Render the payload as configuration text")
                .arg(payload.clone())
                .args(parse_flags.clone()),
        )
        .subcommand(
            Command::new("change")
                .about("Apply an edit file and render the result")
                .arg(payload)
                .arg(
                    Arg::new("edits")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON list of changes"),
                )
                .args(parse_flags),
        )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_options(args: &ArgMatches) -> ParseOptions {
    let ignore: Vec<String> = args
        .get_many::<String>("ignore")
        .map(|names| names.cloned().collect())
        .unwrap_or_default();

    ParseOptions::new()
        .with_ignore(ignore)
        .with_single_file(args.get_flag("single"))
        .with_comments(!args.get_flag("no-comments"))
        .with_catch_errors(args.get_flag("catch-errors"))
}

fn load_config(matches: &ArgMatches) -> Result<TreeConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => TreeConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(TreeConfig::default()),
    }
}

fn load_payload(path: &Path, options: &ParseOptions) -> Result<Payload> {
    JsonPayloadParser::new()
        .parse(path, options)
        .with_context(|| format!("parsing {}", path.display()))
}

fn payload_arg(args: &ArgMatches) -> Result<&PathBuf> {
    args.get_one::<PathBuf>("payload")
        .context("missing payload argument")
}

fn run<W: Write>(matches: &ArgMatches, config: TreeConfig, out: &mut W) -> Result<()> {
    match matches.subcommand() {
        Some(("show", args)) => {
            let payload = load_payload(payload_arg(args)?, &parse_options(args))?;
            ConfigTree::with_config(payload, config)
                .show_tree(out)
                .context("writing tree")?;
        }
        Some(("get", args)) => {
            let payload = load_payload(payload_arg(args)?, &parse_options(args))?;
            let path = args.get_one::<String>("path").context("missing path argument")?;
            let tree = ConfigTree::with_config(payload, config);
            let value = tree.get(path).with_context(|| format!("looking up {path}"))?;
            writeln!(out, "{value}")?;
        }
        Some(("render", args)) => {
            let payload = load_payload(payload_arg(args)?, &parse_options(args))?;
            ConfigTree::with_config(payload, config)
                .render(out)
                .context("rendering configuration")?;
        }
        Some(("change", args)) => {
            let conf = payload_arg(args)?;
            let edits = args
                .get_one::<PathBuf>("edits")
                .context("missing edits argument")?;
            change_me(&JsonPayloadParser::new(), conf, edits, &parse_options(args), config, out)
                .with_context(|| format!("applying {} to {}", edits.display(), conf.display()))?;
        }
        Some((other, _)) => bail!("unknown subcommand {other}"),
        None => bail!("no subcommand given"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));
    let config = load_config(&matches)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&matches, config, &mut out)?;
    out.flush()?;
    Ok(())
}
