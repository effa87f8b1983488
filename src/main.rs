use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use themekit::css::{self, CssRule};
use themekit::html::{self, Excerpt};
use themekit::{OrderedMap, config, media, output};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "themekit")]
#[command(about = "Reorder, splice and render ordered theme maps")]
#[command(long_about = "\
Reorder, splice and render ordered theme maps

Maps are JSON objects read from --input or stdin. Key order is kept exactly
as written, and every command prints the map back in its new order.

  echo '{\"title\":\"Dawn\",\"3\":\"x\",\"featured\":true}' | themekit front --key featured --key 3
  themekit splice --group extra.json --anchor title --after --input fields.json

Keys that look like integers (\"3\", not \"03\" or \"+3\") name the same entry
as the integer 3. Missing keys are skipped, never an error; run with
RUST_LOG=debug to see what was skipped.

Run 'themekit gen-config' to generate a documented theme.toml.")]
#[command(version)]
struct Cli {
    /// Theme directory containing theme.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Print maps as `key => value` lines instead of JSON
    #[arg(long, global = true)]
    lines: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where a command reads its JSON document from.
#[derive(Args, Clone)]
struct InputArgs {
    /// JSON input file (stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Move keys to the front; the last key given ends up first
    Front {
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Move the first entry containing each needle to the front
    FrontMatching {
        #[arg(long = "needle", required = true)]
        needles: Vec<String>,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Splice a group of entries before or after an anchor key
    Splice {
        /// JSON object holding the entries to splice in
        #[arg(long)]
        group: PathBuf,
        /// Anchor key (start or end of the map when omitted)
        #[arg(long)]
        anchor: Option<String>,
        /// Insert after the anchor instead of before it
        #[arg(long)]
        after: bool,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Render a JSON list of CSS rules to a minified stylesheet
    Css(InputArgs),
    /// Strip markup from HTML and trim it to the configured excerpt length
    Excerpt(InputArgs),
    /// Reduce width and height to a CSS aspect-ratio value
    AspectRatio { width: u32, height: u32 },
    /// Print a stock theme.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Front { keys, input } => {
            let mut map = read_map(&input)?;
            map.move_many_to_front(&keys);
            print_map(&map, cli.lines)?;
        }
        Command::FrontMatching { needles, input } => {
            let mut map = read_map(&input)?;
            map.move_matching_to_front(&needles);
            print_map(&map, cli.lines)?;
        }
        Command::Splice {
            group,
            anchor,
            after,
            input,
        } => {
            let mut map = read_map(&input)?;
            let group: OrderedMap<Value> = serde_json::from_str(&std::fs::read_to_string(&group)?)?;
            if after {
                map.insert_after(anchor, group);
            } else {
                map.insert_before(anchor, group);
            }
            print_map(&map, cli.lines)?;
        }
        Command::Css(input) => {
            let rules: Vec<CssRule> = serde_json::from_str(&read_input(&input)?)?;
            println!("{}", css::render(&rules));
        }
        Command::Excerpt(input) => {
            let theme = config::load_config(&cli.config)?;
            let excerpt = Excerpt::from(&theme.excerpt);
            println!("{}", html::clean(&read_input(&input)?, Some(&excerpt)));
        }
        Command::AspectRatio { width, height } => match media::calc_aspect_ratio(width, height) {
            Some(ratio) => println!("{ratio}"),
            None => return Err(format!("invalid dimensions {width}x{height}").into()),
        },
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn read_input(input: &InputArgs) -> std::io::Result<String> {
    match &input.input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn read_map(input: &InputArgs) -> Result<OrderedMap<Value>, Box<dyn std::error::Error>> {
    let map: OrderedMap<Value> = serde_json::from_str(&read_input(input)?)?;
    tracing::debug!("{}", output::format_key_summary(&map));
    Ok(map)
}

fn print_map(map: &OrderedMap<Value>, lines: bool) -> Result<(), serde_json::Error> {
    if lines {
        output::print_map(map);
    } else {
        println!("{}", serde_json::to_string_pretty(map)?);
    }
    Ok(())
}
