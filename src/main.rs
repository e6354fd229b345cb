use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunecensus::{cli, config, error, types::CountryCode, utils};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Request an app token and check the connection
    Auth,

    /// Collect the track dataset for a country
    Collect(CollectOptions),

    /// Show the most popular rows of an exported dataset
    Preview(PreviewOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CollectOptions {
    /// Two-letter country code (defaults to TARGET_COUNTRY or US)
    #[clap(long, value_parser = utils::parse_country_code)]
    pub country: Option<CountryCode>,

    /// Directory the CSV is written to (defaults to TUNECENSUS_OUTPUT_DIR or .)
    #[clap(long)]
    pub output_dir: Option<PathBuf>,

    /// Number of discovered playlists to walk
    #[clap(long)]
    pub max_playlists: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewOptions {
    /// Exported CSV file
    pub file: PathBuf,

    /// Number of rows to show
    #[clap(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Collect(opt) => {
            cli::collect(opt.country, opt.output_dir, opt.max_playlists).await
        }
        Command::Preview(opt) => cli::preview(opt.file, opt.limit).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
