use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use trackmatch::{
    analysis::{DEFAULT_LIMIT, DEFAULT_POOL_SIZE, SimilarityFilter},
    cli, config, error,
    types::{Mode, RecommendationTargets},
    utils,
};

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
    /// Find tracks that sound like a seed track
    Similar(SimilarOptions),

    /// Show BPM, key and mood of tracks
    Features(FeaturesOptions),

    /// Key name, Camelot code and mixing compatibility
    Key(KeyOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SimilarOptions {
    /// Seed track id, URI or URL
    pub track: String,

    /// Maximum number of results
    #[clap(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Number of recommended (or searched) candidates to score
    #[clap(long, default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,

    /// Score these tracks instead of recommendations; can be repeated
    #[clap(long = "candidate", num_args = 1..)]
    pub candidates: Vec<String>,

    /// Score the tracks of a playlist
    #[clap(long, conflicts_with = "candidates")]
    pub playlist: Option<String>,

    /// Score the results of a track search
    #[clap(long, conflicts_with_all = ["candidates", "playlist"])]
    pub search: Option<String>,

    /// Keep only tracks matching the seed's tempo (bpm) or key
    #[clap(long, default_value = "all", value_parser = utils::parse_filter)]
    pub filter: SimilarityFilter,

    /// Recommendation target: pitch class 0-11
    #[clap(long, value_parser = clap::value_parser!(u8).range(0..12))]
    pub target_key: Option<u8>,

    /// Recommendation target: tempo in bpm
    #[clap(long)]
    pub target_tempo: Option<f64>,

    /// Recommendation target: energy 0.0-1.0
    #[clap(long)]
    pub target_energy: Option<f64>,

    /// Recommendation target: danceability 0.0-1.0
    #[clap(long)]
    pub target_danceability: Option<f64>,

    /// Recommendation target: valence 0.0-1.0
    #[clap(long)]
    pub target_valence: Option<f64>,

    /// Print JSON instead of a table
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FeaturesOptions {
    /// Track ids, URIs or URLs
    pub tracks: Vec<String>,

    /// Include the tracks of a playlist
    #[clap(long)]
    pub playlist: Option<String>,

    /// Print JSON instead of a table
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct KeyOptions {
    /// Pitch class 0-11 (C=0 ... B=11)
    #[clap(allow_negative_numbers = true)]
    pub pitch_class: i32,

    /// major or minor
    #[clap(value_parser = utils::parse_mode)]
    pub mode: Mode,

    /// Pitch class of a second key to check compatibility against
    #[clap(long, allow_negative_numbers = true, requires = "with_mode")]
    pub with_key: Option<i32>,

    /// Mode of the second key
    #[clap(long, value_parser = utils::parse_mode, requires = "with_key")]
    pub with_mode: Option<Mode>,
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
        Command::Similar(opt) => {
            cli::similar(cli::SimilarRequest {
                track: opt.track,
                limit: opt.limit,
                pool_size: opt.pool_size,
                candidates: opt.candidates,
                playlist: opt.playlist,
                search: opt.search,
                filter: opt.filter,
                targets: RecommendationTargets {
                    key: opt.target_key,
                    tempo: opt.target_tempo,
                    energy: opt.target_energy,
                    danceability: opt.target_danceability,
                    valence: opt.target_valence,
                },
                json: opt.json,
            })
            .await
        }
        Command::Features(opt) => cli::features(opt.tracks, opt.playlist, opt.json).await,
        Command::Key(opt) => cli::key(
            opt.pitch_class,
            opt.mode,
            opt.with_key.zip(opt.with_mode),
        ),
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
