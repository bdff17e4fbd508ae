use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotwire::{Scope, cli, config, error, spotify::options::SearchType};

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
    /// JSON file with `clientId` and `clientSecret`
    #[clap(long, global = true, default_value = "credentials.json", env = "SPOTWIRE_CREDENTIALS")]
    credentials: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Request an app-only access token (client credentials)
    Token,

    /// Authorize as a user through the browser
    Login(LoginOptions),

    /// Show an album
    Album(MarketItemOptions),

    /// Show an artist
    Artist(ItemOptions),

    /// Show a podcast show
    Show(MarketItemOptions),

    /// Show a podcast episode
    Episode(MarketItemOptions),

    /// Show a track
    Track(MarketItemOptions),

    /// Search the catalog
    Search(SearchCommandOptions),

    /// List the markets Spotify is available in
    Markets,

    /// List the genres usable as recommendation seeds
    Genres,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginOptions {
    /// Redirect URI registered for the application
    #[clap(long, env = "SPOTWIRE_REDIRECT_URI", default_value = config::DEFAULT_REDIRECT_URI)]
    redirect_uri: String,

    /// Scope to request; can be repeated
    #[clap(long = "scope", action = ArgAction::Append, num_args = 1)]
    scopes: Vec<Scope>,
}

#[derive(Parser, Debug, Clone)]
pub struct ItemOptions {
    /// Spotify id of the item
    id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct MarketItemOptions {
    /// Spotify id of the item
    id: String,

    /// ISO 3166-1 alpha-2 country code
    #[clap(long)]
    market: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchCommandOptions {
    /// Search query, field filters included
    query: String,

    /// Result type(s) to include; can be repeated
    #[clap(
        long = "type",
        default_values = ["track", "artist", "album"],
        action = ArgAction::Append,
        num_args = 1
    )]
    types: Vec<SearchType>,

    /// Results per type (1-50)
    #[clap(long)]
    limit: Option<u32>,

    /// ISO 3166-1 alpha-2 country code
    #[clap(long)]
    market: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let credentials = cli.credentials.as_path();

    match cli.command {
        Command::Token => cli::token(credentials).await,
        Command::Login(opt) => cli::login(credentials, &opt.redirect_uri, &opt.scopes).await,
        Command::Album(opt) => cli::album(credentials, &opt.id, opt.market).await,
        Command::Artist(opt) => cli::artist(credentials, &opt.id).await,
        Command::Show(opt) => cli::show(credentials, &opt.id, opt.market).await,
        Command::Episode(opt) => cli::episode(credentials, &opt.id, opt.market).await,
        Command::Track(opt) => cli::track(credentials, &opt.id, opt.market).await,
        Command::Search(opt) => {
            cli::search(credentials, &opt.query, &opt.types, opt.limit, opt.market).await
        }
        Command::Markets => cli::markets(credentials).await,
        Command::Genres => cli::genres(credentials).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
