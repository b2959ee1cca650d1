use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use teamboard::Error;

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_PROTOCOL: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_BROWSER: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List open PRs, newest first (default if no subcommand)
    List,
    /// Open a PR in browser by its index number
    Open {
        /// Index number of the PR to open (1-based, as shown in list)
        index: usize,
    },
    /// List the organizations you belong to (values for --org)
    Orgs,
    /// List your teams in the organization (values for --team)
    Teams,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum Format {
    /// One line per PR
    #[default]
    Table,
    /// Multi-line block per PR
    Detail,
    /// Tab-separated values for scripting
    Tsv,
}

#[derive(Parser, Debug)]
#[command(name = "teamboard")]
#[command(about = "Open GitHub pull requests for you and your team", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/teamboard/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// GitHub organization (overrides the config file)
    #[arg(long, global = true)]
    org: Option<String>,

    /// Team slug within the organization (overrides the config file)
    #[arg(long, global = true)]
    team: Option<String>,

    /// Output format for the list
    #[arg(long, value_enum, default_value_t = Format::Table, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default_directive = if verbose { "warn,teamboard=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Config(_) => EXIT_CONFIG,
        Error::Transport(_) => EXIT_NETWORK,
        Error::Protocol(_) | Error::Decode(_) => EXIT_PROTOCOL,
    }
}

fn exit_with_config_hint(err: &Error) -> ! {
    eprintln!("{}", err);
    eprintln!("Add org and team to ~/.config/teamboard/config.yaml:");
    eprintln!("  org: my-org");
    eprintln!("  team: my-team");
    eprintln!("Run `teamboard orgs` and `teamboard teams --org <org>` to list valid values.");
    std::process::exit(EXIT_CONFIG);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let command = cli.command.unwrap_or(Commands::List);
    let start_time = Instant::now();

    // Load config
    let config = match teamboard::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let token = match teamboard::credentials::get_token_from_env() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Credential error: {}", e);
            std::process::exit(EXIT_AUTH);
        }
    };

    let client = match teamboard::github::create_client(&token) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(exit_code(&e));
        }
    };

    match command {
        Commands::Orgs => {
            let deadline = config.deadline().unwrap_or_else(|e| exit_with_config_hint(&e));
            match teamboard::github::fetch_viewer_orgs(&client, deadline).await {
                Ok(orgs) => orgs.iter().for_each(|org| println!("{}", org)),
                Err(e) => {
                    eprintln!("Failed to fetch organizations: {}", e);
                    std::process::exit(exit_code(&e));
                }
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Teams => {
            let deadline = config.deadline().unwrap_or_else(|e| exit_with_config_hint(&e));
            let org = config
                .resolve_org(cli.org.clone())
                .unwrap_or_else(|e| exit_with_config_hint(&e));
            match teamboard::fetch_viewer_team_list(&client, &org, deadline).await {
                Ok(teams) => teams
                    .iter()
                    .for_each(|team| println!("{}\t{}", team.slug, team.name)),
                Err(e) => {
                    eprintln!("Failed to fetch teams: {}", e);
                    std::process::exit(exit_code(&e));
                }
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::List | Commands::Open { .. } => {}
    }

    let settings = config
        .resolve(cli.org, cli.team)
        .unwrap_or_else(|e| exit_with_config_hint(&e));
    tracing::info!(org = %settings.org, team = %settings.team, "using team");

    let prs = match teamboard::fetch_team_pulls(&client, &settings).await {
        Ok(prs) => prs,
        Err(e) => {
            tracing::error!(error = %e, "fetching pull requests failed");
            eprintln!("Failed to fetch pull requests: {}", e);
            std::process::exit(exit_code(&e));
        }
    };

    match command {
        Commands::List => {
            let use_colors = teamboard::output::should_use_colors();
            let output = match cli.format {
                Format::Table => teamboard::output::format_pr_table(&prs, use_colors),
                Format::Detail => teamboard::output::format_pr_details(&prs, use_colors),
                Format::Tsv => teamboard::output::format_tsv(&prs),
            };
            if !output.is_empty() {
                println!("{}", output);
            }

            tracing::debug!(
                count = prs.len(),
                elapsed = ?start_time.elapsed(),
                "listed pull requests"
            );
        }
        Commands::Open { index } => match teamboard::browser::open_pull_request(&prs, index) {
            Ok(pr) => println!("Opening PR #{} in browser: {}", pr.number, pr.url),
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_BROWSER);
            }
        },
        Commands::Orgs | Commands::Teams => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
