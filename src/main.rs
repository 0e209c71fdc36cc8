use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cuotas_cli::cli::{
    handle_audit_command, handle_auth_command, handle_calculate_command, handle_classify_command,
    handle_owners_command, AuthCommands, CalculateArgs, CliContext,
};
use cuotas_cli::models::CommunityConfig;
use cuotas_cli::storage::save_community;

#[derive(Parser)]
#[command(
    name = "cuotas",
    version,
    about = "Allocate community expenses among property owners",
    long_about = "cuotas reads a CSV of annual community expenses, sorts each line \
                  into the general, garage or building pool, and computes what every \
                  owner pays per year and per month."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate an expense file among the owners
    #[command(alias = "calc")]
    Calculate(CalculateArgs),

    /// Show which pool each concept falls into
    Classify {
        /// Expense concepts
        #[arg(required = true)]
        concepts: Vec<String>,
    },

    /// Show the community owner table
    Owners,

    /// Authentication commands
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Write default settings and the default community table
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "cuotas_cli=warn",
        1 => "cuotas_cli=info",
        2 => "cuotas_cli=debug",
        _ => "cuotas_cli=trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = CliContext::load()?;

    match cli.command {
        Some(Commands::Calculate(args)) => handle_calculate_command(&ctx, args)?,
        Some(Commands::Classify { concepts }) => handle_classify_command(&ctx, &concepts)?,
        Some(Commands::Owners) => handle_owners_command(&ctx)?,
        Some(Commands::Auth(cmd)) => handle_auth_command(&ctx, cmd)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&ctx, limit)?,
        Some(Commands::Init) => {
            println!("Initializing cuotas at: {}", ctx.paths.base_dir().display());
            ctx.paths.ensure_directories()?;
            ctx.settings.save(&ctx.paths)?;

            let community_path = ctx.settings.community_path(&ctx.paths);
            if community_path.exists() {
                println!("Community table already exists: {}", community_path.display());
            } else {
                save_community(&community_path, &CommunityConfig::default())?;
                println!("Default community table written to: {}", community_path.display());
            }
            println!();
            println!("Edit the community table to match your building, then run");
            println!("'cuotas calculate gastos.csv'.");
        }
        Some(Commands::Config) => {
            let settings = &ctx.settings;
            println!("cuotas Configuration");
            println!("====================");
            println!("Base directory:   {}", ctx.paths.base_dir().display());
            println!("Settings file:    {}", ctx.paths.settings_file().display());
            println!(
                "Community table:  {}",
                settings.community_path(&ctx.paths).display()
            );
            println!("Audit log:        {}", ctx.paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Auth enabled:     {}", settings.auth.enabled);
            println!("  Session lifetime: {}h", settings.auth.session_ttl_hours);
        }
        None => {
            println!("cuotas - community expense allocation");
            println!();
            println!("Run 'cuotas --help' for usage information.");
        }
    }

    Ok(())
}
