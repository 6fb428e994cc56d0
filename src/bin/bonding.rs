//! Bonding CLI
//!
//! Operator tool for the custodial policy. State lives in a JSON snapshot
//! under the data directory and is reloaded on every invocation.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use bonding::cli::{CliConfig, OutputFormat, OutputFormatter};
use bonding::core::{Amount, AssetId, Bonding};
use bonding::error::Error;
use bonding::storage::StateFile;
use bonding::utils::address::Address;
use bonding::utils::constants::NATIVE_DECIMALS;

/// Bonding CLI - custodial policy and dust recovery
#[derive(Parser)]
#[command(name = "bonding")]
#[command(author = "Bonding Team")]
#[command(version = bonding::VERSION)]
#[command(about = "Command-line interface for the bonding custodial policy", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to data directory
    #[arg(short, long, env = "BONDING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new state file
    Init {
        /// Deploying identity; becomes the administrator
        #[arg(long)]
        admin: Address,

        /// Holding account address (random when omitted)
        #[arg(long)]
        holding: Option<Address>,

        /// Initial service address
        #[arg(long, default_value = "0x0000000000000000000000000000000000000000")]
        service: Address,

        /// Overwrite an existing state file
        #[arg(short, long)]
        force: bool,
    },

    /// Show administrator, service address and protected assets
    Status,

    /// Service reference operations
    #[command(subcommand)]
    Service(ServiceCommands),

    /// Protected asset registry operations
    #[command(subcommand)]
    Protect(ProtectCommands),

    /// Sweep dust from the holding account
    #[command(subcommand)]
    Dust(DustCommands),

    /// Record an external deposit into the holding account
    #[command(subcommand)]
    Deposit(DepositCommands),

    /// Show balances
    Balance {
        /// Account to inspect (defaults to the holding account)
        #[arg(long)]
        account: Option<Address>,
    },

    /// Administrator operations
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Show the audit log
    Events {
        /// Only events with sequence >= this value
        #[arg(long, default_value = "0")]
        since: u64,

        /// Only events of this type (e.g. DustSent)
        #[arg(long = "type")]
        event_type: Option<String>,
    },
}

#[derive(Args)]
struct CallerArg {
    /// Identity making the call
    #[arg(long, env = "BONDING_CALLER")]
    caller: Option<Address>,
}

#[derive(Subcommand)]
enum ServiceCommands {
    /// Show the service address
    Get,

    /// Set the service address (zero disables the service)
    Set {
        /// New service address
        address: Address,

        #[command(flatten)]
        caller: CallerArg,
    },
}

#[derive(Subcommand)]
enum ProtectCommands {
    /// Protect an asset from sweeping
    Add {
        /// Asset: `native` or a token address
        asset: AssetId,

        #[command(flatten)]
        caller: CallerArg,
    },

    /// Stop protecting an asset
    Remove {
        /// Asset: `native` or a token address
        asset: AssetId,

        #[command(flatten)]
        caller: CallerArg,
    },

    /// Check whether an asset is protected
    Check {
        /// Asset: `native` or a token address
        asset: AssetId,
    },

    /// List protected assets
    List,
}

#[derive(Subcommand)]
enum DustCommands {
    /// Send an unprotected asset out of the holding account
    Send {
        /// Asset: `native` or a token address
        #[arg(long)]
        asset: AssetId,

        /// Destination address
        #[arg(long)]
        to: Address,

        /// Amount in smallest units
        #[arg(long)]
        amount: Amount,

        #[command(flatten)]
        caller: CallerArg,
    },
}

#[derive(Subcommand)]
enum DepositCommands {
    /// Native currency arriving at the holding account
    Native {
        /// Amount in wei
        amount: Amount,
    },

    /// Tokens arriving at the holding account
    Token {
        /// Token contract address
        token: Address,

        /// Amount in base units
        amount: Amount,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Show the administrator
    Show,

    /// Hand administration to another identity
    Transfer {
        /// New administrator
        new_admin: Address,

        #[command(flatten)]
        caller: CallerArg,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let app = match App::load(&cli) {
        Ok(app) => app,
        Err(e) => {
            OutputFormatter::new(OutputFormat::Text).error(&format!("{:#}", e), None);
            std::process::exit(2);
        }
    };

    if let Err(e) = run_command(&cli, &app) {
        let code = e.downcast_ref::<Error>().map(Error::code);
        app.out.error(&format!("{:#}", e), code);
        std::process::exit(1);
    }
}

struct App {
    config: CliConfig,
    state: StateFile,
    out: OutputFormatter,
}

impl App {
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => expand_path(dir)?,
            None => CliConfig::default().data_dir,
        };
        let config = CliConfig::resolve(&data_dir)?;

        let format = if cli.json { OutputFormat::Json } else { config.output };
        let mut out = OutputFormatter::new(format);
        if !config.color {
            out = out.without_color();
        }

        let state = StateFile::new(config.state_path());
        tracing::debug!(state = %state.path().display(), "configuration resolved");
        Ok(Self { config, state, out })
    }

    fn load_state(&self) -> anyhow::Result<Bonding> {
        if !self.state.exists() {
            anyhow::bail!(
                "No state at {}. Run `bonding init` first.",
                self.state.path().display()
            );
        }
        Ok(self.state.load()?)
    }

    fn caller(&self, arg: &CallerArg) -> anyhow::Result<Address> {
        arg.caller
            .or(self.config.default_caller)
            .context("no caller given: pass --caller or set BONDING_CALLER")
    }
}

fn run_command(cli: &Cli, app: &App) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init {
            admin,
            holding,
            service,
            force,
        } => cmd_init(app, *admin, *holding, *service, *force),
        Commands::Status => cmd_status(app),
        Commands::Service(cmd) => cmd_service(app, cmd),
        Commands::Protect(cmd) => cmd_protect(app, cmd),
        Commands::Dust(cmd) => cmd_dust(app, cmd),
        Commands::Deposit(cmd) => cmd_deposit(app, cmd),
        Commands::Balance { account } => cmd_balance(app, *account),
        Commands::Admin(cmd) => cmd_admin(app, cmd),
        Commands::Events { since, event_type } => cmd_events(app, *since, event_type.as_deref()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMAND HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_init(
    app: &App,
    admin: Address,
    holding: Option<Address>,
    service: Address,
    force: bool,
) -> anyhow::Result<()> {
    if app.state.exists() && !force {
        anyhow::bail!(
            "State already exists: {}. Use --force to overwrite.",
            app.state.path().display()
        );
    }

    let holding = holding.unwrap_or_else(Address::random);
    let bonding = Bonding::new(admin, holding, service);
    app.state.save(&bonding)?;

    if !app.config.config_path().exists() {
        app.config.save(&app.config.config_path())?;
    }

    app.out.success(
        "Initialized bonding state",
        &[
            ("administrator", admin.to_string()),
            ("holding", holding.to_string()),
            ("service", service.to_string()),
            ("state", app.state.path().display().to_string()),
        ],
    );
    Ok(())
}

fn cmd_status(app: &App) -> anyhow::Result<()> {
    let bonding = app.load_state()?;
    let protected: Vec<String> = bonding
        .protected_assets()
        .iter()
        .map(ToString::to_string)
        .collect();

    app.out.success(
        "Bonding status",
        &[
            ("administrator", bonding.administrator().to_string()),
            ("holding", bonding.holding_address().to_string()),
            ("service", bonding.service_address().to_string()),
            ("service enabled", bonding.is_service_enabled().to_string()),
            ("protected", protected.join(", ")),
            ("events", bonding.events().next_sequence().to_string()),
            ("state hash", bonding.state_hash().to_hex()),
        ],
    );
    Ok(())
}

fn cmd_service(app: &App, cmd: &ServiceCommands) -> anyhow::Result<()> {
    match cmd {
        ServiceCommands::Get => {
            let bonding = app.load_state()?;
            app.out.success(
                "Service address",
                &[("service", bonding.service_address().to_string())],
            );
        }
        ServiceCommands::Set { address, caller } => {
            let caller = app.caller(caller)?;
            let mut bonding = app.load_state()?;
            let previous = bonding.service_address();
            bonding.set_service_address(&caller, *address)?;
            app.state.save(&bonding)?;
            app.out.success(
                "Service address updated",
                &[
                    ("previous", previous.to_string()),
                    ("current", address.to_string()),
                ],
            );
        }
    }
    Ok(())
}

fn cmd_protect(app: &App, cmd: &ProtectCommands) -> anyhow::Result<()> {
    match cmd {
        ProtectCommands::Add { asset, caller } => {
            let caller = app.caller(caller)?;
            let mut bonding = app.load_state()?;
            bonding.add_protected_asset(&caller, *asset)?;
            app.state.save(&bonding)?;
            app.out.success("Asset protected", &[("asset", asset.to_canonical())]);
        }
        ProtectCommands::Remove { asset, caller } => {
            let caller = app.caller(caller)?;
            let mut bonding = app.load_state()?;
            bonding.remove_protected_asset(&caller, *asset)?;
            app.state.save(&bonding)?;
            app.out.success("Asset unprotected", &[("asset", asset.to_canonical())]);
        }
        ProtectCommands::Check { asset } => {
            let bonding = app.load_state()?;
            app.out.success(
                "Protection status",
                &[
                    ("asset", asset.to_canonical()),
                    ("protected", bonding.is_protected(asset).to_string()),
                ],
            );
        }
        ProtectCommands::List => {
            let bonding = app.load_state()?;
            let assets: Vec<String> = bonding
                .protected_assets()
                .iter()
                .map(AssetId::to_canonical)
                .collect();
            app.out.value(&serde_json::json!({ "protected": assets }));
        }
    }
    Ok(())
}

fn cmd_dust(app: &App, cmd: &DustCommands) -> anyhow::Result<()> {
    match cmd {
        DustCommands::Send {
            asset,
            to,
            amount,
            caller,
        } => {
            let caller = app.caller(caller)?;
            let mut bonding = app.load_state()?;
            let transfer = bonding.send_dust(&caller, *asset, *to, *amount)?;
            app.state.save(&bonding)?;
            app.out.success(
                "Dust sent",
                &[
                    ("asset", transfer.asset.to_canonical()),
                    ("destination", transfer.destination.to_string()),
                    ("amount", transfer.amount.to_string()),
                    ("remaining", bonding.holding_balance(asset).to_string()),
                ],
            );
        }
    }
    Ok(())
}

fn cmd_deposit(app: &App, cmd: &DepositCommands) -> anyhow::Result<()> {
    let mut bonding = app.load_state()?;
    let holding = bonding.holding_address();
    let asset = match cmd {
        DepositCommands::Native { amount } => {
            bonding.ledger_mut().deposit_native(holding, *amount)?;
            AssetId::Native
        }
        DepositCommands::Token { token, amount } => {
            bonding.ledger_mut().mint_token(*token, holding, *amount)?;
            AssetId::from_address(*token)
        }
    };
    app.state.save(&bonding)?;
    app.out.success(
        "Deposit recorded",
        &[
            ("asset", asset.to_canonical()),
            ("balance", bonding.holding_balance(&asset).to_string()),
        ],
    );
    Ok(())
}

fn cmd_balance(app: &App, account: Option<Address>) -> anyhow::Result<()> {
    let bonding = app.load_state()?;
    let account = account.unwrap_or_else(|| bonding.holding_address());
    let holdings = bonding.ledger().holdings(&account);

    let mut fields: Vec<(&str, String)> = vec![("account", account.to_string())];
    for (asset, amount) in &holdings {
        if asset.is_native() {
            let coins = amount.format_units(NATIVE_DECIMALS)?;
            fields.push(("native", format!("{} wei ({} ETH)", amount, coins)));
        } else {
            fields.push(("token", format!("{} {}", asset.to_canonical(), amount)));
        }
    }

    app.out.success("Balances", &fields);
    Ok(())
}

fn cmd_admin(app: &App, cmd: &AdminCommands) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::Show => {
            let bonding = app.load_state()?;
            app.out.success(
                "Administrator",
                &[("administrator", bonding.administrator().to_string())],
            );
        }
        AdminCommands::Transfer { new_admin, caller } => {
            let caller = app.caller(caller)?;
            let mut bonding = app.load_state()?;
            bonding.transfer_administrator(&caller, *new_admin)?;
            app.state.save(&bonding)?;
            app.out.success(
                "Administrator transferred",
                &[
                    ("previous", caller.to_string()),
                    ("current", new_admin.to_string()),
                ],
            );
        }
    }
    Ok(())
}

fn cmd_events(app: &App, since: u64, event_type: Option<&str>) -> anyhow::Result<()> {
    let bonding = app.load_state()?;
    let events: Vec<_> = bonding
        .events()
        .since(since)
        .iter()
        .filter(|e| event_type.map_or(true, |t| e.event_type() == t))
        .collect();

    app.out.value(&serde_json::json!({
        "head": bonding.events().head().to_hex(),
        "events": events,
    }));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn expand_path(path: &Path) -> anyhow::Result<PathBuf> {
    let path_str = path.to_string_lossy();
    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = std::env::var("HOME").context("HOME is not set")?;
        Ok(PathBuf::from(home).join(rest))
    } else {
        Ok(path.to_path_buf())
    }
}
