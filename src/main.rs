use chrono::Utc;
use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use elecmate::clipboard::{Clipboard, CommandClipboard, MemoryClipboard, copy_with_notice};
use elecmate::connect::{
    FunctionsConfig, FunctionsConnectClient, PaymentsConnect, RefreshOutcome, RedirectOutcome, StatusBoard,
    consume_redirect,
};
use elecmate::export::{ExportFormat, Exporter, SYSTEM_PROMPT};
use elecmate::notice::{Notice, NoticeLevel};
use elecmate::progress::ProgressTracker;
use elecmate::settings::{JsonlSettingsStore, LogoUpload, SettingsStore, VoiceAgentSettings};
use elecmate::tools::{Tool, ToolCard, ToolRegistry};
use elecmate::tui::{App, TuiRunner, init_terminal, restore_terminal};
use elecmate::wizard::{Wizard, WizardAction};
use elecmate::ElecMateError;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{
    AgentCommands, BrandingCommands, Commands, ProgressCommands, StripeCommands, ToolsCommands, WizardCommands,
};
use config::Config;

fn setup_logging(level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("elecmate")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("elecmate.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the config file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.unwrap_or("info")))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Registry, settings and progress shared by every command
struct AppContext {
    config: Config,
    registry: Arc<ToolRegistry>,
    store: Arc<dyn SettingsStore>,
}

impl AppContext {
    fn open(cli: &Cli, config: Config) -> Result<Self> {
        let registry = match &config.registry.path {
            Some(path) => ToolRegistry::from_file(path).context(format!("Failed to load registry {}", path.display()))?,
            None => ToolRegistry::embedded().context("Failed to load embedded registry")?,
        };

        let profile = cli.profile.as_deref().unwrap_or(&config.profile);
        let store = JsonlSettingsStore::open_profile(&config.storage.data_dir, profile)
            .context(format!("Failed to open settings for profile '{}'", profile))?;
        info!("Using settings at {}", store.path().display());

        Ok(Self {
            config,
            registry: Arc::new(registry),
            store: Arc::new(store),
        })
    }

    fn tracker(&self) -> Result<ProgressTracker> {
        Ok(ProgressTracker::load(self.store.clone(), &self.registry).context("Failed to load progress")?)
    }

    fn clipboard(&self) -> Arc<dyn Clipboard> {
        match CommandClipboard::from_command_line(&self.config.clipboard.command) {
            Ok(clipboard) => Arc::new(clipboard),
            Err(e) => {
                warn!("Clipboard unavailable, copies stay in memory: {}", e);
                Arc::new(MemoryClipboard::new())
            }
        }
    }

    fn exporter(&self) -> Exporter {
        Exporter::new(self.config.export.labels())
    }

    fn connect_client(&self) -> Result<FunctionsConnectClient> {
        let connect = &self.config.connect;
        let token = std::env::var(&connect.access_token_env).unwrap_or_default();
        let config = FunctionsConfig {
            base_url: connect.functions_url.clone(),
            timeout: connect.timeout(),
        };
        Ok(FunctionsConnectClient::new(token, config)?)
    }
}

fn print_notice(notice: &Notice) {
    let message = match notice.level {
        NoticeLevel::Info => notice.message.cyan(),
        NoticeLevel::Success => notice.message.green(),
        NoticeLevel::Warning => notice.message.yellow(),
        NoticeLevel::Error => notice.message.red(),
    };
    println!("{}", message);
}

fn print_card(card: &ToolCard) {
    for (i, line) in card.lines().into_iter().enumerate() {
        if i == 0 && card.configured {
            println!("{}", line.green());
        } else if i == 0 {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}

fn filter_tools<'r>(registry: &'r ToolRegistry, category: Option<&str>, search: Option<&str>) -> Vec<&'r Tool> {
    registry
        .search(search.unwrap_or(""))
        .into_iter()
        .filter(|t| category.is_none_or(|c| t.category.as_deref() == Some(c)))
        .collect()
}

async fn run_application(cli: &Cli, ctx: &AppContext) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None | Some(Commands::Tui) => run_tui(ctx).await,
        Some(Commands::Tools { command }) => handle_tools_command(command, ctx),
        Some(Commands::Progress { command }) => handle_progress_command(command, ctx),
        Some(Commands::Wizard { command }) => handle_wizard_command(command, ctx),
        Some(Commands::Export {
            format,
            category,
            search,
            output,
        }) => handle_export_command(*format, category.as_deref(), search.as_deref(), output.as_ref(), ctx),
        Some(Commands::Prompt { copy }) => handle_prompt_command(*copy, ctx),
        Some(Commands::Agent { command }) => handle_agent_command(command, ctx),
        Some(Commands::Branding { command }) => handle_branding_command(command, ctx),
        Some(Commands::Stripe { command }) => handle_stripe_command(command, ctx).await,
    }
}

async fn run_tui(ctx: &AppContext) -> Result<()> {
    info!("Launching TUI mode");
    let app = App::new(ctx.registry.clone(), ctx.tracker()?, ctx.clipboard(), ctx.config.export.labels());

    let terminal = init_terminal().context("Failed to initialize terminal")?;
    let mut runner = TuiRunner::new(terminal, app, ctx.config.tui.tick_rate_ms);
    let result = runner.run().await;
    restore_terminal().context("Failed to restore terminal")?;
    result
}

fn handle_tools_command(command: &ToolsCommands, ctx: &AppContext) -> Result<()> {
    info!("Handling tools command: {:?}", command);
    let registry = &ctx.registry;
    match command {
        ToolsCommands::List {
            category,
            search,
            expanded,
        } => {
            let tracker = ctx.tracker()?;
            let tools = filter_tools(registry, category.as_deref(), search.as_deref());
            for tool in &tools {
                print_card(&ToolCard::new(tool, tracker.is_configured(&tool.name)).expanded(*expanded));
            }
            println!("{}", format!("{} of {} tools", tools.len(), registry.total_count()).dimmed());
        }
        ToolsCommands::Categories => {
            for category in registry.categories() {
                println!("{} ({})", category, registry.by_category(category).len());
            }
        }
        ToolsCommands::Show { name } => {
            let tool = registry
                .get(name)
                .ok_or_else(|| ElecMateError::ToolNotFound(name.clone()))?;
            let tracker = ctx.tracker()?;
            print_card(&ToolCard::new(tool, tracker.is_configured(name)).expanded(true));
        }
        ToolsCommands::Copy { name, field } => {
            let tool = registry
                .get(name)
                .ok_or_else(|| ElecMateError::ToolNotFound(name.clone()))?;
            let tracker = ctx.tracker()?;
            let text = ToolCard::new(tool, tracker.is_configured(name)).copy_text(*field, &ctx.config.export.labels())?;
            print_notice(&copy_with_notice(ctx.clipboard().as_ref(), &text, field.label()));
        }
        ToolsCommands::Count => println!("{}", registry.total_count()),
    }
    Ok(())
}

fn handle_progress_command(command: &ProgressCommands, ctx: &AppContext) -> Result<()> {
    info!("Handling progress command: {:?}", command);
    let registry = &ctx.registry;
    let mut tracker = ctx.tracker()?;
    match command {
        ProgressCommands::Show => {
            let configured = tracker.configured_count(registry);
            println!(
                "{} {}/{} ({:.0}%)",
                "Configured:".green(),
                configured,
                registry.total_count(),
                tracker.progress_fraction(registry) * 100.0
            );
            let stale = tracker.stale_entries(registry);
            if !stale.is_empty() {
                println!(
                    "{} {} entries for tools no longer in the registry (run `progress prune`)",
                    "Stale:".yellow(),
                    stale.len()
                );
            }
        }
        ProgressCommands::Mark { name } => {
            if !registry.contains(name) {
                warn!("Marking unknown tool {}", name);
                print_notice(&Notice::warning(format!("{} is not in the registry", name)));
            }
            if tracker.mark_configured(name)? {
                print_notice(&Notice::success(format!("{} marked as configured", name)));
            } else {
                print_notice(&Notice::info(format!("{} is already configured", name)));
            }
        }
        ProgressCommands::Toggle { name } => {
            let configured = tracker.toggle_configured(name)?;
            let state = if configured { "configured" } else { "not configured" };
            print_notice(&Notice::success(format!("{} is now {}", name, state)));
        }
        ProgressCommands::Prune => {
            let removed = tracker.prune_stale(registry)?;
            print_notice(&Notice::info(format!("Removed {} stale entries", removed)));
        }
        ProgressCommands::Reset { yes } => {
            if !*yes {
                return Err(eyre!("Refusing to reset progress without --yes"));
            }
            tracker.reset()?;
            print_notice(&Notice::success("Progress cleared"));
        }
    }
    Ok(())
}

fn resolve_target(target: &str, registry: &ToolRegistry) -> Result<usize> {
    if let Ok(position) = target.parse::<usize>() {
        return Ok(position.saturating_sub(1));
    }
    registry
        .position(target)
        .ok_or_else(|| ElecMateError::ToolNotFound(target.to_string()).into())
}

fn handle_wizard_command(command: &WizardCommands, ctx: &AppContext) -> Result<()> {
    info!("Handling wizard command: {:?}", command);
    let mut tracker = ctx.tracker()?;
    let Some(mut wizard) = Wizard::resume(ctx.registry.clone(), &tracker) else {
        print_notice(&Notice::info("No tools in the registry"));
        return Ok(());
    };

    let action = match command {
        WizardCommands::Show => None,
        WizardCommands::Next => Some(WizardAction::Next),
        WizardCommands::Prev => Some(WizardAction::Previous),
        WizardCommands::MarkNext => Some(WizardAction::MarkAndNext),
        WizardCommands::Skip => Some(WizardAction::SkipToNextUnconfigured),
        WizardCommands::Goto { target } => Some(WizardAction::JumpTo(resolve_target(target, &ctx.registry)?)),
    };
    if let Some(action) = action {
        for notice in wizard.dispatch(action, &mut tracker)? {
            print_notice(&notice);
        }
    }

    let (configured, total) = wizard.progress(&tracker);
    println!(
        "{}",
        format!("Tool {} of {} | {}/{} configured", wizard.index() + 1, total, configured, total).cyan()
    );
    let tool = wizard.current();
    print_card(&ToolCard::new(tool, tracker.is_configured(&tool.name)).expanded(true));
    Ok(())
}

fn handle_export_command(
    format: Option<ExportFormat>,
    category: Option<&str>,
    search: Option<&str>,
    output: Option<&PathBuf>,
    ctx: &AppContext,
) -> Result<()> {
    info!("Exporting tools (category: {:?}, search: {:?})", category, search);
    let format = format.unwrap_or(ctx.config.export.format);
    let tools = filter_tools(&ctx.registry, category, search);
    let document = ctx.exporter().export_tools_at(tools, ctx.registry.digest(), Utc::now());
    let rendered = document.render(format)?;

    match output {
        Some(path) => {
            fs::write(path, &rendered).context(format!("Failed to write {}", path.display()))?;
            print_notice(&Notice::success(format!(
                "Exported {} tools to {}",
                document.tool_count,
                path.display()
            )));
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn handle_prompt_command(copy: bool, ctx: &AppContext) -> Result<()> {
    if copy {
        print_notice(&copy_with_notice(ctx.clipboard().as_ref(), SYSTEM_PROMPT, "System prompt"));
    } else {
        println!("{}", SYSTEM_PROMPT);
    }
    Ok(())
}

fn handle_agent_command(command: &AgentCommands, ctx: &AppContext) -> Result<()> {
    match command {
        AgentCommands::Show => {
            let settings = VoiceAgentSettings::load(ctx.store.as_ref())?;
            println!(
                "{} {}",
                "Agent ID:".green(),
                settings.agent_id.as_deref().unwrap_or("(not set)")
            );
            println!(
                "{} {}",
                "API key:".green(),
                settings.masked_api_key().as_deref().unwrap_or("(not set)")
            );
        }
        AgentCommands::Set { agent_id, api_key } => {
            info!("Saving voice agent settings");
            VoiceAgentSettings {
                agent_id: Some(agent_id.clone()),
                api_key: api_key.clone(),
            }
            .save(ctx.store.as_ref())?;
            print_notice(&Notice::success("Voice agent settings saved"));
        }
    }
    Ok(())
}

fn handle_branding_command(command: &BrandingCommands, ctx: &AppContext) -> Result<()> {
    match command {
        BrandingCommands::Logo { path, size } => {
            let upload = LogoUpload::from_path(path)?;
            upload.save(ctx.store.as_ref(), *size)?;
            print_notice(&Notice::success(format!("Logo saved ({} bytes)", upload.bytes)));
        }
    }
    Ok(())
}

async fn print_status(client: &dyn PaymentsConnect) -> Result<()> {
    let board = StatusBoard::new();
    if let RefreshOutcome::Failed(notice) = board.refresh(client).await {
        print_notice(&notice);
        return Ok(());
    }
    let status = board.status()?;
    println!("{} {}", "Status:".green(), status.status.label());
    if !status.stripe_configured {
        print_notice(&Notice::warning("Stripe is not configured on the server"));
    }
    if let Some(account) = &status.account {
        if let Some(name) = &account.business_name {
            println!("  Business: {}", name);
        }
        println!("  Charges enabled: {}", account.charges_enabled);
        println!("  Payouts enabled: {}", account.payouts_enabled);
    }
    if status.can_accept_payments() {
        print_notice(&Notice::success("Card payments are enabled"));
    }
    Ok(())
}

async fn handle_stripe_command(command: &StripeCommands, ctx: &AppContext) -> Result<()> {
    info!("Handling stripe command: {:?}", command);

    // Redirect parsing needs no network
    if let StripeCommands::Redirect { url } = command {
        let consumed = consume_redirect(url)?;
        match &consumed.outcome {
            Some(outcome) => print_notice(&outcome.notice()),
            None => print_notice(&Notice::info("No Stripe parameter in URL")),
        }
        println!("{}", consumed.cleaned_url);
        if consumed.outcome == Some(RedirectOutcome::Success) {
            if let Ok(client) = ctx.connect_client() {
                print_status(&client).await?;
            }
        }
        return Ok(());
    }

    let client = ctx.connect_client()?;
    match command {
        StripeCommands::Status => print_status(&client).await?,
        StripeCommands::Connect { business_name, email } => {
            let created = client.create_account(business_name, email).await?;
            print_notice(&Notice::success("Stripe account created, finish onboarding at:"));
            println!("{}", created.onboarding_url);
        }
        StripeCommands::Link { mode } => {
            let link = client.onboarding_link(*mode).await?;
            println!("{}", link.url);
        }
        StripeCommands::Disconnect => {
            client.disconnect().await?;
            print_notice(&Notice::success("Stripe account disconnected"));
        }
        StripeCommands::Redirect { .. } => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;
    info!("Starting with config from: {:?}", cli.config);

    let ctx = AppContext::open(&cli, config)?;

    run_application(&cli, &ctx).await.context("Application failed")?;

    Ok(())
}
