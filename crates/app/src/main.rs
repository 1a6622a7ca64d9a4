mod cli;
mod commands;
mod tui;

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use services::{AppServices, Clock, SettingsOverrides, load_settings};
use tracing_subscriber::EnvFilter;
use ui::vm::{LoginAction, LoginVm};

use crate::cli::{Cli, Command, PlayArgs};
use crate::tui::PlayScreen;

const DEFAULT_LOG_FILTER: &str = "quiz=info,services=info,api=info";
/// While the play screen owns the terminal, only warnings reach stderr.
const PLAY_LOG_FILTER: &str = "quiz=warn,services=warn,api=warn";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let interactive = matches!(cli.command, Command::Play(_));
    init_tracing(cli.log_file.as_deref(), interactive)?;

    let overrides = SettingsOverrides {
        config_file: cli.config.clone(),
        base_url: cli.api_url.clone(),
        ranking_limit: None,
    };
    let settings = load_settings(&overrides).wrap_err("failed to load settings")?;
    tracing::debug!(base_url = %settings.api.base_url, shuffle = settings.quiz.shuffle, "starting");
    let services = AppServices::rest(settings, Clock::system())?;

    match cli.command {
        Command::Play(args) => play(&services, args).await,
        Command::Ranking { limit } => commands::ranking(&services, limit).await,
        Command::Login(credentials) => {
            commands::authenticate(&services, credentials, LoginAction::Login).await
        }
        Command::Register(credentials) => {
            commands::authenticate(&services, credentials, LoginAction::Register).await
        }
        Command::Questions(command) => commands::questions(&services, command).await,
    }
}

fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let default_filter = if interactive && log_file.is_none() {
        PLAY_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|err| eyre!("{err}"))
}

async fn play(services: &AppServices, args: PlayArgs) -> Result<()> {
    let greeting = match (args.email, args.password) {
        (Some(email), Some(password)) => {
            let mut vm = LoginVm::new();
            vm.email = email;
            vm.password = password;
            vm.submit(&services.auth(), LoginAction::Login)
                .await
                .map_err(|err| eyre!("login failed: {err}"))?;
            vm.greeting()
        }
        _ => None,
    };

    let mut terminal = ratatui::try_init()?;
    let result = PlayScreen::new(services.quiz(), greeting)
        .run(&mut terminal)
        .await;
    ratatui::try_restore()?;
    result
}
