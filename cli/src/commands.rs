use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use dodger_core::arena::{ArenaPhase, load_arena_from_file};
use dodger_core::context::{AppConfig, AppConfigExt, load_registry};

use crate::host::{ChannelNotifier, Notification, ScriptRender};
use crate::scenario::{self, Scenario, ScenarioError};

fn load_config(path: Option<&Path>) -> Result<Option<AppConfig>, ScenarioError> {
    Ok(match path {
        Some(path) => Some(AppConfig::load_from(path)?),
        None => None,
    })
}

/// Replay a scenario and print a summary
pub async fn run_scenario(path: &Path, config: Option<&PathBuf>, echo: bool) -> Result<(), String> {
    let scenario = Scenario::load(path).map_err(|e| e.to_string())?;
    let config = load_config(config.map(PathBuf::as_path))
        .map_err(|e| e.to_string())?
        .unwrap_or_else(|| scenario.config.clone());
    let registry = load_registry(&config).map_err(|e| e.to_string())?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let delivery = tokio::spawn(async move {
        let mut delivered = 0usize;
        while let Some(n) = rx.recv().await {
            tracing::info!(recipient = %n.recipient, sender = %n.sender, "Notification: {}", n.message);
            delivered += 1;
        }
        delivered
    });

    let name = if scenario.scenario.name.is_empty() {
        path.display().to_string()
    } else {
        scenario.scenario.name.clone()
    };
    tracing::info!(scenario = %name, frames = scenario.frames.len(), "Running scenario");

    let mut render = ScriptRender::new(echo);
    let report = scenario::run(
        &scenario,
        config,
        registry,
        ChannelNotifier::new(tx),
        &mut render,
    );

    // The notifier was dropped with the orchestrator, so the task drains and ends
    let delivered = delivery.await.map_err(|e| e.to_string())?;

    println!("scenario: {name}");
    println!("ticks: {}", report.ticks);
    println!(
        "draw calls: {} lines, {} texts, {} outlines",
        report.lines, report.texts, report.outlines
    );
    for (t, phase) in &report.phases {
        match phase {
            Some(phase) => println!("[{t:>8.3}] stage: {phase}"),
            None => println!("[{t:>8.3}] stage: none"),
        }
    }
    for (t, command) in &report.duty_commands {
        println!("[{t:>8.3}] duty: {}", command.label());
    }
    println!("notifications: {delivered}");
    for line in &report.status {
        println!("  {line}");
    }
    Ok(())
}

/// Validate definition files
pub fn check_definitions(paths: &[PathBuf]) -> Result<(), String> {
    let mut failed = 0;
    for path in paths {
        match load_arena_from_file(path) {
            Ok(def) => println!(
                "ok   {} ({}, {} hazards, {} waypoints)",
                path.display(),
                def.arena.phase,
                def.hazards.len(),
                def.waypoints.len()
            ),
            Err(e) => {
                failed += 1;
                println!("FAIL {}: {}", path.display(), e);
                let mut source = std::error::Error::source(&e);
                while let Some(cause) = source {
                    println!("     caused by: {cause}");
                    source = cause.source();
                }
            }
        }
    }
    if failed > 0 {
        return Err(format!("{failed} definition(s) failed validation"));
    }
    Ok(())
}

/// List the stages known to the configuration
pub fn list_arenas(config: Option<&PathBuf>) -> Result<(), String> {
    let config = load_config(config.map(PathBuf::as_path))
        .map_err(|e| e.to_string())?
        .unwrap_or_else(AppConfig::load);
    let registry = load_registry(&config).map_err(|e| e.to_string())?;

    for phase in ArenaPhase::ALL {
        match registry.definition(phase) {
            Some(def) => println!(
                "{phase}: {} (zone {}, {} hazards, {} waypoints)",
                def.arena.display_name(),
                def.arena.zone,
                def.hazards.len(),
                def.waypoints.len()
            ),
            None => println!("{phase}: no definition"),
        }
    }
    Ok(())
}

/// Print the config location and current values
pub fn show_config() -> Result<(), String> {
    match AppConfig::config_path() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# no config directory"),
    }
    let config = AppConfig::try_load().map_err(|e| e.to_string())?;
    let text = toml::to_string_pretty(&config).map_err(|e| e.to_string())?;
    print!("{text}");
    Ok(())
}
