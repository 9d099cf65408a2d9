use crate::Context;
use crate::cli::ConfigCommand;
use crate::config;
use crate::ui;
use anyhow::Result;
use std::process::ExitCode;

pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Path => path(ctx),
    }
}

fn show(ctx: &Context) -> Result<ExitCode> {
    ui::header("Connection");

    let path = config::location(ctx.config_path.as_deref())?;
    let file_state = if path.exists() { "" } else { " (not found)" };
    ui::kv("Config file", &format!("{}{file_state}", path.display()));

    let url = ctx.url();
    ui::kv("URL", if url.is_empty() { "<unset>" } else { &url });
    ui::kv(
        "Token",
        if ctx.token().is_empty() { "<unset>" } else { "<set>" },
    );
    ui::kv(
        "Project",
        &ctx.config
            .project_id(None)
            .map_or_else(|| "<unset>".to_string(), |id| id.to_string()),
    );

    if url.is_empty() || ctx.token().is_empty() {
        ui::warn("Set url and token in the config file, or via SEMAPHORE_URL and SEMAPHORE_TOKEN");
    }
    Ok(ExitCode::SUCCESS)
}

fn path(ctx: &Context) -> Result<ExitCode> {
    println!("{}", config::location(ctx.config_path.as_deref())?.display());
    Ok(ExitCode::SUCCESS)
}
