//! Configuration management: init / show / path.

use std::io;

use portscout_config::{Profile, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }
        ConfigCommand::Show => show(),
        ConfigCommand::Init => init(global),
    }
}

fn show() -> Result<(), CliError> {
    let cfg = load_config_or_default();
    let text = toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    println!("{text}");
    Ok(())
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();

    let name: String = prompt("Profile name", Some("default"))?;

    let backend: String = prompt("Backend URL (e.g. https://switchdiag.internal:8000)", None)?;
    let _: url::Url = backend.parse().map_err(|_| CliError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {backend}"),
    })?;

    let username: String = prompt("Operator username (empty to skip)", Some(""))?;
    let insecure = output::confirm("Accept self-signed TLS certificates?", global.yes)?;

    cfg.profiles.insert(
        name.clone(),
        Profile {
            backend,
            username: if username.is_empty() { None } else { Some(username) },
            password: None,
            ca_cert: None,
            insecure: insecure.then_some(true),
            timeout: None,
        },
    );
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.clone());
    }

    save_config(&cfg)?;
    output::success(
        &format!("Profile '{name}' written to {}", config_path().display()),
        global.quiet,
    );
    Ok(())
}

fn prompt(message: &str, default: Option<&str>) -> Result<String, CliError> {
    let mut input = dialoguer::Input::new().with_prompt(message);
    if let Some(default) = default {
        input = input.default(default.to_owned()).show_default(!default.is_empty());
    }
    input
        .interact_text()
        .map_err(|e| CliError::Io(io::Error::other(e)))
}
