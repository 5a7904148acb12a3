//! Config subcommand handlers.

use std::io::BufRead;
use std::path::PathBuf;

use habconn_config::{Config, Endpoint, EndpointName, save_config_to, store_password};
use habconn_core::{EndpointConfig, NetworkType};

use crate::cli::{ConfigArgs, ConfigCommand, EndpointArg, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

fn invalid(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value
        .parse()
        .map_err(|_| invalid(field, "must be 'true' or 'false'"))
}

fn checked_url(field: &str, value: String) -> Result<String, CliError> {
    if EndpointConfig::new(&value, None, None).is_configured() {
        Ok(value)
    } else {
        Err(invalid(field, format!("not an http(s) URL: {value}")))
    }
}

fn endpoint_name(arg: EndpointArg) -> EndpointName {
    match arg {
        EndpointArg::Local => EndpointName::Local,
        EndpointArg::Remote => EndpointName::Remote,
    }
}

fn redacted(cfg: &Config) -> Config {
    let hide = |ep: &Endpoint| Endpoint {
        password: ep.password.as_ref().map(|_| REDACTED.into()),
        ..ep.clone()
    };
    Config {
        local: hide(&cfg.local),
        remote: hide(&cfg.remote),
        ..cfg.clone()
    }
}

/// Apply `key = value` to the config.
fn set_value(cfg: &mut Config, key: &str, value: String) -> Result<(), CliError> {
    let (section, name) = key.split_once('.').unwrap_or(("", key));
    let endpoint = match section {
        "local" => Some(&mut cfg.local),
        "remote" => Some(&mut cfg.remote),
        _ => None,
    };

    if let Some(ep) = endpoint {
        match name {
            "url" => ep.url = Some(checked_url(key, value)?),
            "username" => ep.username = Some(value),
            "password_env" | "password-env" => ep.password_env = Some(value),
            _ => return Err(unknown_key(key)),
        }
        return Ok(());
    }

    match key {
        "transport.insecure" => cfg.transport.insecure = parse_bool(key, &value)?,
        "transport.ignore_hostname" => cfg.transport.ignore_hostname = parse_bool(key, &value)?,
        "transport.ca_cert" => cfg.transport.ca_cert = Some(PathBuf::from(value)),
        "transport.client_cert" => cfg.transport.client_cert = Some(PathBuf::from(value)),
        "transport.client_key" => cfg.transport.client_key = Some(PathBuf::from(value)),
        "transport.timeout" => {
            cfg.transport.timeout = value
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid(key, "must be a positive number (seconds)"))?;
        }
        "demo_mode" => cfg.demo_mode = parse_bool(key, &value)?,
        "default_network" => {
            cfg.default_network = Some(
                value
                    .parse::<NetworkType>()
                    .map_err(|_| invalid(key, format!("unknown network type '{value}'")))?,
            );
        }
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> CliError {
    invalid(
        key,
        "unknown config key. Valid keys: {local,remote}.{url,username,password_env}, \
         transport.{insecure,ignore_hostname,ca_cert,client_cert,client_key,timeout}, \
         demo_mode, default_network",
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load(global)?);
            let out = output::render(global.output, &cfg, |c| {
                toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable config: {e}"))
            })?;
            output::print_output(&out);
            Ok(())
        }

        ConfigCommand::Init {
            local_url,
            remote_url,
            force,
        } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = Config::default();
            if let Some(url) = local_url {
                cfg.local.url = Some(checked_url("local_url", url)?);
            }
            if let Some(url) = remote_url {
                cfg.remote.url = Some(checked_url("remote_url", url)?);
            }

            save_config_to(&cfg, &path)?;
            eprintln!("Configuration written to {}", path.display());
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load(global)?;
            set_value(&mut cfg, &key, value)?;
            save_config_to(&cfg, &path)?;
            eprintln!("Set {key}");
            Ok(())
        }

        ConfigCommand::SetPassword { endpoint } => {
            let name = endpoint_name(endpoint);
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            let password = line.trim_end_matches(['\r', '\n']);

            if password.is_empty() {
                return Err(invalid("password", "value cannot be empty"));
            }

            store_password(name, password)?;
            eprintln!("Password for {} stored in system keyring", name.as_str());
            Ok(())
        }
    }
}
