use anyhow::{Context, Result};
use latexmd_config::SiteConfig;
use latexmd_site::build_site;
use std::{env, path::PathBuf, process};

fn load_config(args: &[String]) -> Result<SiteConfig> {
    match args {
        [_] => {
            let config = SiteConfig::load().with_context(|| {
                format!(
                    "Failed to load config file {}",
                    SiteConfig::config_path().display()
                )
            })?;
            if config.is_none() {
                log::info!(
                    "No {} found, using defaults",
                    SiteConfig::config_path().display()
                );
            }
            Ok(config.unwrap_or_default())
        }
        [_, path] => {
            let path = PathBuf::from(path);
            SiteConfig::load_from_path(&path)?
                .with_context(|| format!("Config file not found: {}", path.display()))
        }
        _ => {
            let program = args.first().map_or("latexmd-cli", String::as_str);
            eprintln!("Usage: {program} [config.toml]");
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let result = load_config(&args).and_then(|config| {
        log::info!(
            "Building {} -> {}",
            config.src.display(),
            config.tgt.display()
        );
        Ok(build_site(&config)?)
    });

    match result {
        Ok(summary) => log::info!("Built {} files", summary.written.len()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
