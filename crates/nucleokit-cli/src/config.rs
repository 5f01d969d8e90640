use crate::cli::ReplayArgs;
use crate::error::{CliError, Result};
use nucleokit::core::assembly::ChainRecompute;
use nucleokit::engine::config::EngineConfig;
use std::str::FromStr;
use tracing::debug;

/// Builds the engine configuration for a replay.
///
/// Precedence, lowest first: built-in defaults, the `--config` file, `-S key=value`
/// overrides, then the dedicated flags.
pub fn build_engine_config(args: &ReplayArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading engine configuration from file: {:?}", path);
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };

    apply_set_values(&mut config, &args.set_values)?;

    if let Some(threshold) = args.threshold {
        config.auto_assembly_threshold = threshold;
    }
    if let Some((width, height)) = args.canvas {
        config.canvas.width = width;
        config.canvas.height = height;
    }

    config.validate()?;
    debug!("Final engine configuration: {:?}", config);
    Ok(config)
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", expected, key, value))
    })
}

fn apply_set_values(config: &mut EngineConfig, set_values: &[String]) -> Result<()> {
    for kv_pair in set_values {
        let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;
        let key = key.trim();

        match key {
            "canvas.width" => config.canvas.width = parse_value(key, value, "float")?,
            "canvas.height" => config.canvas.height = parse_value(key, value, "float")?,
            "canvas.component-size" => {
                config.canvas.component_size = parse_value(key, value, "float")?
            }
            "auto-assembly-threshold" => {
                config.auto_assembly_threshold = parse_value(key, value, "float")?
            }
            "fine-tune-factor" => config.fine_tune_factor = parse_value(key, value, "float")?,
            "notice-ttl-ms" => config.notice_ttl_ms = parse_value(key, value, "integer")?,
            "chain-recompute" => {
                config.chain_recompute =
                    ChainRecompute::from_str(value).map_err(CliError::Config)?
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(())
}
