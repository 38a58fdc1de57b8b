//! # Soluna Application Entry Point
//!
//! This binary wires configuration, location resolution, the ephemeris
//! core and rendering together for one widget refresh. Text output by
//! default, JSON with `--json`.
//!
//! ## Flags
//! - `--json`: print the full report as JSON
//! - `--config <path>`: config file (default `soluna-config.toml`)
//! - `--offline`: skip the live lookup; use the cache, then the fixed location

use anyhow::Context;
use chrono::Local;
use log::{info, warn};
use std::env;
use std::time::Duration;

use soluna_lib::config::{Config, CONFIG_FILE};
use soluna_lib::location::{
    FixedLookup, HttpLookup, LocationInfo, LocationResolver, LocationSource, ResolvedLocation,
};
use soluna_lib::renderer::{draw_ascii, render_json};
use soluna_lib::{build_report, DaySummaryBuilder, ReportOptions};

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    json: bool,
    offline: bool,
    config_path: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--offline" => args.offline = true,
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config_path = Some(path);
            }
            other => warn!("Ignoring unknown argument {}", other),
        }
    }
    Ok(args)
}

fn fixed_location(config: &Config) -> ResolvedLocation {
    ResolvedLocation {
        info: LocationInfo {
            latitude: config.location.latitude,
            longitude: config.location.longitude,
            label: config.location.label.clone(),
        },
        source: LocationSource::Live,
    }
}

/// Resolve the observer, honouring `use_fixed` and `--offline`.
fn resolve_location(config: &Config, offline: bool) -> anyhow::Result<ResolvedLocation> {
    let resolver = LocationResolver::new(
        &config.location.cache_path,
        Duration::from_millis(config.location.timeout_ms),
    );

    if offline {
        info!("Offline mode, skipping location lookup");
        return Ok(resolver.cached().unwrap_or_else(|| fixed_location(config)));
    }

    // Create Tokio runtime for the lookup race
    let rt = tokio::runtime::Runtime::new()?;
    let resolved = if config.location.use_fixed {
        rt.block_on(resolver.resolve(&FixedLookup(fixed_location(config).info)))
    } else {
        rt.block_on(resolver.resolve(&HttpLookup::new(&config.location.lookup_url)))
    };

    // Network errors are expected; the configured location keeps the widget alive
    Ok(resolved.unwrap_or_else(|error| {
        warn!("Location resolution failed: {}", error);
        warn!(
            "Falling back to configured location {}",
            config.location.label
        );
        fixed_location(config)
    }))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = Config::load_from_path(args.config_path.as_deref().unwrap_or(CONFIG_FILE));

    let location = resolve_location(&config, args.offline)?;
    let coord = location
        .info
        .coordinate()
        .with_context(|| format!("unusable coordinates for {}", location.info.label))?;
    info!(
        "Observer at {:.4}, {:.4} ({})",
        coord.latitude, coord.longitude, location.info.label
    );

    let builder =
        DaySummaryBuilder::default().with_observer_height(config.display.observer_height_m);
    let options = ReportOptions {
        window: config.display.yearly_window(),
        include_aliases: config.display.show_aliases,
    };
    let now = Local::now();
    let report = build_report(&builder, &now, coord, &location.info.label, options)
        .context("computing sun and moon report")?;

    if args.json {
        println!("{}", render_json(&report).context("serializing report")?);
    } else {
        let cached = matches!(location.source, LocationSource::Cached { .. });
        draw_ascii(&mut std::io::stdout().lock(), &report, cached)
            .context("writing report")?;
    }

    Ok(())
}
