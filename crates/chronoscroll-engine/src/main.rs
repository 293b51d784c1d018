//! Headless driver for the Chronoscroll timeline engine.
//!
//! Loads configuration and a dataset, starts a [`TimelineDriver`] against an
//! in-memory surface, scrolls from the start of history to the bottom of
//! the scroll region, and writes the final surface snapshot to stdout as
//! JSON. Useful for checking a dataset end-to-end without a browser.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `chronoscroll-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the dataset from `timeline-data.json`
//! 4. Start the driver (readiness check, index, extent, initial pass)
//! 5. Sweep the viewport to the bottom
//! 6. Dump the snapshot
//!
//! `CHRONOSCROLL_CONFIG` and `CHRONOSCROLL_DATASET` override the two paths.
//!
//! [`TimelineDriver`]: chronoscroll_core::tick::TimelineDriver

mod error;

use std::path::{Path, PathBuf};

use chronoscroll_core::config::TimelineConfig;
use chronoscroll_core::surface::{HeadlessSurface, RenderSurface};
use chronoscroll_core::tick::{TickSummary, TimelineDriver, Viewport};
use chronoscroll_types::TimelineRecord;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "chronoscroll-config.yaml";

/// Default dataset file, relative to the working directory.
const DATASET_FILE: &str = "timeline-data.json";

/// Sweep step as a fraction of the viewport length.
const SWEEP_STEP_VIEWPORTS: f64 = 0.5;

/// Application entry point for the headless engine.
///
/// # Errors
///
/// Returns an error if configuration, the dataset, or the driver fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging. Logs go to stderr so stdout carries
    //    only the snapshot.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        zoom_factor = config.axis.zoom_factor,
        orientation = ?config.axis.orientation,
        policy = ?config.activation.policy,
        viewport_length = config.viewport.initial_length,
        "chronoscroll-engine starting"
    );

    // 3. Load the dataset.
    let records = load_dataset()?;
    info!(records = records.len(), "Dataset loaded");

    // 4. Start the driver.
    let mut driver = TimelineDriver::start(config, &records, HeadlessSurface::new())
        .map_err(EngineError::from)?;
    for id in driver.index().unresolved() {
        if let Some(event) = driver.index().get_by_id(*id) {
            warn!(
                event = event.description,
                date = event.date_text,
                "Event placed at present day"
            );
        }
    }

    // 5. Sweep to the bottom.
    let last = sweep_to_bottom(&mut driver)?;
    info!(
        ticks = last.tick,
        offset = last.viewport.offset,
        "Reached bottom of scroll region"
    );

    // 6. Dump the snapshot.
    let snapshot = driver.surface().snapshot();
    info!(
        nodes = snapshot.nodes.len(),
        mounts = driver.surface().mount_count(),
        unmounts = driver.surface().unmount_count(),
        label = %snapshot.center_label,
        "Sweep complete"
    );
    serde_json::to_writer_pretty(std::io::stdout().lock(), &snapshot)
        .map_err(|source| EngineError::Output { source })?;

    Ok(())
}

/// Load the timeline configuration.
///
/// Uses `CHRONOSCROLL_CONFIG` if set, else `chronoscroll-config.yaml` in the
/// working directory, else defaults.
fn load_config() -> Result<TimelineConfig, EngineError> {
    let config_path = std::env::var_os("CHRONOSCROLL_CONFIG")
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    if config_path.exists() {
        Ok(TimelineConfig::from_file(&config_path)?)
    } else {
        Ok(TimelineConfig::default())
    }
}

/// Scroll from offset 0 to the bottom of the scroll region in half-viewport
/// steps, returning the summary of the final tick.
///
/// The last step is clamped so the final tick always lands exactly on the
/// bottom.
fn sweep_to_bottom<S: RenderSurface>(
    driver: &mut TimelineDriver<S>,
) -> Result<TickSummary, EngineError> {
    let length = driver.viewport().length;
    let bottom = (driver.scroll_extent() - length).max(0.0);
    let step = (length * SWEEP_STEP_VIEWPORTS).max(1.0);
    let mut offset: f64 = 0.0;
    loop {
        let summary = driver.on_scroll(Viewport::new(offset.min(bottom), length))?;
        debug!(
            tick = summary.tick,
            offset = summary.viewport.offset,
            visible = summary.visible,
            active = summary.active,
            label = %summary.label,
            "Scrolled"
        );
        if offset >= bottom {
            return Ok(summary);
        }
        offset += step;
    }
}

/// Load the dataset named by `CHRONOSCROLL_DATASET`, else `timeline-data.json`.
fn load_dataset() -> Result<Vec<TimelineRecord>, EngineError> {
    let path = std::env::var_os("CHRONOSCROLL_DATASET")
        .map_or_else(|| PathBuf::from(DATASET_FILE), PathBuf::from);
    read_dataset(&path)
}

/// Read a dataset file: a JSON array of timeline records.
fn read_dataset(path: &Path) -> Result<Vec<TimelineRecord>, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::DatasetRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(path, &contents)
}

fn parse_dataset(path: &Path, contents: &str) -> Result<Vec<TimelineRecord>, EngineError> {
    serde_json::from_str(contents).map_err(|source| EngineError::DatasetParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> TimelineConfig {
        TimelineConfig::parse("calendar:\n  current_year: 2024\n").unwrap()
    }

    fn records() -> Vec<TimelineRecord> {
        parse_dataset(
            Path::new("inline.json"),
            r#"[
                {"description": "Big Bang", "era": "Cosmic", "date_string": "13.8 billion years ago"},
                {"description": "Dinosaurs vanish", "era": "Mesozoic", "date_string": "66 million years ago"},
                {"description": "Agriculture", "era": "Neolithic", "date_string": "10000 BCE"},
                {"description": "Moon landing", "era": "Modern", "date_string": "1969 CE"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn sweep_ends_at_bottom() {
        let mut driver =
            TimelineDriver::start(config(), &records(), HeadlessSurface::new()).unwrap();
        let last = sweep_to_bottom(&mut driver).unwrap();

        let bottom = driver.scroll_extent() - driver.viewport().length;
        assert!((last.viewport.offset - bottom).abs() < 1e-9);
        assert!(last.tick > 1);
        assert_eq!(driver.last_summary(), Some(&last));
        assert_eq!(driver.surface().center_label(), last.label);
    }

    #[test]
    fn malformed_dataset_is_a_parse_error() {
        let result = parse_dataset(Path::new("broken.json"), "[{\"description\": ");
        assert!(matches!(
            result,
            Err(EngineError::DatasetParse { ref path, .. }) if path == Path::new("broken.json")
        ));
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let result = parse_dataset(Path::new("object.json"), r#"{"events": []}"#);
        assert!(matches!(result, Err(EngineError::DatasetParse { .. })));
    }

    #[test]
    fn missing_dataset_is_a_read_error() {
        let path = std::env::temp_dir().join("chronoscroll-engine-no-such-dataset.json");
        let result = read_dataset(&path);
        assert!(matches!(result, Err(EngineError::DatasetRead { .. })));
    }

    #[test]
    fn project_dataset_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../timeline-data.json");
        let records = read_dataset(&path).unwrap();
        assert!(!records.is_empty());
    }
}
