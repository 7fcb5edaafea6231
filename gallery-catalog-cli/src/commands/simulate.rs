//! Drive a catalog through a simulated scroll.
//!
//! Builds a catalog over synthetic items backed by [`SimulatedLoader`], then
//! slides a visible window from the first to the last position, calling
//! `load_range` for the window on every step the way a scroll handler would.
//! Failed positions are retried naturally when the window covers them again.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;

use gallery_catalog::bitmap::solid_bitmap;
use gallery_catalog::{Catalog, ChannelObserver, Item, ResourceId};

use super::{format_size, load_config};
use crate::error::CliError;
use crate::simulated::SimulatedLoader;

/// Colour of the global placeholder.
const GLOBAL_PLACEHOLDER_RGBA: [u8; 4] = [40, 40, 40, 255];

/// How long to wait for outstanding loads after the last step.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Arguments for the `simulate` command.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Number of items in the catalog
    #[arg(long, default_value_t = 200)]
    pub items: usize,

    /// Override the configured target size (pixels)
    #[arg(long)]
    pub target_size: Option<u32>,

    /// Number of positions visible at once
    #[arg(long, default_value_t = 12)]
    pub window: usize,

    /// Number of scroll steps from top to bottom
    #[arg(long, default_value_t = 40)]
    pub steps: usize,

    /// Simulated fetch latency per image
    #[arg(long, default_value_t = 20)]
    pub latency_ms: u64,

    /// Delay between scroll steps
    #[arg(long, default_value_t = 10)]
    pub step_ms: u64,

    /// Fail every n-th request
    #[arg(long)]
    pub fail_every: Option<u64>,

    /// Pause loading for a moment at this step (simulates a fling)
    #[arg(long)]
    pub pause_at: Option<usize>,

    /// INI file with a [catalog] section
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the simulation and print a summary.
pub fn run(args: SimulateArgs) -> Result<(), CliError> {
    if args.window == 0 || args.steps == 0 {
        return Err(CliError::InvalidArgs(
            "--window and --steps must be greater than zero".to_string(),
        ));
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(size) = args.target_size {
        config = config.with_target_size(size);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let loader = Arc::new(SimulatedLoader::new(
        runtime.handle().clone(),
        Duration::from_millis(args.latency_ms),
        args.fail_every,
    ));
    let catalog = Catalog::new(synthetic_items(args.items), config, loader.clone())?;
    catalog.set_placeholder(solid_bitmap(catalog.target_size(), GLOBAL_PLACEHOLDER_RGBA));

    let (observer, ready_rx) = ChannelObserver::new();
    catalog.subscribe(Arc::new(observer));

    tracing::info!(
        items = args.items,
        window = args.window,
        steps = args.steps,
        "Starting scroll simulation"
    );

    let started = Instant::now();
    let ready_events = runtime.block_on(scroll(&catalog, &loader, &args, ready_rx));
    let elapsed = started.elapsed();

    print_summary(&catalog, &args, ready_events, elapsed);
    Ok(())
}

async fn scroll(
    catalog: &Catalog,
    loader: &SimulatedLoader,
    args: &SimulateArgs,
    mut ready_rx: UnboundedReceiver<usize>,
) -> u64 {
    let progress = ProgressBar::new(args.steps as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} steps {msg}") {
        progress.set_style(style);
    }

    let mut ready_events = 0u64;
    for step in 0..args.steps {
        let first = window_start(step, args.steps, catalog.size(), args.window);
        catalog.load_range(first..first + args.window);

        if args.pause_at == Some(step) {
            catalog.pause();
            progress.set_message("paused");
            tokio::time::sleep(Duration::from_millis(args.latency_ms * 3)).await;
            catalog.resume();
            progress.set_message("");
        }

        while ready_rx.try_recv().is_ok() {
            ready_events += 1;
        }

        tokio::time::sleep(Duration::from_millis(args.step_ms)).await;
        progress.inc(1);
    }
    progress.finish_and_clear();

    // Let outstanding loads land before reporting
    let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
        while catalog.stats().in_flight() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            in_flight = catalog.stats().in_flight(),
            paused = loader.is_paused(),
            "Timed out waiting for outstanding loads"
        );
    }

    while ready_rx.try_recv().is_ok() {
        ready_events += 1;
    }
    ready_events
}

fn print_summary(catalog: &Catalog, args: &SimulateArgs, ready_events: u64, elapsed: Duration) {
    let stats = catalog.stats();
    let last = window_start(args.steps - 1, args.steps, catalog.size(), args.window);
    let end = (last + args.window).min(catalog.size());

    let (mut ready, mut placeholder) = (0, 0);
    for position in last..end {
        if matches!(catalog.is_bitmap_ready(position), Ok(true)) {
            ready += 1;
        } else if matches!(catalog.is_placeholder_ready(position), Ok(true)) {
            placeholder += 1;
        }
    }

    println!("Simulation finished in {:.2}s", elapsed.as_secs_f64());
    println!("  Catalog:         {} items @ {} px", catalog.size(), catalog.target_size());
    println!("  Activity:        {}", stats);
    println!("  Ready events:    {}", ready_events);
    println!(
        "  Final window:    {}..{} ({} ready, {} placeholder)",
        last, end, ready, placeholder
    );
    println!("  Retained memory: {}", format_size(catalog.retained_bytes()));
}

/// First visible position at `step` when scrolling linearly to the end.
pub fn window_start(step: usize, steps: usize, size: usize, window: usize) -> usize {
    let max_start = size.saturating_sub(window);
    if steps <= 1 {
        return 0;
    }
    step.min(steps - 1) * max_start / (steps - 1)
}

/// Items alternating between resource-backed and URL-backed sources.
pub fn synthetic_items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| match i % 3 {
            0 => Item::from_resource(ResourceId::new(i as u32)),
            1 => Item::from_url(format!("https://images.example.com/{}.jpg", i))
                .with_placeholder(ResourceId::new(0)),
            _ => Item::from_resource(ResourceId::new(i as u32))
                .with_url(format!("https://images.example.com/{}.jpg", i))
                .with_placeholder(ResourceId::new(0)),
        })
        .collect()
}
