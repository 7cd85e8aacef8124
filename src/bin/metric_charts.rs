use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use regression_metric_charts::config::{
    Args, FigureGeometry, OutputLayout, ACTUAL_RANGE, BASE_NOISE_STD, HIGHLIGHTED_SEGMENTS,
    TARGET_MAE,
};
use regression_metric_charts::dataset::base_sample;
use regression_metric_charts::figures::{ChartSet, Orientation};
use regression_metric_charts::metrics::Metrics;
use regression_metric_charts::scenarios::build_scenarios;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Args {
        output_dir,
        seed,
        samples,
        dpi,
    }: Args = Args::parse();

    let mut rng = StdRng::seed_from_u64(seed);

    let sample = base_sample(&mut rng, samples, ACTUAL_RANGE, BASE_NOISE_STD)?;

    let manual = Metrics::manual(sample.actual(), sample.predicted())?;
    let computed = sample.metrics()?;

    info!("MAE - Manual: {:.4}, ndarray: {:.4}", manual.mae, computed.mae);
    info!("MSE - Manual: {:.4}, ndarray: {:.4}", manual.mse, computed.mse);
    info!(
        "RMSE - Manual: {:.4}, from ndarray MSE: {:.4}",
        manual.rmse, computed.rmse
    );

    let scenarios = build_scenarios(&mut rng, samples, ACTUAL_RANGE, TARGET_MAE)?;

    for scenario in &scenarios {
        let metrics = scenario.sample.metrics()?;
        debug!(
            scenario = scenario.title(),
            mae = metrics.mae,
            mse = metrics.mse,
            rmse = metrics.rmse,
            "scenario built"
        );
    }

    let layout = OutputLayout::new(&output_dir);
    layout.prepare()?;

    let charts = ChartSet {
        sample: &sample,
        scenarios: &scenarios,
        target: TARGET_MAE,
        highlighted: HIGHLIGHTED_SEGMENTS,
        geometry: FigureGeometry::new(dpi),
    };

    let mut current = None;
    let saved = charts.render_all(&layout, |orientation, path| {
        if current != Some(orientation) {
            if orientation == Orientation::Alternative {
                info!("generating alternative plots (predicted on x, actual on y)..");
            }
            current = Some(orientation);
        }

        info!("Saved: {}", path.display());
    })?;

    info!("{} plots generated successfully", saved.len());

    Ok(())
}
