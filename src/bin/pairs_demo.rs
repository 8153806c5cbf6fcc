// Renders a pairs plot of synthetic correlated Gaussian samples to PNG.
use clap::Parser;
use indexmap::IndexMap;
use pears::cli::DemoArgs;
use pears::render::raster::draw_figure;
use pears::{Dataset, Key, PairsConfig, PairsPlot, Variables};
use plotters::prelude::*;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::error::Error;
use std::path::Path;
use tracing::info;

/// Shared-factor samples: variable k has mean k, scale 1 + k/2 and correlation that
/// weakens with k.
fn correlated_samples(
    vars: usize,
    samples: usize,
    seed: u64,
) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0)?;
    let mut columns = vec![Vec::with_capacity(samples); vars];
    for _ in 0..samples {
        let shared: f64 = normal.sample(&mut rng);
        for (k, column) in columns.iter_mut().enumerate() {
            let rho = 0.8 / (1.0 + k as f64 * 0.5);
            let own: f64 = normal.sample(&mut rng);
            let z = rho * shared + (1.0 - rho * rho).sqrt() * own;
            column.push(k as f64 + (1.0 + k as f64 * 0.5) * z);
        }
    }
    Ok(columns)
}

fn render_png<D: Dataset + ?Sized>(
    plot: &PairsPlot,
    dataset: &D,
    vars: &Variables<'_>,
    out: &Path,
) -> Result<(), Box<dyn Error>> {
    let figure = plot.render(dataset, vars)?;
    if let Some(dir) = out.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let root = BitMapBackend::new(out, figure.geometry().pixel_size()).into_drawing_area();
    draw_figure(&figure, &root)?;
    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = DemoArgs::parse();
    let config = PairsConfig::load_or_default(&args.config);
    let plot = PairsPlot::new(config);

    let columns = correlated_samples(args.vars, args.samples, args.seed)?;
    let truths: Vec<f64> = (0..args.vars).map(|k| k as f64).collect();
    let truths = args.truths.then_some(truths.as_slice());
    let out = Path::new(&args.out);

    if args.named {
        let named: IndexMap<String, Vec<f64>> = columns
            .into_iter()
            .enumerate()
            .map(|(k, col)| (format!("theta_{k}"), col))
            .collect();
        // Reverse order exercises explicit key selection.
        let indices: Vec<Key> = named.keys().rev().map(|k| Key::from(k.as_str())).collect();
        let truths_rev: Option<Vec<f64>> = truths.map(|t| t.iter().rev().copied().collect());
        let vars = Variables {
            indices: Some(&indices),
            truths: truths_rev.as_deref(),
            ..Default::default()
        };
        render_png(&plot, &named, &vars, out)?;
    } else {
        let labels: Vec<String> = (0..args.vars).map(|k| format!("x{k}")).collect();
        let vars = Variables {
            labels: Some(&labels),
            truths,
            ..Default::default()
        };
        render_png(&plot, &columns, &vars, out)?;
    }

    info!(
        "Wrote {} ({} variables, {} samples)",
        out.display(),
        args.vars,
        args.samples
    );
    Ok(())
}
