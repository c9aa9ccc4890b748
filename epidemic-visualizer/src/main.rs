use anyhow::{bail, Context, Result};
use clap::Parser;
use epidemic_common::History;
use log::info;
use plotters::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Command-line arguments for the chart renderer
#[derive(Parser, Debug)]
#[command(author, version, about = "Renders a recorded epidemic history as a line chart", long_about = None)]
struct Args {
    /// Input history file (.json or .bin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output chart image path (.png)
    #[arg(short, long, default_value = "epidemic_chart.png")]
    output: PathBuf,

    /// Width of the chart in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Height of the chart in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Chart only the most recent N samples
    #[arg(long)]
    tail: Option<usize>,
}

fn load_history(path: &Path) -> Result<History> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open history file '{}'", path.display()))?;
    let reader = BufReader::new(file);
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "json" => serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON history from '{}'", path.display())),
        "bin" => bincode::deserialize_from(reader)
            .with_context(|| format!("Failed to decode bincode history from '{}'", path.display())),
        other => bail!(
            "Unsupported history file extension '{}'; expected .json or .bin",
            other
        ),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut history = load_history(&args.input)?;
    if let Some(n) = args.tail {
        history = history.recent(n);
    }
    if history.is_empty() {
        bail!("History file '{}' contains no samples.", args.input.display());
    }
    info!(
        "Loaded {} samples from {}",
        history.len(),
        args.input.display()
    );

    let root = BitMapBackend::new(&args.output, (args.width, args.height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("Failed to fill chart background: {}", e))?;

    let gray = RGBColor(150, 150, 150);
    let mut chart = ChartBuilder::on(&root)
        .caption("Epidemic Simulation", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0..history.len(), 0f32..100f32)
        .map_err(|e| anyhow::anyhow!("Failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Percentage")
        .draw()
        .map_err(|e| anyhow::anyhow!("Failed to draw chart mesh: {}", e))?;

    let series = [
        (&history.susceptible, BLUE, "Susceptible"),
        (&history.infected, RED, "Infected"),
        (&history.recovered, GREEN, "Recovered"),
        (&history.dead, gray, "Death"),
    ];
    for (values, color, label) in series {
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, v)| (i, *v)),
                &color,
            ))
            .map_err(|e| anyhow::anyhow!("Failed to draw '{}' series: {}", label, e))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| anyhow::anyhow!("Failed to draw chart legend: {}", e))?;

    root.present()
        .map_err(|e| anyhow::anyhow!("Failed to write chart image: {}", e))?;
    info!("Chart written to {}", args.output.display());
    Ok(())
}
