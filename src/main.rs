mod config;
mod grid;
mod lens;
mod lightcurve;
mod render;
mod source;
mod visualisation;

use anyhow::{anyhow, Result};
use config::Config;
use grid::Grid;
use lens::LensParams;
use lightcurve::LightCurveSampler;
use render::ImageRenderer;
use source::SourceField;
use visualisation::LensVisualiser;

struct Args {
    config_path: Option<String>,
    lens_x: f64,
    curve: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config_path: None,
        lens_x: 0.0,
        curve: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config_path = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("--config requires a file path"))?,
                );
            }
            "--lens-x" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--lens-x requires a value"))?;
                args.lens_x = value
                    .parse()
                    .map_err(|_| anyhow!("Invalid lens position '{}'", value))?;
            }
            "--curve" => args.curve = true,
            other => {
                return Err(anyhow!(
                    "Unknown argument '{}'\nUsage: microlens [--config FILE] [--lens-x X] [--curve]",
                    other
                ));
            }
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let config = match &args.config_path {
        Some(path) => Config::from_file(path)?,
        None => {
            let config = Config::default();
            config.validate()?;
            config
        }
    };
    config.print_summary();

    // Build the immutable simulation context once; everything downstream
    // only reads from it.
    let grid = Grid::centred(config.grid.size, config.grid.half_extent);
    let source = SourceField::build(&grid, config.source.width);
    let lens_params = LensParams::new(config.lens.theta_e, config.lens.epsilon);
    let renderer = ImageRenderer::new(grid, lens_params, &source);

    let visualiser = LensVisualiser::new(
        &config.visualization.output_dir,
        config.visualization.image_width,
        config.visualization.image_height,
        config.visualization.log_floor,
    );

    println!("Rendering lensed image at x = {:.3}...", args.lens_x);
    let image = renderer.render_parallel(args.lens_x, 0.0);
    println!("Total brightness: {:.4}", image.sum());
    if let Err(e) = visualiser.plot_lensed_image(&image, renderer.extent(), args.lens_x) {
        eprintln!("Warning: Failed to plot image: {}", e);
    }

    if args.curve {
        println!(
            "Sampling light curve over [{}, {}] ({} positions)...",
            config.sweep.min, config.sweep.max, config.sweep.samples
        );
        let positions = Grid::linspace(config.sweep.min, config.sweep.max, config.sweep.samples);
        let sampler = LightCurveSampler::new(&renderer);
        let curve = sampler.sample_parallel(&positions);

        let peak = curve
            .iter()
            .map(|p| p.brightness)
            .fold(f64::NEG_INFINITY, f64::max);
        println!("Light curve complete (peak brightness {:.4})", peak);

        if let Err(e) = visualiser.plot_light_curve(&curve) {
            eprintln!("Warning: Failed to plot light curve: {}", e);
        }
        if let Err(e) = visualiser.write_light_curve_csv(&curve) {
            eprintln!("Warning: Failed to write light curve CSV: {}", e);
        }
    }

    Ok(())
}
