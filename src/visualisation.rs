use crate::lightcurve::LightCurvePoint;
use ndarray::Array2;
use plotters::prelude::*;

pub struct LensVisualiser {
    output_dir: String,
    width: u32,
    height: u32,
    log_floor: f64,
    // Store as a boxed trait object
    gradient: Box<dyn colorgrad::Gradient>,
}

impl LensVisualiser {
    pub fn new(output_dir: &str, width: u32, height: u32, log_floor: f64) -> Self {
        std::fs::create_dir_all(output_dir).unwrap();

        let gradient = Box::new(colorgrad::preset::inferno());

        Self {
            output_dir: output_dir.to_string(),
            width,
            height,
            log_floor,
            gradient,
        }
    }

    /// Plot a lensed image on a logarithmic colour scale.
    ///
    /// Axes carry the physical extent (grid min/max on both axes), matching
    /// what the simulation hands to the presentation layer. Values are
    /// floored before taking the log so fully dark cells stay plottable.
    pub fn plot_lensed_image(
        &self,
        image: &Array2<f64>,
        extent: (f64, f64),
        lens_x: f64,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let filename = format!("{}/lensed_x{:+.3}.png", self.output_dir, lens_x);
        let root = BitMapBackend::new(&filename, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (n_rows, n_cols) = image.dim();
        let (min, max) = extent;
        let cell_w = (max - min) / n_cols as f64;
        let cell_h = (max - min) / n_rows as f64;

        let log_min = self.log_floor.log10();
        let log_max = image
            .iter()
            .map(|&v| v.max(self.log_floor))
            .fold(self.log_floor, f64::max)
            .log10();

        let title = format!("Lens position: x = {:.2}", lens_x);
        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(min..max, min..max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("x (Einstein radii)")
            .y_desc("y (Einstein radii)")
            .draw()?;

        chart.draw_series(image.indexed_iter().map(|((row, col), &value)| {
            let x0 = min + cell_w * col as f64;
            let y0 = min + cell_h * row as f64;
            let color = self.value_to_color(value, log_min, log_max);
            Rectangle::new([(x0, y0), (x0 + cell_w, y0 + cell_h)], color.filled())
        }))?;

        root.present()?;
        drop(chart);
        drop(root);
        println!("Saved image: {}", filename);
        Ok(filename)
    }

    /// Plot the light curve as brightness vs lens position.
    pub fn plot_light_curve(
        &self,
        curve: &[LightCurvePoint],
    ) -> Result<String, Box<dyn std::error::Error>> {
        let filename = format!("{}/light_curve.png", self.output_dir);
        let root = BitMapBackend::new(&filename, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_min = curve.iter().map(|p| p.lens_x).fold(f64::INFINITY, f64::min);
        let x_max = curve
            .iter()
            .map(|p| p.lens_x)
            .fold(f64::NEG_INFINITY, f64::max);
        let y_max = curve.iter().map(|p| p.brightness).fold(0.0_f64, f64::max);

        let mut chart = ChartBuilder::on(&root)
            .caption("Microlensing light curve", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.05)?;

        chart
            .configure_mesh()
            .x_desc("Lens position x (Einstein radii)")
            .y_desc("Total brightness")
            .draw()?;

        chart.draw_series(LineSeries::new(
            curve.iter().map(|p| (p.lens_x, p.brightness)),
            &BLUE,
        ))?;

        root.present()?;
        drop(chart);
        drop(root);
        println!("Saved light curve: {}", filename);
        Ok(filename)
    }

    /// Dump the light curve as CSV alongside the plot.
    pub fn write_light_curve_csv(
        &self,
        curve: &[LightCurvePoint],
    ) -> Result<String, Box<dyn std::error::Error>> {
        let filename = format!("{}/light_curve.csv", self.output_dir);
        let mut out = String::from("lens_x,brightness\n");
        for point in curve {
            out.push_str(&format!("{},{}\n", point.lens_x, point.brightness));
        }
        std::fs::write(&filename, out)?;
        println!("Saved light curve data: {}", filename);
        Ok(filename)
    }

    fn value_to_color(&self, value: f64, log_min: f64, log_max: f64) -> RGBColor {
        let log_value = value.max(self.log_floor).log10();
        let normalized = if log_max > log_min {
            (log_value - log_min) / (log_max - log_min)
        } else {
            0.5
        };
        let normalized = normalized.clamp(0.0, 1.0);
        let color_rgba = self.gradient.at(normalized as f32).to_rgba8();
        RGBColor(color_rgba[0], color_rgba[1], color_rgba[2])
    }
}
