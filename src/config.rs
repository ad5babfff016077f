use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Lens model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensConfig {
    #[serde(default = "default_theta_e")]
    pub theta_e: f64, // Einstein radius (deflection strength)
    #[serde(default = "default_epsilon")]
    pub epsilon: f64, // Singularity floor for |p - lens|^2
}

fn default_theta_e() -> f64 {
    1.0
}

fn default_epsilon() -> f64 {
    1e-6
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            theta_e: default_theta_e(),
            epsilon: default_epsilon(),
        }
    }
}

impl LensConfig {
    fn validate(&self) -> Result<()> {
        if self.theta_e <= 0.0 {
            return Err(anyhow!("theta_e must be positive, got {}", self.theta_e));
        }
        if self.epsilon <= 0.0 {
            return Err(anyhow!(
                "epsilon must be positive to clamp the lens singularity, got {}",
                self.epsilon
            ));
        }
        Ok(())
    }
}

/// Grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_size")]
    pub size: usize, // Samples per axis (grid is size x size)
    #[serde(default = "default_half_extent")]
    pub half_extent: f64, // Grid covers [-half_extent, half_extent] on both axes
}

fn default_size() -> usize {
    300
}

fn default_half_extent() -> f64 {
    2.0
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            half_extent: default_half_extent(),
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(anyhow!(
                "Grid size must be at least 2, got {} (a single-sample axis would make the index rescale divide by zero)",
                self.size
            ));
        }
        if self.half_extent <= 0.0 {
            return Err(anyhow!(
                "Grid half_extent must be positive, got {}",
                self.half_extent
            ));
        }
        Ok(())
    }
}

/// Background source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_width")]
    pub width: f64, // Gaussian width parameter of the background source
}

fn default_width() -> f64 {
    0.02
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
        }
    }
}

impl SourceConfig {
    fn validate(&self) -> Result<()> {
        if self.width <= 0.0 {
            return Err(anyhow!("Source width must be positive, got {}", self.width));
        }
        Ok(())
    }
}

/// Light curve sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_sweep_min")]
    pub min: f64,
    #[serde(default = "default_sweep_max")]
    pub max: f64,
    #[serde(default = "default_sweep_samples")]
    pub samples: usize,
}

fn default_sweep_min() -> f64 {
    -1.5
}

fn default_sweep_max() -> f64 {
    1.5
}

fn default_sweep_samples() -> usize {
    200
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min: default_sweep_min(),
            max: default_sweep_max(),
            samples: default_sweep_samples(),
        }
    }
}

impl SweepConfig {
    fn validate(&self) -> Result<()> {
        if self.min >= self.max {
            return Err(anyhow!(
                "Sweep interval is empty (min={} >= max={})",
                self.min,
                self.max
            ));
        }
        if self.samples < 2 {
            return Err(anyhow!(
                "Sweep needs at least 2 samples, got {}",
                self.samples
            ));
        }
        Ok(())
    }
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_log_floor")]
    pub log_floor: f64, // Floor applied before the log colour scale
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_image_width() -> u32 {
    900
}

fn default_image_height() -> u32 {
    900
}

fn default_log_floor() -> f64 {
    1e-12
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            image_width: default_image_width(),
            image_height: default_image_height(),
            log_floor: default_log_floor(),
        }
    }
}

impl VisualizationConfig {
    fn validate(&self) -> Result<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(anyhow!(
                "Image dimensions must be positive (width={}, height={})",
                self.image_width,
                self.image_height
            ));
        }
        if self.log_floor <= 0.0 {
            return Err(anyhow!(
                "log_floor must be positive for the log colour scale, got {}",
                self.log_floor
            ));
        }
        Ok(())
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lens: LensConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?;

        // Validate before returning
        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.lens.validate()?;
        self.grid.validate()?;
        self.source.validate()?;
        self.sweep.validate()?;
        self.visualization.validate()?;
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("=== Microlensing Configuration ===");
        println!(
            "Grid: {}x{} over [{}, {}]^2",
            self.grid.size, self.grid.size, -self.grid.half_extent, self.grid.half_extent
        );
        println!(
            "Lens: theta_E={}, epsilon={}",
            self.lens.theta_e, self.lens.epsilon
        );
        println!("Source: Gaussian width={}", self.source.width);
        println!(
            "Sweep: {} positions over [{}, {}]",
            self.sweep.samples, self.sweep.min, self.sweep.max
        );
        println!(
            "Visualization: {}x{} px into {}/",
            self.visualization.image_width,
            self.visualization.image_height,
            self.visualization.output_dir
        );
        println!("==================================");
    }
}
