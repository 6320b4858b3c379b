//! @ai:module:intent Bar chart of per-benchmark scores
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::metrics::ResultSet;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Render the score chart to a PNG file
    fn generate(&self, results: &ResultSet, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates score charts from results
pub struct ChartGenerator;

/// One bar: label, height and whether the unit failed.
type Bar = (String, f64, bool);

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:effects pure
    fn bars(results: &ResultSet) -> Vec<Bar> {
        results
            .outcomes
            .iter()
            .map(|o| (o.name.clone(), o.score, o.is_failed()))
            .collect()
    }

    /// @ai:intent Wider canvas for runs with many units
    /// @ai:effects pure
    fn canvas_width(bar_count: usize) -> u32 {
        (bar_count as u32 * 60 + 200).clamp(800, 4000)
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Draw one bar per unit; failed units in red
    /// @ai:effects fs:write
    fn generate(&self, results: &ResultSet, output_path: &Path) -> Result<()> {
        let data = Self::bars(results);

        if data.is_empty() {
            anyhow::bail!("no benchmark outcomes to chart");
        }

        let root = BitMapBackend::new(output_path, (Self::canvas_width(data.len()), 600))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Scores for {}", results.model), ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(50)
            .build_cartesian_2d(0..data.len() as i32, 0f64..100f64)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.len())
            .y_desc("Score out of 100")
            .x_label_formatter(&|x| {
                data.get(*x as usize)
                    .map(|(name, _, _)| name.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(data.iter().enumerate().map(|(i, (_, score, failed))| {
            let color = if *failed { RED } else { BLUE };
            let mut bar = Rectangle::new(
                [(i as i32, 0.0), (i as i32 + 1, *score)],
                color.mix(0.7).filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))?;

        root.present()?;
        Ok(())
    }
}
