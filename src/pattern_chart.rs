use std::path::Path;

use plotters::{
    prelude::{ChartBuilder, IntoDrawingArea, LineSeries, SVGBackend},
    style::{IntoFont, RED, WHITE},
};
use thiserror::Error;

use crate::sweep::RadiationPattern;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("cannot chart an empty pattern")]
    Empty,
    #[error("drawing failed: {0}")]
    Drawing(String),
}

fn drawing<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Drawing(err.to_string())
}

// Line chart of amplitude against receiver angle. The x axis spans the swept angles exactly and
// the y axis runs from zero to the pattern's maximum plus a border.
pub struct PatternChart<'a> {
    pattern: &'a RadiationPattern,
    caption: String,
    border_y: f64,
}

impl<'a> PatternChart<'a> {
    pub fn new(pattern: &'a RadiationPattern) -> PatternChart<'a> {
        PatternChart {
            pattern,
            caption: "Radiation pattern".to_owned(),
            border_y: 0.1,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> PatternChart<'a> {
        self.caption = caption.into();
        self
    }

    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.pattern.samples().first()?;
        let last = self.pattern.samples().last()?;

        let bottom_x = first.angle;
        let top_x = if last.angle > first.angle {
            last.angle
        } else {
            first.angle + 1.
        };

        // A flat zero pattern still needs a visible axis
        let max_y = self.pattern.max_amplitude().clamp(1e-6, f64::MAX);
        let top_y = (max_y * (1. + self.border_y)).min(f64::MAX);

        Some((bottom_x, top_x, 0., top_y))
    }

    pub fn render_svg(&self, path: &Path, size: (u32, u32)) -> Result<(), ChartError> {
        let (bottom_x, top_x, bottom_y, top_y) = self.bounds().ok_or(ChartError::Empty)?;

        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.caption, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(bottom_x..top_x, bottom_y..top_y)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .x_desc("angle from broadside (deg)")
            .y_desc("amplitude")
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(LineSeries::new(
                self.pattern.iter().map(|s| (s.angle, s.amplitude)),
                &RED,
            ))
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use approx::assert_relative_eq;

    use crate::{config::ArrayConfig, sweep::sweep};

    use super::PatternChart;

    #[test]
    fn bounds_follow_pattern() {
        let pattern = sweep(&ArrayConfig::default(), -90.0..90.0, 100).unwrap();
        let (bottom_x, top_x, bottom_y, top_y) = PatternChart::new(&pattern).bounds().unwrap();
        assert_eq!(bottom_x, -90.);
        assert_relative_eq!(top_x, 88.2, max_relative = 1e-12);
        assert_eq!(bottom_y, 0.);
        assert_relative_eq!(top_y, 1.1 * pattern.max_amplitude(), max_relative = 1e-12);
    }

    #[test]
    fn single_sample_still_has_width() {
        let pattern = sweep(&ArrayConfig::default(), 0.0..0.0, 1).unwrap();
        let (bottom_x, top_x, _, _) = PatternChart::new(&pattern).bounds().unwrap();
        assert!(top_x > bottom_x);
    }

    #[test]
    fn renders_svg() {
        let pattern = sweep(&ArrayConfig::default(), -90.0..90.0, 90).unwrap();
        let path = std::env::temp_dir().join("phased_array_pattern_chart_test.svg");
        PatternChart::new(&pattern)
            .with_caption("5 elements")
            .render_svg(&path, (640, 480))
            .unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("5 elements"));
        fs::remove_file(&path).unwrap();
    }
}
