//! The five charts, each drawn once per [`Orientation`].

use std::path::{Path, PathBuf};

use itertools::izip;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::{FigureGeometry, OutputLayout};
use crate::dataset::Sample;
use crate::metrics::Metrics;
use crate::plots::{
    build_scatter_chart, draw_annotation, draw_diagonal, draw_legend, draw_points, draw_segments,
    find_max_min, palette, Anchor, AnnotationStyle, AxesStyle, ChartRange, MinMax,
};
use crate::scenarios::Scenario;

const PERFECT_PREDICTION: &str = "Perfect Prediction (y = ŷ)";

/// Which variable goes on the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Actual on x, predicted on y, vertical error segments.
    Standard,
    /// Predicted on x, actual on y, horizontal error segments.
    Alternative,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Standard, Orientation::Alternative];

    pub fn point(self, actual: f64, predicted: f64) -> (f64, f64) {
        match self {
            Orientation::Standard => (actual, predicted),
            Orientation::Alternative => (predicted, actual),
        }
    }

    /// Segment between a point and the `y = x` diagonal.
    pub fn error_segment(self, actual: f64, predicted: f64) -> [(f64, f64); 2] {
        match self {
            Orientation::Standard => [(actual, actual), (actual, predicted)],
            Orientation::Alternative => [(predicted, actual), (actual, actual)],
        }
    }

    fn horizontal(self, sample: &Sample) -> &ndarray::Array1<f64> {
        match self {
            Orientation::Standard => sample.actual(),
            Orientation::Alternative => sample.predicted(),
        }
    }

    pub fn x_desc(self) -> &'static str {
        match self {
            Orientation::Standard => "Actual Value (y)",
            Orientation::Alternative => "Predicted Value (ŷ)",
        }
    }

    pub fn y_desc(self) -> &'static str {
        match self {
            Orientation::Standard => "Predicted Value (ŷ)",
            Orientation::Alternative => "Actual Value (y)",
        }
    }

    pub fn points_label(self) -> &'static str {
        match self {
            Orientation::Standard => "Predicted Points (ŷ)",
            Orientation::Alternative => "Actual Points (y)",
        }
    }

    pub fn output_dir(self, layout: &OutputLayout) -> &Path {
        match self {
            Orientation::Standard => &layout.root,
            Orientation::Alternative => &layout.alternative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Mae,
    Mse,
    Rmse,
}

impl MetricKind {
    pub fn formula(self) -> &'static str {
        match self {
            MetricKind::Mae => "MAE = (1/N) Σ |yᵢ − ŷᵢ|",
            MetricKind::Mse => "MSE = (1/N) Σ (yᵢ − ŷᵢ)²",
            MetricKind::Rmse => "RMSE = √((1/N) Σ (yᵢ − ŷᵢ)²)",
        }
    }

    pub fn title(self, orientation: Orientation) -> &'static str {
        match (self, orientation) {
            (MetricKind::Mae, Orientation::Standard) => {
                "Mean Absolute Error (MAE): Linear Error Measurement"
            }
            (MetricKind::Mae, Orientation::Alternative) => {
                "Mean Absolute Error (MAE): Alternative Orientation"
            }
            (MetricKind::Mse, Orientation::Standard) => {
                "Mean Squared Error (MSE): Squared Error Measurement"
            }
            (MetricKind::Mse, Orientation::Alternative) => {
                "Mean Squared Error (MSE): Alternative Orientation"
            }
            (MetricKind::Rmse, Orientation::Standard) => {
                "Root Mean Squared Error (RMSE): Interpretable Squared Error"
            }
            (MetricKind::Rmse, Orientation::Alternative) => {
                "Root Mean Squared Error (RMSE): Alternative Orientation"
            }
        }
    }

    fn segment_color(self) -> RGBColor {
        match self {
            MetricKind::Mae => palette::DARK_ORANGE,
            MetricKind::Mse => palette::DARK_RED,
            MetricKind::Rmse => palette::PURPLE,
        }
    }

    fn segment_alpha(self) -> f64 {
        match self {
            MetricKind::Mse => 0.6,
            _ => 0.5,
        }
    }

    fn formula_fill(self) -> RGBColor {
        match self {
            MetricKind::Mae => palette::LIGHT_BLUE,
            MetricKind::Mse => palette::LIGHT_CORAL,
            MetricKind::Rmse => palette::LAVENDER,
        }
    }

    fn text_color(self) -> RGBColor {
        match self {
            MetricKind::Mae => palette::POINTS,
            MetricKind::Mse => palette::DARK_RED,
            MetricKind::Rmse => palette::PURPLE,
        }
    }

    /// Stroke width in points. MSE segments grow with the squared error,
    /// from 1pt up to 4pt for the largest one.
    pub fn segment_width(self, squared_error: f64, max_squared_error: f64) -> f64 {
        match self {
            MetricKind::Mse if max_squared_error > 0. => {
                1. + squared_error / max_squared_error * 3.
            }
            _ => 1.,
        }
    }

    pub fn readout(self, metrics: &Metrics, orientation: Orientation) -> Vec<String> {
        let [mae, mse, rmse] = metrics.summary_lines();

        match (self, orientation) {
            (MetricKind::Mae, _) => vec![mae],
            (MetricKind::Mse, Orientation::Standard) => vec![mae, mse],
            _ => vec![mae, mse, rmse],
        }
    }
}

/// 2x2 panels, one per scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    MaeLimitation,
    AllMetrics,
}

impl GridKind {
    pub fn title(self, orientation: Orientation, target: f64) -> String {
        match (self, orientation) {
            (GridKind::MaeLimitation, Orientation::Standard) => {
                format!("MAE Limitation: Same MAE ({target:.1}), Different Error Patterns")
            }
            (GridKind::MaeLimitation, Orientation::Alternative) => {
                format!("MAE Limitation: Alternative Orientation (Same MAE {target:.1})")
            }
            (GridKind::AllMetrics, Orientation::Standard) => {
                "Metrics Comparison: Same MAE, Different MSE & RMSE Patterns".to_string()
            }
            (GridKind::AllMetrics, Orientation::Alternative) => {
                "Metrics Comparison: Alternative Orientation".to_string()
            }
        }
    }

    pub fn readout(self, metrics: &Metrics) -> Vec<String> {
        let [mae, mse, rmse] = metrics.summary_lines();

        match self {
            GridKind::MaeLimitation => vec![mae],
            GridKind::AllMetrics => vec![mae, mse, rmse],
        }
    }

    fn readout_style(self, geometry: &FigureGeometry) -> AnnotationStyle {
        let (font_pt, alpha, pad_pt) = match self {
            GridKind::MaeLimitation => (11., 0.7, 3.5),
            GridKind::AllMetrics => (10., 0.8, 4.),
        };

        AnnotationStyle {
            font_px: geometry.px(font_pt),
            bold: true,
            text: palette::BLACK,
            fill: palette::YELLOW,
            fill_alpha: alpha,
            padding_px: geometry.px(pad_pt),
        }
    }
}

/// Colour and width in points of a comparison grid segment. Errors beyond
/// twice the target MAE are drawn thick and red.
pub fn grid_segment(absolute_error: f64, target: f64) -> (RGBColor, f64) {
    if absolute_error > target * 2. {
        (palette::RED, 2.)
    } else {
        (palette::DARK_ORANGE, 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Figure {
    Overview(MetricKind),
    Grid(GridKind),
}

impl Figure {
    /// In file-name order.
    pub const ALL: [Figure; 5] = [
        Figure::Overview(MetricKind::Mae),
        Figure::Grid(GridKind::MaeLimitation),
        Figure::Overview(MetricKind::Mse),
        Figure::Overview(MetricKind::Rmse),
        Figure::Grid(GridKind::AllMetrics),
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Figure::Overview(MetricKind::Mae) => "01_mae_overview.png",
            Figure::Grid(GridKind::MaeLimitation) => "02_mae_limitation_comparison.png",
            Figure::Overview(MetricKind::Mse) => "03_mse_overview.png",
            Figure::Overview(MetricKind::Rmse) => "04_rmse_overview.png",
            Figure::Grid(GridKind::AllMetrics) => "05_all_metrics_comparison.png",
        }
    }
}

fn sample_range(sample: &Sample) -> Result<ChartRange, Box<dyn std::error::Error>> {
    let values = sample.actual().iter().chain(sample.predicted().iter()).copied();

    Ok(ChartRange::square(values).ok_or("sample has no finite values")?)
}

fn diagonal_extent(
    sample: &Sample,
    orientation: Orientation,
) -> Result<MinMax<f64>, Box<dyn std::error::Error>> {
    Ok(find_max_min(orientation.horizontal(sample).iter().copied()).ok_or("empty sample")?)
}

pub fn draw_overview<DB>(
    drawing_area: &DrawingArea<DB, Shift>,
    sample: &Sample,
    metric: MetricKind,
    orientation: Orientation,
    highlighted: usize,
    geometry: &FigureGeometry,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&palette::WHITE)?;

    let g = geometry;
    let metrics = sample.metrics()?;

    let axes = AxesStyle {
        caption: metric.title(orientation),
        caption_px: g.px(14.),
        x_desc: orientation.x_desc(),
        y_desc: orientation.y_desc(),
        desc_px: g.px(12.),
        label_px: g.px(10.),
        margin_px: g.px(10.),
    };

    let mut chart = build_scatter_chart(drawing_area, &axes, &sample_range(sample)?)?;

    draw_points(
        &mut chart,
        izip!(sample.actual(), sample.predicted()).map(|(&y, &y_hat)| orientation.point(y, y_hat)),
        g.px(2.5),
        palette::POINTS.mix(0.6).filled(),
        Some(orientation.points_label()),
    )?;

    let MinMax { min, max } = diagonal_extent(sample, orientation)?;
    draw_diagonal(
        &mut chart,
        min,
        max,
        g.px(4.),
        palette::DIAGONAL.stroke_width(g.px(1.5)),
        Some(PERFECT_PREDICTION),
    )?;

    let squared = sample.squared_errors();
    let max_squared = find_max_min(squared.iter().copied()).map_or(0., |m| m.max);
    let color = metric.segment_color().mix(metric.segment_alpha());

    draw_segments(
        &mut chart,
        izip!(sample.actual(), sample.predicted(), &squared)
            .take(highlighted)
            .map(|(&y, &y_hat, &e2)| {
                let width = g.px(metric.segment_width(e2, max_squared));
                (orientation.error_segment(y, y_hat), color.stroke_width(width))
            }),
    )?;

    let plotting_area = chart.plotting_area().strip_coord_spec();

    draw_annotation(
        &plotting_area,
        &[metric.formula().to_string()],
        Anchor::BOTTOM_RIGHT,
        &AnnotationStyle {
            font_px: g.px(14.),
            bold: false,
            text: palette::BLACK,
            fill: metric.formula_fill(),
            fill_alpha: 0.7,
            padding_px: g.px(7.),
        },
    )?;

    let readout = draw_annotation(
        &plotting_area,
        &metric.readout(&metrics, orientation),
        Anchor::TOP_LEFT,
        &AnnotationStyle {
            font_px: g.px(10.),
            bold: true,
            text: metric.text_color(),
            fill: palette::WHITE,
            fill_alpha: 0.8,
            padding_px: g.px(4.),
        },
    )?;

    draw_legend(
        &mut chart,
        SeriesLabelPosition::Coordinate(readout.left, readout.bottom + g.px(6.) as i32),
        g.px(10.),
    )?;

    Ok(())
}

fn draw_scenario_panel<DB>(
    drawing_area: &DrawingArea<DB, Shift>,
    scenario: &Scenario,
    grid: GridKind,
    orientation: Orientation,
    target: f64,
    geometry: &FigureGeometry,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let g = geometry;
    let sample = &scenario.sample;

    let axes = AxesStyle {
        caption: scenario.title(),
        caption_px: g.px(11.),
        x_desc: orientation.x_desc(),
        y_desc: orientation.y_desc(),
        desc_px: g.px(10.),
        label_px: g.px(9.),
        margin_px: g.px(8.),
    };

    let mut chart = build_scatter_chart(drawing_area, &axes, &sample_range(sample)?)?;

    let MinMax { min, max } = diagonal_extent(sample, orientation)?;
    draw_diagonal(
        &mut chart,
        min,
        max,
        g.px(4.),
        palette::DIAGONAL.mix(0.5).stroke_width(g.px(1.5)),
        None,
    )?;

    draw_segments(
        &mut chart,
        izip!(sample.actual(), sample.predicted()).map(|(&y, &y_hat)| {
            let (color, width) = grid_segment((y - y_hat).abs(), target);
            (
                orientation.error_segment(y, y_hat),
                color.mix(0.6).stroke_width(g.px(width)),
            )
        }),
    )?;

    draw_points(
        &mut chart,
        izip!(sample.actual(), sample.predicted()).map(|(&y, &y_hat)| orientation.point(y, y_hat)),
        g.px(1.8),
        palette::POINTS.mix(0.5).filled(),
        None,
    )?;

    draw_annotation(
        &chart.plotting_area().strip_coord_spec(),
        &grid.readout(&sample.metrics()?),
        Anchor::TOP_LEFT,
        &grid.readout_style(g),
    )?;

    Ok(())
}

pub fn draw_comparison_grid<DB>(
    drawing_area: &DrawingArea<DB, Shift>,
    scenarios: &[Scenario],
    grid: GridKind,
    orientation: Orientation,
    target: f64,
    geometry: &FigureGeometry,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&palette::WHITE)?;

    let titled = drawing_area.titled(
        &grid.title(orientation, target),
        crate::plots::font(geometry.px(16.), true),
    )?;

    for (panel, scenario) in titled.split_evenly((2, 2)).iter().zip(scenarios) {
        draw_scenario_panel(panel, scenario, grid, orientation, target, geometry)?;
    }

    Ok(())
}

/// Everything the figures are drawn from.
pub struct ChartSet<'a> {
    pub sample: &'a Sample,
    pub scenarios: &'a [Scenario],
    pub target: f64,
    pub highlighted: usize,
    pub geometry: FigureGeometry,
}

impl ChartSet<'_> {
    pub fn draw<DB>(
        &self,
        drawing_area: &DrawingArea<DB, Shift>,
        figure: Figure,
        orientation: Orientation,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB: DrawingBackend,
        <DB as DrawingBackend>::ErrorType: 'static,
    {
        match figure {
            Figure::Overview(metric) => draw_overview(
                drawing_area,
                self.sample,
                metric,
                orientation,
                self.highlighted,
                &self.geometry,
            ),
            Figure::Grid(grid) => draw_comparison_grid(
                drawing_area,
                self.scenarios,
                grid,
                orientation,
                self.target,
                &self.geometry,
            ),
        }
    }

    pub fn size(&self, figure: Figure) -> (u32, u32) {
        match figure {
            Figure::Overview(_) => self.geometry.overview_size(),
            Figure::Grid(_) => self.geometry.grid_size(),
        }
    }

    pub fn render_png(
        &self,
        figure: Figure,
        orientation: Orientation,
        dir: &Path,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = dir.join(figure.file_name());

        {
            let drawing_area = BitMapBackend::new(&path, self.size(figure)).into_drawing_area();
            self.draw(&drawing_area, figure, orientation)?;
            drawing_area.present()?;
        }

        Ok(path)
    }

    /// Renders every figure in both orientations, standard first.
    pub fn render_all(
        &self,
        layout: &OutputLayout,
        mut on_saved: impl FnMut(Orientation, &Path),
    ) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let mut saved = Vec::with_capacity(Orientation::ALL.len() * Figure::ALL.len());

        for orientation in Orientation::ALL {
            let dir = orientation.output_dir(layout);

            for figure in Figure::ALL {
                let path = self.render_png(figure, orientation, dir)?;
                on_saved(orientation, &path);
                saved.push(path);
            }
        }

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::base_sample;
    use crate::scenarios::build_scenarios;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_inputs() -> (Sample, Vec<Scenario>) {
        let mut rng = StdRng::seed_from_u64(42);
        let sample = base_sample(&mut rng, 50, 10.0..30.0, 2.0).unwrap();
        let scenarios = build_scenarios(&mut rng, 50, 10.0..30.0, 3.0).unwrap();

        (sample, scenarios)
    }

    #[test]
    fn overview_draws_into_svg() {
        let (sample, _) = small_inputs();
        let geometry = FigureGeometry::new(50);

        let mut svg = String::new();
        {
            let drawing_area =
                SVGBackend::with_string(&mut svg, geometry.overview_size()).into_drawing_area();
            draw_overview(
                &drawing_area,
                &sample,
                MetricKind::Rmse,
                Orientation::Alternative,
                20,
                &geometry,
            )
            .unwrap();
            drawing_area.present().unwrap();
        }

        assert!(svg.contains("Root Mean Squared Error (RMSE): Alternative Orientation"));
        assert!(svg.contains("RMSE: "));
        assert!(svg.contains("Actual Points (y)"));
    }

    #[test]
    fn comparison_grid_draws_every_panel_into_svg() {
        let (_, scenarios) = small_inputs();
        let geometry = FigureGeometry::new(50);

        let mut svg = String::new();
        {
            let drawing_area =
                SVGBackend::with_string(&mut svg, geometry.grid_size()).into_drawing_area();
            draw_comparison_grid(
                &drawing_area,
                &scenarios,
                GridKind::MaeLimitation,
                Orientation::Standard,
                3.,
                &geometry,
            )
            .unwrap();
            drawing_area.present().unwrap();
        }

        assert!(svg.contains("Different Error Patterns"));
        for scenario in &scenarios {
            assert!(svg.contains(scenario.title()), "{}", scenario.title());
        }
        assert!(svg.matches("MAE: 3.00").count() >= 4);
    }

    #[test]
    fn standard_segments_are_vertical() {
        let o = Orientation::Standard;

        assert_eq!(o.point(12., 15.), (12., 15.));
        assert_eq!(o.error_segment(12., 15.), [(12., 12.), (12., 15.)]);
    }

    #[test]
    fn alternative_segments_are_horizontal() {
        let o = Orientation::Alternative;

        assert_eq!(o.point(12., 15.), (15., 12.));
        assert_eq!(o.error_segment(12., 15.), [(15., 12.), (12., 12.)]);
    }

    #[test]
    fn segments_join_point_and_diagonal() {
        for o in Orientation::ALL {
            let segment = o.error_segment(20., 23.5);

            assert!(segment.contains(&o.point(20., 23.5)));
            assert!(segment.iter().any(|&(x, y)| x == y));
        }
    }

    #[test]
    fn diagonal_follows_horizontal_variable() {
        let sample = Sample::new(array![10., 20., 30.], array![5., 25., 28.]).unwrap();

        let standard = diagonal_extent(&sample, Orientation::Standard).unwrap();
        assert_eq!((standard.min, standard.max), (10., 30.));

        let alternative = diagonal_extent(&sample, Orientation::Alternative).unwrap();
        assert_eq!((alternative.min, alternative.max), (5., 28.));
    }

    #[test]
    fn mse_segments_scale_with_squared_error() {
        assert_eq!(MetricKind::Mse.segment_width(0., 16.), 1.);
        assert_eq!(MetricKind::Mse.segment_width(8., 16.), 2.5);
        assert_eq!(MetricKind::Mse.segment_width(16., 16.), 4.);
        assert_eq!(MetricKind::Mse.segment_width(0., 0.), 1.);
        assert_eq!(MetricKind::Mae.segment_width(16., 16.), 1.);
        assert_eq!(MetricKind::Rmse.segment_width(16., 16.), 1.);
    }

    #[test]
    fn grid_highlights_errors_beyond_twice_the_target() {
        assert_eq!(grid_segment(6.5, 3.), (palette::RED, 2.));
        assert_eq!(grid_segment(6., 3.), (palette::DARK_ORANGE, 0.5));
        assert_eq!(grid_segment(0., 3.), (palette::DARK_ORANGE, 0.5));
    }

    #[test]
    fn readouts_per_metric_and_orientation() {
        let metrics = Metrics {
            mae: 1.5,
            mse: 4.,
            rmse: 2.,
        };

        assert_eq!(
            MetricKind::Mae.readout(&metrics, Orientation::Alternative),
            vec!["MAE: 1.50"]
        );
        assert_eq!(
            MetricKind::Mse.readout(&metrics, Orientation::Standard),
            vec!["MAE: 1.50", "MSE: 4.00"]
        );
        assert_eq!(
            MetricKind::Mse.readout(&metrics, Orientation::Alternative).len(),
            3
        );
        assert_eq!(
            MetricKind::Rmse.readout(&metrics, Orientation::Standard),
            vec!["MAE: 1.50", "MSE: 4.00", "RMSE: 2.00"]
        );
        assert_eq!(GridKind::MaeLimitation.readout(&metrics), vec!["MAE: 1.50"]);
        assert_eq!(GridKind::AllMetrics.readout(&metrics).len(), 3);
    }

    #[test]
    fn grid_titles_mention_target() {
        assert_eq!(
            GridKind::MaeLimitation.title(Orientation::Standard, 3.),
            "MAE Limitation: Same MAE (3.0), Different Error Patterns"
        );
        assert_eq!(
            GridKind::MaeLimitation.title(Orientation::Alternative, 3.),
            "MAE Limitation: Alternative Orientation (Same MAE 3.0)"
        );
    }

    #[test]
    fn file_names_are_unique_and_ordered() {
        let names: Vec<_> = Figure::ALL.iter().map(|f| f.file_name()).collect();

        assert_eq!(
            names,
            vec![
                "01_mae_overview.png",
                "02_mae_limitation_comparison.png",
                "03_mse_overview.png",
                "04_rmse_overview.png",
                "05_all_metrics_comparison.png",
            ]
        );
    }

    #[test]
    fn output_dirs_follow_orientation() {
        let layout = OutputLayout::new("img");

        assert_eq!(Orientation::Standard.output_dir(&layout), Path::new("img"));
        assert_eq!(
            Orientation::Alternative.output_dir(&layout),
            Path::new("img/alternative")
        );
    }
}
