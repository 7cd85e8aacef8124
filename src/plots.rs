use std::ops::Range;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, VPos};

pub type ScatterChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub mod palette {
    use plotters::style::RGBColor;

    pub const POINTS: RGBColor = RGBColor(0, 0, 255);
    pub const DIAGONAL: RGBColor = RGBColor(128, 128, 128);
    pub const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);
    pub const DARK_RED: RGBColor = RGBColor(139, 0, 0);
    pub const PURPLE: RGBColor = RGBColor(128, 0, 128);
    pub const RED: RGBColor = RGBColor(255, 0, 0);
    pub const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
    pub const LIGHT_CORAL: RGBColor = RGBColor(240, 128, 128);
    pub const LAVENDER: RGBColor = RGBColor(230, 230, 250);
    pub const YELLOW: RGBColor = RGBColor(255, 255, 0);
    pub const WHITE: RGBColor = RGBColor(255, 255, 255);
    pub const BLACK: RGBColor = RGBColor(0, 0, 0);
}

pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

pub fn find_max_min<T: std::cmp::PartialOrd + Copy>(
    mut data: impl Iterator<Item = T>,
) -> Option<MinMax<T>> {
    let init = data.next()?;
    let mut min_max = MinMax {
        min: init,
        max: init,
    };

    for x in data {
        min_max = MinMax {
            min: if x < min_max.min { x } else { min_max.min },
            max: if x > min_max.max { x } else { min_max.max },
        };
    }

    Some(min_max)
}

/// `min..max` widened by `fraction` of its span on both sides. A zero span
/// is widened by one unit instead.
pub fn padded_range(min: f64, max: f64, fraction: f64) -> Range<f64> {
    let span = max - min;
    let pad = if span > 0. { span * fraction } else { 1. };

    (min - pad)..(max + pad)
}

/// Axis ranges of a scatter chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRange {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

impl ChartRange {
    /// Same padded range on both axes, covering every value. Keeps the
    /// `y = x` diagonal at 45 degrees and every error segment in view.
    pub fn square(values: impl Iterator<Item = f64>) -> Option<Self> {
        let MinMax { min, max } = find_max_min(values.filter(|v| v.is_finite()))?;
        let range = padded_range(min, max, 0.05);

        Some(ChartRange {
            x: range.clone(),
            y: range,
        })
    }
}

pub fn font(px: u32, bold: bool) -> FontDesc<'static> {
    let style = if bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };

    FontDesc::new(FontFamily::SansSerif, px as f64, style)
}

pub struct AxesStyle<'a> {
    pub caption: &'a str,
    pub caption_px: u32,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub desc_px: u32,
    pub label_px: u32,
    pub margin_px: u32,
}

pub fn build_scatter_chart<'a, DB>(
    drawing_area: &'a DrawingArea<DB, Shift>,
    axes: &AxesStyle,
    range: &ChartRange,
) -> Result<ScatterChart<'a, DB>, Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let mut chart_builder = ChartBuilder::on(drawing_area);

    let mut chart_context = chart_builder
        .caption(axes.caption, font(axes.caption_px, true))
        .margin(axes.margin_px)
        .x_label_area_size(axes.desc_px * 3)
        .y_label_area_size(axes.desc_px * 4)
        .build_cartesian_2d(range.x.clone(), range.y.clone())?;

    chart_context
        .configure_mesh()
        .x_labels(8)
        .x_desc(axes.x_desc)
        .y_labels(8)
        .y_desc(axes.y_desc)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .label_style(font(axes.label_px, false))
        .axis_desc_style(font(axes.desc_px, false))
        .bold_line_style(palette::BLACK.mix(0.12))
        .light_line_style(palette::BLACK.mix(0.04))
        .draw()?;

    Ok(chart_context)
}

pub fn draw_points<DB>(
    chart: &mut ScatterChart<DB>,
    points: impl Iterator<Item = (f64, f64)>,
    radius: u32,
    style: ShapeStyle,
    label: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let series = chart.draw_series(points.map(|p| Circle::new(p, radius, style)))?;

    if let Some(label) = label {
        series
            .label(label)
            .legend(move |(x, y)| Circle::new((x, y), radius, style));
    }

    Ok(())
}

/// Two dashes with a gap, relative to the legend entry's anchor.
pub fn legend_dashes(dash_px: u32) -> [[(i32, i32); 2]; 2] {
    let dash = dash_px as i32;
    let gap = dash / 2 + 1;

    [[(0, 0), (dash, 0)], [(dash + gap, 0), (2 * dash + gap, 0)]]
}

/// Dashed `y = x` line from `(lo, lo)` to `(hi, hi)`.
pub fn draw_diagonal<'a, DB>(
    chart: &mut ScatterChart<'a, DB>,
    lo: f64,
    hi: f64,
    dash_px: u32,
    style: ShapeStyle,
    label: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend + 'a,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let series = chart.draw_series(DashedLineSeries::new(
        vec![(lo, lo), (hi, hi)],
        dash_px,
        dash_px / 2 + 1,
        style,
    ))?;

    if let Some(label) = label {
        let [first, second] = legend_dashes(dash_px);
        series.label(label).legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(first.to_vec(), style)
                + PathElement::new(second.to_vec(), style)
        });
    }

    Ok(())
}

pub fn draw_segments<DB>(
    chart: &mut ScatterChart<DB>,
    segments: impl Iterator<Item = ([(f64, f64); 2], ShapeStyle)>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    chart.draw_series(segments.map(|(segment, style)| PathElement::new(segment.to_vec(), style)))?;

    Ok(())
}

pub fn draw_legend<'a, DB>(
    chart: &mut ScatterChart<'a, DB>,
    position: SeriesLabelPosition,
    label_px: u32,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend + 'a,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    chart
        .configure_series_labels()
        .position(position)
        .label_font(font(label_px, false))
        .background_style(palette::WHITE.mix(0.8))
        .border_style(palette::BLACK.mix(0.3))
        .draw()?;

    Ok(())
}

/// Where a text box sits, in axes fractions measured from the bottom-left
/// corner, and which of its edges the point pins.
#[derive(Clone, Copy)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub h: HPos,
    pub v: VPos,
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor {
        x: 0.05,
        y: 0.95,
        h: HPos::Left,
        v: VPos::Top,
    };

    pub const BOTTOM_RIGHT: Anchor = Anchor {
        x: 0.95,
        y: 0.10,
        h: HPos::Right,
        v: VPos::Bottom,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct AnnotationStyle {
    pub font_px: u32,
    pub bold: bool,
    pub text: RGBColor,
    pub fill: RGBColor,
    pub fill_alpha: f64,
    pub padding_px: u32,
}

/// Pixel bounds of a drawn text box, relative to its drawing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Top-left corner of a `width x height` box pinned at `anchor` inside an
/// area of `area` pixels.
pub fn anchored_origin(anchor: Anchor, area: (u32, u32), width: u32, height: u32) -> (i32, i32) {
    let ax = (anchor.x * area.0 as f64).round() as i32;
    let ay = ((1. - anchor.y) * area.1 as f64).round() as i32;
    let (w, h) = (width as i32, height as i32);

    let left = match anchor.h {
        HPos::Left => ax,
        HPos::Center => ax - w / 2,
        HPos::Right => ax - w,
    };
    let top = match anchor.v {
        VPos::Top => ay,
        VPos::Center => ay - h / 2,
        VPos::Bottom => ay - h,
    };

    (left, top)
}

pub fn draw_annotation<DB>(
    drawing_area: &DrawingArea<DB, Shift>,
    lines: &[String],
    anchor: Anchor,
    style: &AnnotationStyle,
) -> Result<BoxBounds, Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let text_style = font(style.font_px, style.bold).color(&style.text);

    let mut sizes = Vec::with_capacity(lines.len());
    for line in lines {
        sizes.push(drawing_area.estimate_text_size(line, &text_style)?);
    }

    let text_width = sizes.iter().map(|&(w, _)| w).max().unwrap_or(0);
    let line_height = sizes
        .iter()
        .map(|&(_, h)| h)
        .max()
        .unwrap_or(style.font_px);
    let line_gap = line_height / 4;
    let rows = lines.len() as u32;
    let text_height = line_height * rows + line_gap * rows.saturating_sub(1);

    let width = text_width + 2 * style.padding_px;
    let height = text_height + 2 * style.padding_px;

    let (left, top) = anchored_origin(anchor, drawing_area.dim_in_pixel(), width, height);
    let bounds = BoxBounds {
        left,
        top,
        right: left + width as i32,
        bottom: top + height as i32,
    };
    let corners = [(bounds.left, bounds.top), (bounds.right, bounds.bottom)];

    drawing_area.draw(&Rectangle::new(
        corners,
        style.fill.mix(style.fill_alpha).filled(),
    ))?;
    drawing_area.draw(&Rectangle::new(
        corners,
        palette::BLACK.mix(0.4).stroke_width(1),
    ))?;

    for (i, line) in lines.iter().enumerate() {
        let y = top + (style.padding_px + i as u32 * (line_height + line_gap)) as i32;
        drawing_area.draw(&Text::new(
            line.clone(),
            (left + style.padding_px as i32, y),
            text_style.clone(),
        ))?;
    }

    Ok(bounds)
}
