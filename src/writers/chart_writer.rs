use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::fmt::Display;
use std::path::Path;
use tracing::info;

use crate::analyzers::{Dashboard, PrefectureInvestment, ResolutionTime, RiskMatrix, StatusCount};
use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DASHBOARD_HEIGHT, DASHBOARD_WIDTH};

const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

const MAGMA: [RGBColor; 5] = [
    RGBColor(28, 16, 68),
    RGBColor(81, 18, 124),
    RGBColor(183, 55, 121),
    RGBColor(252, 137, 97),
    RGBColor(252, 253, 191),
];

const PASTEL: [RGBColor; 6] = [
    RGBColor(161, 201, 244),
    RGBColor(255, 180, 130),
    RGBColor(141, 229, 161),
    RGBColor(255, 159, 155),
    RGBColor(208, 187, 255),
    RGBColor(222, 187, 155),
];

// YlOrRd gradient stops
const HEAT_LOW: RGBColor = RGBColor(255, 255, 204);
const HEAT_MID: RGBColor = RGBColor(253, 141, 60);
const HEAT_HIGH: RGBColor = RGBColor(189, 0, 38);

const FONT: &str = "sans-serif";

/// Renders the four dashboard panels into a 2x2 SVG.
pub struct ChartWriter {
    width: u32,
    height: u32,
}

impl ChartWriter {
    pub fn new() -> Self {
        Self {
            width: DASHBOARD_WIDTH,
            height: DASHBOARD_HEIGHT,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn render(&self, dashboard: &Dashboard, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let panels = root.split_evenly((2, 2));
        draw_resolution_panel(&panels[0], &dashboard.resolution_times)?;
        draw_investment_panel(&panels[1], &dashboard.investment_by_prefecture)?;
        draw_risk_panel(&panels[2], &dashboard.risk_matrix)?;
        draw_status_panel(&panels[3], &dashboard.status_distribution)?;

        root.present().map_err(chart_error)?;

        info!(path = %path.display(), "Rendered dashboard");
        Ok(())
    }
}

impl Default for ChartWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn chart_error<E: Display>(e: E) -> ProcessingError {
    ProcessingError::Chart(e.to_string())
}

fn segment_label(names: &[String], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => names.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn draw_placeholder<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, title: &str) -> Result<()> {
    let (width, height) = area.dim_in_pixel();
    let style = TextStyle::from((FONT, 18).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        format!("{} (no data)", title),
        (width as i32 / 2, height as i32 / 2),
        style,
    ))
    .map_err(chart_error)?;
    Ok(())
}

/// Horizontal bars of average resolution days per category.
fn draw_resolution_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[ResolutionTime],
) -> Result<()> {
    let title = "Responsiveness: average resolution time (days)";
    if rows.is_empty() {
        return draw_placeholder(area, title);
    }

    let names: Vec<String> = rows.iter().map(|r| r.category.clone()).collect();
    let max_days = rows
        .iter()
        .filter_map(|r| r.avg_days)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(110)
        .build_cartesian_2d(0.0..max_days * 1.1, (0..rows.len()).into_segmented())
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows.len() + 1)
        .y_label_formatter(&|v| segment_label(&names, v))
        .x_desc("Days")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, row)| {
            let color = VIRIDIS[i % VIRIDIS.len()];
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (row.avg_days.unwrap_or(0.0), SegmentValue::Exact(i + 1)),
                ],
                color.filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))
        .map_err(chart_error)?;

    Ok(())
}

/// Vertical bars of investment in millions per prefecture.
fn draw_investment_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[PrefectureInvestment],
) -> Result<()> {
    let title = "Social investment by prefecture ($M)";
    if rows.is_empty() {
        return draw_placeholder(area, title);
    }

    let names: Vec<String> = rows.iter().map(|r| r.prefecture.clone()).collect();
    let max_musd = rows
        .iter()
        .filter_map(|r| r.invest_musd)
        .fold(0.0_f64, f64::max)
        .max(0.1);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..rows.len()).into_segmented(), 0.0..max_musd * 1.1)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(rows.len() + 1)
        .x_label_formatter(&|v| segment_label(&names, v))
        .y_desc("$M")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, row)| {
            let color = MAGMA[i % MAGMA.len()];
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), row.invest_musd.unwrap_or(0.0)),
                ],
                color.filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))
        .map_err(chart_error)?;

    Ok(())
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn heat_color(count: u64, max: u64) -> RGBColor {
    let t = if max == 0 {
        0.0
    } else {
        count as f64 / max as f64
    };
    if t < 0.5 {
        lerp(HEAT_LOW, HEAT_MID, t * 2.0)
    } else {
        lerp(HEAT_MID, HEAT_HIGH, (t - 0.5) * 2.0)
    }
}

/// Category x severity heatmap with annotated counts.
fn draw_risk_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    matrix: &RiskMatrix,
) -> Result<()> {
    let title = "Risk matrix (category vs severity)";
    if matrix.categories.is_empty() || matrix.severities.is_empty() {
        return draw_placeholder(area, title);
    }

    let rows = matrix.categories.len();
    let cols = matrix.severities.len();
    let max = matrix.max_count();

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(110)
        .build_cartesian_2d((0..cols).into_segmented(), (0..rows).into_segmented())
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(cols + 1)
        .y_labels(rows + 1)
        .x_label_formatter(&|v| segment_label(&matrix.severities, v))
        .y_label_formatter(&|v| segment_label(&matrix.categories, v))
        .draw()
        .map_err(chart_error)?;

    let cells: Vec<(usize, usize, u64)> = matrix
        .counts
        .iter()
        .enumerate()
        .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, n)| (r, c, *n)))
        .collect();

    chart
        .draw_series(cells.iter().map(|(r, c, n)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(*c), SegmentValue::Exact(*r)),
                    (SegmentValue::Exact(*c + 1), SegmentValue::Exact(*r + 1)),
                ],
                heat_color(*n, max).filled(),
            )
        }))
        .map_err(chart_error)?;

    let label_style =
        TextStyle::from((FONT, 16).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(cells.iter().map(|(r, c, n)| {
            Text::new(
                n.to_string(),
                (SegmentValue::CenterOf(*c), SegmentValue::CenterOf(*r)),
                label_style.clone(),
            )
        }))
        .map_err(chart_error)?;

    Ok(())
}

/// Pie of grievance statuses with percentage labels.
fn draw_status_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[StatusCount],
) -> Result<()> {
    let title = "Grievance status distribution";
    let total: u64 = rows.iter().map(|r| r.count).sum();
    if total == 0 {
        return draw_placeholder(area, title);
    }

    let area = area
        .titled(title, (FONT, 20).into_font())
        .map_err(chart_error)?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 * 0.35;

    let point = |angle: f64, r: f64| {
        (
            (center.0 + r * angle.cos()).round() as i32,
            (center.1 - r * angle.sin()).round() as i32,
        )
    };

    let label_style =
        TextStyle::from((FONT, 15).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    let mut start = 0.0_f64;

    for (i, row) in rows.iter().enumerate() {
        let share = row.count as f64 / total as f64;
        let sweep = share * 2.0 * PI;
        let steps = ((sweep / (2.0 * PI)) * 120.0).ceil().max(2.0) as usize;

        let mut wedge = vec![point(0.0, 0.0)];
        wedge.extend((0..=steps).map(|s| point(start + sweep * s as f64 / steps as f64, radius)));

        area.draw(&Polygon::new(wedge, PASTEL[i % PASTEL.len()].filled()))
            .map_err(chart_error)?;

        let middle = start + sweep / 2.0;
        area.draw(&Text::new(
            row.status.clone(),
            point(middle, radius * 1.18),
            label_style.clone(),
        ))
        .map_err(chart_error)?;
        area.draw(&Text::new(
            format!("{:.1}%", share * 100.0),
            point(middle, radius * 0.6),
            label_style.clone(),
        ))
        .map_err(chart_error)?;

        start += sweep;
    }

    Ok(())
}
