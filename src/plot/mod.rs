//! HTML report rendering.
//!
//! The report is a single self-contained HTML file with an inline SVG chart
//! drawn by Plotters:
//!
//! - training observations as faint circles
//! - the selected ideal functions as lines
//! - mapped test points as triangle markers
//!
//! The SVG backend writes text as plain `<text>` elements, so no font
//! rasterization (and none of Plotters' native font dependencies) is needed.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{MappingRecord, SampleTable, Selection};
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (1000, 600);

/// One color per selected ideal function, reused for its training points.
const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

const MAPPED_COLOR: RGBColor = RGBColor(23, 23, 23);

/// Render the chart and write it wrapped in a standalone HTML file.
pub fn write_html_report(
    path: &Path,
    train: &SampleTable,
    ideal: &SampleTable,
    selections: &[Selection],
    mappings: &[MappingRecord],
) -> Result<(), AppError> {
    let svg = render_svg(train, ideal, selections, mappings)?;
    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Ideal function mapping</title>\n</head>\n<body>\n{svg}\n</body>\n</html>\n"
    );
    std::fs::write(path, html)
        .map_err(|e| AppError::report(format!("Failed to write HTML report '{}': {e}", path.display())))
}

/// Render the chart to an SVG string.
pub fn render_svg(
    train: &SampleTable,
    ideal: &SampleTable,
    selections: &[Selection],
    mappings: &[MappingRecord],
) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw_chart(&root, train, ideal, selections, mappings)
            .map_err(|e| AppError::report(format!("Failed to render report chart: {e}")))?;
    }
    Ok(svg)
}

fn draw_chart(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    train: &SampleTable,
    ideal: &SampleTable,
    selections: &[Selection],
    mappings: &[MappingRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    root.fill(&WHITE)?;

    let ((x0, x1), (y0, y1)) = chart_bounds(train, ideal, selections, mappings);

    let mut chart = ChartBuilder::on(root)
        .caption("Ideal function mapping", ("sans-serif", 24))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .x_labels(10)
        .y_labels(10)
        .draw()?;

    // 1) Training observations, one faint scatter per series.
    for (i, series) in train.series.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let label = format!("train: {}", series.name);
        chart
            .draw_series(
                train
                    .x
                    .iter()
                    .zip(&series.values)
                    .map(|(&x, &y)| Circle::new((x, y), 2, color.mix(0.4).filled())),
            )?
            .label(label)
            .legend(move |(x, y)| Circle::new((x + 9, y), 3, color.filled()));
    }

    // 2) Selected ideal functions as lines, sorted by x for drawing only
    // (tables themselves need not be sorted).
    for (i, sel) in selections.iter().enumerate() {
        let Some(series) = ideal.series(&sel.ideal_series) else {
            continue;
        };
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let mut points: Vec<(f64, f64)> = ideal.x.iter().copied().zip(series.values.iter().copied()).collect();
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let label = format!("ideal: {}", sel.ideal_series);
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    // 3) Mapped test points.
    if !mappings.is_empty() {
        chart
            .draw_series(
                mappings
                    .iter()
                    .map(|m| TriangleMarker::new((m.x, m.y), 6, MAPPED_COLOR.filled())),
            )?
            .label("mapped test")
            .legend(|(x, y)| TriangleMarker::new((x + 9, y), 6, MAPPED_COLOR.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Data-driven chart bounds with a small margin, padded out when degenerate
/// so Plotters always gets a valid non-empty range.
fn chart_bounds(
    train: &SampleTable,
    ideal: &SampleTable,
    selections: &[Selection],
    mappings: &[MappingRecord],
) -> ((f64, f64), (f64, f64)) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    let mut take = |x: f64, y: f64| {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    };

    for series in &train.series {
        for (&x, &y) in train.x.iter().zip(&series.values) {
            take(x, y);
        }
    }
    for sel in selections {
        if let Some(series) = ideal.series(&sel.ideal_series) {
            for (&x, &y) in ideal.x.iter().zip(&series.values) {
                take(x, y);
            }
        }
    }
    for m in mappings {
        take(m.x, m.y);
    }

    (pad_range(x_min, x_max), pad_range(y_min, y_max))
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    if (max - min).abs() < 1e-9 {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Series;

    fn table(x: &[f64], series: &[(&str, &[f64])]) -> SampleTable {
        SampleTable {
            x: x.to_vec(),
            series: series
                .iter()
                .map(|(name, values)| Series {
                    name: name.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn renders_nonempty_svg() {
        let train = table(&[0.0, 1.0, 2.0], &[("y1", &[0.0, 1.0, 2.0])]);
        let ideal = table(&[0.0, 1.0, 2.0], &[("f1", &[0.0, 1.0, 2.0])]);
        let selections = vec![Selection {
            train_series: "y1".to_string(),
            ideal_series: "f1".to_string(),
            sse: 0.0,
            max_dev: 0.0,
        }];
        let mappings = vec![MappingRecord {
            x: 1.0,
            y: 1.0,
            test_series: "y".to_string(),
            ideal_series: "f1".to_string(),
            delta: 0.0,
            threshold: 0.0,
        }];

        let svg = render_svg(&train, &ideal, &selections, &mappings).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn pad_range_handles_degenerate_input() {
        assert_eq!(pad_range(f64::INFINITY, f64::NEG_INFINITY), (0.0, 1.0));
        let (lo, hi) = pad_range(2.0, 2.0);
        assert!(lo < 2.0 && hi > 2.0);
    }
}
