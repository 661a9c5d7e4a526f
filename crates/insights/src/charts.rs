//! SVG charts: pies for shares, bars for opening rankings.

use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;

use crate::error::InsightsError;
use crate::openings::OpeningScore;
use crate::opponents::CountryTally;
use crate::outcomes::OutcomeTally;

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const LEGEND_ROW: i32 = 20;

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for InsightsError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        InsightsError::Chart(e.to_string())
    }
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Draw a pie with a legend on the right. Zero-valued slices only appear
/// in the legend.
fn draw_pie(area: &Area<'_>, title: &str, slices: &[(String, f64)]) -> Result<(), InsightsError> {
    let (width, height) = area.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);

    area.draw(&Text::new(title.to_string(), (10, 8), ("sans-serif", 20).into_font()))?;

    let legend_x = width / 2 + 20;
    for (i, (label, _)) in slices.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let legend_y = 40 + i as i32 * LEGEND_ROW;
        area.draw(&Rectangle::new(
            [(legend_x, legend_y), (legend_x + 12, legend_y + 12)],
            color.filled(),
        ))?;
        area.draw(&Text::new(
            label.clone(),
            (legend_x + 18, legend_y),
            ("sans-serif", 14).into_font(),
        ))?;
    }

    let mut sizes = Vec::with_capacity(slices.len());
    let mut colors = Vec::with_capacity(slices.len());
    let mut labels = Vec::with_capacity(slices.len());
    for (i, (label, value)) in slices.iter().enumerate() {
        if *value > 0.0 {
            sizes.push(*value);
            colors.push(PALETTE[i % PALETTE.len()]);
            labels.push(label.as_str());
        }
    }
    if sizes.is_empty() {
        return Ok(());
    }

    let radius = f64::from((width / 2).min(height - 50)) * 0.38;
    let center = (width / 4 + 20, height / 2 + 15);
    let mut pie = Pie::new(&center, &radius, sizes.as_slice(), colors.as_slice(), labels.as_slice());
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 12).into_font());
    pie.percentages(("sans-serif", 12).into_font().color(&WHITE));
    area.draw(&pie)?;

    Ok(())
}

/// Pie of opponent countries; shares are relative to `games_total`.
pub fn render_countries(
    path: &Path,
    countries: &CountryTally,
    games_total: usize,
) -> Result<(), InsightsError> {
    let rows = countries.len() as u32;
    let height = 460.max(80 + rows * LEGEND_ROW as u32);
    let root = SVGBackend::new(path, (900, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let denominator = games_total.max(1) as f64;
    let slices: Vec<(String, f64)> = countries
        .iter()
        .map(|(name, count)| (name.to_string(), f64::from(count) / denominator))
        .collect();

    draw_pie(&root, "Opponents by country", &slices)?;
    root.present()?;
    Ok(())
}

/// Drawn, won and lost breakdowns stacked vertically. A pie is only drawn
/// when its bucket holds at least one game.
pub fn render_outcomes(path: &Path, outcomes: &OutcomeTally, time_class: &str) -> Result<(), InsightsError> {
    let root = SVGBackend::new(path, (900, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((3, 1));

    let to_slices = |entries: &[(&str, u32)]| -> Vec<(String, f64)> {
        entries
            .iter()
            .map(|(label, count)| (label.to_string(), f64::from(*count)))
            .collect()
    };

    if outcomes.drawn > 0 {
        draw_pie(
            &panels[0],
            &format!("Games({time_class}) Drawn"),
            &to_slices(&outcomes.drawn_by.entries()),
        )?;
    }
    if outcomes.won > 0 {
        draw_pie(
            &panels[1],
            &format!("Games({time_class}) Won"),
            &to_slices(&outcomes.won_by.entries()),
        )?;
    }
    if outcomes.lost > 0 {
        draw_pie(
            &panels[2],
            &format!("Games({time_class}) Lost"),
            &to_slices(&outcomes.lost_by.entries()),
        )?;
    }

    root.present()?;
    Ok(())
}

/// Bar chart of win percentage per opening, each bar annotated with its game count.
pub fn render_openings(path: &Path, scores: &[OpeningScore], x_desc: &str) -> Result<(), InsightsError> {
    let root = SVGBackend::new(path, (1000, 620)).into_drawing_area();
    root.fill(&WHITE)?;

    let bars = scores.len().max(1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..bars, 0f64..1.1f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(scores.len().max(1))
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|v| format!("{:.0}%", v * 100.0))
        .y_desc("Win percentage")
        .x_desc(x_desc)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(scores.iter().enumerate().map(|(i, score)| {
        let x = i as f64;
        Rectangle::new(
            [(x + 0.15, 0.0), (x + 0.85, score.win_fraction)],
            PALETTE[i % PALETTE.len()].filled(),
        )
    }))?;

    chart.draw_series(scores.iter().enumerate().map(|(i, score)| {
        Text::new(
            format!("{} games", score.games),
            (i as f64 + 0.86, score.win_fraction + 0.03),
            ("sans-serif", 13).into_font(),
        )
    }))?;

    // Multi-line opening names under each bar, drawn in pixel space.
    for (i, score) in scores.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(i as f64 + 0.15, 0.0));
        for (line_no, line) in score.label().lines().enumerate() {
            root.draw(&Text::new(
                line.to_string(),
                (px, py + 8 + line_no as i32 * 15),
                ("sans-serif", 12).into_font(),
            ))?;
        }
    }

    root.present()?;
    Ok(())
}
