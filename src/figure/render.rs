use std::iter;

use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::axes::{
    Artist, Axes, Line, LineStyle, Placement, Ticks, VerticalDirection, XAxis, YAxis,
};
use super::{Figure, Panel};
use crate::color::{self, to_rgb};
use crate::error::{Result, SoilError};

type Area<'b> = DrawingArea<SVGBackend<'b>, Shift>;
type AxisCoord = WithKeyPoints<RangedCoordf64>;
type Chart<'c, 'b> = ChartContext<'c, SVGBackend<'b>, Cartesian2d<AxisCoord, AxisCoord>>;

// Layout, in pixels.
const LEFT_MARGIN: f64 = 80.0;
const RIGHT_MARGIN: f64 = 30.0;
const BOTTOM_MARGIN: f64 = 40.0;
const TOP_LABEL_ROOM: f64 = 48.0;
const TITLE_ROOM: f64 = 32.0;
const PANEL_GAP: f64 = 16.0;
const MAJOR_TICK: i32 = 5;
const MINOR_TICK: i32 = 3;
const DASH: i32 = 8;
const DASH_GAP: i32 = 5;
const LEGEND_SAMPLE: i32 = 30;

// Text sizes, in points.
const TICK_FONT: f64 = 9.0;
const LABEL_FONT: f64 = 10.0;
const TITLE_FONT: f64 = 12.0;

/// Upper bound on generated ticks per axis.
const MAX_TICKS: usize = 400;
/// Tick count asked of plotters for `Ticks::Auto`.
const AUTO_TICKS: usize = 6;

fn render_error<E: std::fmt::Display>(err: E) -> SoilError {
    SoilError::Render(err.to_string())
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// The plot box of a panel, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn right(&self) -> f64 {
        self.left + self.width
    }
}

fn px(value: f64) -> i32 {
    value.round() as i32
}

/// Points to pixels at the figure's dpi.
fn points(size: f64, dpi: f64) -> f64 {
    size * dpi / 72.0
}

/// Split the figure into one frame per panel.
fn layout(figure: &Figure) -> Vec<Frame> {
    let (width, height) = figure.pixel_size();
    let (width, height) = (f64::from(width), f64::from(height));

    let top_room = TOP_LABEL_ROOM + if figure.title().is_some() { TITLE_ROOM } else { 0.0 };
    let highest_spine = figure
        .panels()
        .iter()
        .flat_map(Panel::axes)
        .map(|axes| axes.x.spine_position())
        .fold(1.0, f64::max);

    let plot_height = ((height - BOTTOM_MARGIN - top_room) / highest_spine).max(1.0);
    let top = height - BOTTOM_MARGIN - plot_height;

    let panels = figure.panels();
    let gaps = PANEL_GAP * panels.len().saturating_sub(1) as f64;
    let available = (width - LEFT_MARGIN - RIGHT_MARGIN - gaps).max(1.0);
    let total_ratio: f64 = panels.iter().map(Panel::width_ratio).sum();

    let mut left = LEFT_MARGIN;
    panels
        .iter()
        .map(|panel| {
            let frame = Frame {
                left,
                top,
                width: available * panel.width_ratio() / total_ratio,
                height: plot_height,
            };
            left = frame.right() + PANEL_GAP;
            frame
        })
        .collect()
}

/// The frame plus its label room: left labels, top labels, bottom margin.
fn panel_area<'b>(root: &Area<'b>, frame: Frame, left_room: f64) -> Area<'b> {
    root.clone().shrink(
        (px(frame.left - left_room), px(frame.top - TOP_LABEL_ROOM)),
        (
            px(frame.width + left_room),
            px(TOP_LABEL_ROOM + frame.height + BOTTOM_MARGIN),
        ),
    )
}

/// Runs of consecutive points that are finite and inside the x range.
fn visible_runs(line: &Line, (lo, hi): (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    let (lo, hi) = (lo.min(hi), lo.max(hi));
    let points: Vec<(f64, f64)> = line.x.iter().copied().zip(line.y.iter().copied()).collect();
    points
        .split(|&(x, y)| !(x.is_finite() && y.is_finite() && x >= lo && x <= hi))
        .filter(|run| run.len() >= 2)
        .map(<[_]>::to_vec)
        .collect()
}

// ---------------------------------------------------------------------------
// Ticks and coordinates
// ---------------------------------------------------------------------------

fn tick_values(ticks: &Ticks, (lo, hi): (f64, f64)) -> Vec<f64> {
    let (lo, hi) = (lo.min(hi), lo.max(hi));
    let inside = |v: &f64| *v >= lo - 1e-9 && *v <= hi + 1e-9;
    match ticks {
        Ticks::Fixed(values) => values.iter().copied().filter(inside).collect(),
        Ticks::Multiple(step) if *step > 0.0 && (hi - lo) / step <= MAX_TICKS as f64 => {
            multiples(*step, lo, hi)
        }
        Ticks::Auto | Ticks::Multiple(_) => RangedCoordf64::from(lo..hi).key_points(AUTO_TICKS),
    }
}

fn multiples(step: f64, lo: f64, hi: f64) -> Vec<f64> {
    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        let rounded = value.round();
        format!("{}", if rounded == 0.0 { 0.0 } else { rounded })
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// The x coordinate of one axes: its limits, flipped when reversed, with
/// major ticks as bold points and minor ticks as light points.
fn x_coord(axes: &Axes) -> AxisCoord {
    let (lo, hi) = axes.x_limits();
    let range = if axes.x.reversed { hi..lo } else { lo..hi };
    let minor = axes
        .x
        .minor_ticks
        .as_ref()
        .map(|ticks| tick_values(ticks, (lo, hi)))
        .unwrap_or_default();
    range
        .with_key_points(tick_values(&axes.x.major_ticks, (lo, hi)))
        .with_light_points(minor)
}

fn y_coord(axis: &YAxis, (lo, hi): (f64, f64)) -> AxisCoord {
    let range = match axis.direction {
        VerticalDirection::Up => lo..hi,
        VerticalDirection::Down => hi..lo,
    };
    range.with_key_points(tick_values(&axis.major_ticks, (lo, hi)))
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn font(size_pt: f64, dpi: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, points(size_pt, dpi), FontStyle::Normal)
}

/// A chart whose plotting area is the panel frame. Only the host reserves
/// label areas; twins reach the same box through margins.
fn build_chart<'c, 'b>(
    area: &Area<'b>,
    axes: &Axes,
    y: AxisCoord,
    host: bool,
    left: i32,
) -> Result<Chart<'c, 'b>> {
    let (top, bottom) = (px(TOP_LABEL_ROOM), px(BOTTOM_MARGIN));
    let mut builder = ChartBuilder::on(area);
    if host {
        builder.set_label_area_size(LabelAreaPosition::Left, left);
        match axes.x.placement {
            Placement::Bottom => builder
                .margin_top(top)
                .set_label_area_size(LabelAreaPosition::Bottom, bottom),
            Placement::Top { .. } => builder
                .set_label_area_size(LabelAreaPosition::Top, top)
                .margin_bottom(bottom),
        };
    } else {
        builder.margin_left(left).margin_top(top).margin_bottom(bottom);
    }
    builder.build_cartesian_2d(x_coord(axes), y).map_err(render_error)
}

fn draw_mesh(chart: &mut Chart, host: &Axes, with_y_labels: bool, dpi: f64) -> Result<()> {
    let x_labels = |v: &f64| if host.x.tick_labels { format_tick(*v) } else { String::new() };
    let y_labels = |v: &f64| format_tick(*v);

    let mut mesh = chart.configure_mesh();
    mesh.x_label_formatter(&x_labels)
        .y_label_formatter(&y_labels)
        .label_style(font(TICK_FONT, dpi))
        .axis_desc_style(font(LABEL_FONT, dpi));
    match &host.grid {
        Some(grid) => {
            let rgb = to_rgb(color::GRID);
            mesh.bold_line_style(rgb.mix(grid.major_alpha).stroke_width(1))
                .light_line_style(rgb.mix(grid.minor_alpha).stroke_width(1));
        }
        None => {
            mesh.disable_mesh();
        }
    }
    if let (true, Some(label)) = (with_y_labels, &host.y.label) {
        mesh.y_desc(label.clone());
    }
    mesh.draw().map_err(render_error)
}

fn draw_artists(chart: &mut Chart, axes: &Axes, dpi: f64) -> Result<()> {
    let x_range = chart.x_range();
    for artist in axes.artists() {
        match artist {
            Artist::Band(band) => {
                let corners = [(band.x.0, band.y.0), (band.x.1, band.y.1)];
                chart
                    .draw_series(iter::once(Rectangle::new(corners, to_rgb(band.color).filled())))
                    .map_err(render_error)?;
            }
            Artist::Line(line) => {
                let width = points(line.width, dpi).round().max(1.0) as u32;
                let style = to_rgb(line.color).stroke_width(width);
                for run in visible_runs(line, (x_range.start, x_range.end)) {
                    chart.draw_series(LineSeries::new(run, style)).map_err(render_error)?;
                }
            }
            Artist::HorizontalLine(hline) => {
                let style = to_rgb(hline.color).stroke_width(2);
                let ends = vec![(x_range.start, hline.y), (x_range.end, hline.y)];
                match hline.style {
                    LineStyle::Solid => chart.draw_series(LineSeries::new(ends, style)),
                    LineStyle::Dashed => {
                        chart.draw_series(DashedLineSeries::new(ends, DASH, DASH_GAP, style))
                    }
                }
                .map_err(render_error)?;
            }
            Artist::Annotation(annotation) => {
                let style = font(annotation.font_size, dpi)
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Left, VPos::Center));
                let text = Text::new(annotation.text.clone(), (annotation.x, annotation.y), style);
                chart.draw_series(iter::once(text)).map_err(render_error)?;
            }
        }
    }
    Ok(())
}

/// Backend row of a spine placed at `position` times the plot height.
fn spine_row(chart: &Chart, placement: Placement) -> i32 {
    let (_, rows) = chart.plotting_area().get_pixel_range();
    let position = match placement {
        Placement::Bottom => 0.0,
        Placement::Top { position } => position,
    };
    rows.end - px(position * f64::from(rows.end - rows.start))
}

/// Spine, ticks and tick labels of a twin axis stacked above the plot.
fn draw_spine(root: &Area, chart: &Chart, axes: &Axes, dpi: f64) -> Result<()> {
    let axis = &axes.x;
    let (columns, _) = chart.plotting_area().get_pixel_range();
    let row = spine_row(chart, axis.placement);
    let outward = if axis.placement == Placement::Bottom { 1 } else { -1 };
    let depth = chart.y_range().start;
    let column = |value: f64| chart.backend_coord(&(value, depth)).0;
    let black = BLACK.stroke_width(1);

    let segment = |from: (i32, i32), to: (i32, i32)| {
        root.draw(&PathElement::new(vec![from, to], black)).map_err(render_error)
    };

    segment((columns.start, row), (columns.end - 1, row))?;

    let limits = axes.x_limits();
    if let Some(minor) = &axis.minor_ticks {
        for value in tick_values(minor, limits) {
            let x = column(value);
            segment((x, row), (x, row + outward * MINOR_TICK))?;
        }
    }

    let anchor = if outward > 0 { VPos::Top } else { VPos::Bottom };
    let style = font(TICK_FONT, dpi).color(&BLACK).pos(Pos::new(HPos::Center, anchor));
    for value in tick_values(&axis.major_ticks, limits) {
        let x = column(value);
        segment((x, row), (x, row + outward * MAJOR_TICK))?;
        if axis.tick_labels {
            let at = (x, row + outward * (MAJOR_TICK + 2));
            root.draw(&Text::new(format_tick(value), at, style.clone()))
                .map_err(render_error)?;
        }
    }
    Ok(())
}

/// The axis label, in the axis colour, outside its tick labels.
fn draw_x_label(root: &Area, chart: &Chart, axis: &XAxis, dpi: f64) -> Result<()> {
    let Some(label) = &axis.label else {
        return Ok(());
    };
    let (columns, _) = chart.plotting_area().get_pixel_range();
    let row = spine_row(chart, axis.placement);
    let (outward, anchor) = match axis.placement {
        Placement::Bottom => (1, VPos::Top),
        Placement::Top { .. } => (-1, VPos::Bottom),
    };
    let tick_room = if axis.tick_labels { px(points(TICK_FONT, dpi)) } else { 0 };
    let at = ((columns.start + columns.end) / 2, row + outward * (MAJOR_TICK + 4 + tick_room));
    let style = font(LABEL_FONT, dpi)
        .color(&to_rgb(axis.color))
        .pos(Pos::new(HPos::Center, anchor));
    root.draw(&Text::new(label.clone(), at, style)).map_err(render_error)
}

/// Register every labelled artist of the panel on the host chart and draw
/// the series labels box.
fn draw_legend<'c, 'b: 'c>(chart: &mut Chart<'c, 'b>, panel: &Panel, dpi: f64) -> Result<()> {
    let entries = panel.legend_entries();
    if entries.is_empty() {
        return Ok(());
    }

    for entry in entries {
        let style = to_rgb(entry.color).stroke_width(2);
        let anno = chart
            .draw_series(LineSeries::new(iter::empty::<(f64, f64)>(), style))
            .map_err(render_error)?;
        anno.label(entry.label);
        match entry.style {
            LineStyle::Solid => anno.legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + LEGEND_SAMPLE, y)], style)
            }),
            LineStyle::Dashed => anno.legend(move |(x, y)| {
                let sample = vec![(x, y), (x + LEGEND_SAMPLE, y)];
                DashedPathElement::new(sample, DASH, DASH_GAP, style)
            }),
        };
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&to_rgb(color::GRID))
        .label_font(font(TICK_FONT, dpi))
        .draw()
        .map_err(render_error)
}

fn draw_panel(
    root: &Area,
    panel: &Panel,
    frame: Frame,
    y_limits: (f64, f64),
    first: bool,
    dpi: f64,
) -> Result<()> {
    // Panels share the depth axis; only the first one carries its labels.
    let left_room = if first { LEFT_MARGIN } else { 0.0 };
    let area = panel_area(root, frame, left_room);
    let host_y = &panel.host().y;

    let mut charts = Vec::with_capacity(panel.axes().len());
    for (index, axes) in panel.axes().iter().enumerate() {
        let host = index == 0;
        let mut chart = build_chart(&area, axes, y_coord(host_y, y_limits), host, px(left_room))?;
        if host {
            draw_mesh(&mut chart, axes, first, dpi)?;
        }
        draw_artists(&mut chart, axes, dpi)?;
        charts.push(chart);
    }

    let Some(host) = charts.first() else {
        return Ok(());
    };
    let (columns, rows) = host.plotting_area().get_pixel_range();
    root.draw(&Rectangle::new(
        [(columns.start, rows.start), (columns.end - 1, rows.end - 1)],
        BLACK.stroke_width(1),
    ))
    .map_err(render_error)?;

    for (index, (axes, chart)) in panel.axes().iter().zip(&charts).enumerate() {
        if index > 0 {
            draw_spine(root, chart, axes, dpi)?;
        }
        draw_x_label(root, chart, &axes.x, dpi)?;
    }

    if let (true, Some(host)) = (panel.show_legend(), charts.first_mut()) {
        draw_legend(host, panel, dpi)?;
    }
    Ok(())
}

pub(crate) fn to_svg(figure: &Figure) -> Result<String> {
    let (width, height) = figure.pixel_size();
    let frames = layout(figure);
    let y_limits = figure.y_limits();
    let dpi = figure.dpi();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        for (index, (panel, frame)) in figure.panels().iter().zip(frames).enumerate() {
            draw_panel(&root, panel, frame, y_limits, index == 0, dpi)?;
        }

        if let Some(title) = figure.title() {
            let style = font(TITLE_FONT, dpi)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top));
            root.draw(&Text::new(title.to_string(), (width as i32 / 2, 8), style))
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotConfig;
    use crate::figure::HorizontalLine;

    #[test]
    fn ticks_follow_the_policy() {
        assert_eq!(tick_values(&Ticks::Multiple(5.0), (0.0, 12.0)), vec![0.0, 5.0, 10.0]);
        assert_eq!(tick_values(&Ticks::Fixed(vec![-1.0, 0.5, 3.0]), (0.0, 1.0)), vec![0.5]);

        let auto = tick_values(&Ticks::Auto, (0.0, 0.8));
        assert!(!auto.is_empty());
        assert!(auto.iter().all(|v| (0.0..=0.8 + 1e-9).contains(v)));
    }

    #[test]
    fn tick_labels_are_compact() {
        assert_eq!(format_tick(5.0), "5");
        assert_eq!(format_tick(-0.0), "0");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(-1.5), "-1.5");
    }

    #[test]
    fn reversed_axis_maps_large_values_left() {
        let mut axes = Axes::default();
        axes.x.set_limits(0.0, 16.0);
        axes.x.reversed = true;
        axes.x.major_ticks = Ticks::Multiple(4.0);

        let coord = x_coord(&axes);
        assert_eq!(coord.range(), 16.0..0.0);
        assert_eq!(coord.map(&16.0, (0, 100)), 0);
        assert_eq!(coord.map(&0.0, (0, 100)), 100);
        assert_eq!(coord.bold_points(), &[0.0, 4.0, 8.0, 12.0, 16.0]);
    }

    #[test]
    fn depth_axis_grows_upward() {
        let coord = y_coord(&YAxis::default(), (-10.0, 0.0));
        assert_eq!(coord.range(), -10.0..0.0);

        let down = YAxis {
            direction: VerticalDirection::Down,
            ..YAxis::default()
        };
        assert_eq!(y_coord(&down, (-10.0, 0.0)).range(), 0.0..-10.0);
    }

    #[test]
    fn gaps_and_out_of_range_points_split_a_line() {
        let line = Line::new(
            vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 60.0, 6.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
            color::BLACK,
        );
        let runs = visible_runs(&line, (40.0, 0.0));
        assert_eq!(runs, vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(4.0, 4.0), (5.0, 5.0)]]);
    }

    #[test]
    fn panels_split_width_by_ratio() {
        let figure = Figure::from_config(&PlotConfig::default())
            .unwrap()
            .with_panel(Panel::new(1.0))
            .with_panel(Panel::new(0.1));
        let frames = layout(&figure);
        assert_eq!(frames.len(), 2);
        assert!((frames[0].width / frames[1].width - 10.0).abs() < 1e-9);
        assert_eq!(frames[0].top, frames[1].top);
    }

    #[test]
    fn renders_an_svg_document() {
        let mut panel = Panel::new(1.0);
        panel
            .host_mut()
            .plot(Line::new(vec![0.0, 1.0], vec![0.0, -1.0], color::CONE_RESISTANCE));
        panel.host_mut().annotate("Zand", (0.25, -0.5), 5.0);
        let figure = Figure::from_config(&PlotConfig::default())
            .unwrap()
            .with_title("CPT-01")
            .with_panel(panel);

        let svg = figure.to_svg().unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Zand"));
        assert!(svg.contains("CPT-01"));
    }

    #[test]
    fn legend_lists_labelled_lines_and_twin_labels() {
        let mut panel = Panel::new(1.0);
        panel.set_legend(true);
        panel.host_mut().axhline(
            HorizontalLine::new(-0.5, color::TAB_BLUE)
                .dashed()
                .with_label("Groundwater level"),
        );
        let twin = panel.twin_x();
        twin.x.placement = Placement::Top { position: 1.1 };
        twin.x.label = Some("Rf [%]".to_string());
        twin.plot(
            Line::new(vec![1.0, 2.0], vec![0.0, -1.0], color::BLACK).with_label("Friction ratio"),
        );
        let figure = Figure::from_config(&PlotConfig::default())
            .unwrap()
            .with_panel(panel);

        let svg = figure.to_svg().unwrap();
        assert!(svg.contains("Groundwater level"));
        assert!(svg.contains("Friction ratio"));
        assert!(svg.contains("Rf [%]"));
    }
}
