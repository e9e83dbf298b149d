use {
    super::{
        dashboard::DashboardState,
        renderer::{format_price, price_bounds},
    },
    crate::{fares::PricePoint, sink::MarkerColor},
    ratatui::{
        layout::{Constraint, Direction, Layout as RatLayout, Rect},
        style::{Color, Modifier, Style},
        symbols,
        text::{Line, Span},
        widgets::{
            canvas::{Canvas, Map, MapResolution},
            Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph, Wrap,
        },
        Frame,
    },
};

// Map viewport: contiguous US plus Hawaii
const MAP_LON: [f64; 2] = [-160.0, -60.0];
const MAP_LAT: [f64; 2] = [15.0, 55.0];

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(Span::styled(title, Style::default().fg(Color::Blue)))
}

/// Render the dashboard: map and settings on top, prices, then the log
pub fn render_layout(f: &mut Frame, area: Rect, state: &DashboardState, markers_visible: bool) {
    let rows = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(5, 12), // Map + settings
            Constraint::Ratio(4, 12), // Prices
            Constraint::Ratio(3, 12), // Log
        ])
        .split(area);

    let top = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(9, 12), Constraint::Ratio(3, 12)])
        .split(rows[0]);

    render_map(f, top[0], state, markers_visible);
    render_settings(f, top[1], state);
    render_prices(f, rows[1], state);
    render_log(f, rows[2], state);
}

fn marker_color(color: MarkerColor) -> Color {
    match color {
        MarkerColor::Red => Color::Red,
        MarkerColor::Yellow => Color::Yellow,
    }
}

fn render_map(f: &mut Frame, area: Rect, state: &DashboardState, markers_visible: bool) {
    let markers = state.markers();
    let canvas = Canvas::default()
        .block(panel("Map"))
        .marker(symbols::Marker::Braille)
        .x_bounds(MAP_LON)
        .y_bounds(MAP_LAT)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::Blue,
                resolution: MapResolution::High,
            });
            if markers_visible {
                ctx.layer();
                for marker in markers {
                    ctx.print(
                        marker.lon,
                        marker.lat,
                        Span::styled(
                            "X",
                            Style::default()
                                .fg(marker_color(marker.color))
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            }
        });

    f.render_widget(canvas, area);
}

fn render_settings(f: &mut Frame, area: Rect, state: &DashboardState) {
    let lines: Vec<Line> = state
        .settings()
        .iter()
        .map(|s| Line::from(Span::raw(s.clone())))
        .collect();

    let settings = Paragraph::new(lines)
        .block(panel("Settings"))
        .wrap(Wrap { trim: true });
    f.render_widget(settings, area);
}

fn line_dataset<'a>(name: &'static str, color: Color, data: &'a [(f64, f64)]) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

fn render_prices(f: &mut Frame, area: Rect, state: &DashboardState) {
    let prices = state.prices();
    let points: Vec<PricePoint> = prices.iter().map(|(_, p)| *p).collect();

    let series = |pick: fn(&PricePoint) -> f64| -> Vec<(f64, f64)> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, pick(p)))
            .collect()
    };
    let outbound = series(|p| p.outbound);
    let inbound = series(|p| p.inbound);
    let roundtrip = series(|p| p.roundtrip);

    let datasets = vec![
        line_dataset("Origin/Outbound", Color::Red, &outbound),
        line_dataset("Destination/Return", Color::Yellow, &inbound),
        line_dataset("Roundtrip", Color::Magenta, &roundtrip),
    ];

    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let x_labels = match (prices.first(), prices.last()) {
        (Some((first, _)), Some((last, _))) => vec![
            Span::raw(first.format("%m/%d %H:%M").to_string()),
            Span::raw(last.format("%m/%d %H:%M").to_string()),
        ],
        _ => vec![Span::raw("waiting for first check…")],
    };

    let [lo, hi] = price_bounds(&points);
    let y_labels = vec![
        Span::raw(format_price(lo)),
        Span::raw(format_price((lo + hi) / 2.0)),
        Span::raw(format_price(hi)),
    ];

    let chart = Chart::new(datasets)
        .block(panel("Prices"))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([lo, hi])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

fn render_log(f: &mut Frame, area: Rect, state: &DashboardState) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines = state.log_lines();
    let skip = lines.len().saturating_sub(visible);

    let items: Vec<ListItem> = lines
        .iter()
        .skip(skip)
        .map(|line| {
            let style = if line.contains("deal alert!") || line.contains("Deal alert!") {
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
            } else if line.contains("Error") || line.contains("failed") {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Blue)
            };
            ListItem::new(Line::from(Span::styled(line.clone(), style)))
        })
        .collect();

    f.render_widget(List::new(items).block(panel("Log")), area);
}
