//! Trend chart: closing price and SMA-20 as two lines
//!
//! The chart is laid out once as SVG. The dashboard embeds that document
//! directly; the on-disk artifact is the same document rasterized to PNG.

use chrono::NaiveDate;
use minijinja::{AutoEscape, Environment, context};
use resvg::usvg;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tiny_skia::{Pixmap, Transform};

use crate::error::{MarketError, Result};
use crate::model::{IndicatorSet, PriceSeries};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const Y_TICKS: usize = 5;

const CHART_TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="{{ width }}" height="{{ height }}" viewBox="0 0 {{ width }} {{ height }}" font-family="sans-serif" font-size="12">
  <rect width="100%" height="100%" fill="#ffffff"/>
  <text x="{{ width / 2 }}" y="24" text-anchor="middle" font-size="16">{{ title }}</text>
  <line x1="{{ left }}" y1="{{ bottom }}" x2="{{ right }}" y2="{{ bottom }}" stroke="#444"/>
  <line x1="{{ left }}" y1="{{ top }}" x2="{{ left }}" y2="{{ bottom }}" stroke="#444"/>
{%- for tick in y_ticks %}
  <line x1="{{ left }}" y1="{{ tick.y }}" x2="{{ right }}" y2="{{ tick.y }}" stroke="#eee"/>
  <text x="{{ left - 6 }}" y="{{ tick.y + 4 }}" text-anchor="end">{{ tick.label }}</text>
{%- endfor %}
{%- for tick in x_ticks %}
  <text x="{{ tick.x }}" y="{{ bottom + 18 }}" text-anchor="middle">{{ tick.label }}</text>
{%- endfor %}
  <text x="{{ (left + right) / 2 }}" y="{{ height - 8 }}" text-anchor="middle">{{ x_label }}</text>
  <text x="16" y="{{ (top + bottom) / 2 }}" text-anchor="middle" transform="rotate(-90 16 {{ (top + bottom) / 2 }})">{{ y_label }}</text>
{%- for line in lines %}
  <polyline fill="none" stroke="{{ line.color }}" stroke-width="2" points="{{ line.points }}"/>
  <rect x="{{ right - 140 }}" y="{{ top + loop.index0 * 18 }}" width="12" height="3" fill="{{ line.color }}"/>
  <text x="{{ right - 122 }}" y="{{ top + loop.index0 * 18 + 5 }}">{{ line.name }}</text>
{%- endfor %}
</svg>
"##;

/// Currency label for a ticker, keyed on its exchange suffix
pub fn currency_for(ticker: &str) -> &'static str {
    const SUFFIXES: &[(&str, &str)] = &[
        (".NS", "INR"),
        (".BO", "INR"),
        (".L", "GBP"),
        (".T", "JPY"),
        (".HK", "HKD"),
        (".TO", "CAD"),
        (".DE", "EUR"),
        (".PA", "EUR"),
        (".AS", "EUR"),
    ];

    let upper = ticker.trim().to_uppercase();
    SUFFIXES
        .iter()
        .find(|(suffix, _)| upper.ends_with(suffix))
        .map_or("USD", |&(_, currency)| currency)
}

/// File name of the chart artifact for `ticker`
pub fn artifact_name(ticker: &str) -> String {
    let safe: String = ticker
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}_stock_chart.png")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: String,
    pub points: Vec<LinePoint>,
}

/// Renderable two-line trend view of a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub ticker: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub currency: String,
    pub lines: Vec<LineSeries>,
}

#[derive(Serialize)]
struct Tick {
    x: f64,
    y: f64,
    label: String,
}

#[derive(Serialize)]
struct RenderedLine<'a> {
    name: &'a str,
    color: &'a str,
    points: String,
}

impl TrendChart {
    /// Select the close and SMA-20 columns; warm-up SMA points are left out
    pub fn build(series: &PriceSeries, indicators: &IndicatorSet) -> Self {
        let ticker = series.symbol().to_string();
        let currency = currency_for(&ticker);

        let close = series
            .points()
            .iter()
            .map(|p| LinePoint {
                date: p.date,
                value: p.close,
            })
            .collect();
        let sma_20 = indicators
            .rows
            .iter()
            .filter_map(|r| {
                r.sma_20.map(|value| LinePoint {
                    date: r.date,
                    value,
                })
            })
            .collect();

        Self {
            title: format!("{ticker} Stock Price Trend"),
            x_label: "Date".to_string(),
            y_label: format!("Price ({currency})"),
            currency: currency.to_string(),
            lines: vec![
                LineSeries {
                    name: "Closing Price".to_string(),
                    color: "blue".to_string(),
                    points: close,
                },
                LineSeries {
                    name: "20-day SMA".to_string(),
                    color: "orange".to_string(),
                    points: sma_20,
                },
            ],
            ticker,
        }
    }

    fn bounds(&self) -> Option<(NaiveDate, NaiveDate, f64, f64)> {
        let mut all = self.lines.iter().flat_map(|l| l.points.iter());
        let first = all.next()?;
        let init = (first.date, first.date, first.value, first.value);

        Some(all.fold(init, |(d0, d1, lo, hi), p| {
            (d0.min(p.date), d1.max(p.date), lo.min(p.value), hi.max(p.value))
        }))
    }

    /// Render as a standalone SVG document
    pub fn to_svg(&self) -> Result<String> {
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let bottom = HEIGHT - MARGIN_BOTTOM;

        let (start, end, lo, hi) = self.bounds().unwrap_or((
            NaiveDate::MIN,
            NaiveDate::MIN,
            0.0,
            1.0,
        ));
        let pad = ((hi - lo) * 0.05).max(hi.abs() * 0.01).max(1e-6);
        let (lo, hi) = (lo - pad, hi + pad);
        let span_days = (end - start).num_days().max(1) as f64;

        let x_of = |d: NaiveDate| MARGIN_LEFT + (d - start).num_days() as f64 / span_days * plot_w;
        let y_of = |v: f64| bottom - (v - lo) / (hi - lo) * plot_h;

        let lines: Vec<RenderedLine<'_>> = self
            .lines
            .iter()
            .map(|line| RenderedLine {
                name: &line.name,
                color: &line.color,
                points: line
                    .points
                    .iter()
                    .map(|p| format!("{:.1},{:.1}", x_of(p.date), y_of(p.value)))
                    .collect::<Vec<_>>()
                    .join(" "),
            })
            .collect();

        let y_ticks: Vec<Tick> = (0..=Y_TICKS)
            .map(|i| {
                let value = lo + (hi - lo) * i as f64 / Y_TICKS as f64;
                Tick {
                    x: MARGIN_LEFT,
                    y: y_of(value),
                    label: format!("{value:.2}"),
                }
            })
            .collect();

        let mid = start + chrono::Duration::days((end - start).num_days() / 2);
        let x_ticks: Vec<Tick> = if self.bounds().is_some() {
            let mut dates = vec![start, mid, end];
            dates.dedup();
            dates
                .into_iter()
                .map(|d| Tick {
                    x: x_of(d),
                    y: bottom,
                    label: d.format("%Y-%m-%d").to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template("trend_chart", CHART_TEMPLATE)?;

        let svg = env.get_template("trend_chart")?.render(context! {
            width => WIDTH,
            height => HEIGHT,
            left => MARGIN_LEFT,
            right => WIDTH - MARGIN_RIGHT,
            top => MARGIN_TOP,
            bottom => bottom,
            title => &self.title,
            x_label => &self.x_label,
            y_label => &self.y_label,
            y_ticks => y_ticks,
            x_ticks => x_ticks,
            lines => lines,
        })?;

        Ok(svg)
    }

    /// Rasterize the SVG rendering into PNG bytes
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let svg = self.to_svg()?;

        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        let tree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| MarketError::Render(format!("invalid chart SVG: {e}")))?;

        let size = tree.size().to_int_size();
        let mut pixmap = Pixmap::new(size.width(), size.height())
            .ok_or_else(|| MarketError::Render("chart has zero size".to_string()))?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| MarketError::Render(format!("PNG encoding failed: {e}")))
    }

    /// Write `{ticker}_stock_chart.png` into `dir`, replacing any previous file
    pub fn write_png(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(artifact_name(&self.ticker));
        std::fs::write(&path, self.to_png()?)?;
        tracing::info!(path = %path.display(), "wrote chart artifact");
        Ok(path)
    }
}
