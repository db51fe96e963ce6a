//! Server-rendered dashboard page

use minijinja::{Environment, context};
use serde::Serialize;
use std::time::Duration;

use trendcast_market::report::table::cell;
use trendcast_market::{RequestOutcome, StockReport};

use crate::error::Result;

const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.html");

/// Everything the page shows besides the form
#[derive(Debug, Default)]
pub struct PageInput<'a> {
    pub ticker: &'a str,
    pub notice: Option<&'a str>,
    pub error: Option<&'a str>,
    pub outcome: Option<&'a RequestOutcome>,
}

#[derive(Serialize)]
struct RowView {
    date: String,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: String,
    sma_20: String,
    sma_5: String,
    rsi_14: String,
}

#[derive(Serialize)]
struct ForecastView {
    date: String,
    price: String,
}

#[derive(Serialize)]
struct ReportView<'a> {
    ticker: &'a str,
    currency: &'a str,
    recent: Vec<RowView>,
    rsi: Option<String>,
    rsi_signal: Option<&'static str>,
    chart_svg: String,
    horizon: usize,
    forecast: Vec<ForecastView>,
    forecast_note: Option<&'a str>,
    news: &'a [trendcast_market::NewsArticle],
    news_warning: Option<&'a str>,
}

impl<'a> ReportView<'a> {
    fn new(report: &'a StockReport, horizon: usize) -> Result<Self> {
        let recent = report
            .recent
            .iter()
            .map(|r| RowView {
                date: r.date.format("%Y-%m-%d").to_string(),
                open: cell(r.open),
                high: cell(r.high),
                low: cell(r.low),
                close: format!("{:.2}", r.close),
                volume: r.volume.map_or_else(|| "-".to_string(), |v| v.to_string()),
                sma_20: cell(r.sma_20),
                sma_5: cell(r.sma_5),
                rsi_14: cell(r.rsi_14),
            })
            .collect();

        let forecast = report
            .forecast
            .iter()
            .flat_map(|f| f.points.iter())
            .map(|p| ForecastView {
                date: p.date.format("%Y-%m-%d").to_string(),
                price: format!("{:.2}", p.predicted_price),
            })
            .collect();

        Ok(Self {
            ticker: &report.ticker,
            currency: &report.currency,
            recent,
            rsi: report.latest_rsi.map(|v| format!("{v:.2}")),
            rsi_signal: report.rsi_signal,
            chart_svg: report.chart.to_svg()?,
            horizon: report.forecast.as_ref().map_or(horizon, |f| f.horizon_days),
            forecast,
            forecast_note: report.forecast_note.as_deref(),
            news: &report.news,
            news_warning: report.news_warning.as_deref(),
        })
    }
}

/// Compiled dashboard template
pub struct Dashboard {
    env: Environment<'static>,
    listen_ms: u64,
    horizon: usize,
}

impl Dashboard {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("dashboard.html", DASHBOARD_TEMPLATE)?;
        Ok(Self {
            env,
            listen_ms: 5000,
            horizon: trendcast_market::analysis::DEFAULT_HORIZON_DAYS,
        })
    }

    /// Length of the browser-side recording window
    pub fn with_listen_window(mut self, window: Duration) -> Self {
        self.listen_ms = window.as_millis() as u64;
        self
    }

    pub fn render(&self, input: &PageInput<'_>) -> Result<String> {
        let mut error = input.error.map(str::to_string);
        let report = match input.outcome {
            Some(RequestOutcome::Report(report)) => Some(ReportView::new(report, self.horizon)?),
            Some(RequestOutcome::NoData { message, .. }) => {
                error = Some(message.clone());
                None
            }
            None => None,
        };

        let html = self.env.get_template("dashboard.html")?.render(context! {
            ticker => input.ticker,
            notice => input.notice,
            error => error,
            report => report,
            listen_ms => self.listen_ms,
        })?;
        Ok(html)
    }
}
