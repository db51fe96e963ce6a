//! Terminal tables for an analysis report

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use trendcast_market::StockReport;
use trendcast_market::report::table::cell;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Recent rows joined with their indicators
pub fn recent_table(report: &StockReport) -> Table {
    let mut t = table(vec![
        "Date", "Open", "High", "Low", "Close", "Volume", "SMA 20", "SMA 5", "RSI 14",
    ]);
    for row in &report.recent {
        t.add_row(vec![
            row.date.format("%Y-%m-%d").to_string(),
            cell(row.open),
            cell(row.high),
            cell(row.low),
            format!("{:.2}", row.close),
            row.volume.map_or_else(|| "-".to_string(), |v| v.to_string()),
            cell(row.sma_20),
            cell(row.sma_5),
            cell(row.rsi_14),
        ]);
    }
    t
}

/// Projected prices, or `None` when the series was too short
pub fn forecast_table(report: &StockReport) -> Option<Table> {
    let forecast = report.forecast.as_ref()?;
    let mut t = table(vec!["Date", &format!("Predicted Price ({})", report.currency)]);
    for point in &forecast.points {
        t.add_row(vec![
            point.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", point.predicted_price),
        ]);
    }
    Some(t)
}

/// Everything `analyze` prints, in display order
pub fn report_text(report: &StockReport) -> String {
    let mut out = format!("Recent data for {}\n{}\n", report.ticker, recent_table(report));

    if let (Some(rsi), Some(signal)) = (report.latest_rsi, report.rsi_signal) {
        out.push_str(&format!("\nRSI 14: {rsi:.2} ({signal})\n"));
    }

    match (forecast_table(report), &report.forecast_note) {
        (Some(t), _) => out.push_str(&format!(
            "\nPrice forecast (speculative)\n{t}\n"
        )),
        (None, Some(note)) => out.push_str(&format!("\n{note}\n")),
        (None, None) => {}
    }

    out.push_str("\nLatest news\n");
    if let Some(warning) = &report.news_warning {
        out.push_str(&format!("{warning}\n"));
    }
    for article in &report.news {
        out.push_str(&format!("- {} ({})\n", article.title, article.url));
    }
    out
}
