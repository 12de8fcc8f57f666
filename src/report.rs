// 5.1: trade history export. plain CSV, consumed by a file-download side
// effect outside the ledger. rows are written most-recent-first, matching
// the order the history is kept in.

use crate::trade::Trade;

const CSV_HEADER: [&str; 9] = [
    "Date", "Symbol", "Side", "Entry", "Exit", "Size", "Leverage", "PnL", "PnL%",
];

pub fn export_trade_history_csv(history: &[Trade]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for trade in history {
        writer.write_record([
            trade.closed_at.to_iso8601(),
            trade.symbol.ticker().to_string(),
            trade.side.to_string(),
            format!("{:.2}", trade.entry_price.value()),
            format!("{:.2}", trade.exit_price.value()),
            format!("{:.2}", trade.size.value()),
            trade.leverage.value().to_string(),
            format!("{:.2}", trade.pnl.value()),
            format!("{:.2}", trade.pnl_percent),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    // Writer only ever receives valid UTF-8
    Ok(String::from_utf8(bytes).expect("csv output is utf-8"))
}
