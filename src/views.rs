//! HTML rendering. Every page goes through `layout`; every interpolated user value
//! goes through `escape`.

use std::fmt::Write;

use axum::http::StatusCode;
use rust_decimal::Decimal;

use crate::portfolio::Portfolio;
use crate::types::quote::Quote;
use crate::types::transaction::Transaction;

/// Format money as US dollars: `$1,234.56`, `-$5.00`.
pub fn usd(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, signed_in: bool, body: &str) -> String {
    let nav = if signed_in {
        r#"<ul class="nav">
<li><a href="/quote">Quote</a></li>
<li><a href="/buy">Buy</a></li>
<li><a href="/sell">Sell</a></li>
<li><a href="/add_cash">Add Cash</a></li>
<li><a href="/history">History</a></li>
<li><a href="/logout">Log Out</a></li>
</ul>"#
    } else {
        r#"<ul class="nav">
<li><a href="/register">Register</a></li>
<li><a href="/login">Log In</a></li>
</ul>"#
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="initial-scale=1, width=device-width">
<title>Paper Broker: {title}</title>
</head>
<body>
<nav><a href="/">Paper Broker</a>
{nav}
</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn apology_page(message: &str, status: StatusCode) -> String {
    let body = format!(
        r#"<h1 class="apology">{code}</h1>
<p class="apology-message">{message}</p>"#,
        code = status.as_u16(),
        message = escape(message),
    );
    layout("Apology", false, &body)
}

pub fn login_page() -> String {
    let body = r#"<form action="/login" method="post">
<input autocomplete="off" autofocus name="username" placeholder="Username" type="text">
<input name="password" placeholder="Password" type="password">
<button type="submit">Log In</button>
</form>"#;
    layout("Log In", false, body)
}

pub fn register_page() -> String {
    let body = r#"<form action="/register" method="post">
<input autocomplete="off" autofocus name="username" placeholder="Username" type="text">
<input name="password" placeholder="Password" type="password">
<input name="confirmation" placeholder="Confirm password" type="password">
<button type="submit">Register</button>
</form>"#;
    layout("Register", false, body)
}

pub fn quote_page() -> String {
    let body = r#"<form action="/quote" method="post">
<input autocomplete="off" autofocus name="symbol" placeholder="Symbol" type="text">
<button type="submit">Quote</button>
</form>"#;
    layout("Quote", true, body)
}

pub fn quoted_page(quote: &Quote) -> String {
    let body = format!(
        "<p>A share of {name} ({symbol}) costs {price}.</p>",
        name = escape(&quote.name),
        symbol = escape(&quote.symbol),
        price = usd(quote.price),
    );
    layout("Quoted", true, &body)
}

pub fn buy_page() -> String {
    let body = r#"<form action="/buy" method="post">
<input autocomplete="off" autofocus name="symbol" placeholder="Symbol" type="text">
<input min="1" name="shares" placeholder="Shares" type="number">
<button type="submit">Buy</button>
</form>"#;
    layout("Buy", true, body)
}

/// Sell form; the select lists only symbols the user holds.
pub fn sell_page(symbols: &[String]) -> String {
    let mut options = String::new();
    for symbol in symbols {
        let symbol = escape(symbol);
        let _ = writeln!(options, r#"<option value="{symbol}">{symbol}</option>"#);
    }
    let body = format!(
        r#"<form action="/sell" method="post">
<select name="symbol">
<option disabled selected value="">Symbol</option>
{options}</select>
<input min="1" name="shares" placeholder="Shares" type="number">
<button type="submit">Sell</button>
</form>"#
    );
    layout("Sell", true, &body)
}

pub fn add_cash_page() -> String {
    let body = r#"<form action="/add_cash" method="post">
<input autocomplete="off" autofocus min="0.01" name="cash" placeholder="Amount" step="0.01" type="number">
<button type="submit">Add Cash</button>
</form>"#;
    layout("Add Cash", true, body)
}

pub fn index_page(portfolio: &Portfolio) -> String {
    let mut rows = String::new();
    for holding in &portfolio.holdings {
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&holding.symbol),
            escape(&holding.name),
            holding.shares,
            usd(holding.price),
            usd(holding.total),
        );
    }
    let body = format!(
        r#"<table class="portfolio">
<thead><tr><th>Symbol</th><th>Name</th><th>Shares</th><th>Price</th><th>TOTAL</th></tr></thead>
<tbody>
{rows}<tr><td colspan="4">CASH</td><td>{cash}</td></tr>
</tbody>
<tfoot><tr><td colspan="4"></td><td class="grand-total">{total}</td></tr></tfoot>
</table>"#,
        cash = usd(portfolio.cash),
        total = usd(portfolio.grand_total),
    );
    layout("Portfolio", true, &body)
}

pub fn history_page(transactions: &[Transaction]) -> String {
    let mut rows = String::new();
    for txn in transactions {
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            txn.kind.as_str(),
            escape(&txn.symbol),
            usd(txn.price),
            txn.shares,
            txn.timestamp.format("%Y-%m-%d %H:%M:%S"),
        );
    }
    let body = format!(
        r#"<table class="history">
<thead><tr><th>Type</th><th>Symbol</th><th>Price</th><th>Shares</th><th>Transacted</th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#
    );
    layout("History", true, &body)
}
