//! # Charts
//! SVG renderings of a classification: the per-headline sentiment line with
//! buy markers, and the buy / not-buy bar chart. Pure string building so the
//! output can be asserted on in tests and dropped straight into the page.

use std::fmt::Write as _;

use serde::Serialize;

use crate::classify::Classification;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const LEFT: f64 = 64.0;
const RIGHT: f64 = 24.0;
const TOP: f64 = 48.0;
const BOTTOM: f64 = 56.0;

const SERIES_COLOR: &str = "blue";
const BUY_COLOR: &str = "green";
const NOT_BUY_COLOR: &str = "red";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SvgCharts {
    pub sentiment: String,
    pub distribution: String,
}

pub fn render(ticker: &str, c: &Classification) -> SvgCharts {
    SvgCharts {
        sentiment: sentiment_svg(ticker, c),
        distribution: distribution_svg(c.buy_count(), c.not_buy_count()),
    }
}

fn plot_w() -> f64 {
    WIDTH - LEFT - RIGHT
}

fn plot_h() -> f64 {
    HEIGHT - TOP - BOTTOM
}

fn open_svg(out: &mut String, title: &str) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    );
    let _ = write!(out, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#);
    let _ = write!(
        out,
        r#"<text class="title" x="{:.1}" y="24" text-anchor="middle" font-size="15">{}</text>"#,
        WIDTH / 2.0,
        html_escape::encode_text(title)
    );
}

fn axis_labels(out: &mut String, x_label: &str, y_label: &str) {
    let _ = write!(
        out,
        r#"<text class="x-label" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        LEFT + plot_w() / 2.0,
        HEIGHT - 12.0,
        html_escape::encode_text(x_label)
    );
    let cy = TOP + plot_h() / 2.0;
    let _ = write!(
        out,
        r#"<text class="y-label" x="16" y="{cy:.1}" text-anchor="middle" transform="rotate(-90 16 {cy:.1})">{}</text>"#,
        html_escape::encode_text(y_label)
    );
    // frame
    let _ = write!(
        out,
        r#"<rect x="{LEFT}" y="{TOP}" width="{:.1}" height="{:.1}" fill="none" stroke="dimgray"/>"#,
        plot_w(),
        plot_h()
    );
}

/// Line chart of `scores` over headline index with a marker on each buy.
pub fn sentiment_svg(ticker: &str, c: &Classification) -> String {
    let n = c.scores.len();
    let x_of = |i: usize| -> f64 {
        if n <= 1 {
            LEFT + plot_w() / 2.0
        } else {
            LEFT + i as f64 * plot_w() / (n - 1) as f64
        }
    };
    // y axis is fixed to the compound range
    let y_of = |v: f64| -> f64 { TOP + (1.0 - (v.clamp(-1.0, 1.0) + 1.0) / 2.0) * plot_h() };

    let mut out = String::with_capacity(2048 + n * 64);
    open_svg(
        &mut out,
        &format!("Sentiment Analysis of Stock {ticker} News Headlines"),
    );
    axis_labels(&mut out, "Headline", "Sentiment Polarity");

    for tick in [-1.0, -0.5, 0.0, 0.5, 1.0] {
        let y = y_of(tick);
        let _ = write!(
            out,
            r#"<text class="y-tick" x="{:.1}" y="{:.1}" text-anchor="end">{tick:.1}</text>"#,
            LEFT - 6.0,
            y + 4.0
        );
    }
    let every = n.div_ceil(10).max(1);
    for i in (0..n).step_by(every) {
        let _ = write!(
            out,
            r#"<text class="x-tick" x="{:.1}" y="{:.1}" text-anchor="middle">{i}</text>"#,
            x_of(i),
            TOP + plot_h() + 16.0
        );
    }

    let zero = y_of(0.0);
    let _ = write!(
        out,
        r#"<line class="zero" x1="{LEFT}" y1="{zero:.1}" x2="{:.1}" y2="{zero:.1}" stroke="black" stroke-dasharray="6 4"/>"#,
        LEFT + plot_w()
    );

    if n > 0 {
        let points = c
            .scores
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{:.1},{:.1}", x_of(i), y_of(*s)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            out,
            r#"<polyline class="series" fill="none" stroke="{SERIES_COLOR}" stroke-width="1.5" points="{points}"/>"#
        );
    }

    for &i in &c.buy_indices {
        let Some(s) = c.scores.get(i) else { continue };
        let _ = write!(
            out,
            r#"<circle class="buy" cx="{:.1}" cy="{:.1}" r="5" fill="{BUY_COLOR}"><title>#{i}: {s:+.4}</title></circle>"#,
            x_of(i),
            y_of(*s)
        );
    }

    // legend
    let lx = LEFT + plot_w() - 56.0;
    let _ = write!(
        out,
        r#"<g class="legend"><circle cx="{lx:.1}" cy="{:.1}" r="5" fill="{BUY_COLOR}"/><text x="{:.1}" y="{:.1}">Buy</text></g>"#,
        TOP + 14.0,
        lx + 10.0,
        TOP + 18.0
    );

    out.push_str("</svg>");
    out
}

/// Two-bar chart of buy vs not-buy counts.
pub fn distribution_svg(buy: usize, not_buy: usize) -> String {
    let max = buy.max(not_buy).max(1);
    let step = max.div_ceil(5).max(1);
    let top_value = step * max.div_ceil(step);
    let y_of = |v: usize| -> f64 { TOP + plot_h() * (1.0 - v as f64 / top_value as f64) };

    let mut out = String::with_capacity(2048);
    open_svg(&mut out, "Distribution of Buy vs Not Buy Sentiments");
    axis_labels(&mut out, "Sentiment Category", "Count");

    let mut v = 0;
    while v <= top_value {
        let _ = write!(
            out,
            r#"<text class="y-tick" x="{:.1}" y="{:.1}" text-anchor="end">{v}</text>"#,
            LEFT - 6.0,
            y_of(v) + 4.0
        );
        v += step;
    }

    let slot = plot_w() / 2.0;
    let bar_w = slot * 0.6;
    for (k, (label, count, color)) in [("Buy", buy, BUY_COLOR), ("Not Buy", not_buy, NOT_BUY_COLOR)]
        .into_iter()
        .enumerate()
    {
        let cx = LEFT + slot * (k as f64 + 0.5);
        let y = y_of(count);
        let _ = write!(
            out,
            r#"<rect class="bar" data-category="{label}" x="{:.1}" y="{y:.1}" width="{bar_w:.1}" height="{:.1}" fill="{color}"/>"#,
            cx - bar_w / 2.0,
            TOP + plot_h() - y
        );
        let _ = write!(
            out,
            r#"<text class="count" x="{cx:.1}" y="{:.1}" text-anchor="middle">{count}</text>"#,
            y - 6.0
        );
        let _ = write!(
            out,
            r#"<text class="x-tick" x="{cx:.1}" y="{:.1}" text-anchor="middle">{label}</text>"#,
            TOP + plot_h() + 16.0
        );
    }

    out.push_str("</svg>");
    out
}
