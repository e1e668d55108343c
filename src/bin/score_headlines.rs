//! Offline scorer: reads one headline per line from stdin and prints the
//! compound score and buy flag for each, plus the buy / not-buy counts.
//!
//! ```text
//! score-headlines [THRESHOLD] [--lexicon PATH] [--svg-dir DIR]
//! ```

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use stock_news_sentiment::{chart, classify, init_lexicon, LexiconSource, SentimentAnalyzer};

struct Args {
    threshold: f64,
    lexicon: Option<PathBuf>,
    svg_dir: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut out = Args {
        threshold: 0.1,
        lexicon: None,
        svg_dir: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--lexicon" => out.lexicon = Some(it.next().context("--lexicon needs a path")?.into()),
            "--svg-dir" => out.svg_dir = Some(it.next().context("--svg-dir needs a path")?.into()),
            other if other.starts_with("--") => bail!("unknown flag {other}"),
            other => {
                out.threshold = other
                    .parse()
                    .with_context(|| format!("threshold must be a number, got {other:?}"))?
            }
        }
    }
    Ok(out)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = parse_args()?;
    let lexicon = init_lexicon(LexiconSource::from_config(args.lexicon.as_deref()))?;
    let analyzer = SentimentAnalyzer::with_lexicon(lexicon);

    let headlines = io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<String>>>()
        .context("reading headlines from stdin")?;

    let c = classify(&analyzer, &headlines, args.threshold)?;
    for (i, (h, s)) in headlines.iter().zip(&c.scores).enumerate() {
        let mark = if c.is_buy(i) { "BUY" } else { "-" };
        println!("{i}\t{s:+.4}\t{mark}\t{h}");
    }
    println!(
        "# threshold {:.2}: buy {}, not buy {}",
        args.threshold,
        c.buy_count(),
        c.not_buy_count()
    );

    if let Some(dir) = args.svg_dir {
        std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        let charts = chart::render("stdin", &c);
        std::fs::write(dir.join("sentiment.svg"), charts.sentiment)?;
        std::fs::write(dir.join("distribution.svg"), charts.distribution)?;
        tracing::info!(dir = %dir.display(), "charts written");
    }

    Ok(())
}
