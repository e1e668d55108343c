//! # Sentiment scorer
//! Lexicon + rule based compound polarity for short texts such as headlines.
//!
//! Each token gets a valence from the lexicon, adjusted by the words around it
//! (boosters, negators, ALL-CAPS emphasis, a "but" contrast) and by trailing
//! punctuation. The summed valence is squashed into [-1, 1] as the *compound*
//! score.
//!
//! The lexicon is process-wide state with an explicit lifecycle: call
//! [`init_lexicon`] once at boot, before the first [`SentimentAnalyzer::new`].
//! Nothing needs tearing down.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ScoringError;

const EMBEDDED_LEXICON: &str = include_str!("../vader_lexicon.txt");

static LEXICON: OnceCell<Arc<Lexicon>> = OnceCell::new();

// Empirically derived increments (Hutto & Gilbert, 2014).
const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const EXCLAIM_INCR: f64 = 0.292;
const QUESTION_INCR: f64 = 0.18;
const QUESTION_MAX: f64 = 0.96;
const NORMALIZE_ALPHA: f64 = 15.0;

/// Anything that turns a text into a compound polarity in [-1, 1].
pub trait Scorer: Send + Sync {
    fn compound(&self, text: &str) -> Result<f64, ScoringError>;
}

/// Word → valence table (roughly -4.0 ..= 4.0 per word).
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// The lexicon bundled into the binary (VADER text layout).
    pub fn embedded() -> Result<Self, ScoringError> {
        Self::from_vader_txt(EMBEDDED_LEXICON)
    }

    /// JSON object of `{ "word": valence }`.
    pub fn from_json_str(s: &str) -> Result<Self, ScoringError> {
        let raw: HashMap<String, f64> =
            serde_json::from_str(s).map_err(|e| ScoringError::InvalidLexicon(e.to_string()))?;
        Self::from_entries(raw)
    }

    /// VADER's text format: `word<TAB>mean<TAB>stddev<TAB>[raw ratings]`, one per line.
    pub fn from_vader_txt(s: &str) -> Result<Self, ScoringError> {
        let mut raw = HashMap::new();
        for (n, line) in s.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let word = fields.next().unwrap_or_default();
            let mean = fields
                .next()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .ok_or_else(|| {
                    ScoringError::InvalidLexicon(format!(
                        "line {}: expected `word<TAB>valence`",
                        n + 1
                    ))
                })?;
            raw.insert(word.to_string(), mean);
        }
        Self::from_entries(raw)
    }

    /// Load from disk; a file whose first non-blank char is `{` is read as JSON,
    /// anything else as the VADER text format.
    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        let content = fs::read_to_string(path).map_err(|source| ScoringError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim_start().starts_with('{') {
            Self::from_json_str(&content)
        } else {
            Self::from_vader_txt(&content)
        }
    }

    fn from_entries(raw: HashMap<String, f64>) -> Result<Self, ScoringError> {
        let valences: HashMap<String, f64> = raw
            .into_iter()
            .filter(|(w, v)| !w.trim().is_empty() && v.is_finite())
            .map(|(w, v)| (w.trim().to_lowercase(), v))
            .collect();
        if valences.is_empty() {
            return Err(ScoringError::InvalidLexicon("lexicon has no entries".into()));
        }
        Ok(Self { valences })
    }

    /// Valence for an already lower-cased token.
    #[inline]
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

/// Where the process-wide lexicon comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexiconSource {
    Embedded,
    File(PathBuf),
}

impl LexiconSource {
    pub fn from_config(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::File(p.to_path_buf()),
            None => Self::Embedded,
        }
    }

    fn load(&self) -> Result<Lexicon, ScoringError> {
        match self {
            Self::Embedded => Lexicon::embedded(),
            Self::File(p) => Lexicon::from_path(p),
        }
    }
}

impl fmt::Display for LexiconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded"),
            Self::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Install the process-wide lexicon. The first successful call wins; later
/// calls return the installed lexicon and ignore `source`.
pub fn init_lexicon(source: LexiconSource) -> Result<Arc<Lexicon>, ScoringError> {
    if let Some(existing) = LEXICON.get() {
        debug!(requested = %source, "sentiment lexicon already initialized");
        return Ok(existing.clone());
    }
    let lex = LEXICON.get_or_try_init(|| {
        let lex = source.load()?;
        info!(source = %source, words = lex.len(), "sentiment lexicon loaded");
        Ok::<_, ScoringError>(Arc::new(lex))
    })?;
    Ok(lex.clone())
}

/// The installed lexicon, if [`init_lexicon`] has run.
pub fn lexicon() -> Option<Arc<Lexicon>> {
    LEXICON.get().cloned()
}

/// Full scorer output. `neg`, `neu` and `pos` are proportions of the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl SentimentAnalyzer {
    /// Analyzer over the process-wide lexicon.
    pub fn new() -> Result<Self, ScoringError> {
        lexicon()
            .map(|lexicon| Self { lexicon })
            .ok_or(ScoringError::LexiconNotInitialized)
    }

    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return PolarityScores::default();
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let cap_diff = allcap_differential(&tokens);

        let mut sentiments: Vec<f64> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, &lowered, i, cap_diff))
            .collect();

        apply_but_contrast(&lowered, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn token_valence(&self, tokens: &[&str], lowered: &[String], i: usize, cap_diff: bool) -> f64 {
        let word = lowered[i].as_str();

        // boosters only modify their neighbours
        if booster(word).is_some() {
            return 0.0;
        }
        if word == "kind" && lowered.get(i + 1).map(String::as_str) == Some("of") {
            return 0.0;
        }

        let Some(base) = self.lexicon.valence(word) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" right before a sentiment word negates that word instead of scoring itself
        if word == "no"
            && lowered
                .get(i + 1)
                .is_some_and(|next| self.lexicon.valence(next).is_some())
        {
            valence = 0.0;
        }
        if preceded_by_no(lowered, i) {
            valence = base * N_SCALAR;
        }

        if cap_diff && is_all_caps(tokens[i]) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for k in 1..=3 {
            if i < k {
                break;
            }
            let prev = lowered[i - k].as_str();
            if self.lexicon.valence(prev).is_some() {
                continue;
            }
            let mut s = scalar_inc_dec(tokens[i - k], prev, valence, cap_diff);
            match k {
                2 => s *= 0.95,
                3 => s *= 0.9,
                _ => {}
            }
            valence += s;
            if is_negator(prev) {
                valence *= N_SCALAR;
            }
        }

        valence
    }
}

impl Scorer for SentimentAnalyzer {
    fn compound(&self, text: &str) -> Result<f64, ScoringError> {
        Ok(self.polarity_scores(text).compound)
    }
}

/// Whitespace tokens with surrounding ASCII punctuation stripped, unless that
/// would leave two chars or fewer (keeps emoticons like `:)`).
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|tok| {
            let stripped = tok.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                tok
            } else {
                stripped
            }
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// "no X", "no <word> X" and "no <word> or/nor X".
fn preceded_by_no(lowered: &[String], i: usize) -> bool {
    let at = |k: usize| i >= k && lowered[i - k] == "no";
    at(1) || at(2) || (at(3) && matches!(lowered[i - 1].as_str(), "or" | "nor"))
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are ALL CAPS.
fn allcap_differential(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn scalar_inc_dec(raw: &str, lower: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(lower) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_all_caps(raw) {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

fn apply_but_contrast(lowered: &[String], sentiments: &mut [f64]) {
    let Some(bi) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, s) in sentiments.iter_mut().enumerate() {
        if idx < bi {
            *s *= 0.5;
        } else if idx > bi {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclaims = text.matches('!').count().min(4) as f64;
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * QUESTION_INCR,
        _ => QUESTION_MAX,
    };
    exclaims * EXCLAIM_INCR + question_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    let punct = punctuation_emphasis(text);

    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0usize;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count as f64;
    if total <= 0.0 {
        return PolarityScores::default();
    }

    PolarityScores {
        neg: round_to(neg_sum.abs() / total, 3),
        neu: round_to(neu_count as f64 / total, 3),
        pos: round_to(pos_sum.abs() / total, 3),
        compound: round_to(compound, 4),
    }
}

fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}

fn booster(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "enormously" | "entirely" | "especially" | "exceptionally" | "extremely"
        | "fabulously" | "fully" | "greatly" | "highly" | "hugely" | "incredibly"
        | "intensely" | "majorly" | "more" | "most" | "particularly" | "purely" | "quite"
        | "really" | "remarkably" | "so" | "substantially" | "thoroughly" | "totally"
        | "tremendously" | "unbelievably" | "unusually" | "utterly" | "very" | "sharply"
        | "strongly" => Some(B_INCR),
        "almost" | "barely" | "hardly" | "kinda" | "less" | "little" | "marginally"
        | "occasionally" | "partly" | "scarcely" | "slightly" | "somewhat" | "sorta"
        | "modestly" => Some(B_DECR),
        _ => None,
    }
}

fn is_negator(word: &str) -> bool {
    matches!(
        word,
        "not"
            | "never"
            | "none"
            | "nor"
            | "neither"
            | "nothing"
            | "nowhere"
            | "nope"
            | "without"
            | "cannot"
            | "rarely"
            | "seldom"
            | "despite"
            | "aint"
            | "arent"
            | "cant"
            | "couldnt"
            | "didnt"
            | "doesnt"
            | "dont"
            | "hadnt"
            | "hasnt"
            | "havent"
            | "isnt"
            | "mightnt"
            | "mustnt"
            | "neednt"
            | "shouldnt"
            | "wasnt"
            | "werent"
            | "wont"
            | "wouldnt"
    ) || word.contains("n't")
}
