//! Word-valence lexicon and rule-based polarity scoring.
//!
//! Valences are summed over the document with two adjustments: a negator
//! within the three preceding tokens flips and damps the valence, and an
//! intensifier directly before a word pushes it further from zero. The
//! sum is squashed into `[-1, 1]`.

use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

const BUNDLED: &str = include_str!("../data/lexicon.tsv");

/// Normalization constant of the compound score.
const ALPHA: f64 = 15.0;
/// Multiplier applied to a negated valence.
const NEGATION_SCALAR: f64 = -0.74;
/// Magnitude added by an intensifier.
const BOOSTER_INCREMENT: f64 = 0.293;
/// How many preceding tokens are checked for a negator.
const NEGATION_SPAN: usize = 3;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "without", "nor", "neither", "cannot", "none", "nothing", "nobody",
    "hardly", "isn't", "aren't", "wasn't", "weren't", "don't", "doesn't", "didn't", "won't",
    "can't", "shouldn't", "wouldn't",
];

const BOOSTERS: &[&str] = &[
    "very", "extremely", "highly", "strongly", "significantly", "substantially", "particularly",
    "considerably",
];

static LEXICON: OnceLock<Lexicon> = OnceLock::new();

/// Returns the bundled lexicon, parsing it on first use.
///
/// Safe to call any number of times; later calls return the same instance.
pub fn ensure_resource_loaded() -> &'static Lexicon {
    LEXICON.get_or_init(|| {
        let lexicon = Lexicon::from_tsv(BUNDLED);
        debug!("Loaded sentiment lexicon with {} entries", lexicon.len());
        lexicon
    })
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Parses `word<TAB>valence` lines. Blank lines and `#` comments are
    /// skipped; malformed lines are logged and skipped.
    #[must_use]
    pub fn from_tsv(source: &str) -> Self {
        let mut valences = HashMap::new();

        for (lineno, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            match (fields.next(), fields.next().map(str::parse::<f64>)) {
                (Some(word), Some(Ok(valence))) if !word.is_empty() => {
                    valences.insert(word.to_lowercase(), valence);
                }
                _ => warn!("Skipping malformed lexicon line {}: {:?}", lineno + 1, line),
            }
        }

        Self { valences }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    #[must_use]
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    /// Compound polarity of `text` in `[-1, 1]`; zero when no word is known.
    #[must_use]
    pub fn compound(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let total: f64 = tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| {
                self.valence(token)
                    .map(|valence| adjust(valence, &tokens[..i]))
            })
            .sum();

        normalize(total)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphabetic() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn adjust(valence: f64, preceding: &[String]) -> f64 {
    let mut score = valence;

    if let Some(prev) = preceding.last() {
        if BOOSTERS.contains(&prev.as_str()) {
            score += BOOSTER_INCREMENT.copysign(valence);
        }
    }

    let negated = preceding
        .iter()
        .rev()
        .take(NEGATION_SPAN)
        .any(|t| NEGATORS.contains(&t.as_str()));
    if negated {
        score *= NEGATION_SCALAR;
    }

    score
}

fn normalize(total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (total / (total * total + ALPHA).sqrt()).clamp(-1.0, 1.0)
}
