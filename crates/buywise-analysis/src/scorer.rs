//! Product-review lexicon scorer.

/// Review word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("perfect", 0.5),
    ("love", 0.5),
    ("loved", 0.5),
    ("loves", 0.5),
    ("best", 0.5),
    ("recommend", 0.4),
    ("recommended", 0.4),
    ("quality", 0.3),
    ("fast", 0.3),
    ("easy", 0.3),
    ("comfortable", 0.4),
    ("reliable", 0.4),
    ("sturdy", 0.4),
    ("beautiful", 0.4),
    ("happy", 0.4),
    ("worth", 0.3),
    ("works", 0.2),
    ("nice", 0.3),
    ("solid", 0.3),
    ("impressive", 0.4),
    // Negative signals
    ("bad", -0.4),
    ("poor", -0.5),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("horrible", -0.6),
    ("worst", -0.6),
    ("broke", -0.5),
    ("broken", -0.5),
    ("defective", -0.6),
    ("cheap", -0.3),
    ("flimsy", -0.4),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("useless", -0.6),
    ("waste", -0.6),
    ("refund", -0.4),
    ("returned", -0.4),
    ("slow", -0.3),
    ("overpriced", -0.4),
    ("expensive", -0.3),
    ("problem", -0.3),
    ("problems", -0.3),
    ("issue", -0.3),
    ("issues", -0.3),
    ("hate", -0.5),
];

/// Words that flip the weight of the next lexicon hit.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "isn't", "wasn't", "don't", "doesn't", "didn't", "hardly",
];

/// Score a text string using the review lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. A negation word inverts the next match.
/// Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    let mut negate = false;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic() && c != '\'')
            .to_lowercase();
        if NEGATIONS.contains(&w.as_str()) {
            negate = true;
            continue;
        }
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| *lex_word == w) {
            score += if negate { -weight } else { weight };
            negate = false;
        }
    }
    score.clamp(-1.0, 1.0)
}
