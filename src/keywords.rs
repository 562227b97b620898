use futures::future::try_join_all;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};
use crate::translate::Translator;

/// English stop list applied before weighting (scikit-learn's `ENGLISH_STOP_WORDS`)
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
    "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub keyword: String,
    pub translated_keyword: String,
    pub score: f64,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static token pattern"))
}

fn stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// TF-IDF weights over a one-document corpus, best first.
///
/// With a single document the smoothed IDF is 1 for every term, so the
/// weight is the L2-normalized term count. Ties keep alphabetical order.
pub fn rank_terms(text: &str) -> Vec<(String, f64)> {
    let lowered = text.to_lowercase();
    let stop = stop_words();

    // BTreeMap keeps the vocabulary sorted, which the stable sort below relies on
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for term in token_pattern().find_iter(&lowered).map(|m| m.as_str()) {
        if !stop.contains(term) {
            *counts.entry(term).or_insert(0) += 1;
        }
    }

    let norm = counts
        .values()
        .map(|&c| f64::from(c) * f64::from(c))
        .sum::<f64>()
        .sqrt();

    let mut ranked: Vec<(String, f64)> = counts
        .into_iter()
        .map(|(term, count)| (term.to_string(), f64::from(count) / norm))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Extract the `top_n` heaviest terms and translate each one
pub async fn extract_and_translate_keywords(
    translator: &dyn Translator,
    text: &str,
    top_n: usize,
    source_lang: &str,
    target_lang: &str,
) -> GatewayResult<Vec<Keyword>> {
    let mut ranked = rank_terms(text);
    if ranked.is_empty() {
        return Err(GatewayError::NoKeywordsFound);
    }
    ranked.truncate(top_n);
    debug!("Selected keywords: {:?}", ranked);

    let translations = try_join_all(
        ranked
            .iter()
            .map(|(term, _)| translator.translate(term, source_lang, target_lang)),
    )
    .await?;

    Ok(ranked
        .into_iter()
        .zip(translations)
        .map(|((keyword, score), translated_keyword)| Keyword {
            keyword,
            translated_keyword,
            score,
        })
        .collect())
}
