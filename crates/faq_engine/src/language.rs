//! Linguistic resources consumed by the [`Normalizer`](crate::normalize::Normalizer).
//!
//! The engine only talks to a [`LanguageResource`]; the bundled
//! [`EnglishResource`] is a small rule-based stand-in for a full NLP pipeline.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

pub trait LanguageResource {
    /// Split already lower-cased text into word and punctuation tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Base (dictionary) form of a single token.
    fn lemma(&self, token: &str) -> String;

    fn is_stop_word(&self, token: &str) -> bool;
}

impl LanguageResource for Box<dyn LanguageResource + Send + Sync> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }

    fn lemma(&self, token: &str) -> String {
        (**self).lemma(token)
    }

    fn is_stop_word(&self, token: &str) -> bool {
        (**self).is_stop_word(token)
    }
}

// NLTK english stop-word list.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

// Forms the suffix rules cannot recover.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("went", "go"),
    ("gone", "go"),
    ("goes", "go"),
    ("got", "get"),
    ("gotten", "get"),
    ("made", "make"),
    ("paid", "pay"),
    ("bought", "buy"),
    ("sold", "sell"),
    ("sent", "send"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("came", "come"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("told", "tell"),
    ("said", "say"),
    ("found", "find"),
    ("left", "leave"),
    ("kept", "keep"),
    ("brought", "bring"),
    ("lost", "lose"),
    ("saw", "see"),
    ("seen", "see"),
    ("wrote", "write"),
    ("written", "write"),
    ("died", "die"),
    ("lied", "lie"),
    ("tied", "tie"),
    ("agreed", "agree"),
    ("freed", "free"),
    ("guaranteed", "guarantee"),
    ("used", "use"),
    ("using", "use"),
    ("issued", "issue"),
    ("purchased", "purchase"),
    ("purchasing", "purchase"),
    ("received", "receive"),
    ("receiving", "receive"),
    ("charged", "charge"),
    ("charging", "charge"),
    ("changed", "change"),
    ("changing", "change"),
    ("damaged", "damage"),
    ("exchanged", "exchange"),
    ("exchanging", "exchange"),
    ("arrived", "arrive"),
    ("placed", "place"),
    ("placing", "place"),
    ("cancelled", "cancel"),
    ("cancelling", "cancel"),
    ("canceled", "cancel"),
    ("canceling", "cancel"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
];

// Negated contractions whose base does not survive stripping "n't".
const IRREGULAR_NEGATIONS: &[(&str, &str)] = &[
    ("can't", "can"),
    ("won't", "will"),
    ("shan't", "shall"),
    ("ain't", "am"),
];

const CLITICS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];

// Words ending in -ing/-ed/-s that are already base forms.
const BASE_FORMS: &[&str] = &[
    "something", "nothing", "anything", "everything", "morning", "evening", "ceiling",
    "spring", "wedding", "hundred", "need", "news", "series", "species", "always", "perhaps",
    "towards", "afterwards", "gas", "yes", "this", "thus", "plus", "bonus", "status", "address",
];

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = ENGLISH_STOP_WORDS.iter().copied().collect();
    static ref IRREGULAR: HashMap<&'static str, &'static str> =
        IRREGULAR_FORMS.iter().copied().collect();
    static ref BASE: HashSet<&'static str> = BASE_FORMS.iter().copied().collect();
    static ref NEGATIONS: HashMap<&'static str, &'static str> =
        IRREGULAR_NEGATIONS.iter().copied().collect();
    static ref TOKEN_PATTERN: Regex =
        Regex::new(r"[\p{L}\p{N}_]+(?:['’][\p{L}\p{N}_]+)*|[^\s\p{L}\p{N}_]+")
            .expect("token pattern is valid");
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishResource;

impl LanguageResource for EnglishResource {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for m in TOKEN_PATTERN.find_iter(text) {
            let word = m.as_str().replace('’', "'");
            match split_contraction(&word) {
                Some((base, clitic)) => {
                    tokens.push(base.to_string());
                    tokens.push(clitic.to_string());
                }
                None => tokens.push(word),
            }
        }
        tokens
    }

    fn lemma(&self, token: &str) -> String {
        lemmatize(token)
    }

    fn is_stop_word(&self, token: &str) -> bool {
        let word = match token {
            "n't" => "not",
            _ => token.strip_prefix('\'').unwrap_or(token),
        };
        STOP_WORDS.contains(word)
    }
}

/// Splits a contraction into its base word and clitic: `what's` becomes
/// `what` + `'s`, `don't` becomes `do` + `n't`. Other apostrophes are kept.
fn split_contraction(word: &str) -> Option<(&str, &str)> {
    if let Some(base) = NEGATIONS.get(word) {
        return Some((*base, "n't"));
    }
    if let Some(base) = word.strip_suffix("n't").filter(|b| !b.is_empty()) {
        return Some((base, "n't"));
    }

    CLITICS.iter().find_map(|clitic| {
        word.strip_suffix(clitic)
            .filter(|b| !b.is_empty())
            .map(|base| (base, *clitic))
    })
}

/// Inflectional lemmatizer: irregular lookup, then plural and
/// past/progressive suffix rules for plain ASCII words.
pub fn lemmatize(word: &str) -> String {
    if let Some(base) = IRREGULAR.get(word) {
        return (*base).to_string();
    }
    if word.len() <= 3 || BASE.contains(word) || !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return word.to_string();
    }

    let singular = strip_plural(word);
    strip_verb_suffix(singular)
}

fn strip_plural(word: &str) -> &str {
    let n = word.len();
    if word.ends_with("sses") {
        &word[..n - 2]
    } else if word.ends_with("ies") {
        // handled by the caller when a `y` must be restored
        word
    } else if word.ends_with("xes") || word.ends_with("ches") || word.ends_with("shes") {
        &word[..n - 2]
    } else if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        word
    } else if word.ends_with('s') {
        &word[..n - 1]
    } else {
        word
    }
}

fn strip_verb_suffix(word: &str) -> String {
    let n = word.len();

    if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
        return if n > 4 {
            format!("{stem}y")
        } else {
            // ties -> tie
            word[..n - 1].to_string()
        };
    }

    // need, proceed; past forms like agreed live in the irregular table
    if word.ends_with("eed") {
        return word.to_string();
    }

    let stem = word
        .strip_suffix("ed")
        .or_else(|| word.strip_suffix("ing"))
        .filter(|stem| has_vowel(stem));

    match stem {
        Some(stem) => restore_stem(stem),
        None => word.to_string(),
    }
}

fn restore_stem(stem: &str) -> String {
    if stem.ends_with("at") || stem.ends_with("bl") || stem.ends_with("iz") {
        return format!("{stem}e");
    }

    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2
        && bytes[n - 1] == bytes[n - 2]
        && is_consonant(bytes, n - 1)
        && !matches!(bytes[n - 1], b'l' | b's' | b'z')
    {
        return stem[..n - 1].to_string();
    }

    if measure(stem) == 1 && ends_cvc(bytes) {
        return format!("{stem}e");
    }

    stem.to_string()
}

fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

fn has_vowel(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    (0..bytes.len()).any(|i| !is_consonant(bytes, i))
}

/// Number of vowel-consonant sequences in `stem`.
fn measure(stem: &str) -> usize {
    let bytes = stem.as_bytes();
    let mut count = 0;
    let mut prev_vowel = false;
    for i in 0..bytes.len() {
        let consonant = is_consonant(bytes, i);
        if consonant && prev_vowel {
            count += 1;
        }
        prev_vowel = !consonant;
    }
    count
}

fn ends_cvc(word: &[u8]) -> bool {
    let n = word.len();
    n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], b'w' | b'x' | b'y')
}
