use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Everything that is not an ASCII letter, digit, or whitespace is deleted
    // outright (not replaced with a space), so the stopword table below stores
    // contractions in their stripped form.
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-zA-Z0-9\s]").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","arent","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cant","cannot","could","couldnt",
            "did","didnt","do","does","doesnt","doing","dont","down","during",
            "each","few","for","from","further",
            "had","hadnt","has","hasnt","have","havent","having","he","hed","hell","hes","her","here","heres","hers","herself","him","himself","his","how","hows",
            "i","id","ill","im","ive","if","in","into","is","isnt","it","its","itself",
            "lets","me","more","most","mustnt","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","shed","shell","shes","should","shouldnt","so","some","such",
            "than","that","thats","the","their","theirs","them","themselves","then","there","theres","these","they","theyd","theyll","theyre","theyve","this","those","through","to","too",
            "under","until","up","very",
            "was","wasnt","we","wed","well","were","weve","werent","what","whats","when","whens","where","wheres","which","while","who","whos","whom","why","whys","with","wont","would","wouldnt",
            "you","youd","youll","youre","youve","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Normalize free text into the canonical token stream: NFKC fold + lowercase,
/// strip non-alphanumerics, drop stopwords, stem, single-space join.
///
/// The exact same function runs over corpus documents at index-build time and
/// over queries at search time; the two must never diverge or vectors stop
/// being comparable.
pub fn normalize(text: &str) -> String {
    let folded = text.nfkc().collect::<String>().to_lowercase();
    let cleaned = NON_ALNUM.replace_all(&folded, "");
    let mut stems: Vec<String> = Vec::new();
    for token in cleaned.split_whitespace() {
        if is_stopword(token) {
            continue;
        }
        stems.push(STEMMER.stem(token).to_string());
    }
    stems.join(" ")
}

/// Normalized text as individual tokens, in order.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_stems() {
        let out = normalize("Running, runner's run!");
        assert!(out.split_whitespace().all(|t| t.starts_with("run")));
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(normalize("   \t\n  "), "");
    }

    #[test]
    fn stopwords_only_is_empty() {
        assert_eq!(normalize("the and of"), "");
    }
}
