use irs_core::preprocess::{normalize, tokens};

#[test]
fn it_normalizes_and_stems() {
    let words = tokens("Running Runners RUN!");
    assert!(!words.is_empty());
    assert!(words.iter().all(|w| w == "run" || w == "runner"));
    assert!(words.contains(&"run".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words = tokens("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"quick".to_string()));
}

#[test]
fn punctuation_is_deleted_not_spaced() {
    // Stripping joins the pieces, it never splits a token in two.
    let out = normalize("co-op check-in");
    assert_eq!(out, "coop checkin");
}

#[test]
fn contractions_lose_apostrophes_before_stopword_lookup() {
    let words = tokens("don't worry");
    assert_eq!(words, vec!["worri".to_string()]);
}

#[test]
fn empty_and_stopword_only_inputs_yield_empty() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("  \n\t "), "");
    assert_eq!(normalize("is it the and of"), "");
}

#[test]
fn normalization_is_deterministic() {
    let input = "Information Retrieval Systems, 2nd edition!";
    assert_eq!(normalize(input), normalize(input));
}
