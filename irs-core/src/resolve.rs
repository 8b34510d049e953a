use crate::error::{IrsError, Result};

/// Parsed composite document id: `<label>_<fileIndex>_<rowIndex>` with
/// 1-based indices. The label may itself contain underscores; the last two
/// segments are always the indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLocation {
    pub label: String,
    pub file_index: usize,
    pub row_index: usize,
}

impl DocLocation {
    pub fn parse(doc_id: &str) -> Result<Self> {
        let malformed = || IrsError::MalformedDocId(doc_id.to_string());
        let mut parts = doc_id.rsplitn(3, '_');
        let row = parts.next().ok_or_else(malformed)?;
        let file = parts.next().ok_or_else(malformed)?;
        let label = parts.next().ok_or_else(malformed)?;
        if label.is_empty() {
            return Err(malformed());
        }
        let file_index: usize = file.parse().map_err(|_| malformed())?;
        let row_index: usize = row.parse().map_err(|_| malformed())?;
        if file_index == 0 || row_index == 0 {
            return Err(malformed());
        }
        Ok(Self { label: label.to_string(), file_index, row_index })
    }

    /// Zero-based position of the source file in the dataset table list.
    pub fn file_pos(&self) -> usize {
        self.file_index - 1
    }

    /// Zero-based row position within that file.
    pub fn row_pos(&self) -> usize {
        self.row_index - 1
    }
}

/// Title for display: truncated at `truncate_len` chars with an ellipsis and
/// a title-case transform; short titles pass through untouched.
pub fn display_title(title: &str, truncate_len: usize) -> String {
    if title.chars().count() > truncate_len {
        let head: String = title.chars().take(truncate_len).collect();
        format!("{}...", title_case(&head))
    } else {
        title.to_string()
    }
}

/// Content for display: truncated at `2 * truncate_len` chars with an
/// ellipsis and a sentence-case transform; short content passes through.
pub fn display_content(content: &str, truncate_len: usize) -> String {
    let limit = truncate_len * 2;
    if content.chars().count() > limit {
        let head: String = content.chars().take(limit).collect();
        format!("{}...", sentence_case(&head))
    } else {
        content.to_string()
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_based_indices() {
        let loc = DocLocation::parse("d_3_7").unwrap();
        assert_eq!(loc.label, "d");
        assert_eq!(loc.file_index, 3);
        assert_eq!(loc.row_index, 7);
        assert_eq!(loc.file_pos(), 2);
        assert_eq!(loc.row_pos(), 6);
    }

    #[test]
    fn label_may_contain_underscores() {
        let loc = DocLocation::parse("news_id_2_14").unwrap();
        assert_eq!(loc.label, "news_id");
        assert_eq!(loc.file_pos(), 1);
        assert_eq!(loc.row_pos(), 13);
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "d", "d_1", "d_0_1", "d_1_0", "d_x_1", "_1_2"] {
            assert!(matches!(
                DocLocation::parse(bad),
                Err(crate::error::IrsError::MalformedDocId(_))
            ));
        }
    }

    #[test]
    fn truncates_and_transforms_only_long_fields() {
        assert_eq!(display_title("short title", 20), "short title");
        assert_eq!(display_title("a very long headline", 10), "A Very Lon...");
        assert_eq!(display_content("tiny", 10), "tiny");
        let long = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG";
        assert_eq!(display_content(long, 10), "The quick brown fox ...");
    }
}
