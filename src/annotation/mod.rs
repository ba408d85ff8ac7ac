//! Token-level edit labels for an aligned sentence pair.
//!
//! Labels come from word alignments alone: a source token is kept, deleted
//! or replaced, a target token is kept or added, and replacements or
//! isolated additions of function words count as rewrites.

mod word_alignment;

use std::fmt;

use serde::Serialize;

use crate::error::AlignmentError;

pub use word_alignment::{parse_word_alignments, WordLink};

/// Function words whose replacement, or isolated addition, is a rewrite.
const REWRITE_WORDS: &[&str] = &[
    "that", "what", "which", "who", "whom", "a", "an", "the", "of", "at", "by", "into", "in", "s",
    "'s", "t", "'t", "can", "don", "should", "d", "ll", "m", "re", "ve", "ain", "aren", "couldn",
    "didn", "doesn", "hadn", "hasn", "haven", "isn", "mustn", "needn", "shan", "shouldn", "wasn",
    "weren", "won", "wouldn",
];

/// Edit operation on one token, serialized as its BIO tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EditLabel {
    #[serde(rename = "O")]
    Keep,
    #[serde(rename = "B-D")]
    Delete,
    #[serde(rename = "B-R")]
    Replace,
    /// Later source token of a phrase replaced as a whole.
    #[serde(rename = "I-R")]
    ReplaceContinued,
    #[serde(rename = "B-A")]
    Add,
    #[serde(rename = "B-RW")]
    Rewrite,
}

impl EditLabel {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Keep => "O",
            Self::Delete => "B-D",
            Self::Replace => "B-R",
            Self::ReplaceContinued => "I-R",
            Self::Add => "B-A",
            Self::Rewrite => "B-RW",
        }
    }
}

impl fmt::Display for EditLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAnnotation {
    /// 1-based position in its sentence.
    pub index: usize,
    pub word: String,
    pub label: EditLabel,
    /// Words standing in for this token on replace and rewrite heads.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replacement: Vec<String>,
}

impl TokenAnnotation {
    fn new(index: usize, word: &str, label: EditLabel) -> Self {
        Self {
            index,
            word: word.to_string(),
            label,
            replacement: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentenceAnnotation {
    pub source: Vec<TokenAnnotation>,
    pub target: Vec<TokenAnnotation>,
}

impl SentenceAnnotation {
    pub fn is_empty(&self) -> bool {
        self.source.is_empty() && self.target.is_empty()
    }
}

/// Annotates the whitespace tokens of an aligned sentence pair from Pharaoh
/// word alignments. A blank sentence on either side gives an empty
/// annotation.
pub fn annotate_sentence_pair(
    source: &str,
    target: &str,
    word_alignments: &str,
) -> Result<SentenceAnnotation, AlignmentError> {
    let source: Vec<&str> = source.split_whitespace().collect();
    let target: Vec<&str> = target.split_whitespace().collect();
    if source.is_empty() || target.is_empty() {
        return Ok(SentenceAnnotation::default());
    }
    let links = parse_word_alignments(word_alignments)?;
    annotate_tokens(&source, &target, &links)
}

/// Labels pre-tokenized sentences. Every link must address existing tokens.
pub fn annotate_tokens<S: AsRef<str>>(
    source: &[S],
    target: &[S],
    links: &[WordLink],
) -> Result<SentenceAnnotation, AlignmentError> {
    if let Some(link) = links
        .iter()
        .find(|link| link.source > source.len() || link.target > target.len())
    {
        return Err(AlignmentError::word_alignment(
            &format!("{}-{}", link.source, link.target),
            format!(
                "outside a {} x {} token pair",
                source.len(),
                target.len()
            ),
        ));
    }

    let mut source_tokens = label_source(source, target, links);
    let mut target_tokens = label_target(target, links, &mut source_tokens);
    label_rewrites(&mut source_tokens, &mut target_tokens);

    tracing::debug!(
        source_tokens = source_tokens.len(),
        target_tokens = target_tokens.len(),
        links = links.len(),
        "annotation: sentence pair labeled"
    );
    Ok(SentenceAnnotation {
        source: source_tokens,
        target: target_tokens,
    })
}

/// Unaligned source tokens are deletions. A token aligned to exactly one
/// identical word is kept; anything else is a replacement by the aligned
/// target words, in target order.
fn label_source<S: AsRef<str>>(
    source: &[S],
    target: &[S],
    links: &[WordLink],
) -> Vec<TokenAnnotation> {
    source
        .iter()
        .enumerate()
        .map(|(offset, word)| {
            let index = offset + 1;
            let word = word.as_ref();
            let mut aligned: Vec<usize> = links
                .iter()
                .filter(|link| link.source == index)
                .map(|link| link.target)
                .collect();
            aligned.sort_unstable();

            if aligned.is_empty() {
                return TokenAnnotation::new(index, word, EditLabel::Delete);
            }
            if aligned.len() == 1 && target[aligned[0] - 1].as_ref() == word {
                return TokenAnnotation::new(index, word, EditLabel::Keep);
            }
            let mut token = TokenAnnotation::new(index, word, EditLabel::Replace);
            token.replacement = aligned
                .iter()
                .map(|&position| target[position - 1].as_ref().to_string())
                .collect();
            token
        })
        .collect()
}

/// Unaligned target tokens are additions. A target token aligned to several
/// source tokens turns every source token after the first into the
/// continuation of one phrase replacement.
fn label_target<S: AsRef<str>>(
    target: &[S],
    links: &[WordLink],
    source_tokens: &mut [TokenAnnotation],
) -> Vec<TokenAnnotation> {
    target
        .iter()
        .enumerate()
        .map(|(offset, word)| {
            let index = offset + 1;
            let mut aligned: Vec<usize> = links
                .iter()
                .filter(|link| link.target == index)
                .map(|link| link.source)
                .collect();
            if aligned.is_empty() {
                return TokenAnnotation::new(index, word.as_ref(), EditLabel::Add);
            }

            aligned.sort_unstable();
            for &position in &aligned[1..] {
                let continued = &mut source_tokens[position - 1];
                continued.label = EditLabel::ReplaceContinued;
                continued.replacement.clear();
            }
            TokenAnnotation::new(index, word.as_ref(), EditLabel::Keep)
        })
        .collect()
}

/// Replaced function words become rewrites, as do added function words with
/// no added neighbour. Target tokens are relabeled left to right, so a token
/// already turned into a rewrite no longer counts as an added neighbour.
fn label_rewrites(source_tokens: &mut [TokenAnnotation], target_tokens: &mut [TokenAnnotation]) {
    for token in source_tokens.iter_mut() {
        if token.label == EditLabel::Replace && is_rewrite_word(&token.word) {
            token.label = EditLabel::Rewrite;
        }
    }

    for position in 0..target_tokens.len() {
        let candidate = &target_tokens[position];
        if candidate.label != EditLabel::Add || !is_rewrite_word(&candidate.word) {
            continue;
        }
        let added_before = position > 0 && target_tokens[position - 1].label == EditLabel::Add;
        let added_after = target_tokens
            .get(position + 1)
            .is_some_and(|next| next.label == EditLabel::Add);
        if added_before || added_after {
            continue;
        }

        let token = &mut target_tokens[position];
        token.label = EditLabel::Rewrite;
        token.replacement = vec![token.word.clone()];
    }
}

fn is_rewrite_word(word: &str) -> bool {
    REWRITE_WORDS.contains(&word)
}

/// CoNLL-style rows `index<TAB>word<TAB>label`, followed by the space-joined
/// replacement words on replace and rewrite heads.
pub fn to_conll(tokens: &[TokenAnnotation]) -> String {
    let mut conll = String::new();
    for token in tokens {
        conll.push_str(&format!("{}\t{}\t{}", token.index, token.word, token.label));
        if matches!(token.label, EditLabel::Replace | EditLabel::Rewrite) {
            conll.push('\t');
            conll.push_str(&token.replacement.join(" "));
        }
        conll.push('\n');
    }
    conll
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tokens: &[TokenAnnotation]) -> Vec<&'static str> {
        tokens.iter().map(|token| token.label.tag()).collect()
    }

    fn annotate(source: &str, target: &str, alignments: &str) -> SentenceAnnotation {
        annotate_sentence_pair(source, target, alignments).expect("valid sentence pair")
    }

    #[test]
    fn identical_sentences_are_kept() {
        let annotation = annotate("the cat sat", "the cat sat", "1-1 2-2 3-3");
        assert_eq!(labels(&annotation.source), vec!["O", "O", "O"]);
        assert_eq!(labels(&annotation.target), vec!["O", "O", "O"]);
        assert_eq!(annotation.source[1].index, 2);
        assert_eq!(annotation.source[1].word, "cat");
    }

    #[test]
    fn unaligned_tokens_are_deleted_or_added() {
        let annotation = annotate("the old cat sat", "the cat sat down", "1-1 3-2 4-3");
        assert_eq!(labels(&annotation.source), vec!["O", "B-D", "O", "O"]);
        assert_eq!(labels(&annotation.target), vec!["O", "O", "O", "B-A"]);
    }

    #[test]
    fn different_aligned_words_are_replacements() {
        let annotation = annotate("the feline rested", "the cat sat", "1-1 2-2 3-3");
        assert_eq!(labels(&annotation.source), vec!["O", "B-R", "B-R"]);
        assert_eq!(annotation.source[1].replacement, vec!["cat".to_string()]);
        assert_eq!(labels(&annotation.target), vec!["O", "O", "O"]);
    }

    #[test]
    fn one_token_replaced_by_several() {
        let annotation = annotate("huge dog", "very big dog", "1-2 1-1 2-3");
        assert_eq!(labels(&annotation.source), vec!["B-R", "O"]);
        assert_eq!(
            annotation.source[0].replacement,
            vec!["very".to_string(), "big".to_string()]
        );
    }

    #[test]
    fn phrase_replacement_continues_over_later_tokens() {
        let annotation = annotate("passed away yesterday", "died yesterday", "1-1 2-1 3-2");
        assert_eq!(labels(&annotation.source), vec!["B-R", "I-R", "O"]);
        assert_eq!(annotation.source[0].replacement, vec!["died".to_string()]);
        assert!(annotation.source[1].replacement.is_empty());
        assert_eq!(labels(&annotation.target), vec!["O", "O"]);
    }

    #[test]
    fn replaced_function_word_is_a_rewrite() {
        let annotation = annotate("the man who came", "a man came", "1-1 2-2 4-3");
        assert_eq!(labels(&annotation.source), vec!["B-RW", "O", "B-D", "O"]);
        assert_eq!(annotation.source[0].replacement, vec!["a".to_string()]);
    }

    #[test]
    fn isolated_added_function_word_is_a_rewrite() {
        let annotation = annotate("he went home", "he went into home", "1-1 2-2 3-4");
        assert_eq!(labels(&annotation.target), vec!["O", "O", "B-RW", "O"]);
        assert_eq!(annotation.target[2].replacement, vec!["into".to_string()]);
    }

    #[test]
    fn added_function_words_next_to_other_additions_stay_additions() {
        let annotation = annotate("he went home", "he went into the home", "1-1 2-2 3-5");
        assert_eq!(labels(&annotation.target), vec!["O", "O", "B-A", "B-A", "O"]);
    }

    #[test]
    fn blank_sentence_gives_empty_annotation() {
        assert!(annotate("", "the cat", "1-1").is_empty());
        assert!(annotate("the cat", "   ", "").is_empty());
    }

    #[test]
    fn missing_alignments_delete_and_add_everything() {
        let annotation = annotate("a b", "c", "");
        assert_eq!(labels(&annotation.source), vec!["B-D", "B-D"]);
        assert_eq!(labels(&annotation.target), vec!["B-A"]);
    }

    #[test]
    fn links_outside_the_sentences_are_rejected() {
        let result = annotate_sentence_pair("a b", "c", "1-1 2-2");
        assert!(matches!(result, Err(AlignmentError::WordAlignment { .. })));
        let result = annotate_tokens(&["a"], &["b"], &[WordLink::new(3, 1)]);
        assert!(matches!(result, Err(AlignmentError::WordAlignment { .. })));
    }

    #[test]
    fn conll_rows_carry_replacements() {
        let annotation = annotate("the feline rested", "the cat sat", "1-1 2-2 3-3");
        assert_eq!(
            to_conll(&annotation.source),
            "1\tthe\tO\n2\tfeline\tB-R\tcat\n3\trested\tB-R\tsat\n"
        );
        assert_eq!(to_conll(&annotation.target), "1\tthe\tO\n2\tcat\tO\n3\tsat\tO\n");
    }

    #[test]
    fn labels_serialize_as_tags() {
        let json = serde_json::to_string(&EditLabel::ReplaceContinued).expect("serialize label");
        assert_eq!(json, "\"I-R\"");
        let token = serde_json::to_value(TokenAnnotation::new(2, "cat", EditLabel::Keep))
            .expect("serialize token");
        assert_eq!(token["label"], "O");
        assert!(token.get("replacement").is_none());
    }
}
