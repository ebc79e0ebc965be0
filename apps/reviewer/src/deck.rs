//! Markdown decks for terminal review.
//!
//! # Format
//! ```markdown
//! ID: 1
//! Q: What is Rust?
//! A: A systems programming language.
//!
//! Q: A card without an ID
//! A: Answers may span
//! several lines.
//! ```

use reveal_core::CardId;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("could not read deck {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("answer without a question at line {line}")]
    MissingQuestion { line: usize },

    #[error("question without an answer at line {line}")]
    MissingAnswer { line: usize },

    #[error("empty ID at line {line}")]
    EmptyId { line: usize },

    #[error("duplicate ID {id} at line {line}")]
    DuplicateId { id: String, line: usize },
}

/// A card ready for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckCard {
    pub id: CardId,
    pub question: String,
    pub answer: String,
}

/// Read and parse a deck file. Cards without an ID are keyed by the file
/// stem and their position.
pub fn load_deck(path: &Path) -> Result<Vec<DeckCard>, DeckError> {
    let content = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deck".to_string());
    parse_deck(&content, &name)
}

/// Parse deck content.
pub fn parse_deck(content: &str, deck_name: &str) -> Result<Vec<DeckCard>, DeckError> {
    let mut cards = Vec::new();
    let mut seen = HashSet::new();
    let mut pending: Option<Pending> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();

        if let Some(id) = trimmed.strip_prefix("ID:") {
            let id = id.trim();
            if id.is_empty() {
                return Err(DeckError::EmptyId { line: line_num });
            }
            finish(pending.take(), deck_name, &mut cards, &mut seen)?;
            pending = Some(Pending::new(Some(id.to_string()), line_num));
        } else if let Some(question) = trimmed.strip_prefix("Q:") {
            let card = match pending.take() {
                Some(card) if card.question.is_none() => card,
                other => {
                    finish(other, deck_name, &mut cards, &mut seen)?;
                    Pending::new(None, line_num)
                }
            };
            pending = Some(Pending {
                question: Some(question.trim().to_string()),
                ..card
            });
        } else if let Some(answer) = trimmed.strip_prefix("A:") {
            match pending.as_mut() {
                Some(card) if card.question.is_some() && card.answer.is_none() => {
                    card.answer = Some(vec![answer.trim().to_string()]);
                }
                _ => return Err(DeckError::MissingQuestion { line: line_num }),
            }
        } else if let Some(lines) = pending.as_mut().and_then(|card| card.answer.as_mut()) {
            lines.push(line.trim_end().to_string());
        }
    }

    finish(pending, deck_name, &mut cards, &mut seen)?;
    Ok(cards)
}

struct Pending {
    id: Option<String>,
    question: Option<String>,
    answer: Option<Vec<String>>,
    line: usize,
}

impl Pending {
    fn new(id: Option<String>, line: usize) -> Self {
        Self {
            id,
            question: None,
            answer: None,
            line,
        }
    }
}

fn finish(
    pending: Option<Pending>,
    deck_name: &str,
    cards: &mut Vec<DeckCard>,
    seen: &mut HashSet<String>,
) -> Result<(), DeckError> {
    let Some(pending) = pending else {
        return Ok(());
    };
    let question = pending
        .question
        .ok_or(DeckError::MissingQuestion { line: pending.line })?;
    let answer = pending
        .answer
        .ok_or(DeckError::MissingAnswer { line: pending.line })?
        .join("\n")
        .trim()
        .to_string();

    let id = pending
        .id
        .unwrap_or_else(|| format!("{}#{}", deck_name, cards.len() + 1));
    if !seen.insert(id.clone()) {
        return Err(DeckError::DuplicateId {
            id,
            line: pending.line,
        });
    }

    cards.push(DeckCard {
        id: CardId::from(id),
        question,
        answer,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_cards_with_and_without_ids() {
        let input = "ID: 10\nQ: What is Rust?\nA: A language.\n\nQ: Second\nA: Two";
        let cards = parse_deck(input, "rust").unwrap();
        assert_eq!(
            cards,
            vec![
                DeckCard {
                    id: CardId::from("10"),
                    question: "What is Rust?".to_string(),
                    answer: "A language.".to_string(),
                },
                DeckCard {
                    id: CardId::from("rust#2"),
                    question: "Second".to_string(),
                    answer: "Two".to_string(),
                },
            ]
        );
    }

    #[test]
    fn multiline_answers_keep_inner_blank_lines() {
        let input = "Q: Explain\nA: Line 1\nLine 2\n\nLine 4\n\n";
        let cards = parse_deck(input, "d").unwrap();
        assert_eq!(cards[0].answer, "Line 1\nLine 2\n\nLine 4");
    }

    #[test]
    fn empty_content_has_no_cards() {
        assert!(parse_deck("", "d").unwrap().is_empty());
        assert!(parse_deck("# Title\n\nsome notes", "d").unwrap().is_empty());
    }

    #[test]
    fn rejects_answer_without_question() {
        assert!(matches!(
            parse_deck("ID: 1\nA: Answer only", "d"),
            Err(DeckError::MissingQuestion { line: 2 })
        ));
    }

    #[test]
    fn rejects_question_without_answer() {
        assert!(matches!(
            parse_deck("ID: 1\nQ: Question only\nID: 2\nQ: Next\nA: x", "d"),
            Err(DeckError::MissingAnswer { line: 1 })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        assert!(matches!(
            parse_deck("ID: 1\nQ: a\nA: b\nID: 1\nQ: c\nA: d", "d"),
            Err(DeckError::DuplicateId { .. })
        ));
    }

    #[test]
    fn load_uses_file_stem_for_generated_ids() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("capitals.md");
        std::fs::write(&path, "Q: France?\nA: Paris").unwrap();
        let cards = load_deck(&path).unwrap();
        assert_eq!(cards[0].id, CardId::from("capitals#1"));
    }
}
