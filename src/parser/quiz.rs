//! Quiz question extraction
//!
//! Turns an article page into a list of [`QuizQuestion`] records. Question
//! blocks are located inside the content container; their options and
//! answer blocks are the nearest matching elements that follow them in
//! document order.

use scraper::{ElementRef, Html};
use serde::Serialize;

use super::answer::{self, AnswerEvidence, AnswerSource};
use super::markup::{element_lines, element_text, find_all, find_first, find_following};
use super::sanitize::{clean_explanation, clean_options, clean_question};
use super::selectors::{
    ANSWER_BLOCK, ANSWER_HINT, CONTENT_CONTAINER, FALLBACK_ANSWER, OPTIONS_BLOCK, QUESTION_BLOCK,
    STATED_ANSWER,
};
use crate::models::QuizQuestion;
use crate::utils::error::ParseError;

/// Minimum number of options for a question to be accepted
pub const MIN_OPTIONS: usize = 2;

/// A question block that did not produce a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// 1-based position of the block on the page
    pub position: usize,
    pub reason: ParseError,
}

/// Result of extracting one page
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub questions: Vec<QuizQuestion>,
    pub skipped: Vec<SkippedBlock>,
    /// Number of answers recovered through the fallback marker
    pub fallback_answers: usize,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Extracted question in its serializable preview form
#[derive(Debug, Serialize)]
pub struct QuestionPreview<'a> {
    #[serde(flatten)]
    pub question: &'a QuizQuestion,
    pub correct_letter: char,
}

impl<'a> From<&'a QuizQuestion> for QuestionPreview<'a> {
    fn from(question: &'a QuizQuestion) -> Self {
        Self {
            question,
            correct_letter: question.correct_letter(),
        }
    }
}

/// Multiple-choice question extractor
#[derive(Debug, Clone, Default)]
pub struct QuestionExtractor;

impl QuestionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all valid questions from an article page
    ///
    /// # Errors
    ///
    /// Returns `ParseError::ContainerNotFound` when the page lacks the
    /// content container. Problems with individual blocks never fail the
    /// page; they are reported in [`Extraction::skipped`].
    pub fn extract(&self, html: &str) -> Result<Extraction, ParseError> {
        let document = Html::parse_document(html);
        let container = find_first(document.root_element(), &CONTENT_CONTAINER)
            .ok_or(ParseError::ContainerNotFound)?;

        let mut extraction = Extraction::default();

        for (i, block) in find_all(container, &QUESTION_BLOCK).into_iter().enumerate() {
            let position = i + 1;
            match self.extract_block(block) {
                Ok((question, source)) => {
                    if source == AnswerSource::Marker {
                        extraction.fallback_answers += 1;
                    }
                    extraction.questions.push(question);
                }
                Err(reason) => {
                    tracing::warn!(position, %reason, "Skipping question block");
                    extraction.skipped.push(SkippedBlock { position, reason });
                }
            }
        }

        tracing::debug!(
            accepted = extraction.questions.len(),
            skipped = extraction.skipped.len(),
            fallback = extraction.fallback_answers,
            "Extracted questions"
        );

        Ok(extraction)
    }

    /// Extract questions, treating a structural failure as an empty page
    pub fn extract_questions(&self, html: &str) -> Vec<QuizQuestion> {
        match self.extract(html) {
            Ok(extraction) => extraction.questions,
            Err(e) => {
                tracing::warn!(error = %e, "No quiz content on page");
                Vec::new()
            }
        }
    }

    fn extract_block(
        &self,
        block: ElementRef<'_>,
    ) -> Result<(QuizQuestion, AnswerSource), ParseError> {
        let question_text = clean_question(&element_text(block));

        let options_block =
            find_following(block, &OPTIONS_BLOCK).ok_or(ParseError::OptionsBlockMissing)?;
        let options = clean_options(element_lines(options_block));
        if options.len() < MIN_OPTIONS {
            return Err(ParseError::TooFewOptions(options.len()));
        }

        let answer_block =
            find_following(block, &ANSWER_BLOCK).ok_or(ParseError::AnswerBlockMissing)?;

        let stated = find_first(answer_block, &STATED_ANSWER).map(element_text);
        let marker = find_first(block, &FALLBACK_ANSWER).map(element_text);
        let evidence = AnswerEvidence {
            stated: stated.as_deref(),
            marker: marker.as_deref(),
        };

        let resolved = answer::resolve(&evidence).ok_or(ParseError::AnswerUnresolved)?;
        if resolved.index >= options.len() {
            return Err(ParseError::AnswerOutOfRange {
                index: resolved.index,
                options: options.len(),
            });
        }

        let hint = find_first(answer_block, &ANSWER_HINT).map(element_text);
        let explanation = clean_explanation(hint.as_deref());

        Ok((
            QuizQuestion {
                question_text,
                options,
                correct_index: resolved.index,
                explanation,
            },
            resolved.source,
        ))
    }
}
