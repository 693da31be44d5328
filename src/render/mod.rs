//! Quiz document rendering with the Handlebars template engine
//!
//! A batch of (already translated) questions becomes one Markdown document
//! written to the output directory. Labels come from the locale matching
//! the target language.

use chrono::Utc;
use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::{self, t};
use crate::models::{index_to_letter, QuizQuestion};
use crate::utils::{sanitize_filename, title_from_url};

/// Default quiz template
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/quiz.hbs");

const TEMPLATE_NAME: &str = "quiz";

/// Errors raised while rendering a document
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Render failed: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing to render")]
    Empty,
}

/// A document written to disk
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub path: PathBuf,
    pub title: String,
    /// Number of the first question in the document
    pub first_index: u64,
    /// Number of the last question in the document
    pub last_index: u64,
    pub count: usize,
}

#[derive(Debug, Serialize)]
struct Labels {
    answer: String,
    explanation: String,
    questions: String,
}

#[derive(Debug, Serialize)]
struct OptionData<'a> {
    letter: char,
    text: &'a str,
    correct: bool,
}

#[derive(Debug, Serialize)]
struct QuestionData<'a> {
    number: u64,
    text: &'a str,
    options: Vec<OptionData<'a>>,
    answer: &'a str,
    explanation: &'a str,
}

#[derive(Debug, Serialize)]
struct DocumentData<'a> {
    title: &'a str,
    questions: Vec<QuestionData<'a>>,
    labels: Labels,
    first_index: u64,
    last_index: u64,
    generated_at: String,
}

/// Markdown document renderer
pub struct DocumentRenderer<'a> {
    handlebars: Handlebars<'a>,
    output_dir: PathBuf,
    locale: String,
}

impl<'a> DocumentRenderer<'a> {
    /// Create a renderer with the default template
    ///
    /// `language` selects the label locale (e.g. `gu`).
    pub fn new(output_dir: &Path, language: &str) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars
            .register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE)
            .map_err(Box::new)?;

        fs::create_dir_all(output_dir)?;

        Ok(Self {
            handlebars,
            output_dir: output_dir.to_path_buf(),
            locale: i18n::normalize_locale(language),
        })
    }

    /// Create with a custom template file
    pub fn with_template(
        output_dir: &Path,
        language: &str,
        template_path: &Path,
    ) -> Result<Self, RenderError> {
        let mut renderer = Self::new(output_dir, language)?;
        renderer
            .handlebars
            .register_template_file(TEMPLATE_NAME, template_path)
            .map_err(Box::new)?;
        Ok(renderer)
    }

    /// Locale used for labels
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Render questions to a Markdown string
    ///
    /// Questions are numbered from `start_index + 1`.
    pub fn render_to_string(
        &self,
        title: &str,
        questions: &[QuizQuestion],
        start_index: u64,
    ) -> Result<String, RenderError> {
        if questions.is_empty() {
            return Err(RenderError::Empty);
        }

        let locale = self.locale.as_str();
        let data = DocumentData {
            title,
            questions: questions
                .iter()
                .zip(start_index + 1..)
                .map(|(q, number)| question_data(q, number))
                .collect(),
            labels: Labels {
                answer: t!("document.answer", locale = locale).to_string(),
                explanation: t!("document.explanation", locale = locale).to_string(),
                questions: t!("document.questions", locale = locale).to_string(),
            },
            first_index: start_index + 1,
            last_index: start_index + questions.len() as u64,
            generated_at: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
        };

        Ok(self.handlebars.render(TEMPLATE_NAME, &data)?)
    }

    /// Render questions and save the document
    ///
    /// The title is derived from `source_url`; the file is named
    /// `{title}_{unix seconds}.md`.
    pub fn render(
        &self,
        questions: &[QuizQuestion],
        start_index: u64,
        source_url: &str,
    ) -> Result<RenderedDocument, RenderError> {
        let title = title_from_url(source_url);
        let markdown = self.render_to_string(&title, questions, start_index)?;

        let filename = format!("{}_{}.md", sanitize_filename(&title), Utc::now().timestamp());
        let path = self.output_dir.join(filename);
        fs::write(&path, markdown)?;

        tracing::debug!(path = %path.display(), count = questions.len(), "Rendered quiz document");

        Ok(RenderedDocument {
            path,
            title,
            first_index: start_index + 1,
            last_index: start_index + questions.len() as u64,
            count: questions.len(),
        })
    }

    /// Caption sent along with the document
    pub fn caption(&self, title: &str) -> String {
        t!("document.caption", locale = self.locale.as_str(), title = title).to_string()
    }
}

fn question_data(question: &QuizQuestion, number: u64) -> QuestionData<'_> {
    QuestionData {
        number,
        text: &question.question_text,
        options: question
            .options
            .iter()
            .enumerate()
            .map(|(i, text)| OptionData {
                letter: index_to_letter(i),
                text,
                correct: i == question.correct_index,
            })
            .collect(),
        answer: question.correct_option().unwrap_or_default(),
        explanation: &question.explanation,
    }
}
