//! CSS selectors for quiz listing and article pages
//!
//! The site publishes listing pages and quiz articles from the same
//! WordPress theme, so both share the content container.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    /// Main content column holding links or questions
    pub static ref CONTENT_CONTAINER: Selector =
        parse_selector!("div.inside_post.column.content_width");

    /// Anchors inside the listing container
    pub static ref LINK_ANCHOR: Selector = parse_selector!("a[href]");

    /// One question with its ordinal label
    pub static ref QUESTION_BLOCK: Selector =
        parse_selector!("div.wp_quiz_question.testclass");

    /// Answer choices for the preceding question
    pub static ref OPTIONS_BLOCK: Selector = parse_selector!("div.wp_quiz_question_options");

    /// Stated answer plus optional explanation
    pub static ref ANSWER_BLOCK: Selector = parse_selector!("div.wp_basic_quiz_answer");

    /// "Correct Answer: X" line inside the answer block
    pub static ref STATED_ANSWER: Selector = parse_selector!("div.ques_answer");

    /// Explanation inside the answer block
    pub static ref ANSWER_HINT: Selector = parse_selector!("div.answer_hint");

    /// Alternate answer marker inside the question block
    pub static ref FALLBACK_ANSWER: Selector = parse_selector!("div.correct_answer");
}
