//! Common test utilities

use quizharvest::models::QuizQuestion;

/// Article page with two valid questions and a trailing one without options
///
/// The second question has no stated answer and relies on the fallback
/// marker.
#[allow(dead_code)]
pub const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Daily Current Affairs Quiz: October 18, 2026</title>
</head>
<body>
    <div class="inside_post column content_width">
        <p>Practice the daily quiz below.</p>

        <div class="wp_quiz_question testclass">1. Which river is known as the Dakshin Ganga?</div>
        <div class="wp_quiz_question_options">[A] Krishna<br>[B] Godavari<br>[C] Kaveri<br>[D] Narmada</div>
        <div class="wp_basic_quiz_answer">
            <div class="ques_answer">Correct Answer: B [Godavari]</div>
            <div class="answer_hint">Notes:
                The Godavari is the longest river of peninsular India.</div>
        </div>

        <div class="wp_quiz_question testclass">2. Which state hosted the 2026 national games?
            <div class="correct_answer">C</div>
        </div>
        <div class="wp_quiz_question_options">[A] Goa<br>[B] Kerala<br>[C] Gujarat<br>[D] Assam</div>
        <div class="wp_basic_quiz_answer">
            <div class="ques_answer">Correct Answer: see the notes</div>
        </div>

        <div class="wp_quiz_question testclass">3. Which organisation publishes the report?</div>
        <p>Options for this question were not published.</p>
    </div>
</body>
</html>
"#;

/// Article page without the content container
#[allow(dead_code)]
pub const NO_CONTAINER_HTML: &str =
    "<html><body><div class=\"sidebar\"><p>Nothing here</p></div></body></html>";

/// Listing page linking to the given URLs, plus an anchor outside the container
#[allow(dead_code)]
pub fn listing_html(urls: &[&str]) -> String {
    let anchors: String = urls
        .iter()
        .map(|url| format!("<h2><a href=\"{url}\">{url}</a></h2>\n"))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<body>
    <nav><a href="/about/">About</a></nav>
    <div class="inside_post column content_width">
{anchors}    </div>
</body>
</html>"#
    )
}

/// Create a question with default values
#[allow(dead_code)]
pub fn create_test_question(n: usize) -> QuizQuestion {
    QuizQuestion {
        question_text: format!("{n}. Sample question {n}?"),
        options: vec!["Alpha".into(), "Beta".into(), "Gamma".into()],
        correct_index: n % 3,
        explanation: format!("Explanation {n}."),
    }
}
