//! Terminal output: banner, help text, and answer formatting.
//!
//! Formatting builds plain `String`s and the styling roles resolve to
//! escape codes only inside `Tag::paint`, so nothing else in the program
//! touches terminal capabilities.

use shoplite_client::AnswerResult;
use yansi::Paint;

const RULE: &str = "------------------------------------------------------------";

/// Clear-and-home control sequence for the `clear` command.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Styling roles used across the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Emphasis,
    Notice,
    Positive,
    Warning,
    Negative,
}

impl Tag {
    pub fn paint(self, text: &str) -> String {
        match self {
            Tag::Emphasis => Paint::new(text).bold().to_string(),
            Tag::Notice => Paint::cyan(text).to_string(),
            Tag::Positive => Paint::green(text).to_string(),
            Tag::Warning => Paint::yellow(text).to_string(),
            Tag::Negative => Paint::red(text).to_string(),
        }
    }
}

/// Tag for a confidence label. Exact matches only; anything unexpected
/// (including the missing-field default) reads as negative.
pub fn confidence_tag(level: &str) -> Tag {
    match level {
        "High" => Tag::Positive,
        "Medium" => Tag::Warning,
        _ => Tag::Negative,
    }
}

/// Display name of one source citation: the trimmed text after the first
/// colon (labels like `doc:` are dropped), or the whole string.
pub fn source_name(source: &str) -> &str {
    match source.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => source,
    }
}

pub fn banner() -> String {
    format!(
        "\n{RULE}\n{}\n{RULE}\n\n",
        Tag::Emphasis.paint("Shoplite Customer Service Assistant")
    )
}

pub fn help_text() -> String {
    format!(
        "\n{RULE}\n{}\n  help    - Show this help message\n  clear   - Clear the screen\n  save    - Save conversation history to file\n  quit    - Exit the chat interface\n{RULE}\n\n",
        Tag::Emphasis.paint("Available Commands:")
    )
}

pub fn prompt() -> String {
    Paint::blue("You: ").bold().to_string()
}

/// Render one answer block, framed by rules.
pub fn format_answer(result: &AnswerResult) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    out.push('\n');
    out.push_str(&Tag::Emphasis.paint("Answer:"));
    out.push('\n');
    out.push_str(result.answer());
    out.push_str("\n\n");

    let sources = result.sources();
    if !sources.is_empty() {
        out.push_str(&Tag::Emphasis.paint("Sources:"));
        out.push('\n');
        for (i, source) in sources.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, source_name(source)));
        }
        out.push('\n');
    }

    let confidence = result.confidence_level();
    out.push_str(&format!(
        "{} {} (Similarity: {:.3})\n",
        Tag::Emphasis.paint("Confidence:"),
        confidence_tag(confidence).paint(confidence),
        result.top_similarity()
    ));
    out.push_str(RULE);
    out.push_str("\n\n");
    out
}
