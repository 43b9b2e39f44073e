//! Read-eval-print loop over the QA service.
//!
//! Strictly one thing at a time: the loop blocks on input, then on the
//! network call, then prints. The transcript is owned here and only
//! handed out by reference when `save` runs.

use std::io::Write as _;

use anyhow::Result;
use shoplite_client::{Endpoint, QaClient};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Stdin};
use tokio::signal::unix::{signal, SignalKind};

use crate::display::{self, Tag};
use crate::transcript::{self, TranscriptEntry};

pub type InputLines = tokio::io::Lines<BufReader<Stdin>>;

pub fn stdin_lines() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Keywords recognized at the prompt; anything else is a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Clear,
    Save,
    Quit,
    Question(String),
}

impl Command {
    /// Classify one input line. Keywords are case-insensitive and the
    /// line is trimmed before anything else looks at it.
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        match trimmed.to_lowercase().as_str() {
            "help" => Command::Help,
            "clear" => Command::Clear,
            "save" => Command::Save,
            "quit" => Command::Quit,
            _ => Command::Question(trimmed.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Prompt for and validate the service URL. `None` means the user
/// interrupted (or closed stdin) at the prompt and the process should
/// exit cleanly.
pub async fn acquire_endpoint<R>(
    lines: &mut tokio::io::Lines<BufReader<R>>,
) -> Result<Option<Endpoint>>
where
    R: AsyncRead + Unpin,
{
    println!("{}", Tag::Emphasis.paint("Enter your RAG system URL:"));
    print!("\nURL: ");
    std::io::stdout().flush()?;

    let line = tokio::select! {
        line = lines.next_line() => match line? {
            Some(line) => line,
            None => {
                println!("\n{}\n", Tag::Notice.paint(GOODBYE));
                return Ok(None);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\n\n{}\n", Tag::Notice.paint(GOODBYE));
            return Ok(None);
        }
    };

    let endpoint = Endpoint::parse(&line)?;
    Ok(Some(endpoint))
}

pub struct Repl {
    endpoint: Endpoint,
    client: Box<dyn QaClient>,
    transcript: Vec<TranscriptEntry>,
}

impl Repl {
    pub fn new(endpoint: Endpoint, client: Box<dyn QaClient>) -> Self {
        Self {
            endpoint,
            client,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Run until `quit` or end of input. Nothing that happens inside one
    /// iteration ends the loop: per-request and persistence failures are
    /// printed inline, anything else lands in the catch-all branch below.
    pub async fn run<R>(&mut self, lines: &mut tokio::io::Lines<BufReader<R>>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        // One stream for the whole session, so a SIGINT is observed no
        // matter which await it lands on.
        let mut interrupt = signal(SignalKind::interrupt())?;
        loop {
            print!("{}", display::prompt());
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => line,
                    // EOF behaves like quit.
                    Ok(None) => {
                        println!("\n{}\n", Tag::Notice.paint(FAREWELL));
                        break;
                    }
                    Err(err) => {
                        log::error!("stdin read failed: {err}");
                        println!("\n{}\n", Tag::Negative.paint(&format!("Unexpected error: {err}")));
                        continue;
                    }
                },
                _ = interrupt.recv() => {
                    println!("\n\n{}\n", Tag::Notice.paint(INTERRUPTED));
                    continue;
                }
            };

            let outcome = tokio::select! {
                result = self.step(&line) => result,
                // Interrupting here abandons the in-flight exchange; no
                // transcript entry is written for it.
                _ = interrupt.recv() => {
                    log::info!("exchange interrupted");
                    println!("\n\n{}\n", Tag::Notice.paint(INTERRUPTED));
                    Ok(Flow::Continue)
                }
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(err) => {
                    log::error!("iteration failed: {err:#}");
                    println!("\n{}\n", Tag::Negative.paint(&format!("Unexpected error: {err}")));
                }
            }
        }
        Ok(())
    }

    async fn step(&mut self, line: &str) -> Result<Flow> {
        match Command::parse(line) {
            Command::Empty => Ok(Flow::Continue),
            Command::Quit => {
                println!("\n{}\n", Tag::Notice.paint(FAREWELL));
                Ok(Flow::Exit)
            }
            Command::Help => {
                print!("{}", display::help_text());
                Ok(Flow::Continue)
            }
            Command::Clear => {
                print!("{}{}", display::CLEAR_SCREEN, display::banner());
                Ok(Flow::Continue)
            }
            Command::Save => {
                self.save_transcript();
                Ok(Flow::Continue)
            }
            Command::Question(question) => {
                self.ask(&question).await;
                Ok(Flow::Continue)
            }
        }
    }

    /// One exchange. A failed exchange is reported and leaves the
    /// transcript untouched.
    async fn ask(&mut self, question: &str) {
        println!("{}", Tag::Notice.paint("Thinking..."));
        match self.client.ask(question).await {
            Ok(result) => {
                print!("{}", display::format_answer(&result));
                self.transcript
                    .push(TranscriptEntry::new(question.to_string(), result));
            }
            Err(err) => {
                log::warn!("exchange failed: {err}");
                println!("\n{}\n", Tag::Negative.paint(&format!("Error: {err}")));
            }
        }
    }

    fn save_transcript(&self) {
        match transcript::save_log(&self.endpoint, &self.transcript) {
            Ok(filename) => println!(
                "{}",
                Tag::Positive.paint(&format!("✓ Conversation saved to {filename}"))
            ),
            Err(err) => println!(
                "{}",
                Tag::Negative.paint(&format!("✗ Failed to save conversation: {err}"))
            ),
        }
    }
}

const FAREWELL: &str = "Thank you for using Shoplite Customer Service!";
const GOODBYE: &str = "Goodbye!";
const INTERRUPTED: &str = "Chat interrupted. Type 'quit' to exit or continue asking questions.";

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use shoplite_client::{AnswerResult, ClientError};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted stand-in for the HTTP client: pops canned replies and
    /// records every question it is asked.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<AnswerResult, ClientError>>>,
        questions: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<AnswerResult, ClientError>>) -> (Self, Arc<Mutex<Vec<String>>>) {
            let questions = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    replies: Mutex::new(VecDeque::from(replies)),
                    questions: questions.clone(),
                },
                questions,
            )
        }
    }

    #[async_trait]
    impl QaClient for ScriptedClient {
        async fn ask(&self, question: &str) -> Result<AnswerResult, ClientError> {
            self.questions.lock().unwrap().push(question.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ClientError::Connection("script exhausted".into())))
        }
    }

    fn repl_with(
        replies: Vec<Result<AnswerResult, ClientError>>,
    ) -> (Repl, Arc<Mutex<Vec<String>>>) {
        let (client, questions) = ScriptedClient::new(replies);
        let endpoint = Endpoint::parse("http://x").unwrap();
        (Repl::new(endpoint, Box::new(client)), questions)
    }

    fn ok_reply(answer: &str) -> Result<AnswerResult, ClientError> {
        Ok(AnswerResult::from(json!({"answer": answer})))
    }

    #[test]
    fn command_parse_recognizes_keywords_in_any_casing() {
        for line in ["help", "HELP", "Help"] {
            assert_eq!(Command::parse(line), Command::Help);
        }
        assert_eq!(Command::parse("CLEAR"), Command::Clear);
        assert_eq!(Command::parse(" Save "), Command::Save);
        assert_eq!(Command::parse("qUIt"), Command::Quit);
    }

    #[test]
    fn command_parse_treats_everything_else_as_question() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(
            Command::parse(" Where is my order? "),
            Command::Question("Where is my order?".to_string())
        );
        // A keyword with extra words is a question, not a command.
        assert_eq!(
            Command::parse("help me"),
            Command::Question("help me".to_string())
        );
    }

    #[tokio::test]
    async fn question_issues_one_call_and_appends_entry() {
        let (mut repl, questions) = repl_with(vec![ok_reply("Check your account page.")]);

        let flow = repl.step("Where is my order?").await.unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(*questions.lock().unwrap(), vec!["Where is my order?"]);
        assert_eq!(repl.transcript().len(), 1);
        assert_eq!(repl.transcript()[0].question, "Where is my order?");
        assert_eq!(repl.transcript()[0].response.answer(), "Check your account page.");
    }

    #[tokio::test]
    async fn failed_exchange_appends_nothing() {
        let (mut repl, questions) = repl_with(vec![Err(ClientError::Status {
            status: 500,
            body: "internal error".to_string(),
        })]);

        let flow = repl.step("anything").await.unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(questions.lock().unwrap().len(), 1);
        assert!(repl.transcript().is_empty());
    }

    #[tokio::test]
    async fn transcript_preserves_exchange_order() {
        let (mut repl, _) = repl_with(vec![
            ok_reply("one"),
            Err(ClientError::Timeout { secs: 120 }),
            ok_reply("two"),
        ]);

        repl.step("first?").await.unwrap();
        repl.step("timed out?").await.unwrap();
        repl.step("second?").await.unwrap();

        let entries = repl.transcript();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question, "first?");
        assert_eq!(entries[1].question, "second?");
    }

    #[tokio::test]
    async fn commands_issue_no_network_calls() {
        let (mut repl, questions) = repl_with(vec![]);

        for line in ["help", "HELP", "clear", "Clear", ""] {
            let flow = repl.step(line).await.unwrap();
            assert_eq!(flow, Flow::Continue);
        }
        let flow = repl.step("QUIT").await.unwrap();
        assert_eq!(flow, Flow::Exit);

        assert!(questions.lock().unwrap().is_empty());
        assert!(repl.transcript().is_empty());
    }

    /// Client whose exchange never finishes on its own; only an interrupt
    /// gets the loop past it.
    struct StalledClient {
        questions: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl QaClient for StalledClient {
        async fn ask(&self, question: &str) -> Result<AnswerResult, ClientError> {
            self.questions.lock().unwrap().push(question.to_string());
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(AnswerResult::from(json!({"answer": "too late"})))
        }
    }

    fn raise_sigint_after(delay: std::time::Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let status = std::process::Command::new("kill")
                .args(["-INT", &std::process::id().to_string()])
                .status()
                .unwrap();
            assert!(status.success());
        })
    }

    #[tokio::test]
    async fn acquire_endpoint_parses_entered_url() {
        let mut lines = BufReader::new(&b"http://localhost:8000/\n"[..]).lines();
        let endpoint = acquire_endpoint(&mut lines).await.unwrap().unwrap();
        assert_eq!(endpoint.as_str(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn acquire_endpoint_treats_eof_as_clean_exit() {
        let mut lines = BufReader::new(tokio::io::empty()).lines();
        assert!(acquire_endpoint(&mut lines).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn acquire_endpoint_rejects_bad_scheme() {
        let mut lines = BufReader::new(&b"localhost:8000\n"[..]).lines();
        assert!(acquire_endpoint(&mut lines).await.is_err());
    }

    #[tokio::test]
    async fn interrupt_during_processing_keeps_loop_alive() {
        let questions = Arc::new(Mutex::new(Vec::new()));
        let client = StalledClient {
            questions: questions.clone(),
        };
        let endpoint = Endpoint::parse("http://x").unwrap();
        let mut repl = Repl::new(endpoint, Box::new(client));

        // One question that stalls, then EOF so the loop ends like quit.
        let mut lines = BufReader::new(&b"is anyone there?\n"[..]).lines();
        let raiser = raise_sigint_after(std::time::Duration::from_millis(200));

        repl.run(&mut lines).await.unwrap();
        raiser.await.unwrap();

        // The exchange started, was abandoned by the interrupt, and left
        // no transcript entry; the loop went on to see EOF.
        assert_eq!(*questions.lock().unwrap(), vec!["is anyone there?"]);
        assert!(repl.transcript().is_empty());
    }

    #[tokio::test]
    async fn help_and_clear_do_not_touch_prior_transcript() {
        let (mut repl, _) = repl_with(vec![ok_reply("kept")]);
        repl.step("a question").await.unwrap();

        for _ in 0..3 {
            repl.step("help").await.unwrap();
            repl.step("clear").await.unwrap();
        }
        assert_eq!(repl.transcript().len(), 1);
        assert_eq!(repl.transcript()[0].response.answer(), "kept");
    }
}
