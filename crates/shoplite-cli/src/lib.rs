//! Interactive terminal frontend for the Shoplite question-answering service
//!
//! A thin read-eval-print loop over one HTTP endpoint: each line typed at
//! the prompt is either one of four commands (`help`, `clear`, `save`,
//! `quit`) or a question forwarded to the service. Successful exchanges
//! accumulate in an in-memory transcript that `save` snapshots to a
//! timestamped JSON file.

pub mod display;
pub mod repl;
pub mod transcript;
