//! Question loading for multiple-choice benchmarks.
//!
//! A benchmark file is JSON with a top-level `questions` array; each entry
//! carries the question text, a map of exactly four option labels (A–D) to
//! option text, and the correct label:
//!
//! ```json
//! {
//!   "questions": [
//!     {
//!       "question": "Which protocol secures HTTP traffic?",
//!       "answers": { "A": "FTP", "B": "TLS", "C": "SNMP", "D": "DHCP" },
//!       "solution": "B"
//!     }
//!   ]
//! }
//! ```

use crate::error::DatasetError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tokio::fs;

/// One of the four option labels.
///
/// Ordered A → D so option maps iterate in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    /// All labels in presentation order.
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    /// Map a single character to a label, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Choice::A),
            'B' => Some(Choice::B),
            'C' => Some(Choice::C),
            'D' => Some(Choice::D),
            _ => None,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        };
        f.write_str(letter)
    }
}

/// A single benchmark question.
#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    /// The question text put to the model
    pub question: String,

    /// Option label → option text; always exactly the four labels A–D
    pub answers: BTreeMap<Choice, String>,

    /// The correct option label
    pub solution: Choice,
}

/// Wire format of the benchmark file.
#[derive(Deserialize)]
struct QuestionFile {
    questions: Vec<Question>,
}

/// A benchmark loaded from a JSON file.
pub struct JsonDataset {
    path: PathBuf,
    name: String,
}

impl JsonDataset {
    /// Create a dataset from a JSON file path.
    ///
    /// The dataset name is derived from the file stem.
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset")
            .to_string();

        Self { path, name }
    }

    /// The name of this dataset (used in reports).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load questions from the file.
    ///
    /// If `sample` is given, at most that many questions are returned, taken
    /// from the front so evaluation order stays the file order.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed JSON, and records that do not
    /// carry all four option labels. Loading failures are fatal to a run;
    /// nothing is evaluated from a file that does not fully validate.
    pub async fn load(&self, sample: Option<usize>) -> Result<Vec<Question>, DatasetError> {
        let content = fs::read_to_string(&self.path).await?;
        let data: QuestionFile =
            serde_json::from_str(&content).map_err(|e| DatasetError::Parse(e.to_string()))?;

        let mut questions = data.questions;
        for (index, question) in questions.iter().enumerate() {
            validate_labels(index, question)?;
        }

        if let Some(size) = sample {
            questions.truncate(size);
        }

        log::debug!("Loaded {} questions from {:?}", questions.len(), self.path);
        Ok(questions)
    }
}

/// Check that a record carries exactly the four labels A–D.
///
/// Unknown labels already fail JSON deserialization; this catches records
/// with labels missing.
fn validate_labels(index: usize, question: &Question) -> Result<(), DatasetError> {
    for label in Choice::ALL {
        if !question.answers.contains_key(&label) {
            return Err(DatasetError::InvalidRecord {
                index,
                reason: format!("missing option {}", label),
            });
        }
    }
    Ok(())
}
