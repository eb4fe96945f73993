use dictionary_rs::WordRecord;
use rand::seq::SliceRandom;
use rand::Rng;
use std::error::Error;
use std::fmt;

/// Number of words drawn for one practice session.
pub const PRACTICE_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingRange,
    Practicing,
    Completed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum QuizError {
    NotEnoughWords { available: usize },
    AlreadyStarted,
    NotPracticing,
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QuizError::NotEnoughWords { .. } => write!(
                f,
                "Not enough words in the date range to practice {} words.",
                PRACTICE_SIZE
            ),
            QuizError::AlreadyStarted => write!(f, "a practice session is already running"),
            QuizError::NotPracticing => write!(f, "no practice session is running"),
        }
    }
}

impl Error for QuizError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong { correct_word: String },
}

/// What the learner sees for the current word. The word itself is withheld.
#[derive(Debug, PartialEq, Eq)]
pub struct Prompt<'a> {
    pub meaning: &'a str,
    pub word_type: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub score: u32,
    pub total: u32,
}

impl Score {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total) * 100.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{} ({:.2}%)", self.score, self.total, self.percentage())
    }
}

/// Trimmed, case-insensitive, exact comparison.
pub fn is_correct(answer: &str, word: &str) -> bool {
    answer.trim().to_lowercase() == word.trim().to_lowercase()
}

/// One practice run: pick a range, answer the sampled words, see the score.
#[derive(Debug, Clone)]
pub struct QuizSession {
    words: Vec<WordRecord>,
    current: usize,
    score: Score,
    phase: Phase,
}

impl Default for QuizSession {
    fn default() -> Self {
        QuizSession::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        QuizSession {
            words: Vec::new(),
            current: 0,
            score: Score::default(),
            phase: Phase::AwaitingRange,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn sampled_words(&self) -> &[WordRecord] {
        &self.words
    }

    /// Samples [`PRACTICE_SIZE`] distinct words and begins practising.
    ///
    /// With too few words the session stays where it is.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        words: Vec<WordRecord>,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        if self.phase != Phase::AwaitingRange {
            return Err(QuizError::AlreadyStarted);
        }
        if words.len() < PRACTICE_SIZE {
            return Err(QuizError::NotEnoughWords {
                available: words.len(),
            });
        }

        self.words = words
            .choose_multiple(rng, PRACTICE_SIZE)
            .cloned()
            .collect();
        self.current = 0;
        self.score = Score::default();
        self.phase = Phase::Practicing;
        Ok(())
    }

    pub fn current(&self) -> Option<Prompt<'_>> {
        if self.phase != Phase::Practicing {
            return None;
        }
        self.words.get(self.current).map(|w| Prompt {
            meaning: &w.meaning,
            word_type: &w.word_type,
        })
    }

    pub fn submit(&mut self, answer: &str) -> Result<Outcome, QuizError> {
        if self.phase != Phase::Practicing {
            return Err(QuizError::NotPracticing);
        }
        let word = &self.words[self.current].word;

        self.score.total += 1;
        let outcome = if is_correct(answer, word) {
            self.score.score += 1;
            Outcome::Correct
        } else {
            Outcome::Wrong {
                correct_word: word.clone(),
            }
        };

        self.current += 1;
        if self.current >= self.words.len() {
            self.phase = Phase::Completed;
        }
        Ok(outcome)
    }

    pub fn restart(&mut self) {
        *self = QuizSession::new();
    }
}
