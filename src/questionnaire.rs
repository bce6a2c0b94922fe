use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Answer, CompassError, ScoreVector, Vector4};

/// A questionnaire statement and how agreeing with it moves the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Question {
    pub text: &'static str,
    pub weight: Vector4,
}

const fn q(text: &'static str, d: f64, sc: f64, se: f64, a: f64) -> Question {
    Question {
        text,
        weight: Vector4::new(d, sc, se, a),
    }
}

/// The fixed questionnaire, in presentation order.
pub const QUESTIONS: [Question; 20] = [
    q("I would support a blockchain system where all users can make decisions equally.", 0.2, 0.0, 0.0, 0.0),
    q("I would accept a blockchain system controlled by a central authority.", -0.2, 0.0, 0.0, 0.0),
    q("A high degree of decentralization is more important than fast transaction times.", 0.2, -0.2, 0.0, 0.0),
    q("The security features of a blockchain system are crucial for my usage.", 0.0, 0.0, 0.2, 0.0),
    q("The privacy and security of my transactions are more important to me than the cost of using the system.", 0.0, 0.0, 0.2, 0.2),
    q("I would not take additional steps to enhance the security of my blockchain transactions.", 0.0, 0.0, -0.2, 0.0),
    q("I am willing to accept reduced participation opportunities if it improves the scalability of a blockchain system.", 0.0, 0.2, 0.0, -0.2),
    q("Scalability should be prioritized to enable global applications of blockchain.", 0.0, 0.2, 0.0, 0.2),
    q("A blockchain system should be able to process large volumes of transactions quickly.", 0.0, 0.2, 0.0, 0.0),
    q("I trust a decentralized system more, even if it is harder to use.", 0.2, 0.0, 0.0, -0.2),
    q("I prefer using a blockchain with low transaction fees, even if it has fewer security guarantees.", 0.1, 0.1, 0.0, 0.0),
    q("I would prefer a blockchain system that focuses on user adoption and accessibility over complex technical improvements.", 0.0, 0.1, 0.1, 0.0),
    q("Increased adoption of blockchain systems is more important than decentralized governance.", 0.0, 0.0, 0.1, 0.1),
    q("I prefer to use a highly secure system over one that has high performance.", 0.1, 0.0, 0.0, 0.1),
    q("A fast, scalable blockchain is more useful to me than one that is governed by the community.", -0.1, -0.1, 0.0, 0.0),
    q("I believe a higher level of decentralization is critical to the success of blockchain.", 0.0, -0.1, -0.1, 0.0),
    q("Blockchain systems should primarily focus on user adoption, even if that compromises decentralization.", 0.0, 0.0, -0.1, -0.1),
    q("I prefer higher security, even if it means increased costs or slower transaction times.", -0.1, 0.0, 0.0, -0.1),
    q("I think scalability is more important than security for mainstream adoption of blockchain.", 0.1, 0.0, 0.1, -0.1),
    q("A blockchain\u{2019}s success should be measured by its number of users and real-world adoption.", -0.1, 0.1, -0.1, 0.0),
];

/// Weights of [`QUESTIONS`], positionally aligned.
pub fn weights() -> Vec<Vector4> {
    QUESTIONS.iter().map(|question| question.weight).collect()
}

/// Applies a single answer to a running score.
///
/// Agree adds `weight`, Disagree subtracts it, Neutral and Skip (`None`)
/// leave the score untouched. `index` only identifies the question in logs.
pub fn apply_answer(
    score: &ScoreVector,
    index: usize,
    answer: Option<Answer>,
    weight: &Vector4,
) -> ScoreVector {
    let sign = answer.map_or(0.0, Answer::sign);
    if sign == 0.0 {
        return *score;
    }
    let next = score.add(&weight.scale(sign));
    debug!(index, ?answer, ?next, "applied answer");
    next
}

/// Folds [`apply_answer`] over every answer in order.
///
/// # Panics
/// Panics if `answers` and `weights` differ in length.
pub fn score_all(answers: &[Option<Answer>], weights: &[Vector4]) -> ScoreVector {
    assert_eq!(
        answers.len(),
        weights.len(),
        "answers and weights must be positionally aligned"
    );
    answers
        .iter()
        .zip(weights)
        .enumerate()
        .fold(Vector4::ZERO, |score, (index, (answer, weight))| {
            apply_answer(&score, index, *answer, weight)
        })
}

/// Parses one answer token: `a`/`agree`/`+1`, `n`/`neutral`/`0`,
/// `d`/`disagree`/`-1`, or `s`/`skip`/empty for no answer.
///
/// # Errors
/// Returns [`CompassError::InvalidAnswer`] for any other token.
pub fn parse_answer(token: &str) -> Result<Option<Answer>, CompassError> {
    match token.trim().to_ascii_lowercase().as_str() {
        "a" | "agree" | "1" | "+1" => Ok(Some(Answer::Agree)),
        "n" | "neutral" | "0" => Ok(Some(Answer::Neutral)),
        "d" | "disagree" | "-1" => Ok(Some(Answer::Disagree)),
        "s" | "skip" | "" => Ok(None),
        _ => Err(CompassError::InvalidAnswer(token.to_string())),
    }
}

/// Where the questionnaire goes after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextStep {
    Question(usize),
    Complete,
}

/// Finds the next open question after `from`.
///
/// Scans forward from `from + 1` first and only then wraps to the start,
/// so `from` itself is found again if it is the last open slot.
pub fn next_unanswered(answers: &[Option<Answer>], from: usize) -> NextStep {
    let forward = answers
        .iter()
        .enumerate()
        .skip(from.saturating_add(1))
        .find(|(_, answer)| answer.is_none());
    if let Some((index, _)) = forward {
        return NextStep::Question(index);
    }
    match answers.iter().position(Option::is_none) {
        Some(index) => NextStep::Question(index),
        None => NextStep::Complete,
    }
}

/// A questionnaire in progress.
///
/// Holds the answer slots, the running score and the cursor that the
/// overview navigation and answer flow move around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    weights: Vec<Vector4>,
    answers: Vec<Option<Answer>>,
    score: ScoreVector,
    current: Option<usize>,
    complete: bool,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new(weights())
    }
}

impl Questionnaire {
    /// Creates an unstarted questionnaire over the given weights.
    pub fn new(weights: Vec<Vector4>) -> Self {
        let answers = vec![None; weights.len()];
        Self {
            weights,
            answers,
            score: Vector4::ZERO,
            current: None,
            complete: false,
        }
    }

    /// Moves from the intro to the first question.
    pub fn start(&mut self) {
        self.current = if self.weights.is_empty() { None } else { Some(0) };
    }

    /// Jumps to a question from the overview.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn navigate(&mut self, index: usize) {
        assert!(index < self.answers.len(), "question {index} out of range");
        self.current = Some(index);
    }

    /// Records an answer and advances the cursor.
    ///
    /// Re-answering a question first retracts the previous contribution,
    /// so flipping Agree to Disagree moves the score by twice the weight.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn answer(&mut self, index: usize, answer: Option<Answer>) -> NextStep {
        assert!(index < self.answers.len(), "question {index} out of range");
        let weight = self.weights[index];
        if let Some(previous) = self.answers[index] {
            self.score = self.score.sub(&weight.scale(previous.sign()));
        }
        self.answers[index] = answer;
        self.score = apply_answer(&self.score, index, answer, &weight);

        let step = next_unanswered(&self.answers, index);
        match step {
            NextStep::Question(next) => {
                self.current = Some(next);
                self.complete = false;
            }
            NextStep::Complete => {
                self.current = None;
                self.complete = true;
            }
        }
        step
    }

    pub fn score(&self) -> ScoreVector {
        self.score
    }

    pub fn answers(&self) -> &[Option<Answer>] {
        &self.answers
    }

    /// Question under the cursor, `None` before start or after completion.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Answered and total question counts.
    pub fn progress(&self) -> (usize, usize) {
        let answered = self.answers.iter().filter(|a| a.is_some()).count();
        (answered, self.answers.len())
    }
}
