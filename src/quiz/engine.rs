//! Multiple-choice question generation and grading.
//!
//! For each candidate word the prompt is its translation and the
//! correct answer its source-language text; up to three distractors are
//! sampled from the other words' texts. With fewer than three other
//! words available the question simply carries fewer options. Grading
//! only ever compares against the stored correct index — a client
//! cannot vouch for its own correctness.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::words::Word;

use super::models::{QuestionResult, QuizQuestion, QuizScore};

/// Distractors per question when enough candidates exist
const MAX_DISTRACTORS: usize = 3;

/// Generate one question per input word using the thread RNG.
pub fn generate_questions(words: &[Word]) -> Vec<QuizQuestion> {
    generate_questions_with(words, &mut rand::thread_rng())
}

/// Generate one question per input word with a caller-supplied RNG.
pub fn generate_questions_with<R: Rng + ?Sized>(words: &[Word], rng: &mut R) -> Vec<QuizQuestion> {
    words
        .iter()
        .map(|word| build_question(word, words, rng))
        .collect()
}

fn build_question<R: Rng + ?Sized>(word: &Word, pool: &[Word], rng: &mut R) -> QuizQuestion {
    // Candidate distractors: other words' texts, minus duplicates of the
    // correct answer and of each other
    let mut candidates: Vec<&str> = pool
        .iter()
        .filter(|w| w.id != word.id && w.word != word.word)
        .map(|w| w.word.as_str())
        .collect();
    candidates.sort_unstable();
    candidates.dedup();

    let distractors: Vec<String> = candidates
        .choose_multiple(rng, MAX_DISTRACTORS)
        .map(|s| s.to_string())
        .collect();

    let mut options = Vec::with_capacity(distractors.len() + 1);
    options.push(word.word.clone());
    options.extend(distractors);
    options.shuffle(rng);

    let correct_index = options
        .iter()
        .position(|o| o == &word.word)
        .unwrap_or(0);

    QuizQuestion {
        word_id: word.id,
        prompt: word.translation.clone(),
        options,
        correct_index,
    }
}

/// Grade submitted answers against the stored questions. Missing or
/// out-of-range answers count as incorrect.
pub fn score(questions: &[QuizQuestion], answers: &[Option<usize>]) -> QuizScore {
    let results: Vec<QuestionResult> = questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let selected = answers.get(i).copied().flatten();
            let correct = selected == Some(question.correct_index);
            QuestionResult {
                word_id: question.word_id,
                selected,
                correct_index: question.correct_index,
                correct,
            }
        })
        .collect();

    QuizScore {
        correct_count: results.iter().filter(|r| r.correct).count(),
        total: results.len(),
        results,
    }
}
