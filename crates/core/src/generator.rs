use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

use crate::model::{Question, QuestionId, QuestionSet, Topic};

/// Letters used by the alphabet topic, in alphabetical order.
pub const ALPHABET: [char; 33] = [
    'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ё', 'Ж', 'З', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р',
    'С', 'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш', 'Щ', 'Ъ', 'Ы', 'Ь', 'Э', 'Ю', 'Я',
];

/// How many times each digit is asked in one run.
pub const DIGIT_REPEATS: usize = 2;

/// Wrong options offered next to the correct one.
pub const DISTRACTORS_PER_QUESTION: usize = 3;

/// Upper bound on rejected draws before falling back to a linear scan.
const MAX_REDRAWS: usize = 64;

/// Spelled-out Russian name of a digit. Values outside 0-9 are rendered as numbers.
#[must_use]
pub fn digit_to_word(digit: u8) -> String {
    let word = match digit {
        0 => "ноль",
        1 => "один",
        2 => "два",
        3 => "три",
        4 => "четыре",
        5 => "пять",
        6 => "шесть",
        7 => "семь",
        8 => "восемь",
        9 => "девять",
        _ => return digit.to_string(),
    };
    word.to_string()
}

/// Drains `pool` in random order so that equal items are not drawn back to back.
///
/// Each draw picks uniformly from what is left and rejects a pick equal to the
/// previous one. When only one item remains it is taken unconditionally, which
/// is the only place an adjacent repeat can appear given at most two copies of
/// any value.
pub fn draw_without_adjacent_repeats<T, R>(mut pool: Vec<T>, rng: &mut R) -> Vec<T>
where
    T: PartialEq + Clone,
    R: Rng + ?Sized,
{
    pool.shuffle(rng);
    let mut drawn: Vec<T> = Vec::with_capacity(pool.len());

    while !pool.is_empty() {
        let index = if pool.len() == 1 {
            0
        } else {
            pick_index(&pool, drawn.last(), rng)
        };
        drawn.push(pool.swap_remove(index));
    }

    drawn
}

fn pick_index<T, R>(pool: &[T], last: Option<&T>, rng: &mut R) -> usize
where
    T: PartialEq,
    R: Rng + ?Sized,
{
    let Some(last) = last else {
        return rng.random_range(0..pool.len());
    };

    for _ in 0..MAX_REDRAWS {
        let index = rng.random_range(0..pool.len());
        if pool[index] != *last {
            return index;
        }
    }

    // Only reachable if the pool is dominated by copies of `last`.
    pool.iter().position(|item| item != last).unwrap_or(0)
}

/// Picks `count` distinct values from `candidates` other than `exclude`.
fn distractors<T, R>(candidates: &[T], exclude: &T, count: usize, rng: &mut R) -> Vec<T>
where
    T: PartialEq + Clone,
    R: Rng + ?Sized,
{
    let mut others: Vec<T> = candidates
        .iter()
        .filter(|candidate| *candidate != exclude)
        .cloned()
        .collect();
    others.shuffle(rng);
    others.truncate(count);
    others
}

/// Builds randomized question sets from an injected random source.
#[derive(Debug, Clone)]
pub struct QuestionGenerator<R = ThreadRng> {
    rng: R,
}

impl QuestionGenerator<ThreadRng> {
    /// Generator backed by the thread-local RNG.
    #[must_use]
    pub fn from_thread_rng() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for QuestionGenerator<ThreadRng> {
    fn default() -> Self {
        Self::from_thread_rng()
    }
}

impl<R: Rng> QuestionGenerator<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Builds a fresh question set for `topic`.
    pub fn generate(&mut self, topic: Topic) -> QuestionSet {
        let questions = match topic {
            Topic::Digits => self.digit_questions(),
            Topic::Letters => self.letter_questions(),
        };
        QuestionSet::new(topic, questions)
    }

    fn digit_questions(&mut self) -> Vec<Question> {
        let digits: Vec<u8> = (0..=9).collect();
        let pool: Vec<u8> = digits
            .iter()
            .flat_map(|digit| std::iter::repeat_n(*digit, DIGIT_REPEATS))
            .collect();

        let order = draw_without_adjacent_repeats(pool, &mut self.rng);

        order
            .into_iter()
            .zip(0_u64..)
            .map(|(digit, id)| {
                let wrong = distractors(&digits, &digit, DISTRACTORS_PER_QUESTION, &mut self.rng)
                    .iter()
                    .map(u8::to_string)
                    .collect();
                Question::assemble(
                    QuestionId::new(id),
                    format!("Найди цифру {}", digit_to_word(digit)),
                    digit.to_string(),
                    wrong,
                    None,
                    &mut self.rng,
                )
            })
            .collect()
    }

    fn letter_questions(&mut self) -> Vec<Question> {
        let mut order = ALPHABET.to_vec();
        order.shuffle(&mut self.rng);

        order
            .into_iter()
            .zip(0_u64..)
            .map(|(letter, id)| {
                let wrong = distractors(&ALPHABET, &letter, DISTRACTORS_PER_QUESTION, &mut self.rng)
                    .iter()
                    .map(char::to_string)
                    .collect();
                Question::assemble(
                    QuestionId::new(id),
                    String::new(),
                    letter.to_string(),
                    wrong,
                    Some(format!("Найди букву {letter}")),
                    &mut self.rng,
                )
            })
            .collect()
    }
}
