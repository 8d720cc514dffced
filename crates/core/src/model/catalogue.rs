use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ExerciseId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogueError {
    #[error("no exercise with id {0}")]
    UnknownExercise(ExerciseId),

    #[error("exercise {id} ({title}) has no quiz yet")]
    NoQuiz { id: ExerciseId, title: &'static str },
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// Top-level area of study shown on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Math,
    Reading,
}

impl Subject {
    pub const ALL: [Subject; 2] = [Subject::Math, Subject::Reading];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Subject::Math => "Математика",
            Subject::Reading => "Чтение",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Subject::Math => "function",
            Subject::Reading => "book.fill",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Subject::Math => "blue",
            Subject::Reading => "green",
        }
    }

    /// Exercises owned by this subject, in display order.
    #[must_use]
    pub fn exercises(self) -> &'static [Exercise] {
        match self {
            Subject::Math => &MATH_EXERCISES,
            Subject::Reading => &READING_EXERCISES,
        }
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Легко",
            Difficulty::Medium => "Средне",
            Difficulty::Hard => "Сложно",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Difficulty::Easy => "green",
            Difficulty::Medium => "orange",
            Difficulty::Hard => "red",
        }
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// Question pool an exercise draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Digits 0-9, each asked twice.
    Digits,
    /// The 33-letter alphabet, each letter asked once.
    Letters,
}

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// A catalogue entry. Instances only exist in the static tables below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    id: ExerciseId,
    title: &'static str,
    description: &'static str,
    subject: Subject,
    difficulty: Difficulty,
    icon: &'static str,
    topic: Option<Topic>,
}

impl Exercise {
    const fn entry(
        id: u64,
        title: &'static str,
        description: &'static str,
        subject: Subject,
        difficulty: Difficulty,
        icon: &'static str,
        topic: Option<Topic>,
    ) -> Self {
        Self {
            id: ExerciseId::new(id),
            title,
            description,
            subject,
            difficulty,
            icon,
            topic,
        }
    }

    #[must_use]
    pub fn id(&self) -> ExerciseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        self.icon
    }

    /// Question topic, or `None` for exercises without a quiz yet.
    #[must_use]
    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    /// Returns the topic, failing for exercises that cannot be played.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::NoQuiz` when the exercise has no topic.
    pub fn quiz_topic(&self) -> Result<Topic, CatalogueError> {
        self.topic.ok_or(CatalogueError::NoQuiz {
            id: self.id,
            title: self.title,
        })
    }
}

static MATH_EXERCISES: [Exercise; 6] = [
    Exercise::entry(
        1,
        "Цифры",
        "Изучение цифр от 0 до 9",
        Subject::Math,
        Difficulty::Easy,
        "1.circle.fill",
        Some(Topic::Digits),
    ),
    Exercise::entry(
        2,
        "Счет до 10",
        "Учимся считать от 1 до 10",
        Subject::Math,
        Difficulty::Easy,
        "plus.circle.fill",
        None,
    ),
    Exercise::entry(
        3,
        "Сложение",
        "Простые примеры на сложение",
        Subject::Math,
        Difficulty::Easy,
        "equal.circle.fill",
        None,
    ),
    Exercise::entry(
        4,
        "Вычитание",
        "Простые примеры на вычитание",
        Subject::Math,
        Difficulty::Medium,
        "minus.circle.fill",
        None,
    ),
    Exercise::entry(
        5,
        "Геометрия",
        "Изучаем фигуры",
        Subject::Math,
        Difficulty::Medium,
        "triangle.fill",
        None,
    ),
    Exercise::entry(
        6,
        "Сравнение",
        "Больше, меньше, равно",
        Subject::Math,
        Difficulty::Easy,
        "greaterthan.circle.fill",
        None,
    ),
];

static READING_EXERCISES: [Exercise; 6] = [
    Exercise::entry(
        7,
        "Алфавит",
        "Изучаем буквы",
        Subject::Reading,
        Difficulty::Easy,
        "a.circle.fill",
        Some(Topic::Letters),
    ),
    Exercise::entry(
        8,
        "Слоги",
        "Читаем по слогам",
        Subject::Reading,
        Difficulty::Easy,
        "textformat.abc",
        None,
    ),
    Exercise::entry(
        9,
        "Слова",
        "Простые слова",
        Subject::Reading,
        Difficulty::Medium,
        "text.word.spacing",
        None,
    ),
    Exercise::entry(
        10,
        "Предложения",
        "Читаем предложения",
        Subject::Reading,
        Difficulty::Medium,
        "text.alignleft",
        None,
    ),
    Exercise::entry(
        11,
        "Сказки",
        "Короткие сказки",
        Subject::Reading,
        Difficulty::Hard,
        "book.closed.fill",
        None,
    ),
    Exercise::entry(
        12,
        "Стихи",
        "Детские стихотворения",
        Subject::Reading,
        Difficulty::Hard,
        "music.note",
        None,
    ),
];

/// Iterates every exercise across all subjects.
pub fn all_exercises() -> impl Iterator<Item = &'static Exercise> {
    Subject::ALL.into_iter().flat_map(Subject::exercises)
}

/// Looks up an exercise by id.
///
/// # Errors
///
/// Returns `CatalogueError::UnknownExercise` if no exercise has this id.
pub fn find_exercise(id: ExerciseId) -> Result<&'static Exercise, CatalogueError> {
    all_exercises()
        .find(|exercise| exercise.id() == id)
        .ok_or(CatalogueError::UnknownExercise(id))
}
