pub mod catalogue;
mod ids;
mod question;
mod summary;

pub use catalogue::{
    CatalogueError, Difficulty, Exercise, Subject, Topic, all_exercises, find_exercise,
};
pub use ids::{ExerciseId, ParseIdError, QuestionId};
pub use question::{Question, QuestionError, QuestionSet};
pub use summary::{ResultSummary, ScoreBand, ScoreError};
