//! Line-based quiz host: renders questions to stdout and reads answers from stdin.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use quiz_core::QuestionGenerator;
use quiz_core::model::{ExerciseId, ResultSummary};
use services::session::{OptionState, QuestionView};
use services::{AdvanceScheduler, QuizEvent, QuizLoopService, QuizSession, SpeechSink};

/// Prints what a speech engine would say.
#[derive(Debug)]
struct ConsoleSpeech;

impl SpeechSink for ConsoleSpeech {
    fn speak(&self, text: &str) {
        println!("🔊 {text}");
    }

    fn stop(&self) {
        debug!("speech stopped");
    }
}

/// Host-side effects: delayed speech and the auto-advance timer.
struct Effects {
    speech: Arc<dyn SpeechSink>,
    pending_speech: Option<JoinHandle<()>>,
    scheduler: AdvanceScheduler,
}

impl Effects {
    fn speak_after(&mut self, text: String, after: Duration) {
        // new speech interrupts the previous utterance
        if let Some(handle) = self.pending_speech.take() {
            handle.abort();
        }
        if after.is_zero() {
            self.speech.speak(&text);
            return;
        }
        let speech = Arc::clone(&self.speech);
        self.pending_speech = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            speech.speak(&text);
        }));
    }

    /// Runs the events; returns the summary if the run finished.
    fn apply(&mut self, events: Vec<QuizEvent>) -> Option<ResultSummary> {
        let mut finished = None;
        for event in events {
            match event {
                QuizEvent::Speak { text, after } => self.speak_after(text, after),
                QuizEvent::Correct { first_try } => {
                    println!("{}", if first_try { "✅ Верно!" } else { "✅ Верно" });
                }
                QuizEvent::Incorrect { answer } => println!("❌ {answer}"),
                QuizEvent::ScheduleAdvance { ticket, after } => {
                    self.scheduler.schedule(ticket, after);
                }
                QuizEvent::Completed(summary) => finished = Some(summary),
            }
        }
        finished
    }

    fn cancel_all(&mut self) {
        self.scheduler.cancel();
        if let Some(handle) = self.pending_speech.take() {
            handle.abort();
        }
        self.speech.stop();
    }
}

fn render_question(view: &QuestionView) {
    println!();
    println!(
        "{} [{}]",
        progress_bar(view.progress.fraction()),
        view.progress.label()
    );
    if !view.prompt.is_empty() {
        println!("{}", view.prompt);
    }
    let options: Vec<String> = view
        .options
        .iter()
        .map(|option| match option.state {
            OptionState::Open => format!(" {} ", option.text),
            OptionState::Wrong => format!("✗{}✗", option.text),
            OptionState::Correct => format!("[{}]", option.text),
        })
        .collect();
    println!("  {}", options.join("   "));
}

fn progress_bar(fraction: f64) -> String {
    const WIDTH: usize = 20;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((fraction.clamp(0.0, 1.0) * WIDTH as f64).round() as usize).min(WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled))
}

fn render_summary(summary: &ResultSummary) {
    println!();
    println!("{}", summary.band().message());
    println!(
        "{}% ({}/{})",
        summary.percentage(),
        summary.first_try_correct(),
        summary.total()
    );
    println!("Правильно с первой попытки: {}", summary.first_try_correct());
    println!("С ошибками или со второй попытки: {}", summary.mistakes());
    println!();
    println!(":r - попробовать еще раз, :q - вернуться");
}

/// Plays one exercise until the learner quits or stdin closes.
///
/// # Errors
///
/// Returns an error if the exercise cannot be played or stdin fails.
pub async fn play(
    quiz_loop: &QuizLoopService,
    exercise_id: ExerciseId,
) -> Result<(), Box<dyn std::error::Error>> {
    let generator = QuestionGenerator::new(StdRng::from_os_rng());
    let (mut session, events) = quiz_loop.start_session(exercise_id, generator)?;

    let (scheduler, mut tickets) = AdvanceScheduler::channel();
    let mut effects = Effects {
        speech: Arc::new(ConsoleSpeech),
        pending_speech: None,
        scheduler,
    };

    show(&session);
    if let Some(summary) = effects.apply(events) {
        render_summary(&summary);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.trim() {
                    "" => {}
                    ":q" => break,
                    ":r" => {
                        effects.cancel_all();
                        let events = quiz_loop.restart(&mut session)?;
                        show(&session);
                        if let Some(summary) = effects.apply(events) {
                            render_summary(&summary);
                        }
                    }
                    ":s" => {
                        if let Some(event) = quiz_loop.repeat_prompt(&session) {
                            effects.apply(vec![event]);
                        }
                    }
                    answer => {
                        let result = quiz_loop.answer_current(&mut session, answer);
                        effects.apply(result.events);
                        show(&session);
                    }
                }
            }
            Some(ticket) = tickets.recv() => {
                let result = quiz_loop.advance_due(&mut session, ticket)?;
                match effects.apply(result.events) {
                    Some(summary) => render_summary(&summary),
                    None => show(&session),
                }
            }
        }
    }

    effects.cancel_all();
    if !session.is_complete() {
        warn!("left the quiz at {}", session.progress().label());
    }
    Ok(())
}

fn show(session: &QuizSession<StdRng>) {
    if let Some(view) = session.question_view() {
        render_question(&view);
    }
}
