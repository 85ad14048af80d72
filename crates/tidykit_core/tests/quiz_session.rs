use std::time::Duration;
use tidykit_core::{QuizConfig, QuizError, QuizEvent, QuizQuestion, QuizSession};

fn question(id: &str, correct: &str) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        question: format!("question {id}"),
        emoji: "?".to_string(),
        options: vec![correct.to_string(), "wrong".to_string()],
        correct_answer: correct.to_string(),
    }
}

fn session(questions: Vec<QuizQuestion>) -> QuizSession {
    QuizSession::on_current_runtime(questions, QuizConfig::default()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn answer_scores_and_advances_after_delay() {
    let mut quiz = session(vec![question("1", "Seoul"), question("2", "Tokyo")]);

    assert!(quiz.check_answer("Seoul").unwrap());
    let snapshot = quiz.snapshot();
    assert_eq!(snapshot.score, 1);
    assert!(snapshot.show_feedback);
    assert!(snapshot.is_correct);
    assert_eq!(snapshot.selected_answer.as_deref(), Some("Seoul"));

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(quiz.snapshot().current_index, 0);

    tokio::time::sleep(Duration::from_millis(600)).await;
    let snapshot = quiz.snapshot();
    assert_eq!(snapshot.current_index, 1);
    assert!(!snapshot.show_feedback);
    assert_eq!(snapshot.selected_answer, None);
    assert_eq!(snapshot.current_question.unwrap().id, "2");
}

#[tokio::test(start_paused = true)]
async fn last_answer_shows_results() {
    let mut quiz = session(vec![question("1", "Seoul")]);
    let mut rx = quiz.subscribe();

    assert!(!quiz.check_answer("wrong").unwrap());
    tokio::time::sleep(Duration::from_secs(2)).await;

    let snapshot = quiz.snapshot();
    assert!(snapshot.showing_results);
    assert_eq!(snapshot.score, 0);
    assert_eq!(quiz.check_answer("Seoul"), Err(QuizError::Finished));

    assert_eq!(
        rx.recv().await.unwrap(),
        QuizEvent::Answered {
            question_id: "1".to_string(),
            is_correct: false
        }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        QuizEvent::Finished { score: 0, total: 1 }
    );
}

#[tokio::test(start_paused = true)]
async fn second_answer_during_feedback_is_rejected() {
    let mut quiz = session(vec![question("1", "a"), question("2", "b"), question("3", "c")]);

    quiz.check_answer("a").unwrap();
    assert!(quiz.is_advance_pending());
    assert_eq!(quiz.check_answer("a"), Err(QuizError::AdvancePending));

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = quiz.snapshot();
    assert_eq!(snapshot.current_index, 1);
    assert_eq!(snapshot.score, 1);
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_pending_advance() {
    let mut quiz = session(vec![question("1", "a"), question("2", "b")]);

    quiz.check_answer("a").unwrap();
    quiz.reset();
    tokio::time::sleep(Duration::from_secs(3)).await;

    let snapshot = quiz.snapshot();
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(snapshot.score, 0);
    assert!(!snapshot.show_feedback);
    assert!(!snapshot.showing_results);
}

#[tokio::test(start_paused = true)]
async fn dropping_session_cancels_pending_advance() {
    let mut quiz = session(vec![question("1", "a"), question("2", "b")]);
    let mut rx = quiz.subscribe();

    quiz.check_answer("a").unwrap();
    drop(quiz);
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(matches!(rx.recv().await, Ok(QuizEvent::Answered { .. })));
    assert!(rx.recv().await.is_err());
}

#[tokio::test]
async fn empty_question_list_rejects_answers() {
    let mut quiz = session(Vec::new());
    assert_eq!(quiz.snapshot().current_question, None);
    assert_eq!(quiz.check_answer("anything"), Err(QuizError::NoQuestions));
}

#[test]
fn construction_outside_runtime_is_an_error() {
    let result = QuizSession::on_current_runtime(vec![question("1", "a")], QuizConfig::default());
    assert!(matches!(result, Err(QuizError::NoRuntime)));
}

#[tokio::test(start_paused = true)]
async fn custom_delay_is_honoured() {
    let config = QuizConfig {
        advance_delay: Duration::from_millis(200),
    };
    let mut quiz = QuizSession::on_current_runtime(vec![question("1", "a"), question("2", "b")], config)
        .unwrap();

    quiz.check_answer("b").unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(quiz.snapshot().current_index, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reset_wins_against_an_advance_that_already_slept() {
    let config = QuizConfig {
        advance_delay: Duration::ZERO,
    };
    for _ in 0..2000 {
        let mut quiz = QuizSession::on_current_runtime(
            vec![question("1", "a"), question("2", "b")],
            config,
        )
        .unwrap();

        quiz.check_answer("a").unwrap();
        quiz.reset();
        tokio::time::sleep(Duration::from_micros(50)).await;

        let snapshot = quiz.snapshot();
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.score, 0);
        assert!(!snapshot.show_feedback);
    }
}
