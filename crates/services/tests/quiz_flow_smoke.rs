//! Whole-flow exercise of taking a quiz: load, hydrate, answer, navigate,
//! with only the HTTP transport scripted.

mod support;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::json;

use quizdesk_core::model::{OptionId, QuizId};
use services::error::{ApiError, QuizTakeError};
use services::{NavIntent, QuizService, QuizTakingService};
use support::{ScriptedTransport, scripted_client};

fn session_body() -> serde_json::Value {
    json!({
        "id": 42,
        "title": "Weekly drill",
        "questions": [
            {
                "id": 1,
                "title": "First",
                "answer_options": [
                    { "id": 5, "content": "a", "sort_order": 1 },
                    { "id": 6, "content": "b", "sort_order": 2 },
                ],
            },
            {
                "id": 2,
                "title": "Second",
                "answer_options": [
                    { "id": 7, "content": "a", "sort_order": 1 },
                    { "id": 8, "content": "b", "sort_order": 2 },
                ],
            },
            {
                "id": 3,
                "title": "Third",
                "answer_options": [
                    { "id": 9, "content": "a", "sort_order": 1 },
                    { "id": 10, "content": "b", "sort_order": 2 },
                ],
            },
        ],
    })
}

fn not_found() -> serde_json::Value {
    json!({ "detail": "Not found." })
}

#[tokio::test]
async fn answer_and_advance_through_a_fresh_session() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, session_body());
    // Hydration: nothing saved yet for any of the three positions.
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());
    // Saving position 2: existence probe, then create.
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(
        StatusCode::CREATED,
        json!({
            "question_order": 2,
            "options": [
                { "id": 7, "is_selected": true },
                { "id": 8, "is_selected": false },
            ],
        }),
    );

    let api = scripted_client(transport.clone());
    let taking = QuizTakingService::new(Arc::new(QuizService::new(api)));

    let mut nav = taking.load_session(QuizId::new(42), None).await.unwrap();
    assert_eq!(nav.total(), 3);
    assert_eq!(nav.current_index(), 1);
    assert!(nav.items().all(|item| !item.answered()));

    assert!(nav.select(2));
    let outcome = taking
        .answer_current(&mut nav, vec![OptionId::new(7)], NavIntent::Next)
        .await
        .unwrap();

    assert_eq!(outcome.index, 2);
    assert_eq!(outcome.current_index, 3);
    assert_eq!(nav.current_index(), 3);

    let item = nav.item(2).unwrap();
    assert!(item.answered());
    assert_eq!(item.selected_option_ids(), &[OptionId::new(7)]);

    let progress = nav.progress();
    assert_eq!(progress.answered, 1);
    assert!(!progress.is_complete());

    // Exactly one create went over the wire, with the submitted selection.
    let calls = transport.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[5].method, Method::POST);
    assert!(calls[5].url.as_str().ends_with("quiz/42/attempt/2/"));
    assert_eq!(calls[5].body, Some(json!({ "selected_option_ids": [7] })));
}

#[tokio::test]
async fn resuming_hydrates_saved_answers() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, session_body());
    transport.push(
        StatusCode::OK,
        json!({
            "question_order": 1,
            "options": [
                { "id": 5, "is_selected": false },
                { "id": 6, "is_selected": true },
            ],
        }),
    );
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());

    let api = scripted_client(transport.clone());
    let taking = QuizTakingService::new(Arc::new(QuizService::new(api)));

    let nav = taking.load_session(QuizId::new(42), Some(2)).await.unwrap();
    assert_eq!(nav.current_index(), 2);

    let first = nav.item(1).unwrap();
    assert!(first.answered());
    assert_eq!(first.selected_option_ids(), &[OptionId::new(6)]);
    assert!(!first.flagged());
    assert!(!nav.item(2).unwrap().answered());
}

#[tokio::test]
async fn hydration_failures_are_skipped_per_question() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, session_body());
    transport.push(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    transport.push(
        StatusCode::OK,
        json!({
            "question_order": 2,
            "options": [{ "id": 7, "is_selected": true }],
        }),
    );
    transport.push(StatusCode::NOT_FOUND, not_found());

    let api = scripted_client(transport.clone());
    let taking = QuizTakingService::new(Arc::new(QuizService::new(api)));

    let nav = taking.load_session(QuizId::new(42), None).await.unwrap();

    // Position 1 failed to hydrate and stays fresh; position 2 still loaded.
    assert!(!nav.item(1).unwrap().answered());
    assert!(nav.item(2).unwrap().answered());
}

#[tokio::test]
async fn failed_save_leaves_item_and_pointer_untouched() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, session_body());
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::INTERNAL_SERVER_ERROR, json!({}));

    let api = scripted_client(transport.clone());
    let taking = QuizTakingService::new(Arc::new(QuizService::new(api)));

    let mut nav = taking.load_session(QuizId::new(42), None).await.unwrap();
    let err = taking
        .answer_current(&mut nav, vec![OptionId::new(5)], NavIntent::Next)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QuizTakeError::Api(ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            ..
        })
    ));
    assert_eq!(nav.current_index(), 1);
    assert!(!nav.item(1).unwrap().answered());
}

#[tokio::test]
async fn closed_session_rejects_answers_locally() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut body = session_body();
    body["is_closed"] = json!(true);
    transport.push(StatusCode::OK, body);
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());

    let api = scripted_client(transport.clone());
    let taking = QuizTakingService::new(Arc::new(QuizService::new(api)));

    let mut nav = taking.load_session(QuizId::new(42), None).await.unwrap();
    let err = taking
        .answer_current(&mut nav, vec![OptionId::new(5)], NavIntent::Next)
        .await
        .unwrap_err();

    assert!(matches!(err, QuizTakeError::Closed));
    // The refusal happened before any save reached the wire.
    assert_eq!(transport.calls().len(), 4);
    assert!(!nav.item(1).unwrap().answered());
    assert_eq!(nav.current_index(), 1);
}

#[tokio::test]
async fn saving_again_updates_the_existing_attempt() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push(StatusCode::OK, session_body());
    // Position 1 already has a saved answer.
    transport.push(
        StatusCode::OK,
        json!({
            "question_order": 1,
            "options": [{ "id": 5, "is_selected": true }],
        }),
    );
    transport.push(StatusCode::NOT_FOUND, not_found());
    transport.push(StatusCode::NOT_FOUND, not_found());
    // Re-saving: the existence probe finds it, so an update follows.
    transport.push(
        StatusCode::OK,
        json!({
            "question_order": 1,
            "options": [{ "id": 5, "is_selected": true }],
        }),
    );
    transport.push(
        StatusCode::OK,
        json!({
            "question_order": 1,
            "options": [
                { "id": 5, "is_selected": false },
                { "id": 6, "is_selected": true },
            ],
        }),
    );

    let api = scripted_client(transport.clone());
    let taking = QuizTakingService::new(Arc::new(QuizService::new(api)));

    let mut nav = taking.load_session(QuizId::new(42), None).await.unwrap();
    taking
        .answer_current(&mut nav, vec![OptionId::new(6)], NavIntent::Stay)
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls[5].method, Method::PUT);
    assert!(calls[5].url.as_str().ends_with("quiz/42/attempt/1/"));
    assert_eq!(
        nav.item(1).unwrap().selected_option_ids(),
        &[OptionId::new(6)]
    );
    assert_eq!(nav.current_index(), 1);
}
