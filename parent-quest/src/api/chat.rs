use tracing::info;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::agents::pipeline::handle_turn;
use crate::error::ApiError;
use crate::models::{SessionResponse, TurnRequest, TurnResponse};
use crate::state::AppState;

pub async fn handle_create_session(state: AppState) -> Result<impl Reply, Rejection> {
    let (session_id, conversation) = state.sessions.create().await;
    info!("Created session {}", session_id);

    let turns = conversation.lock().await.turns().to_vec();
    Ok(warp::reply::with_status(
        warp::reply::json(&SessionResponse { session_id, turns }),
        StatusCode::CREATED,
    ))
}

pub async fn handle_get_session(
    session_id: Uuid,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let conversation = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| warp::reject::custom(ApiError::NotFound(session_id.to_string())))?;

    let turns = conversation.lock().await.turns().to_vec();
    Ok(warp::reply::json(&SessionResponse { session_id, turns }))
}

pub async fn handle_submit_turn(
    session_id: Uuid,
    request: TurnRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let conversation = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| warp::reject::custom(ApiError::NotFound(session_id.to_string())))?;

    info!("Processing turn for session [{}]", session_id);

    // Held for the whole turn so submissions on one session never interleave.
    let mut conversation = conversation.lock().await;
    let outcome = handle_turn(
        &mut conversation,
        &request.prompt,
        state.retriever.as_ref(),
        state.scorer.as_ref(),
    )
    .await;

    state.metrics.turns.inc();
    if outcome.errored {
        state.metrics.retrieval_failures.inc();
    } else if !outcome.scored && outcome.notice.is_some() {
        state.metrics.scoring_failures.inc();
    }

    Ok(warp::reply::json(&TurnResponse {
        session_id,
        errored: outcome.errored,
        notice: outcome.notice,
        turns: conversation.turns().to_vec(),
    }))
}
