use warp::{Filter, Rejection, Reply};

use crate::config::ChatStyle;
use crate::state::AppState;

mod chat;
mod ui;

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let api = warp::path("api").and(warp::path("v1"));

    let index_route = warp::path::end()
        .and(warp::get())
        .and(with_style(state.chat_style))
        .and_then(ui::handle_index);

    let create_session_route = api
        .and(warp::path("sessions"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(chat::handle_create_session);

    let get_session_route = api
        .and(warp::path("sessions"))
        .and(warp::path::param())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(chat::handle_get_session);

    let turn_route = api
        .and(warp::path("sessions"))
        .and(warp::path::param())
        .and(warp::path("turns"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(64 * 1024))
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(chat::handle_submit_turn);

    index_route
        .or(create_session_route)
        .or(get_session_route)
        .or(turn_route)
}

fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn with_style(
    style: ChatStyle,
) -> impl Filter<Extract = (ChatStyle,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || style)
}
