use warp::{Rejection, Reply};

use crate::config::ChatStyle;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn render_index(style: ChatStyle) -> String {
    INDEX_HTML.replace("{{CHAT_STYLE}}", style.as_str())
}

pub async fn handle_index(style: ChatStyle) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::html(render_index(style)))
}
