//! GET /ui — minimal embedded browser client, no external assets.

use axum::response::Html;

pub async fn ui() -> Html<&'static str> {
    Html(include_str!("../../static/ui.html"))
}
