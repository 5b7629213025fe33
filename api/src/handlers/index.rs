use axum::response::Html;

/// Landing page banner
#[tracing::instrument]
pub async fn index() -> Html<&'static str> {
    Html("<h1>Bakery API</h1>")
}
