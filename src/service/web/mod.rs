//! Web form for the advisor.
//!
//! - `GET /` draws the page, optionally with `?brand=` selecting dataset rows.
//! - `POST /ask` handles one submission and draws the page with its outcome.

pub mod page;

use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::{
    base::types::{Res, Void},
    interaction::submission::handle_submission,
    runtime::Runtime,
};

use page::{PageRenderer, PageView};

/// Query string for `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub brand: Option<String>,
}

/// Form body for `POST /ask`.
#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
    pub brand: Option<String>,
}

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub runtime: Runtime,
    pub pages: PageRenderer,
}

/// Builds the router over a shared runtime.
pub fn router(runtime: Runtime) -> Res<Router> {
    let state = AppState {
        runtime,
        pages: PageRenderer::new()?,
    };

    Ok(Router::new().route("/", get(show_page)).route("/ask", post(ask)).with_state(state))
}

/// Binds the configured address and serves until Ctrl-C.
#[instrument(skip_all)]
pub async fn serve(runtime: Runtime) -> Void {
    let listener = TcpListener::bind(&runtime.config.listen_address).await?;

    info!("Advisor listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(runtime)?)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down ...");
        })
        .await?;

    Ok(())
}

async fn show_page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Html<String>, StatusCode> {
    respond(
        &state.pages,
        &PageView {
            question: "",
            outcome: None,
            dataset: state.runtime.dataset.as_ref(),
            brand: selected_brand(query.brand.as_deref()),
        },
    )
}

#[instrument(skip_all)]
async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Result<Html<String>, StatusCode> {
    let outcome = handle_submission(&state.runtime, &form.question).await;

    respond(
        &state.pages,
        &PageView {
            question: &form.question,
            outcome: Some(&outcome),
            dataset: state.runtime.dataset.as_ref(),
            brand: selected_brand(form.brand.as_deref()),
        },
    )
}

fn respond(pages: &PageRenderer, view: &PageView<'_>) -> Result<Html<String>, StatusCode> {
    pages.render(view).map(Html).map_err(|err| {
        error!("Error while rendering the page: {err:#}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// An empty selection means "all brands".
fn selected_brand(brand: Option<&str>) -> Option<&str> {
    brand.map(str::trim).filter(|b| !b.is_empty())
}
