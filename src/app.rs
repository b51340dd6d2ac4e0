use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tokio::net::TcpListener;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::downloader;
use crate::generator::Generator;
use crate::grid::Grid;
use crate::store::{RecordStore, open_store};
use crate::table::Column;
use crate::viewport::Viewport;

/// Shared state behind every handler
pub struct AppState {
    grid: Mutex<Grid>,
    store: Box<dyn RecordStore>,
    clock: Box<dyn Clock>,
    generator: Generator,
    viewport: Viewport,
}

impl AppState {
    /// Build the state, loading records from `store` (or generating them).
    pub fn new(
        store: Box<dyn RecordStore>,
        clock: Box<dyn Clock>,
        generator: Generator,
        viewport: Viewport,
    ) -> Self {
        let grid = Grid::load_or_generate(store.as_ref(), &generator, clock.as_ref());
        AppState {
            grid: Mutex::new(grid),
            store,
            clock,
            generator,
            viewport,
        }
    }

    fn grid(&self) -> MutexGuard<'_, Grid> {
        self.grid
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Deserialize)]
struct RowsQuery {
    scroll_top: Option<u64>,
    height: Option<u32>,
}

#[derive(Deserialize)]
struct SortRequest {
    column: String,
}

#[derive(Deserialize)]
struct MoveRequest {
    from: String,
    to: String,
}

#[derive(Serialize)]
struct MoveResponse<'a> {
    moved: bool,
    columns: &'a [Column],
}

#[derive(Serialize)]
struct RegenerateResponse {
    total: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: String,
}

fn bad_request(message: impl ToString) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            status: "error".to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_grid))
        .route("/api/rows", get(get_rows))
        .route("/api/sort", post(toggle_sort))
        .route("/api/columns", post(move_column))
        .route("/api/regenerate", post(regenerate))
        .route("/api/export.csv", get(export_csv))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config.store)?;
    let app_state = Arc::new(AppState::new(
        store,
        Box::new(SystemClock),
        config.generator(),
        config.viewport(),
    ));

    let app = router(app_state);

    let listener = TcpListener::bind(&config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    info!(
        "{} {} -> {} in {:?}",
        method,
        uri,
        response.status(),
        started.elapsed()
    );
    response
}

async fn serve_grid() -> Html<&'static str> {
    Html(include_str!("./static/grid.html"))
}

async fn get_rows(
    Query(params): Query<RowsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let viewport = match params.height {
        Some(height) => state.viewport.with_height(height),
        None => state.viewport,
    };

    let grid = state.grid();
    let page = grid.render(
        state.clock.as_ref(),
        &viewport,
        params.scroll_top.unwrap_or(0),
    );
    Json(page).into_response()
}

async fn toggle_sort(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SortRequest>,
) -> Response {
    let column: Column = match payload.column.parse() {
        Ok(column) => column,
        Err(e) => return bad_request(e),
    };

    let sort = state.grid().toggle_sort(column);
    Json(sort).into_response()
}

async fn move_column(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MoveRequest>,
) -> Response {
    let (from, to) = match (payload.from.parse::<Column>(), payload.to.parse::<Column>()) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(e), _) | (_, Err(e)) => return bad_request(e),
    };

    let mut grid = state.grid();
    let moved = grid.move_column(from, to);
    Json(MoveResponse {
        moved,
        columns: grid.columns(),
    })
    .into_response()
}

async fn regenerate(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let total = state.grid().regenerate(
        state.store.as_ref(),
        &state.generator,
        state.clock.as_ref(),
    );
    Json(RegenerateResponse { total })
}

async fn export_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let grid = state.grid();
    let rows = grid.rows_in_view_order(state.clock.as_ref());
    let csv = downloader::to_csv(&rows, grid.columns());

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"users.csv\"",
            ),
        ],
        csv,
    )
}

