use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use crate::{
    SessionStore, assets, auth, cash, days, employees, ledger_codes, reports, transactions, users,
};
use engine::Engine;

/// Runtime knobs of the HTTP server.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub bind: SocketAddr,
    /// Zone used to decide which calendar date is "today".
    pub timezone: Tz,
    pub session_ttl: Duration,
    /// Upper bound for `GET /cash/watch`.
    pub watch_timeout: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            timezone: Tz::UTC,
            session_ttl: Duration::from_secs(8 * 60 * 60),
            watch_timeout: Duration::from_secs(25),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub sessions: SessionStore,
    pub timezone: Tz,
    pub watch_timeout: Duration,
}

impl ServerState {
    pub fn new(engine: Arc<Engine>, options: &ServerOptions) -> Self {
        Self {
            engine,
            sessions: SessionStore::new(options.session_ttl),
            timezone: options.timezone,
            watch_timeout: options.watch_timeout,
        }
    }

    /// Today's calendar date in the configured zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// Bearer token of the current request, kept for `/logout`.
#[derive(Clone, Debug)]
pub struct AuthToken(pub String);

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(Authorization(bearer))) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let token = bearer.token().to_string();

    let Some(session) = state.sessions.touch(&token).await else {
        tracing::debug!("rejected unknown or expired token");
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(session);
    request.extensions_mut().insert(AuthToken(token));
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route("/users/{id}/password", post(users::set_password))
        .route(
            "/ledger-codes",
            get(ledger_codes::list).post(ledger_codes::create),
        )
        .route(
            "/ledger-codes/{id}",
            get(ledger_codes::get)
                .patch(ledger_codes::update)
                .delete(ledger_codes::delete),
        )
        .route("/employees", get(employees::list).post(employees::create))
        .route(
            "/employees/{id}",
            get(employees::get)
                .patch(employees::update)
                .delete(employees::delete),
        )
        .route("/days/{date}", get(days::open))
        .route("/days/{date}/previous-balance", get(days::previous_balance))
        .route("/days/{date}/save", post(days::save))
        .route("/days/{date}/lock", get(days::lock))
        .route("/transactions/search", post(transactions::search))
        .route(
            "/transactions/{id}",
            get(transactions::get).delete(transactions::delete),
        )
        .route("/reports/monthly/{year}/{month}", get(reports::monthly))
        .route("/bikes", get(assets::list_bikes).post(assets::create_bike))
        .route(
            "/bikes/{id}",
            get(assets::get_bike)
                .put(assets::update_bike)
                .delete(assets::delete_bike),
        )
        .route(
            "/vehicles",
            get(assets::list_vehicles).post(assets::create_vehicle),
        )
        .route(
            "/vehicles/{id}",
            get(assets::get_vehicle)
                .put(assets::update_vehicle)
                .delete(assets::delete_vehicle),
        )
        .route(
            "/installations",
            get(assets::list_installations).post(assets::create_installation),
        )
        .route(
            "/installations/{id}",
            get(assets::get_installation)
                .put(assets::update_installation)
                .delete(assets::delete_installation),
        )
        .route(
            "/agristore",
            get(assets::list_agristore).post(assets::create_agristore),
        )
        .route(
            "/agristore/{id}",
            get(assets::get_agristore)
                .put(assets::update_agristore)
                .delete(assets::delete_agristore),
        )
        .route("/cash", get(cash::get).put(cash::set))
        .route("/cash/watch", get(cash::watch))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/login", post(auth::login))
        .with_state(state)
}

pub async fn run(engine: Engine, options: ServerOptions) {
    let listener = match tokio::net::TcpListener::bind(options.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, options, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {} (timezone {})", addr, options.timezone);

    let state = ServerState::new(Arc::new(engine), &options);
    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, options, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
