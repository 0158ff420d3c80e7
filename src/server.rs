//! Web server module for appshelf.
//!
//! Serves the public catalog page, the basic-auth admin panel for managing
//! catalog entries, the JSON API with click tracking, and the crawler
//! surface (sitemap, robots) plus static assets. Handlers call straight into
//! the query layer; shared state is the SQLite pool and the read-only config.
//!
use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tera::Context;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{
    crud,
    models::{App, NewApp},
    pool::create_pool,
};
use crate::render::render_or_empty;
use crate::seed::seed_apps;

/// Shared per-request state: the pool is internally clonable, the config is
/// read-only after startup.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) db: sqlx::SqlitePool,
    pub(crate) config: Arc<Config>,
}

/// Open the database, seed the catalog if empty, and serve until shutdown.
/// A database that cannot be opened or migrated aborts startup.
pub(crate) async fn run(config: Config) -> anyhow::Result<()> {
    let db = create_pool(&config.db).await.context("open database")?;
    seed_apps(&db).await;

    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let addr = format!("0.0.0.0:{}", state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, hostname = %state.config.hostname, "starting server");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Build the full application router. Used by `run` and by the tests.
pub(crate) fn app(state: AppState) -> Router {
    let admin = Router::new()
        .route("/admin", get(admin_page))
        .route("/admin/new", get(admin_new_page))
        .route("/admin/edit/{id}", get(admin_edit_page))
        .route("/admin/save", post(admin_save))
        .route("/admin/delete/{id}", post(admin_delete))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(index_page))
        .route("/impressum", get(impressum_page))
        .route("/datenschutz", get(datenschutz_page))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .route("/api/apps", get(api_apps))
        .route("/api/click/{id}", post(api_click))
        .merge(admin)
        .nest_service("/static", ServeDir::new(state.config.static_dir.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Basic-auth gate for the admin routes. Credentials are compared in
/// constant time; an unset admin password locks the panel entirely.
async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if authorized(&state.config, req.headers()) {
        next.run(req).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"Admin\"")],
            "Unauthorized",
        )
            .into_response()
    }
}

fn authorized(config: &Config, headers: &HeaderMap) -> bool {
    let Some(password) = config.admin_password.as_deref() else {
        return false;
    };
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = general_purpose::STANDARD.decode(encoded) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((user, pass)) = decoded.split_once(':') else {
        return false;
    };

    let user_ok = user.as_bytes().ct_eq(config.admin_user.as_bytes());
    let pass_ok = pass.as_bytes().ct_eq(password.as_bytes());
    bool::from(user_ok & pass_ok)
}

/// A read failure on the public pages degrades to an empty catalog.
async fn list_apps_or_empty(state: &AppState) -> Vec<App> {
    match crud::list_apps(&state.db).await {
        Ok(apps) => apps,
        Err(err) => {
            warn!(error = %err, "list apps");
            Vec::new()
        }
    }
}

async fn index_page(State(state): State<AppState>) -> Html<String> {
    let apps = list_apps_or_empty(&state).await;
    let mut ctx = Context::new();
    ctx.insert("hostname", &state.config.hostname);
    ctx.insert("apps", &apps);
    Html(render_or_empty(
        &state.config.templates_dir,
        "index.html",
        &ctx,
    ))
}

/// Flash parameters appended by save/delete redirects.
#[derive(Debug, Deserialize)]
struct AdminFlash {
    saved: Option<String>,
    deleted: Option<String>,
    error: Option<String>,
}

async fn admin_page(State(state): State<AppState>, Query(flash): Query<AdminFlash>) -> Html<String> {
    let apps = list_apps_or_empty(&state).await;
    let mut ctx = Context::new();
    ctx.insert("hostname", &state.config.hostname);
    ctx.insert("apps", &apps);
    if flash.saved.is_some() {
        ctx.insert("success", "App saved.");
    } else if flash.deleted.is_some() {
        ctx.insert("success", "App deleted.");
    }
    match flash.error.as_deref() {
        Some("save") => ctx.insert("error", "Save failed, check the server logs."),
        Some("delete") => ctx.insert("error", "Delete failed, check the server logs."),
        _ => {}
    }
    Html(render_or_empty(
        &state.config.templates_dir,
        "admin.html",
        &ctx,
    ))
}

async fn admin_new_page(State(state): State<AppState>) -> Html<String> {
    edit_form(&state, 0).await
}

async fn admin_edit_page(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let id: i64 = id.parse().unwrap_or(0);
    edit_form(&state, id).await
}

/// Shared by `/admin/new` (id 0, blank form) and `/admin/edit/{id}`. A
/// missing row surfaces as an in-page message, not an HTTP error.
async fn edit_form(state: &AppState, id: i64) -> Html<String> {
    let mut ctx = Context::new();
    ctx.insert("hostname", &state.config.hostname);

    if id > 0 {
        match crud::get_app(&state.db, id).await {
            Ok(Some(app)) => ctx.insert("app", &app),
            Ok(None) => ctx.insert("error", "App not found"),
            Err(err) => {
                warn!(id, error = %err, "get app");
                ctx.insert("error", "App not found");
            }
        }
    }

    Html(render_or_empty(
        &state.config.templates_dir,
        "edit.html",
        &ctx,
    ))
}

/// Admin save form. Everything arrives as strings; numeric fields are parsed
/// leniently (garbage id means create, garbage sort_order means unset).
#[derive(Debug, Deserialize)]
struct SaveForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    sort_order: String,
    #[serde(default)]
    prompt: String,
}

async fn admin_save(State(state): State<AppState>, Form(form): Form<SaveForm>) -> Redirect {
    let id: i64 = form.id.trim().parse().unwrap_or(0);
    let fields = NewApp {
        url: form.url,
        title: form.title,
        description: form.description,
        thumbnail: Some(form.thumbnail),
        sort_order: form.sort_order.trim().parse().ok(),
        prompt: Some(form.prompt),
    };

    let result = if id > 0 {
        crud::update_app(&state.db, id, &fields).await
    } else {
        crud::create_app(&state.db, &fields).await.map(|_| ())
    };

    match result {
        Ok(()) => Redirect::to("/admin?saved=1"),
        Err(err) => {
            warn!(id, error = %err, "save app");
            Redirect::to("/admin?error=save")
        }
    }
}

async fn admin_delete(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let id: i64 = id.parse().unwrap_or(0);
    if id <= 0 {
        return Redirect::to("/admin");
    }
    match crud::delete_app(&state.db, id).await {
        Ok(()) => Redirect::to("/admin?deleted=1"),
        Err(err) => {
            warn!(id, error = %err, "delete app");
            Redirect::to("/admin?error=delete")
        }
    }
}

async fn api_apps(State(state): State<AppState>) -> Response {
    match crud::list_apps(&state.db).await {
        Ok(apps) => Json(apps).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// Click tracking. The one endpoint with strict id validation; an id that
/// parses but matches no row still answers ok.
async fn api_click(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id: i64 = match id.parse() {
        Ok(id) if id > 0 => id,
        _ => return (StatusCode::BAD_REQUEST, "invalid id").into_response(),
    };

    if let Err(err) = crud::increment_click_count(&state.db, id).await {
        warn!(id, error = %err, "increment click");
    }
    Json(serde_json::json!({"ok": true})).into_response()
}

async fn sitemap(State(state): State<AppState>) -> Response {
    let apps = list_apps_or_empty(&state).await;

    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    let _ = write!(
        body,
        "  <url>\n    <loc>https://{}/</loc>\n    <changefreq>weekly</changefreq>\n    <priority>1.0</priority>\n  </url>\n",
        state.config.hostname
    );
    for app in &apps {
        let _ = write!(
            body,
            "  <url>\n    <loc>{}</loc>\n    <changefreq>monthly</changefreq>\n    <priority>0.8</priority>\n  </url>\n",
            app.url
        );
    }
    body.push_str("</urlset>");

    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

async fn robots(State(state): State<AppState>) -> Response {
    let body = format!(
        "User-agent: *\nAllow: /\n\nSitemap: https://{}/sitemap.xml\n",
        state.config.hostname
    );
    ([(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

async fn impressum_page(State(state): State<AppState>) -> Html<String> {
    static_page(&state, "impressum.html")
}

async fn datenschutz_page(State(state): State<AppState>) -> Html<String> {
    static_page(&state, "datenschutz.html")
}

fn static_page(state: &AppState, name: &str) -> Html<String> {
    let mut ctx = Context::new();
    ctx.insert("hostname", &state.config.hostname);
    Html(render_or_empty(&state.config.templates_dir, name, &ctx))
}
