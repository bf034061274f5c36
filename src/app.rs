/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (/api の Bearer 認証, CORS, request id/trace/上限)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api::{self, handlers::health::health},
    config::Config,
    middleware,
    services::supabase::{SupabaseClient, SupabaseError},
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG があればそれを優先。なければデフォルト
    // Ex:
    // RUST_LOG=info,bookshelf_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // 既存の default hook を保持（stderr に location/payload を出す）
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // tracing で必ず出す（起動方法によっては stderr が見えないため）
        tracing::error!(?info, "panic");

        // 開発: プロセスごと落として気付けるようにする
        // 本番: default の挙動（サーバーは動き続ける）
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()
        .inspect_err(|err| tracing::error!(error = %err, "refusing to start"))?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState, SupabaseError> {
    // プロセス共通の client。リクエスト毎の UserClient は handler でここから作る
    let supabase = SupabaseClient::new(&config.supabase_url, &config.supabase_anon_key)?;

    Ok(AppState::new(supabase))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
