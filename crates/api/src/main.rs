use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zonescan_core::ingest::collect::{collect_universe, CollectOptions};
use zonescan_core::ingest::provider::{BarProvider, HttpChartProvider};
use zonescan_core::screen::{refresh, Screen};
use zonescan_core::universe::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = zonescan_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let provider: Arc<dyn BarProvider> = Arc::new(HttpChartProvider::from_settings(&settings)?);
    let instruments = zonescan_core::universe::instruments(settings.universe_symbols.as_deref());
    let state = AppState::default();

    tokio::spawn(refresh_loop(
        state.clone(),
        provider,
        instruments,
        CollectOptions::from_settings(&settings),
        Duration::from_secs(settings.refresh_secs),
    ));

    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, refresh_secs = settings.refresh_secs, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/screen", get(get_screen))
        .route("/screen/zones", get(get_zones))
        .route("/screen/breadth", get(get_breadth))
        .route("/screen/snapshots/:symbol", get(get_snapshot))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Latest completed screen. Replaced wholesale on every refresh.
#[derive(Debug, Clone, Default)]
struct AppState {
    screen: Arc<RwLock<Option<Arc<Screen>>>>,
}

impl AppState {
    async fn current(&self) -> Result<Arc<Screen>, StatusCode> {
        self.screen
            .read()
            .await
            .clone()
            .ok_or(StatusCode::SERVICE_UNAVAILABLE)
    }

    async fn publish(&self, screen: Screen) {
        *self.screen.write().await = Some(Arc::new(screen));
    }
}

async fn refresh_loop(
    state: AppState,
    provider: Arc<dyn BarProvider>,
    instruments: Vec<Instrument>,
    opts: CollectOptions,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let inputs = collect_universe(provider.as_ref(), &instruments, opts).await;
        if inputs.is_empty() {
            let err = anyhow::anyhow!(
                "no bar series collected from {} for {} instruments",
                provider.provider_name(),
                instruments.len()
            );
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "refresh skipped; keeping previous screen");
            continue;
        }

        let previous = state.screen.read().await.clone();
        let next = refresh(previous.as_deref(), inputs);
        state.publish(next).await;
    }
}

async fn get_screen(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let screen = state.current().await?;
    Ok(Json(&*screen).into_response())
}

async fn get_zones(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let screen = state.current().await?;
    Ok(Json(&screen.zones()).into_response())
}

async fn get_breadth(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let screen = state.current().await?;
    Ok(Json(screen.breadth()).into_response())
}

async fn get_snapshot(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Response, StatusCode> {
    let screen = state.current().await?;
    let snapshot = screen.snapshot(&symbol).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(snapshot).into_response())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &zonescan_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonescan_core::domain::bar::{Bar, BarSeries};
    use zonescan_core::screen::InstrumentSeries;

    fn input(symbol: &str, closes: impl IntoIterator<Item = f64>) -> InstrumentSeries {
        let bars = closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| Bar {
                timestamp: 1_748_835_900 + i as i64 * 86_400,
                open: None,
                high: close + 0.5,
                low: close - 0.5,
                close,
            })
            .collect();
        InstrumentSeries {
            instrument: Instrument::new(symbol),
            series: BarSeries::try_new(bars).unwrap(),
        }
    }

    fn rising_input(symbol: &str) -> InstrumentSeries {
        input(symbol, (0..120).map(|i| 100.0 + i as f64))
    }

    /// Uptrend into a tight 197/201 chop, closing at 200: above SMA-10/20/50 with CCI near 36.
    fn pullback_input(symbol: &str) -> InstrumentSeries {
        let rise = (0..100).map(|i| 100.0 + i as f64);
        let chop = (0..20).map(|j| if j % 2 == 0 { 201.0 } else { 197.0 });
        input(symbol, rise.chain(chop).chain([200.0]))
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unavailable_until_first_refresh() {
        let state = AppState::default();
        assert_eq!(
            state.current().await.unwrap_err(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        let res = get_breadth(State(state)).await;
        assert_eq!(res.unwrap_err(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn serves_published_screen() {
        let state = AppState::default();
        state.publish(refresh(None, vec![rising_input("TCS.NS")])).await;

        let screen = state.current().await.unwrap();
        assert_eq!(screen.generation, 1);

        let res = get_snapshot(State(state.clone()), Path("TCS".to_string()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let missing = get_snapshot(State(state), Path("INFY".to_string())).await;
        assert_eq!(missing.unwrap_err(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn zones_report_supertrend_distance_for_buy_candidates() {
        let state = AppState::default();
        state
            .publish(refresh(None, vec![pullback_input("TCS.NS"), rising_input("ITC.NS")]))
            .await;

        let v = body_json(get_zones(State(state)).await.unwrap()).await;
        let buy = v["buyZone"].as_array().unwrap();
        assert_eq!(buy.len(), 1);
        assert_eq!(buy[0]["symbol"], "TCS.NS");
        assert_eq!(buy[0]["supertrendTrend"], "up");

        let price = buy[0]["currentPrice"].as_f64().unwrap();
        let line = buy[0]["supertrend"].as_f64().unwrap();
        let distance = buy[0]["supertrendDistance"].as_f64().unwrap();
        assert!(distance > 0.0);
        assert!((distance - (price - line) / line * 100.0).abs() < 1e-9);

        assert_eq!(v["sellZone"][0]["symbol"], "ITC.NS");
        assert!(v["sellZone"][0].get("supertrendDistance").is_none());
    }
}
