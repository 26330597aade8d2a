use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::sync::broadcast;

use hand_gesture_server::config::{Config, DetectorConfig, LimitsConfig};
use hand_gesture_server::detector::{HandDetector, MockDetector};
use hand_gesture_server::gesture::Handedness;
use hand_gesture_server::pipeline::FramePipeline;
use hand_gesture_server::routes::build_router;
use hand_gesture_server::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    pub shutdown_tx: broadcast::Sender<()>,
}

pub fn test_config() -> Config {
    // 直接构造 Config，避免 set_var 造成多线程测试环境变量竞态
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 5000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "*".to_string(),
        target_handedness: Handedness::Right,
        limits: LimitsConfig {
            max_frame_bytes: 4096,
            max_socket_connections: 4,
        },
        detector: DetectorConfig::default(),
    }
}

pub fn spawn_with(config: Config, detector: Arc<dyn HandDetector>) -> TestApp {
    let pipeline = Arc::new(FramePipeline::from_config(&config, detector));
    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(pipeline, &config, shutdown_tx.clone());
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        shutdown_tx,
    }
}

pub fn spawn_with_detector(detector: Arc<dyn HandDetector>) -> TestApp {
    spawn_with(test_config(), detector)
}

pub fn spawn_test_app() -> TestApp {
    spawn_with_detector(Arc::new(MockDetector::new()))
}

/// Serves the app on an ephemeral port, for clients that need a real
/// connection (WebSocket upgrade).
pub async fn serve_on_ephemeral_port(app: &TestApp) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let router = app.app.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}
