use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::pipeline::FramePipeline;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<FramePipeline>,
    config: Arc<Config>,
    shutdown_tx: broadcast::Sender<()>,
    started_at: Instant,
    socket_connections: Arc<AtomicUsize>,
}

/// Holds one socket connection slot; released on drop.
pub struct ConnectionSlot {
    counter: Arc<AtomicUsize>,
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AppState {
    pub fn new(
        pipeline: Arc<FramePipeline>,
        config: &Config,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Self {
        Self {
            pipeline,
            config: Arc::new(config.clone()),
            shutdown_tx,
            started_at: Instant::now(),
            socket_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn pipeline(&self) -> &Arc<FramePipeline> {
        &self.pipeline
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shutdown_rx(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn socket_connections(&self) -> usize {
        self.socket_connections.load(Ordering::SeqCst)
    }

    /// Reserves a socket slot, or `None` once `max_socket_connections` is reached.
    pub fn try_acquire_socket(&self) -> Option<ConnectionSlot> {
        let max = self.config.limits.max_socket_connections;
        let current = self.socket_connections.fetch_add(1, Ordering::SeqCst);
        if current >= max {
            self.socket_connections.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        Some(ConnectionSlot {
            counter: self.socket_connections.clone(),
        })
    }
}
