//! Mock construction helpers

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::JoinHandle;

use mockall::mock;
use trafficvis_rs::backend::{BackendBridge, BackendWorker, MockTrafficSource, TrafficSource};
use trafficvis_rs::error::Result;
use trafficvis_rs::types::{RegistryMap, TrafficMap};

mock! {
    pub Source {}

    impl TrafficSource for Source {
        fn name(&self) -> &str;
        fn connect(&mut self) -> Result<()>;
        fn disconnect(&mut self);
        fn is_connected(&self) -> bool;
        fn fetch_traffic(&mut self) -> Result<TrafficMap>;
        fn fetch_registry(&mut self) -> Result<RegistryMap>;
    }
}

/// A mock source that is already connected and tolerates disconnects
pub fn connected_mock(name: &str) -> MockSource {
    let mut source = MockSource::new();
    source.expect_name().return_const(name.to_string());
    source.expect_is_connected().return_const(true);
    source.expect_connect().returning(|| Ok(()));
    source.expect_disconnect().return_const(());
    source
}

/// Synthetic source with a fixed seed
pub fn seeded_mock_source() -> MockTrafficSource {
    MockTrafficSource::new().with_seed(42)
}

/// Spawn a worker thread for `source`, returning the UI side of the bridge
pub fn spawn_worker(
    source: Box<dyn TrafficSource>,
    poll_interval_ms: u64,
) -> (BackendBridge, Arc<AtomicBool>, JoinHandle<()>) {
    let (bridge, cmd_rx, msg_tx) = BackendBridge::new();
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    let handle = std::thread::spawn(move || {
        BackendWorker::new(source, poll_interval_ms, cmd_rx, msg_tx, running_clone).run();
    });
    (bridge, running, handle)
}
