//! System-telemetry module.
//!
//! Samples CPU, memory, swap, and self-process metrics through an
//! interval-gated [`sysinfo`] collector and publishes each snapshot on the
//! `telemetry` channel. Re-samples whenever a `tick` event arrives on the
//! bus.

pub mod format;
pub mod telemetry;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chassis_core::mediator::Mediator;
use chassis_core::module::Module;

use crate::format::{format_bytes, format_percent};
use crate::telemetry::TelemetryCollector;

/// Publishes system metrics on the `telemetry` channel.
pub struct SysmonModule {
    mediator: Mediator,
    collector: Rc<RefCell<TelemetryCollector>>,
}

impl SysmonModule {
    /// Create a module with the default 1-second sampling interval.
    pub fn new(mediator: &Mediator) -> Self {
        Self::with_interval(mediator, Duration::from_secs(1))
    }

    /// Create a module with a custom sampling interval.
    pub fn with_interval(mediator: &Mediator, interval: Duration) -> Self {
        Self {
            mediator: mediator.handle(),
            collector: Rc::new(RefCell::new(TelemetryCollector::with_interval(interval))),
        }
    }
}

/// Refresh the collector and, if a sample was taken, publish it.
fn publish_sample(mediator: &Mediator, collector: &Rc<RefCell<TelemetryCollector>>, now: Instant) {
    if !collector.borrow_mut().maybe_refresh(now) {
        return;
    }

    let payload = {
        let collector = collector.borrow();
        let snapshot = collector.snapshot();
        tracing::debug!(
            "telemetry: cpu {} mem {}/{}",
            format_percent(snapshot.cpu_global),
            format_bytes(snapshot.mem_used),
            format_bytes(snapshot.mem_total),
        );
        serde_json::to_value(snapshot)
    };

    match payload {
        Ok(payload) => {
            mediator.publish("telemetry", payload);
        }
        Err(err) => tracing::warn!("failed to serialize telemetry snapshot: {}", err),
    }
}

impl Module for SysmonModule {
    fn initialize(&mut self) {
        let mediator = self.mediator.handle();
        let collector = self.collector.clone();
        self.mediator.subscribe("tick", move |_| {
            publish_sample(&mediator, &collector, Instant::now());
        });

        // Publish a first sample right away so subscribers do not have to
        // wait for the first tick.
        publish_sample(&self.mediator, &self.collector, Instant::now());
    }

    fn destroy(&mut self) {
        tracing::info!("sysmon module shutting down");
    }
}
