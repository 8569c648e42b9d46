use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde_json::json;

use chassis_config::AppConfig;
use chassis_core::{logging, registry::App};
use chassis_mod_hello::HelloModule;
use chassis_mod_sysmon::SysmonModule;

const TICK_INTERVAL: Duration = Duration::from_secs(1);
const DEMO_TICKS: u32 = 3;

fn main() -> Result<()> {
    logging::init();

    let config = AppConfig::load()?;
    tracing::info!("chassis starting up");

    let app = App::with_debug(config.debug);
    app.register("hello", |_, mediator| {
        Some(Box::new(HelloModule::new(mediator)))
    })
    .register("sysmon", |_, mediator| {
        Some(Box::new(SysmonModule::new(mediator)))
    });

    // The host is ready: initialize exactly once.
    app.initialize();

    let mediator = app.mediator().handle();
    mediator.publish("greeting", json!({ "message": "hello from the shell" }));

    // Pump a few ticks so the sysmon module gets to sample and publish.
    let started_at = Instant::now();
    for _ in 0..DEMO_TICKS {
        thread::sleep(TICK_INTERVAL);
        mediator.publish(
            "tick",
            json!({ "uptime_seconds": started_at.elapsed().as_secs_f64() }),
        );
    }

    app.destroy();
    tracing::info!("chassis shutting down");
    Ok(())
}
