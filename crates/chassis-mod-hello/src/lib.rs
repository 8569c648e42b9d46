use chassis_core::mediator::Mediator;
use chassis_core::module::Module;

/// A minimal greeting module.
///
/// Subscribes to the `greeting` channel on startup and logs every payload
/// it receives. Serves as the reference implementation for the [`Module`]
/// trait: hold a mediator handle, wire subscriptions in `initialize`, say
/// goodbye in `destroy`.
pub struct HelloModule {
    mediator: Mediator,
}

impl HelloModule {
    /// Create a new `HelloModule` bound to the shared bus.
    pub fn new(mediator: &Mediator) -> Self {
        Self {
            mediator: mediator.handle(),
        }
    }
}

impl Module for HelloModule {
    fn initialize(&mut self) {
        self.mediator.subscribe("greeting", |payload| {
            tracing::info!("greeting received: {}", payload);
        });
    }

    fn destroy(&mut self) {
        tracing::info!("hello module shutting down");
    }
}
