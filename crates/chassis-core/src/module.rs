use std::rc::Rc;

use crate::mediator::Mediator;
use crate::registry::App;

/// A chassis module instance.
///
/// Modules are the extension point of the shell. Each one is produced by a
/// [`ModuleFactory`] registered under a unique name with
/// [`App::register`](crate::registry::App::register) and is driven through
/// its lifecycle by [`App::start`](crate::registry::App::start) and
/// [`App::stop`](crate::registry::App::stop).
///
/// Both hooks default to no-ops; a module overrides the ones it needs.
/// Modules interact with the rest of the application exclusively through
/// the shared [`Mediator`]; there are no direct module-to-module
/// references.
pub trait Module {
    /// Called once, right after the factory produces the instance.
    fn initialize(&mut self) {}

    /// Called once, when the module is stopped.
    fn destroy(&mut self) {}
}

/// Factory invoked by the registry to produce a module instance.
///
/// Receives the owning [`App`] handle (through which it may register, start,
/// or stop other modules) and the shared [`Mediator`]. Returning `None`
/// registers the start without a live instance; no lifecycle hooks run in
/// that case.
pub type ModuleFactory = Rc<dyn Fn(&App, &Mediator) -> Option<Box<dyn Module>>>;
