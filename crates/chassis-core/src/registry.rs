use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};

use crate::mediator::Mediator;
use crate::module::{Module, ModuleFactory};

struct ModuleEntry {
    name: String,
    factory: ModuleFactory,
    instance: Option<Box<dyn Module>>,
}

struct Inner {
    modules: Vec<ModuleEntry>,
}

/// The application registry.
///
/// Owns the mapping from module name to factory and current instance, plus
/// the one [`Mediator`] every module communicates over. Entries keep
/// registration order, which is also the order `start_all`/`stop_all` walk
/// them in.
///
/// `App` is a cheap-clone handle over shared state, so factories and
/// subscriber callbacks can hold their own handle and drive other modules.
/// No internal borrow is held while user code (factories, lifecycle hooks)
/// runs, which makes synchronous re-entrancy safe. Handles are not `Send`;
/// the whole shell is single-threaded.
#[derive(Clone)]
pub struct App {
    inner: Rc<RefCell<Inner>>,
    mediator: Mediator,
    debug: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an empty registry with diagnostics disabled.
    pub fn new() -> Self {
        Self::with_debug(false)
    }

    /// Create an empty registry. When `debug` is set, registration and
    /// lifecycle transitions are logged.
    pub fn with_debug(debug: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                modules: Vec::new(),
            })),
            mediator: Mediator::new(),
            debug,
        }
    }

    /// The bus shared by every module of this application.
    pub fn mediator(&self) -> &Mediator {
        &self.mediator
    }

    /// Register `factory` under `name`. Returns self for chaining.
    ///
    /// Re-registering an existing name silently replaces its record in
    /// place: same position in start order, instance reset, no duplicate
    /// signal. The replaced instance (if any) is dropped without `destroy`.
    pub fn register<F>(&self, name: impl Into<String>, factory: F) -> &Self
    where
        F: Fn(&App, &Mediator) -> Option<Box<dyn Module>> + 'static,
    {
        let name = name.into();
        let entry = ModuleEntry {
            name: name.clone(),
            factory: Rc::new(factory),
            instance: None,
        };

        {
            let mut inner = self.inner.borrow_mut();
            match inner.modules.iter_mut().find(|e| e.name == name) {
                Some(existing) => *existing = entry,
                None => inner.modules.push(entry),
            }
        }

        if self.debug {
            tracing::info!("Registered module {}", name);
        }
        self
    }

    /// Start the module registered under `name`.
    ///
    /// Invokes the factory with this handle and the shared mediator, calls
    /// `initialize` on the produced instance, and stores it. An unregistered
    /// name is a silent no-op. Starting an already-started module re-invokes
    /// the factory and replaces the instance; there is no idempotence
    /// guard, and the prior instance is dropped without `destroy`.
    pub fn start(&self, name: &str) -> &Self {
        let factory = {
            let inner = self.inner.borrow();
            inner
                .modules
                .iter()
                .find(|e| e.name == name)
                .map(|e| e.factory.clone())
        };
        let Some(factory) = factory else {
            return self;
        };

        let mut instance = factory(self, &self.mediator);
        let produced = instance.is_some();
        if let Some(module) = instance.as_mut() {
            module.initialize();
        }

        {
            let mut inner = self.inner.borrow_mut();
            // The factory may have re-entered the registry; only store the
            // instance if the entry is still present.
            if let Some(entry) = inner.modules.iter_mut().find(|e| e.name == name) {
                entry.instance = instance;
            }
        }

        if produced && self.debug {
            tracing::info!("Module {} started", name);
        }
        self
    }

    /// Stop the module registered under `name`.
    ///
    /// A started module has `destroy` called on its instance and its record
    /// removed from the registry. A registered-but-never-started module is
    /// left untouched. An unknown name is an error.
    pub fn stop(&self, name: &str) -> Result<&Self> {
        if !self.contains(name) {
            bail!("unknown module: {name}");
        }
        self.stop_present(name);
        Ok(self)
    }

    fn stop_present(&self, name: &str) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            match inner.modules.iter().position(|e| e.name == name) {
                Some(idx) if inner.modules[idx].instance.is_some() => {
                    Some(inner.modules.remove(idx))
                }
                _ => None,
            }
        };

        if let Some(mut entry) = removed {
            if let Some(module) = entry.instance.as_mut() {
                module.destroy();
            }
            if self.debug {
                tracing::info!("Module {} stopped", name);
            }
        }
    }

    /// Start every registered module, in registration order.
    ///
    /// The name list is snapshotted first, so modules registered or removed
    /// while the sweep runs do not perturb it.
    pub fn start_all(&self) -> &Self {
        for name in self.module_names() {
            self.start(&name);
        }
        self
    }

    /// Stop every registered module, in registration order.
    ///
    /// The name list is snapshotted first; entries a previous module's
    /// teardown already removed are skipped, so one module stopping another
    /// during `destroy` cannot skip or revisit the rest of the sweep.
    pub fn stop_all(&self) -> &Self {
        for name in self.module_names() {
            if self.contains(&name) {
                self.stop_present(&name);
            }
        }
        self
    }

    /// Entry point for process startup: start all registered modules.
    pub fn initialize(&self) -> &Self {
        self.start_all()
    }

    /// Entry point for process teardown: stop all registered modules.
    pub fn destroy(&self) -> &Self {
        self.stop_all()
    }

    /// Whether a record is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().modules.iter().any(|e| e.name == name)
    }

    /// Whether the module under `name` currently holds a live instance.
    pub fn is_started(&self, name: &str) -> bool {
        self.inner
            .borrow()
            .modules
            .iter()
            .any(|e| e.name == name && e.instance.is_some())
    }

    /// Registered module names, in registration order.
    pub fn module_names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .modules
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().modules.is_empty()
    }
}
