//! In-process event bus.

mod event_bus;

pub use event_bus::InMemoryEventBus;
