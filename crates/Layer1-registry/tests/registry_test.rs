//! Registry integration test - a component-style collaborator using only
//! the stable emitter contract (on / off / emit / remove_all_listeners)
//!
//! `cargo test -p chime-registry --test registry_test -- --nocapture`

use chime_registry::{listener, EventRegistry, ListenerRef, RegistryConfig};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A component that wires itself to a registry on attach and fully detaches
/// again, the way a UI surface would consume the registry.
struct Panel {
    registry: Arc<EventRegistry>,
    on_show: ListenerRef,
    on_hide: ListenerRef,
    log: Arc<Mutex<Vec<String>>>,
}

impl Panel {
    fn attach(registry: Arc<EventRegistry>) -> Self {
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = log.clone();
        let on_show = listener(move |event: &str, _args: &[Value]| {
            sink.lock().push(format!("show:{event}"));
        });
        let sink = log.clone();
        let on_hide = listener(move |event: &str, _args: &[Value]| {
            sink.lock().push(format!("hide:{event}"));
        });

        registry.on("panel.show", on_show.clone());
        registry.on("panel.hide", on_hide.clone());

        Self {
            registry,
            on_show,
            on_hide,
            log,
        }
    }

    fn detach(&self) {
        self.registry.off("panel.show", &self.on_show);
        self.registry.off("panel.hide", &self.on_hide);
    }
}

#[test]
fn test_component_attach_emit_detach() {
    init_tracing();
    let registry = Arc::new(EventRegistry::new());
    let panel = Panel::attach(registry.clone());

    assert!(registry.emit("panel.show", &[]));
    assert!(registry.emit("panel.hide", &[]));
    assert_eq!(
        *panel.log.lock(),
        vec!["show:panel.show".to_string(), "hide:panel.hide".to_string()]
    );

    panel.detach();
    assert!(!registry.emit("panel.show", &[]));
    assert_eq!(panel.log.lock().len(), 2);
}

#[test]
fn test_two_components_share_one_registry() {
    init_tracing();
    let registry = Arc::new(EventRegistry::new());
    let first = Panel::attach(registry.clone());
    let second = Panel::attach(registry.clone());

    registry.emit("panel.show", &[]);
    assert_eq!(first.log.lock().len(), 1);
    assert_eq!(second.log.lock().len(), 1);

    // Detaching one panel must not disturb the other's registrations
    first.detach();
    registry.emit("panel.show", &[]);
    assert_eq!(first.log.lock().len(), 1);
    assert_eq!(second.log.lock().len(), 2);
}

#[test]
fn test_registry_teardown_clears_everything() {
    init_tracing();
    let registry = Arc::new(EventRegistry::new());
    let panel = Panel::attach(registry.clone());
    registry.on_any(listener(|_event: &str, _args: &[Value]| {}));

    registry.remove_all_listeners(None);

    assert!(!registry.emit("panel.show", &[]));
    assert!(registry.listeners("panel.show").is_none());
    assert!(registry.listeners_any().is_none());
    assert!(panel.log.lock().is_empty());
}

#[test]
fn test_custom_config_delimiter_and_threshold() {
    init_tracing();
    let registry = EventRegistry::with_config(RegistryConfig {
        delimiter: "/".to_string(),
        max_listeners: 2,
        debug_mode: true,
    });

    let hits = Arc::new(Mutex::new(0usize));
    let sink = hits.clone();
    registry.on(
        "panel/body/refresh",
        listener(move |_event: &str, _args: &[Value]| {
            *sink.lock() += 1;
        }),
    );

    assert!(registry.emit("panel/body/refresh", &[]));
    // The dot is not a delimiter here, so this is a different (unknown) path
    assert!(!registry.emit("panel.body.refresh", &[]));
    assert_eq!(*hits.lock(), 1);
    assert_eq!(registry.delimiter(), "/");
    assert_eq!(registry.max_listeners(), 2);
}
