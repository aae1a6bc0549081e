//! Event System - namespace-aware publish/subscribe
//!
//! Listener lists are indexed by dot-delimited namespace path and dispatch
//! is synchronous: `emit` resolves the exact path, then runs every matching
//! listener on the calling thread.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      EventRegistry                          │
//! │                                                             │
//! │  on("a.b.c", L) ──▶ NamespaceTrie                           │
//! │                        root ── "a" ── "b" ── "c" ▶ [L, ..]  │
//! │                                                             │
//! │  on_any(A) ───────▶ any listeners: [A, ..]                  │
//! │                                                             │
//! │  emit("a.b.c") ───▶ [L, ..] then [A, ..], in order          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 사용법
//!
//! ```ignore
//! use chime_registry::{listener, EventRegistry};
//!
//! let registry = EventRegistry::new();
//!
//! // 1. Register listeners
//! let on_save = listener(|event, args| {
//!     println!("{event} fired with {} args", args.len());
//! });
//! registry.on("doc.saved", on_save.clone());
//! registry.once("doc.closed", listener(|_, _| println!("closing")));
//!
//! // 2. Emit
//! registry.emit("doc.saved", &[]);
//!
//! // 3. Remove
//! registry.off("doc.saved", &on_save);
//! ```

mod listener;
mod registry;

pub use listener::{listener, Listener, ListenerRef};
pub use registry::{EventRegistry, RegistryConfig, NEW_LISTENER};
