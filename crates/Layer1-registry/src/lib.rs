//! # chime-registry
//!
//! Registry layer for Chime:
//! - Trie: hierarchical key storage keyed by namespace segments
//! - Event: 발행/구독 registry (registration, removal, synchronous dispatch)
//! - Error: central error types
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  EventRegistry                                      │
//! │  ├── NamespaceTrie<ListenerList>  (scoped paths)    │
//! │  └── any listeners                (every event)     │
//! │                     │                               │
//! │                     ▼                               │
//! │  emit("a.b") ──▶ exact-path list + any list,        │
//! │                  invoked synchronously in order     │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod event;
pub mod trie;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Trie
// ============================================================================
pub use trie::NamespaceTrie;

// ============================================================================
// Event
// ============================================================================
pub use event::{listener, EventRegistry, Listener, ListenerRef, RegistryConfig, NEW_LISTENER};
