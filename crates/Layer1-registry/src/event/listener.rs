//! Listener types - 콜백, 카운트 엔트리, 경로별 리스트

use serde_json::Value;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

// ============================================================================
// Listener Trait
// ============================================================================

/// A callback invoked with the emitted event name and its arguments.
///
/// Implemented for any `Fn(&str, &[Value])` closure; standalone types can
/// implement it directly when they carry their own state.
pub trait Listener: Send + Sync {
    /// Handle one emission.
    fn call(&self, event: &str, args: &[Value]);
}

impl<F> Listener for F
where
    F: Fn(&str, &[Value]) + Send + Sync,
{
    fn call(&self, event: &str, args: &[Value]) {
        self(event, args)
    }
}

/// Shared handle to a listener.
///
/// The registry matches listeners by pointer identity: two clones of the
/// same `ListenerRef` are the same listener, two separately created refs
/// never are, even for identical closures.
pub type ListenerRef = Arc<dyn Listener>;

/// Wrap a closure into a [`ListenerRef`].
pub fn listener<F>(f: F) -> ListenerRef
where
    F: Fn(&str, &[Value]) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Pointer identity for listener handles.
///
/// Compares data pointers only: the vtable half of a fat pointer is not
/// stable across codegen units for the same object.
pub(crate) fn same_listener(a: &ListenerRef, b: &ListenerRef) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

// ============================================================================
// Entry - one registration
// ============================================================================

/// One registered entry in a listener list.
#[derive(Clone)]
pub(crate) enum Entry {
    /// Plain listener registered with `on`
    Simple(ListenerRef),

    /// Counting wrapper registered with `many`/`once`. Holds the original
    /// listener so removal by the original reference matches the wrapper.
    Counted {
        listener: ListenerRef,
        /// Invocations left; shared between the stored entry and every
        /// emission snapshot that cloned it.
        remaining: Arc<AtomicUsize>,
    },
}

impl Entry {
    pub(crate) fn simple(listener: ListenerRef) -> Self {
        Self::Simple(listener)
    }

    pub(crate) fn counted(listener: ListenerRef, count: usize) -> Self {
        Self::Counted {
            listener,
            remaining: Arc::new(AtomicUsize::new(count)),
        }
    }

    /// The registered listener; counted entries report the original.
    pub(crate) fn listener(&self) -> &ListenerRef {
        match self {
            Self::Simple(listener) => listener,
            Self::Counted { listener, .. } => listener,
        }
    }

    /// True if this entry was registered for `target`, directly or behind
    /// a counting wrapper.
    pub(crate) fn matches(&self, target: &ListenerRef) -> bool {
        same_listener(self.listener(), target)
    }
}

// ============================================================================
// ListenerList - per-path state
// ============================================================================

/// Ordered listener list stored at one trie path.
///
/// Registration merges into this list in place, so the `warned` flag
/// survives repeated registrations: the leak warning fires once per path,
/// not once per registration.
pub(crate) struct ListenerList {
    pub(crate) entries: Vec<Entry>,
    pub(crate) warned: bool,
}

impl ListenerList {
    pub(crate) fn with_entry(entry: Entry) -> Self {
        Self {
            entries: vec![entry],
            warned: false,
        }
    }

    /// Append-merge used by registration: `other`'s entries are appended in
    /// order, this list keeps its identity and its warned state.
    pub(crate) fn absorb(&mut self, other: ListenerList) {
        self.entries.extend(other.entries);
    }
}
