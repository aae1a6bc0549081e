//! Event Registry - 이벤트 등록/제거 및 동기 디스패치
//!
//! Event names are split into namespace segments by the configured delimiter
//! and listener lists are stored in a [`NamespaceTrie`] at the exact segment
//! path. Dispatch is a direct synchronous call chain: `emit` invokes every
//! matching listener on the calling thread before returning.

use super::listener::{same_listener, Entry, ListenerList, ListenerRef};
use crate::error::{Error, Result};
use crate::trie::NamespaceTrie;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Event emitted through the registry itself before every registration,
/// carrying the subscribed event name as its single argument.
///
/// This is an ordinary emission: listeners registered at this exact name
/// and unscoped ([`on_any`](EventRegistry::on_any)) listeners both
/// receive it.
pub const NEW_LISTENER: &str = "newListener";

// ============================================================================
// RegistryConfig
// ============================================================================

/// 레지스트리 설정
///
/// 모든 필드는 인스턴스별 상태입니다 - 두 레지스트리가 구분자나 leak
/// 임계값을 공유하는 일은 없습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// 이벤트 이름을 세그먼트로 나누는 네임스페이스 구분자
    pub delimiter: String,

    /// 경로당 리스너 soft 상한 (0 = 무제한). 초과 시 경로당 한 번만
    /// 경고하며, 등록 자체는 거부하지 않습니다.
    pub max_listeners: usize,

    /// 모든 emit을 trace 레벨로 로깅
    pub debug_mode: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            delimiter: ".".to_string(),
            max_listeners: 10,
            debug_mode: false,
        }
    }
}

// ============================================================================
// EventRegistry
// ============================================================================

/// 공유 레지스트리 상태 (인스턴스당 mutex 하나)
struct Inner {
    /// 네임스페이스 경로로 인덱싱된 리스너 리스트
    tree: NamespaceTrie<ListenerList>,

    /// Unscoped listeners, invoked for every emitted event. `None` until the
    /// first `on_any` call - "never used" is distinct from "emptied".
    any_listeners: Option<Vec<ListenerRef>>,

    /// Per-instance configuration
    config: RegistryConfig,
}

/// Namespace-aware publish/subscribe registry.
///
/// Listeners are registered against dot-delimited event names and invoked
/// synchronously, in registration order, when the exact name is emitted.
/// There is no wildcard or ancestor matching: `emit("a.b")` resolves the
/// listeners registered at `"a.b"` and nothing else, plus the unscoped
/// listeners registered with [`on_any`](EventRegistry::on_any).
///
/// The internal lock is never held while a listener runs, so listeners may
/// reentrantly call back into the registry (remove themselves, register
/// others, emit further events).
///
/// ## 사용법
///
/// ```ignore
/// use chime_registry::{listener, EventRegistry};
///
/// let registry = EventRegistry::new();
///
/// let on_save = listener(|event, args| {
///     println!("{event}: {args:?}");
/// });
/// registry.on("doc.saved", on_save.clone());
///
/// registry.emit("doc.saved", &[]);        // invokes on_save
/// registry.off("doc.saved", &on_save);    // removes it again
/// ```
pub struct EventRegistry {
    inner: Mutex<Inner>,
}

impl EventRegistry {
    /// 기본 설정으로 레지스트리 생성 (구분자 `"."`, max listeners 10)
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// 커스텀 설정으로 레지스트리 생성
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                tree: NamespaceTrie::new(),
                any_listeners: None,
                config,
            }),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register `listener` under `event`. Returns `&Self` for chaining.
    ///
    /// Emits a [`NEW_LISTENER`] notification through this registry before
    /// the listener is stored, then append-merges it into the list at the
    /// exact namespace path.
    pub fn on(&self, event: &str, listener: ListenerRef) -> &Self {
        self.register(event, Entry::simple(listener));
        self
    }

    /// Alias for [`on`](EventRegistry::on).
    pub fn add_listener(&self, event: &str, listener: ListenerRef) -> &Self {
        self.on(event, listener)
    }

    /// Register `listener` to fire at most `count` times, after which it
    /// removes itself. Removal with the original reference also works while
    /// the wrapper is live.
    ///
    /// A zero count is rejected with [`Error::InvalidArgument`] and leaves
    /// the registry unchanged.
    pub fn many(&self, event: &str, count: usize, listener: ListenerRef) -> Result<&Self> {
        if count == 0 {
            return Err(Error::invalid_argument(
                "many() requires a non-zero invocation count",
            ));
        }
        self.register(event, Entry::counted(listener, count));
        Ok(self)
    }

    /// Register `listener` to fire exactly once.
    pub fn once(&self, event: &str, listener: ListenerRef) -> &Self {
        self.register(event, Entry::counted(listener, 1));
        self
    }

    /// Register a listener invoked for every emitted event, after the
    /// event's own listeners. That includes the [`NEW_LISTENER`]
    /// notification fired by later registrations.
    pub fn on_any(&self, listener: ListenerRef) -> &Self {
        let mut inner = self.inner.lock();
        inner.any_listeners.get_or_insert_with(Vec::new).push(listener);
        debug!("Registered unscoped listener");
        self
    }

    fn register(&self, event: &str, entry: Entry) {
        // Notified before the merge: observers see the subscription coming,
        // and the new listener never receives its own notification.
        self.emit(NEW_LISTENER, &[Value::String(event.to_string())]);

        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let segments: Vec<&str> = event.split(inner.config.delimiter.as_str()).collect();
        let list = inner
            .tree
            .set_value(&segments, ListenerList::with_entry(entry), |existing, new| {
                existing.absorb(new)
            });

        let count = list.entries.len();
        let max = inner.config.max_listeners;
        if max > 0 && count > max && !list.warned {
            list.warned = true;
            warn!(
                listener_count = count,
                max_listeners = max,
                event = %event,
                "Possible listener leak: path exceeds max_listeners"
            );
        }

        debug!(event = %event, listener_count = count, "Registered event listener");
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove the first entry under `event` matching `listener`, either
    /// directly or as the original behind a `once`/`many` wrapper. Unknown
    /// events and absent listeners are no-ops; duplicates beyond the first
    /// match are kept.
    pub fn off(&self, event: &str, listener: &ListenerRef) -> &Self {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let segments: Vec<&str> = event.split(inner.config.delimiter.as_str()).collect();
        if let Some(list) = inner.tree.get_value_mut(&segments) {
            if let Some(pos) = list.entries.iter().position(|e| e.matches(listener)) {
                list.entries.remove(pos);
                debug!(event = %event, "Removed event listener");
            }
        }
        self
    }

    /// Alias for [`off`](EventRegistry::off).
    pub fn remove_listener(&self, event: &str, listener: &ListenerRef) -> &Self {
        self.off(event, listener)
    }

    /// Remove the first unscoped listener matching `listener`. No-op if the
    /// unscoped list was never created or the listener is absent.
    pub fn off_any(&self, listener: &ListenerRef) -> &Self {
        let mut inner = self.inner.lock();
        if let Some(list) = inner.any_listeners.as_mut() {
            if let Some(pos) = list.iter().position(|l| same_listener(l, listener)) {
                list.remove(pos);
                debug!("Removed unscoped listener");
            }
        }
        self
    }

    /// With an event name: reset that exact path's list to empty. The path
    /// itself survives, siblings and descendants are untouched, and the
    /// path's leak warning is re-armed.
    ///
    /// With `None`: discard the whole tree and the unscoped list entirely.
    pub fn remove_all_listeners(&self, event: Option<&str>) -> &Self {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        match event {
            Some(event) => {
                let segments: Vec<&str> =
                    event.split(inner.config.delimiter.as_str()).collect();
                if let Some(list) = inner.tree.get_value_mut(&segments) {
                    list.entries.clear();
                    list.warned = false;
                }
                debug!(event = %event, "Removed all listeners for event");
            }
            None => {
                inner.tree.clear();
                inner.any_listeners = None;
                debug!("Removed all listeners");
            }
        }
        self
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Synchronously invoke every listener at `event`'s exact namespace
    /// path, in registration order, followed by every unscoped listener, in
    /// registration order. Returns whether at least one listener fired.
    ///
    /// Dispatch iterates over a snapshot taken under the registry lock, and
    /// the lock is released before the first listener runs. Removing a
    /// listener during dispatch never skips or duplicates an entry already
    /// snapshotted for this call; registering one only affects later emits.
    /// A panicking listener propagates to the caller and prevents later
    /// listeners in the same emit from running.
    pub fn emit(&self, event: &str, args: &[Value]) -> bool {
        let (scoped, any, debug_mode) = {
            let inner = self.inner.lock();
            let segments: Vec<&str> = event.split(inner.config.delimiter.as_str()).collect();
            (
                inner.tree.get_value(&segments).map(|l| l.entries.clone()),
                inner.any_listeners.clone(),
                inner.config.debug_mode,
            )
        };

        if debug_mode {
            trace!(event = %event, args = args.len(), "Emitting event");
        }

        let mut fired = false;
        let mut exhausted: Vec<Entry> = Vec::new();

        if let Some(entries) = &scoped {
            for entry in entries {
                match entry {
                    Entry::Simple(listener) => {
                        listener.call(event, args);
                        fired = true;
                    }
                    Entry::Counted { listener, remaining } => {
                        // Atomic reservation: a reentrant emit over the same
                        // entry cannot double-fire the final invocation.
                        let taken = remaining
                            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                                n.checked_sub(1)
                            });
                        if let Ok(prev) = taken {
                            listener.call(event, args);
                            fired = true;
                            if prev == 1 {
                                exhausted.push(entry.clone());
                            }
                        }
                    }
                }
            }
        }

        if let Some(list) = &any {
            for listener in list {
                listener.call(event, args);
                fired = true;
            }
        }

        if !exhausted.is_empty() {
            self.prune_exhausted(event, &exhausted);
        }

        fired
    }

    /// Drop counted entries whose final invocation was taken during this
    /// emit. Matched by counter identity, not listener identity, so an
    /// original registered twice loses only the exhausted wrapper.
    fn prune_exhausted(&self, event: &str, exhausted: &[Entry]) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let segments: Vec<&str> = event.split(inner.config.delimiter.as_str()).collect();
        if let Some(list) = inner.tree.get_value_mut(&segments) {
            for done in exhausted {
                if let Entry::Counted { remaining, .. } = done {
                    if let Some(pos) = list.entries.iter().position(|e| match e {
                        Entry::Counted { remaining: r, .. } => Arc::ptr_eq(r, remaining),
                        Entry::Simple(_) => false,
                    }) {
                        list.entries.remove(pos);
                    }
                }
            }
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Snapshot of the listeners at `event`'s exact path, or `None` if that
    /// path never held a list. Counted wrappers are reported by their
    /// original listener reference.
    pub fn listeners(&self, event: &str) -> Option<Vec<ListenerRef>> {
        let inner = self.inner.lock();
        let segments: Vec<&str> = event.split(inner.config.delimiter.as_str()).collect();
        inner
            .tree
            .get_value(&segments)
            .map(|l| l.entries.iter().map(|e| e.listener().clone()).collect())
    }

    /// Snapshot of the unscoped listeners. `None` if `on_any` was never
    /// called; a drained list is `Some` and empty.
    pub fn listeners_any(&self) -> Option<Vec<ListenerRef>> {
        self.inner.lock().any_listeners.clone()
    }

    /// Number of listeners registered at `event`'s exact path.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners(event).map_or(0, |l| l.len())
    }

    /// Number of unscoped listeners.
    pub fn any_listener_count(&self) -> usize {
        self.inner.lock().any_listeners.as_ref().map_or(0, Vec::len)
    }

    /// Every event name currently holding at least one listener, joined
    /// with the current delimiter. Order is unspecified.
    pub fn event_names(&self) -> Vec<String> {
        let inner = self.inner.lock();
        let delimiter = inner.config.delimiter.as_str();
        inner
            .tree
            .paths_with_values()
            .into_iter()
            .filter(|path| {
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                inner
                    .tree
                    .get_value(&segments)
                    .is_some_and(|l| !l.entries.is_empty())
            })
            .map(|path| path.join(delimiter))
            .collect()
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Current namespace delimiter.
    pub fn delimiter(&self) -> String {
        self.inner.lock().config.delimiter.clone()
    }

    /// Change the delimiter used to split future event names. Paths already
    /// stored under the old delimiter are not re-indexed. Empty delimiters
    /// are rejected with [`Error::InvalidArgument`].
    pub fn set_delimiter(&self, delimiter: &str) -> Result<()> {
        if delimiter.is_empty() {
            return Err(Error::invalid_argument("delimiter must not be empty"));
        }
        self.inner.lock().config.delimiter = delimiter.to_string();
        Ok(())
    }

    /// Soft per-path listener ceiling (0 = unlimited).
    pub fn max_listeners(&self) -> usize {
        self.inner.lock().config.max_listeners
    }

    /// Change the leak-warning threshold. Applies to future registrations;
    /// already-warned paths do not re-warn.
    pub fn set_max_listeners(&self, max: usize) {
        self.inner.lock().config.max_listeners = max;
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================
