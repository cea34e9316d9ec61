use crate::ids::IdGenerator;
use crate::models::{Toast, ToastAction, ToastRequest};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalReason {
    Expired,
    Dismissed,
    ActionInvoked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ToastEvent {
    Shown { toast: Toast },
    Removed { id: String, reason: RemovalReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastDurations {
    pub plain: Duration,
    pub with_action: Duration,
}

impl Default for ToastDurations {
    fn default() -> Self {
        Self {
            plain: Duration::from_millis(3_000),
            with_action: Duration::from_millis(5_000),
        }
    }
}

struct ActiveToast {
    toast: Toast,
    expiry: Option<JoinHandle<()>>,
    action_claimed: bool,
}

#[derive(Default)]
struct Registry {
    order: Vec<String>,
    active: HashMap<String, ActiveToast>,
}

impl Registry {
    fn remove(&mut self, id: &str) -> Option<ActiveToast> {
        let entry = self.active.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(entry)
    }
}

/// Visible toasts and their expiry timers.
///
/// A toast leaves through exactly one of expiry, dismissal or its action;
/// whichever comes first aborts the timer, and later removals are no-ops.
#[derive(Clone)]
pub struct ToastCenter {
    registry: Arc<Mutex<Registry>>,
    durations: Arc<Mutex<ToastDurations>>,
    events: broadcast::Sender<ToastEvent>,
    ids: IdGenerator,
}

impl ToastCenter {
    pub fn new(durations: ToastDurations) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            durations: Arc::new(Mutex::new(durations)),
            events,
            ids: IdGenerator::new(),
        }
    }

    pub fn set_durations(&self, durations: ToastDurations) {
        *self
            .durations
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = durations;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.events.subscribe()
    }

    /// Arms the expiry timer on the current tokio runtime. Without one the
    /// toast stays until it is closed.
    pub fn show(&self, request: ToastRequest) -> Toast {
        let toast = Toast {
            id: self.ids.next_id(),
            message: request.message,
            severity: request.severity,
            action: request.action,
        };
        let durations = *self
            .durations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let lifetime = if toast.action.is_some() {
            durations.with_action
        } else {
            durations.plain
        };

        {
            let mut registry = self.registry();
            let expiry = match Handle::try_current() {
                Ok(runtime) => {
                    let center = self.clone();
                    let id = toast.id.clone();
                    Some(runtime.spawn(async move {
                        tokio::time::sleep(lifetime).await;
                        center.remove(&id, RemovalReason::Expired);
                    }))
                }
                Err(_) => {
                    tracing::debug!(toast_id = %toast.id, "no tokio runtime; toast will not expire");
                    None
                }
            };
            registry.order.push(toast.id.clone());
            registry.active.insert(
                toast.id.clone(),
                ActiveToast {
                    toast: toast.clone(),
                    expiry,
                    action_claimed: false,
                },
            );
        }

        tracing::debug!(toast_id = %toast.id, severity = ?toast.severity, "toast shown");
        let _ = self.events.send(ToastEvent::Shown {
            toast: toast.clone(),
        });
        toast
    }

    /// Click on the toast body. Toasts carrying an action ignore body clicks.
    pub fn dismiss(&self, id: &str) -> bool {
        let has_action = self
            .registry()
            .active
            .get(id)
            .map(|entry| entry.toast.action.is_some());
        match has_action {
            Some(false) => self.remove(id, RemovalReason::Dismissed),
            _ => false,
        }
    }

    /// Explicit close control; always allowed.
    pub fn close(&self, id: &str) -> bool {
        self.remove(id, RemovalReason::Dismissed)
    }

    /// Hands out the toast's action once and stops its expiry so the toast
    /// stays visible while the action runs. Call `finish_action` afterwards.
    pub fn claim_action(&self, id: &str) -> Option<ToastAction> {
        let mut registry = self.registry();
        let entry = registry.active.get_mut(id)?;
        if entry.action_claimed {
            return None;
        }
        let action = entry.toast.action.clone()?;
        entry.action_claimed = true;
        if let Some(expiry) = entry.expiry.take() {
            expiry.abort();
        }
        Some(action)
    }

    pub fn finish_action(&self, id: &str) -> bool {
        self.remove(id, RemovalReason::ActionInvoked)
    }

    pub fn visible(&self) -> Vec<Toast> {
        let registry = self.registry();
        registry
            .order
            .iter()
            .filter_map(|id| registry.active.get(id).map(|entry| entry.toast.clone()))
            .collect()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.registry().active.contains_key(id)
    }

    fn remove(&self, id: &str, reason: RemovalReason) -> bool {
        let removed = self.registry().remove(id);
        let Some(mut entry) = removed else {
            return false;
        };
        if reason != RemovalReason::Expired {
            if let Some(expiry) = entry.expiry.take() {
                expiry.abort();
            }
        }
        tracing::debug!(toast_id = %id, reason = ?reason, "toast removed");
        let _ = self.events.send(ToastEvent::Removed {
            id: id.to_string(),
            reason,
        });
        true
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new(ToastDurations::default())
    }
}
