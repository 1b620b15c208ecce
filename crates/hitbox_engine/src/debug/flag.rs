//! Debug mode switch with change notification

/// Callback run whenever debug mode changes
pub type DebugObserver = Box<dyn FnMut(bool) + Send>;

/// Debug mode flag owned by the application context
///
/// Observers are notified only on actual changes.
#[derive(Default)]
pub struct DebugFlag {
    enabled: bool,
    observers: Vec<DebugObserver>,
}

impl DebugFlag {
    /// Create a flag in the given state
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            observers: Vec::new(),
        }
    }

    /// Whether debug mode is on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Register a change observer
    pub fn subscribe(&mut self, observer: impl FnMut(bool) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Switch debug mode, notifying observers if the value changed
    pub fn set(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }

        self.enabled = enabled;
        log::info!("Hitbox debug mode {}", if enabled { "enabled" } else { "disabled" });
        for observer in &mut self.observers {
            observer(enabled);
        }
    }
}

impl std::fmt::Debug for DebugFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugFlag")
            .field("enabled", &self.enabled)
            .field("observers", &self.observers.len())
            .finish()
    }
}
