use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How observations turn into notifications. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Announce when the top period changes; alert the admin once per outage.
    #[default]
    Edge,
    /// Announce every period value the first time it is listed.
    SeenSet,
}

impl FromStr for NotifyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edge" | "a" => Ok(NotifyPolicy::Edge),
            "seen-set" | "seen_set" | "b" => Ok(NotifyPolicy::SeenSet),
            other => Err(format!("unknown notify policy `{other}`")),
        }
    }
}

impl fmt::Display for NotifyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyPolicy::Edge => write!(f, "edge"),
            NotifyPolicy::SeenSet => write!(f, "seen-set"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchState {
    policy: NotifyPolicy,
    last_marker: Option<String>,
    site_error: bool,
    startup_pending: bool,
    seen: BTreeSet<String>,
    dirty: bool,
}

/// Read-only snapshot for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchView {
    pub policy: NotifyPolicy,
    pub last_marker: Option<String>,
    pub site_error: bool,
    pub startup_pending: bool,
    pub seen_count: usize,
}

impl WatchState {
    pub fn new(policy: NotifyPolicy) -> Self {
        Self {
            policy,
            // Only the edge policy announces a startup snapshot.
            startup_pending: policy == NotifyPolicy::Edge,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> NotifyPolicy {
        self.policy
    }

    pub fn last_marker(&self) -> Option<&str> {
        self.last_marker.as_deref()
    }

    pub fn is_site_error(&self) -> bool {
        self.site_error
    }

    pub fn has_seen(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn view(&self) -> WatchView {
        WatchView {
            policy: self.policy,
            last_marker: self.last_marker.clone(),
            site_error: self.site_error,
            startup_pending: self.startup_pending,
            seen_count: self.seen.len(),
        }
    }

    /// Returns whether the last update changed anything, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Records a non-empty marker. Returns true when it differs from the previous one.
    pub(crate) fn record_marker(&mut self, marker: &str) -> bool {
        debug_assert!(!marker.is_empty());
        if self.last_marker.as_deref() == Some(marker) {
            return false;
        }
        self.last_marker = Some(marker.to_string());
        self.dirty = true;
        true
    }

    pub(crate) fn enter_error(&mut self) -> bool {
        if self.site_error {
            return false;
        }
        self.site_error = true;
        self.dirty = true;
        true
    }

    pub(crate) fn clear_error(&mut self) -> bool {
        if !self.site_error {
            return false;
        }
        self.site_error = false;
        self.dirty = true;
        true
    }

    /// Consumes the startup snapshot. Returns true only on the first call.
    pub(crate) fn take_startup(&mut self) -> bool {
        if self.startup_pending {
            self.startup_pending = false;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Adds a value to the seen set. Returns true if it was not present.
    pub(crate) fn mark_seen(&mut self, value: &str) -> bool {
        let inserted = self.seen.insert(value.to_string());
        self.dirty |= inserted;
        inserted
    }
}
