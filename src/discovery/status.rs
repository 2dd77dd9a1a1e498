//! Lifecycle status vocabularies.

/// Direction of a container lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The container is now running.
    Up,
    /// The container is no longer running.
    Down,
}

/// Runtime status strings that count as "now running" and "no longer
/// running".
///
/// The same value is handed to the event watcher and the inventory mapper so
/// both agree on what "up" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusVocabulary {
    up: &'static [&'static str],
    down: &'static [&'static str],
}

impl StatusVocabulary {
    /// Docker's container event statuses.
    pub const DOCKER: Self = Self::new(&["start", "restart"], &["die", "destroy", "stop", "pause"]);

    /// Build a vocabulary from explicit up and down status lists.
    #[must_use]
    pub const fn new(up: &'static [&'static str], down: &'static [&'static str]) -> Self {
        Self { up, down }
    }

    /// Returns `true` if `status` means the container is running.
    #[must_use]
    pub fn is_up(&self, status: &str) -> bool {
        self.up.contains(&status)
    }

    /// Classify `status`, or `None` when it is in neither list.
    #[must_use]
    pub fn classify(&self, status: &str) -> Option<Transition> {
        if self.is_up(status) {
            Some(Transition::Up)
        } else if self.down.contains(&status) {
            Some(Transition::Down)
        } else {
            None
        }
    }
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self::DOCKER
    }
}
