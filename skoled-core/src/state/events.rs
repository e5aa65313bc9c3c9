//! Events that trigger lifecycle transitions

/// Events that can trigger lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleEvent {
    /// Host started the plugin with a validated configuration
    Activate,
    /// Host stopped the plugin
    Deactivate,
}

impl LifecycleEvent {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Activate => "activate",
            LifecycleEvent::Deactivate => "deactivate",
        }
    }
}
