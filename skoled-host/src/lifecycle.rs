//! Lifecycle controller
//!
//! Owns the periodic render timer. Activation validates the configuration
//! and spawns one timer task; deactivation stops it and releases whatever
//! the host registered with [`Controller::hold_subscription`].
//!
//! The render cycle itself is synchronous, so the timer task can only be
//! suspended between cycles. Aborting it and awaiting the handle therefore
//! guarantees that no cycle starts after [`Controller::deactivate`] returns.
//! On a multi-threaded runtime the cycle runs under `block_in_place`, so a
//! slow bus does not hold up other tasks on the same worker.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use parking_lot::Mutex;
use skoled_core::{
    run_cycle, ActivationConfig, ConfigError, DataSource, DisplayOpener, LifecycleEvent,
    LifecycleState, PluginConfig,
};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Longest timer period (one year); longer rates are clamped
const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Callback run once on deactivation
pub type Unsubscribe = Box<dyn FnOnce() + Send>;

/// Starts and stops the periodic render
pub struct Controller<S: ?Sized, O> {
    source: Arc<S>,
    opener: Arc<Mutex<O>>,
    state: LifecycleState,
    timer: Option<JoinHandle<()>>,
    unsubscribes: Vec<Unsubscribe>,
}

impl<S, O> Controller<S, O>
where
    S: DataSource + Send + Sync + ?Sized + 'static,
    O: DisplayOpener + Send + 'static,
{
    /// Create an inactive controller
    pub fn new(source: Arc<S>, opener: O) -> Self {
        Self {
            source,
            opener: Arc::new(Mutex::new(opener)),
            state: LifecycleState::Inactive,
            timer: None,
            unsubscribes: Vec::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Shared handle on the display opener
    pub fn opener(&self) -> &Arc<Mutex<O>> {
        &self.opener
    }

    /// Validate `config` and start rendering
    ///
    /// An invalid configuration is returned as an error and leaves the
    /// controller as it was. A valid one replaces any running activation.
    pub async fn activate(&mut self, config: PluginConfig) -> Result<(), ConfigError> {
        let activation = match config.validate() {
            Ok(activation) => activation,
            Err(e) => {
                warn!("Activation rejected: {}", e);
                return Err(e);
            }
        };

        if self.state.is_active() {
            debug!("Restarting with new configuration");
            self.stop_timer().await;
        }

        let period = Duration::from_millis(activation.refresh_interval_ms).min(MAX_PERIOD);
        if period == MAX_PERIOD {
            debug!("Refresh interval clamped to {:?}", MAX_PERIOD);
        }
        info!(
            "Rendering {} slot(s) every {} ms to bus {} at {}",
            activation.slots.len(),
            activation.refresh_interval_ms,
            activation.bus_number,
            activation.address
        );

        self.timer = Some(spawn_timer(
            activation,
            Arc::clone(&self.source),
            Arc::clone(&self.opener),
            Instant::now() + period,
            period,
        ));
        self.transition(LifecycleEvent::Activate);
        Ok(())
    }

    /// Stop rendering and release held subscriptions
    ///
    /// Safe to call any number of times.
    pub async fn deactivate(&mut self) {
        self.stop_timer().await;

        let released = self.unsubscribes.len();
        for unsubscribe in self.unsubscribes.drain(..) {
            unsubscribe();
        }
        if released > 0 {
            debug!("Released {} subscription(s)", released);
        }

        self.transition(LifecycleEvent::Deactivate);
    }

    /// Register a callback to run on the next deactivation
    pub fn hold_subscription<F>(&mut self, unsubscribe: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.unsubscribes.push(Box::new(unsubscribe));
    }

    async fn stop_timer(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        timer.abort();
        if let Err(e) = timer.await {
            if e.is_panic() {
                warn!("Render timer panicked: {}", e);
            }
        }
    }

    fn transition(&mut self, event: LifecycleEvent) {
        let next = self.state.transition(event);
        if next != self.state {
            info!("Lifecycle {}: {:?} -> {:?}", event.name(), self.state, next);
        }
        self.state = next;
    }
}

impl<S: ?Sized, O> Drop for Controller<S, O> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn spawn_timer<S, O>(
    activation: ActivationConfig,
    source: Arc<S>,
    opener: Arc<Mutex<O>>,
    start: Instant,
    period: Duration,
) -> JoinHandle<()>
where
    S: DataSource + Send + Sync + ?Sized + 'static,
    O: DisplayOpener + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let cycle = || {
                let mut opener = opener.lock();
                run_cycle(&activation, &*source, &mut *opener, unix_millis);
            };
            match Handle::current().runtime_flavor() {
                RuntimeFlavor::MultiThread => tokio::task::block_in_place(cycle),
                _ => cycle(),
            }
        }
    })
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
