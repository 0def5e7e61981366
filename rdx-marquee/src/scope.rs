//! The host that owns mounted components and guarantees their teardown.

use crate::common::ComponentId;
use crate::components::countdown::{CompletionCallback, Countdown};
use crate::components::screensaver::ScreenSaver;
use crate::config::MarqueeConfig;
use crate::events::{ComponentKind, ScopeEvent};
use chrono::Utc;
use slotmap::SlotMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

enum Mounted {
    ScreenSaver(ScreenSaver),
    Countdown(Countdown),
}

impl Mounted {
    fn kind(&self) -> ComponentKind {
        match self {
            Mounted::ScreenSaver(_) => ComponentKind::ScreenSaver,
            Mounted::Countdown(_) => ComponentKind::Countdown,
        }
    }

    fn dispose(&mut self) {
        match self {
            Mounted::ScreenSaver(saver) => saver.dispose(),
            Mounted::Countdown(countdown) => countdown.dispose(),
        }
    }
}

/// Owns every component mounted by a view.
///
/// Components are created on mount and disposed on unmount. Dropping the
/// scope disposes whatever is still mounted, so no ticker outlives its view
/// even if nobody calls `stop`.
pub struct Scope {
    config: Arc<MarqueeConfig>,
    components: SlotMap<ComponentId, Mounted>,
    events: broadcast::Sender<ScopeEvent>,
}

impl Scope {
    pub fn new(config: MarqueeConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            config: Arc::new(config),
            components: SlotMap::with_key(),
            events,
        }
    }

    pub fn config(&self) -> &MarqueeConfig {
        &self.config
    }

    /// Mounts a stopped screen saver.
    pub fn mount_screen_saver(&mut self) -> ComponentId {
        self.mount(Mounted::ScreenSaver(ScreenSaver::new()))
    }

    /// Mounts an idle countdown using the configured initial value and tick period.
    pub fn mount_countdown(&mut self, on_complete: Option<CompletionCallback>) -> ComponentId {
        let countdown = Countdown::from_config(&self.config.countdown, on_complete);
        self.mount(Mounted::Countdown(countdown))
    }

    /// Mounts an idle countdown starting from `initial`.
    pub fn mount_countdown_from(
        &mut self,
        initial: u32,
        on_complete: Option<CompletionCallback>,
    ) -> ComponentId {
        let countdown =
            Countdown::with_tick_period(initial, self.config.countdown.tick_period(), on_complete);
        self.mount(Mounted::Countdown(countdown))
    }

    fn mount(&mut self, component: Mounted) -> ComponentId {
        let kind = component.kind();
        let id = self.components.insert(component);
        debug!("Mounted {:?} as {:?}.", kind, id);
        self.events
            .send(ScopeEvent::Mounted {
                id,
                kind,
                at: Utc::now(),
            })
            .ok();
        id
    }

    /// Disposes and removes a component.
    ///
    /// Returns `true` if the component was found and removed.
    pub fn unmount(&mut self, id: ComponentId) -> bool {
        match self.components.remove(id) {
            Some(mut component) => {
                component.dispose();
                let kind = component.kind();
                debug!("Unmounted {:?} {:?}.", kind, id);
                self.events
                    .send(ScopeEvent::Unmounted {
                        id,
                        kind,
                        at: Utc::now(),
                    })
                    .ok();
                true
            }
            None => false,
        }
    }

    /// Unmounts every component.
    pub fn dispose(&mut self) {
        let ids: Vec<ComponentId> = self.components.keys().collect();
        if !ids.is_empty() {
            info!("Disposing {} mounted component(s).", ids.len());
        }
        for id in ids {
            self.unmount(id);
        }
    }

    pub fn screen_saver(&self, id: ComponentId) -> Option<&ScreenSaver> {
        match self.components.get(id)? {
            Mounted::ScreenSaver(saver) => Some(saver),
            Mounted::Countdown(_) => None,
        }
    }

    pub fn screen_saver_mut(&mut self, id: ComponentId) -> Option<&mut ScreenSaver> {
        match self.components.get_mut(id)? {
            Mounted::ScreenSaver(saver) => Some(saver),
            Mounted::Countdown(_) => None,
        }
    }

    pub fn countdown(&self, id: ComponentId) -> Option<&Countdown> {
        match self.components.get(id)? {
            Mounted::Countdown(countdown) => Some(countdown),
            Mounted::ScreenSaver(_) => None,
        }
    }

    pub fn countdown_mut(&mut self, id: ComponentId) -> Option<&mut Countdown> {
        match self.components.get_mut(id)? {
            Mounted::Countdown(countdown) => Some(countdown),
            Mounted::ScreenSaver(_) => None,
        }
    }

    pub fn kind(&self, id: ComponentId) -> Option<ComponentKind> {
        self.components.get(id).map(Mounted::kind)
    }

    /// Every mounted component, in mount order of their slots.
    pub fn components(&self) -> Vec<(ComponentId, ComponentKind)> {
        self.components
            .iter()
            .map(|(id, component)| (id, component.kind()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Subscribes to the `ScopeEvent` stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ScopeEvent> {
        self.events.subscribe()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new(MarqueeConfig::default())
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}
