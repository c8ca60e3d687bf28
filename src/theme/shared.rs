//! The process-wide active theme as an explicit shared object
//!
//! Windows receive an `Arc<SharedTheme>` when they are created and read a
//! snapshot whenever they restyle. Selecting a theme swaps the snapshot and
//! runs every subscriber before `select` returns. Subscribers run with no
//! lock held, so they may read, select, subscribe or unsubscribe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::{ResolvedTheme, ThemeCatalog, ThemeError, ThemeSelection, ThemeSelector, ThemeTarget};

/// Handle returned by [`SharedTheme::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What changed in a theme update
#[derive(Debug, Clone)]
pub struct ThemeChange {
    /// `None` when the whole selection was replaced at once
    pub target: Option<ThemeTarget>,
    pub theme: Arc<ResolvedTheme>,
    pub generation: u64,
}

type Subscriber = Arc<dyn Fn(&ThemeChange) + Send + Sync>;

pub struct SharedTheme {
    current: RwLock<Arc<ResolvedTheme>>,
    generation: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
}

impl std::fmt::Debug for SharedTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTheme")
            .field("selection", &self.selection())
            .field("generation", &self.generation())
            .finish()
    }
}

impl SharedTheme {
    pub fn new(theme: ResolvedTheme) -> Self {
        Self {
            current: RwLock::new(Arc::new(theme)),
            generation: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// Resolve a full selection into a new shared theme
    pub fn load(catalog: &ThemeCatalog, selection: &ThemeSelection) -> Result<Self, ThemeError> {
        Ok(Self::new(catalog.resolve(selection)?))
    }

    /// Snapshot of the active theme
    pub fn current(&self) -> Arc<ResolvedTheme> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn selection(&self) -> ThemeSelection {
        self.current().selection.clone()
    }

    /// Number of updates applied so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Re-resolve one target from the catalog
    ///
    /// On error the active theme is left untouched.
    pub fn select(
        &self,
        catalog: &ThemeCatalog,
        target: ThemeTarget,
        selector: &ThemeSelector,
    ) -> Result<Arc<ResolvedTheme>, ThemeError> {
        let theme = self.swap(Some(target), |current| {
            let mut theme = current.clone();
            match target {
                ThemeTarget::Viewer => theme.viewer = catalog.resolve_viewer(selector)?,
                ThemeTarget::Editor => theme.editor = catalog.resolve_editor(selector)?,
                ThemeTarget::App => theme.app = catalog.resolve_app(selector)?,
            }
            theme.selection.set(target, selector.clone());
            Ok(theme)
        })?;
        tracing::info!("Selected {} theme {}", target, selector);
        Ok(theme)
    }

    /// Re-resolve all three targets at once
    pub fn apply_selection(
        &self,
        catalog: &ThemeCatalog,
        selection: &ThemeSelection,
    ) -> Result<Arc<ResolvedTheme>, ThemeError> {
        let theme = self.swap(None, |_| catalog.resolve(selection))?;
        tracing::info!(
            "Applied theme selection viewer={} editor={} app={}",
            selection.viewer,
            selection.editor,
            selection.app
        );
        Ok(theme)
    }

    /// Build the next theme from the current one under the write lock, then
    /// notify subscribers with no lock held
    fn swap(
        &self,
        target: Option<ThemeTarget>,
        next: impl FnOnce(&ResolvedTheme) -> Result<ResolvedTheme, ThemeError>,
    ) -> Result<Arc<ResolvedTheme>, ThemeError> {
        let change = {
            let mut guard = match self.current.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let theme = Arc::new(next(&**guard)?);
            *guard = Arc::clone(&theme);
            ThemeChange {
                target,
                theme,
                generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
            }
        };

        let subscribers: Vec<Subscriber> = match self.subscribers.lock() {
            Ok(guard) => guard.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            Err(poisoned) => poisoned.into_inner().iter().map(|(_, cb)| Arc::clone(cb)).collect(),
        };
        for callback in subscribers {
            callback(&change);
        }

        Ok(change.theme)
    }

    /// Register a callback run synchronously after every theme change
    pub fn subscribe(
        &self,
        callback: impl Fn(&ThemeChange) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push((id, Arc::new(callback)));
        }
        id
    }

    /// Remove a callback; returns false when the id was unknown
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }
}
