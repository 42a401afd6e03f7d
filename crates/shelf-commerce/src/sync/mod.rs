//! UI sync layer.
//!
//! One source of truth (cart + currency selection) is projected once per
//! change and published to every registered [`Surface`]. Surfaces never
//! patch what they show; each render regenerates it, so two surfaces showing
//! the same value cannot disagree after a publish.

mod projection;
mod surfaces;

use std::cell::RefCell;
use std::rc::Rc;

pub use projection::{CartLineView, CartView, Projection, SyncCause};
pub use surfaces::{CartDrawer, CheckoutSummary, DrawerRow, HeaderBadge, ProductPrices};

/// A renderer translating projections into presentation.
pub trait Surface {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Replace everything shown with what `projection` describes.
    fn render(&mut self, projection: &Projection, cause: SyncCause);
}

/// Publishes projections to every registered surface.
#[derive(Default)]
pub struct SyncHub {
    surfaces: Vec<Rc<RefCell<dyn Surface>>>,
}

impl SyncHub {
    /// Create a hub with no surfaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `surface` and return a handle for reading it back.
    pub fn register<S: Surface + 'static>(&mut self, surface: S) -> Rc<RefCell<S>> {
        let handle = Rc::new(RefCell::new(surface));
        self.surfaces.push(handle.clone());
        handle
    }

    /// Register a surface that is already shared.
    pub fn register_shared(&mut self, surface: Rc<RefCell<dyn Surface>>) {
        self.surfaces.push(surface);
    }

    /// Render `projection` into every surface.
    pub fn publish(&self, projection: &Projection, cause: SyncCause) {
        for surface in &self.surfaces {
            match surface.try_borrow_mut() {
                Ok(mut surface) => surface.render(projection, cause),
                Err(_) => {
                    // A surface re-entered the hub from its own render; the
                    // outer render is already producing the same projection.
                    tracing::debug!(?cause, "skipping surface busy rendering");
                }
            }
        }
        tracing::trace!(?cause, surfaces = self.surfaces.len(), "published");
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Check if no surfaces are registered.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
