use crate::bindings::{bind_image, ImageRequest};
use crate::models::Property;
use crate::overview::diff::{apply_updates, calculate_diff, ItemCallback, ListUpdate};
use std::sync::Arc;
use tracing::debug;

/// Pairs grid slots by listing id; a slot is rebound only when its
/// property actually changed
pub struct PropertyDiffCallback;

impl ItemCallback<Arc<Property>> for PropertyDiffCallback {
    fn are_items_the_same(&self, old_item: &Arc<Property>, new_item: &Arc<Property>) -> bool {
        old_item.id == new_item.id
    }

    fn are_contents_the_same(&self, old_item: &Arc<Property>, new_item: &Arc<Property>) -> bool {
        Arc::ptr_eq(old_item, new_item) || **old_item == **new_item
    }
}

/// One bound cell of the photo grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub position: usize,
    pub property: Arc<Property>,
    pub image: Option<ImageRequest>,
}

/// Keeps the grid's rendered list in step with submitted property lists
#[derive(Default)]
pub struct PhotoGridAdapter {
    items: Vec<Arc<Property>>,
}

impl PhotoGridAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile with `list` (`None` clears the grid) and return the updates
    /// that were applied to the rendered list
    pub fn submit_list(&mut self, list: Option<Vec<Arc<Property>>>) -> Vec<ListUpdate> {
        let list = list.unwrap_or_default();
        let updates = calculate_diff(&self.items, &list, &PropertyDiffCallback);
        apply_updates(&mut self.items, &list, &updates);
        debug!(
            "Grid now shows {} properties after {} updates",
            self.items.len(),
            updates.len()
        );
        updates
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn get_item(&self, position: usize) -> Option<&Arc<Property>> {
        self.items.get(position)
    }

    /// Build the cell for `position` as it scrolls into view
    pub fn bind(&self, position: usize) -> Option<GridCell> {
        let property = self.items.get(position)?;
        Some(GridCell {
            position,
            property: Arc::clone(property),
            image: bind_image(Some(property.img_src_url.as_str())),
        })
    }
}
