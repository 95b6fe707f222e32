//! Ordered collection of vector objects.

use crate::error::{CanvasError, CanvasResult};
use crate::geometry;
use crate::shapes::{CanvasObject, ObjectId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vector objects keyed by id, painted back to front in `z_order`.
///
/// Cloning a scene is a deep copy; ids are preserved so a selection made
/// before a snapshot still resolves after a restore.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    objects: HashMap<ObjectId, CanvasObject>,
    z_order: Vec<ObjectId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object on top of everything else.
    pub fn add(&mut self, object: CanvasObject) -> ObjectId {
        let id = object.id();
        if self.objects.insert(id, object).is_some() {
            self.z_order.retain(|&existing| existing != id);
        }
        self.z_order.push(id);
        id
    }

    /// Remove an object.
    pub fn remove(&mut self, id: ObjectId) -> Option<CanvasObject> {
        self.z_order.retain(|&existing| existing != id);
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Objects in paint order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CanvasObject> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Ids in paint order.
    pub fn ids(&self) -> &[ObjectId] {
        &self.z_order
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.z_order.clear();
    }

    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Topmost object whose click area contains `point`.
    pub fn pick_topmost(&self, point: Point) -> Option<&CanvasObject> {
        geometry::pick_topmost(self.iter(), point)
    }

    /// Check that the paint order and the object map describe the same set.
    pub fn validate(&self) -> CanvasResult<()> {
        if self.z_order.len() != self.objects.len() {
            return Err(CanvasError::StateSerialization(format!(
                "{} ids in paint order but {} objects",
                self.z_order.len(),
                self.objects.len()
            )));
        }
        for id in &self.z_order {
            match self.objects.get(id) {
                Some(object) if object.id() == *id => {}
                Some(_) => {
                    return Err(CanvasError::StateSerialization(format!(
                        "object stored under {id} carries a different id"
                    )));
                }
                None => {
                    return Err(CanvasError::StateSerialization(format!(
                        "paint order references missing object {id}"
                    )));
                }
            }
        }
        Ok(())
    }
}
