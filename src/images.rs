use crate::errors::ServiceError;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Number of image slots every warehouse carries.
pub const SLOT_COUNT: usize = 4;

/// The four fixed image positions, in slot order.
///
/// | index | meaning    |
/// |-------|------------|
/// | 0     | Front      |
/// | 1     | Docks/Gate |
/// | 2     | Covered    |
/// | 3     | Outside    |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSlot {
    Front = 0,
    DocksGate = 1,
    Covered = 2,
    Outside = 3,
}

/// Fixed-length image slot array stored on each warehouse. Always exactly
/// four entries; an empty string marks a vacant slot. Persisted as a JSON
/// column and serialized on the wire as a plain 4-element array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageSlots(pub [String; SLOT_COUNT]);

impl Default for ImageSlots {
    fn default() -> Self {
        Self(std::array::from_fn(|_| String::new()))
    }
}

impl ImageSlots {
    /// Map freshly stored upload paths onto empty slots. Uploads are
    /// positional: path `i` lands in slot `i`.
    pub fn from_uploads(paths: &[String]) -> Result<Self, ServiceError> {
        Self::default().with_uploads(paths)
    }

    /// Merge new upload paths over these slots: slot `i` takes the new path
    /// if one was supplied, otherwise keeps its prior value.
    pub fn with_uploads(&self, paths: &[String]) -> Result<Self, ServiceError> {
        if paths.len() > SLOT_COUNT {
            return Err(ServiceError::Validation(
                "Maximum 4 images allowed".to_string(),
            ));
        }
        let mut slots = self.0.clone();
        for (slot, path) in slots.iter_mut().zip(paths.iter()) {
            *slot = path.clone();
        }
        Ok(Self(slots))
    }

    /// Path stored in the given slot, if any.
    pub fn get(&self, slot: ImageSlot) -> Option<&str> {
        let value = self.0[slot as usize].as_str();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|s| s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn no_uploads_yields_four_empty_slots() {
        let slots = ImageSlots::from_uploads(&[]).unwrap();
        assert_eq!(slots.0.len(), SLOT_COUNT);
        assert!(slots.is_empty());
    }

    #[test]
    fn uploads_fill_slots_positionally() {
        let slots = ImageSlots::from_uploads(&paths(&["/a.jpg", "/b.jpg"])).unwrap();
        assert_eq!(slots.get(ImageSlot::Front), Some("/a.jpg"));
        assert_eq!(slots.get(ImageSlot::DocksGate), Some("/b.jpg"));
        assert_eq!(slots.get(ImageSlot::Covered), None);
        assert_eq!(slots.get(ImageSlot::Outside), None);
    }

    #[test]
    fn merge_preserves_unreplaced_slots() {
        let existing =
            ImageSlots::from_uploads(&paths(&["/a.jpg", "/b.jpg", "", "/d.jpg"])).unwrap();
        let merged = existing.with_uploads(&paths(&["/new.jpg"])).unwrap();
        assert_eq!(merged.get(ImageSlot::Front), Some("/new.jpg"));
        assert_eq!(merged.get(ImageSlot::DocksGate), Some("/b.jpg"));
        assert_eq!(merged.get(ImageSlot::Covered), None);
        assert_eq!(merged.get(ImageSlot::Outside), Some("/d.jpg"));
    }

    #[test]
    fn more_than_four_uploads_is_rejected() {
        let err = ImageSlots::from_uploads(&paths(&["/1", "/2", "/3", "/4", "/5"])).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn serializes_as_plain_array() {
        let slots = ImageSlots::from_uploads(&paths(&["/a.jpg"])).unwrap();
        let json = serde_json::to_value(&slots).unwrap();
        assert_eq!(json, serde_json::json!(["/a.jpg", "", "", ""]));
    }
}
