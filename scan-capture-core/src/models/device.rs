use serde::{Deserialize, Serialize};

/// Reported orientation of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    User,
    Environment,
    Unknown,
}

/// Label fragments that indicate an environment-facing camera.
/// "trase" covers localized "trasera" labels.
const BACK_LABEL_HINTS: &[&str] = &["back", "rear", "trase", "environment"];

/// Label fragments that indicate a user-facing camera.
const FRONT_LABEL_HINTS: &[&str] = &["front", "user", "face", "delante"];

/// A camera input device as reported by the media layer.
///
/// `label` may be empty until a permission probe unlocks device names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
}

impl CameraDevice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Facing inferred from the label alone. Labels are free-form and
    /// platform-dependent, so `Unknown` is common.
    pub fn facing(&self) -> CameraFacing {
        facing_from_label(&self.label)
    }
}

/// Case-insensitive substring classification of a device or track label.
pub(crate) fn facing_from_label(label: &str) -> CameraFacing {
    let lower = label.to_lowercase();
    if BACK_LABEL_HINTS.iter().any(|hint| lower.contains(hint)) {
        CameraFacing::Environment
    } else if FRONT_LABEL_HINTS.iter().any(|hint| lower.contains(hint)) {
        CameraFacing::User
    } else {
        CameraFacing::Unknown
    }
}

/// Settings reported by the track of an opened stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub label: String,
    pub facing: Option<CameraFacing>,
}

impl TrackInfo {
    /// Whether the opened track looks like a front camera.
    ///
    /// Used during candidate verification. Facing metadata is inconsistent
    /// across platforms; this is a confidence heuristic, not proof.
    pub fn looks_user_facing(&self) -> bool {
        self.facing == Some(CameraFacing::User)
            || facing_from_label(&self.label) == CameraFacing::User
    }
}

/// Constraint handed to the media layer to open a stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceConstraint {
    /// Request a camera by facing. `exact` makes the facing mandatory
    /// instead of a preference.
    Facing { facing: CameraFacing, exact: bool },
    /// Request a specific device by id.
    DeviceId(String),
}
