//! Ordered stream-open candidates, most confident first.

use crate::devices::enumerator::guess_back_index;
use crate::models::device::{CameraDevice, CameraFacing, SourceConstraint};

/// One attempt at opening a capture: a constraint plus the reason it is
/// worth trying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub constraint: SourceConstraint,
    pub rationale: &'static str,
}

impl Candidate {
    fn new(constraint: SourceConstraint, rationale: &'static str) -> Self {
        Self {
            constraint,
            rationale,
        }
    }

    /// Sole candidate used when the user has pinned a device manually.
    pub fn manual(device_id: &str) -> Self {
        Self::new(
            SourceConstraint::DeviceId(device_id.to_string()),
            "manually selected device",
        )
    }
}

/// Build the ordered candidate list for a start attempt.
///
/// Order encodes decreasing confidence; each candidate is tried only
/// after the previous one fails to open or fails verification:
/// 1. exact environment-facing constraint,
/// 2. the guessed back-camera device id,
/// 3. every other device id, in reverse enumeration order,
/// 4. loose environment-facing constraint,
/// 5. loose user-facing constraint, so some camera always opens.
///
/// Never empty, even with zero enumerated devices.
pub fn build(devices: &[CameraDevice]) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(devices.len() + 3);

    candidates.push(Candidate::new(
        SourceConstraint::Facing {
            facing: CameraFacing::Environment,
            exact: true,
        },
        "exact environment-facing constraint",
    ));

    if !devices.is_empty() {
        let back = guess_back_index(devices);
        candidates.push(Candidate::new(
            SourceConstraint::DeviceId(devices[back].id.clone()),
            "guessed back camera from label or position",
        ));
        for (index, device) in devices.iter().enumerate().rev() {
            if index == back {
                continue;
            }
            candidates.push(Candidate::new(
                SourceConstraint::DeviceId(device.id.clone()),
                "remaining device, reverse enumeration order",
            ));
        }
    }

    candidates.push(Candidate::new(
        SourceConstraint::Facing {
            facing: CameraFacing::Environment,
            exact: false,
        },
        "loose environment-facing constraint",
    ));
    candidates.push(Candidate::new(
        SourceConstraint::Facing {
            facing: CameraFacing::User,
            exact: false,
        },
        "user-facing last resort",
    ));

    candidates
}
