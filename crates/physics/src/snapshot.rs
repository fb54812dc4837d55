//! # Transform Snapshots
//!
//! After each step the world copies every tracked body's pose into two flat
//! float blocks (3 floats of position and 4 of orientation per body), ordered
//! by snapshot slot. The presentation side validates the block lengths before
//! applying anything.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{PhysicsError, Result};
use crate::registry::BodyRegistry;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    /// Step counter the poses belong to.
    pub step: u64,
    /// `x, y, z` per tracked body.
    pub positions: Vec<f32>,
    /// `x, y, z, w` per tracked body.
    pub orientations: Vec<f32>,
}

impl TransformSnapshot {
    pub(crate) fn capture(registry: &BodyRegistry, step: u64) -> Self {
        let mut positions: Vec<[f32; 3]> = Vec::with_capacity(registry.tracked_count());
        let mut orientations: Vec<[f32; 4]> = Vec::with_capacity(registry.tracked_count());
        for body in registry.tracked_handles().iter().filter_map(|&h| registry.get(h).ok()) {
            positions.push(body.position().to_array());
            orientations.push(body.orientation().to_array());
        }
        Self {
            step,
            positions: bytemuck::cast_slice(&positions).to_vec(),
            orientations: bytemuck::cast_slice(&orientations).to_vec(),
        }
    }

    /// Number of bodies the position block describes.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check both blocks against the expected tracked-body count.
    pub fn validate(&self, expected: usize) -> Result<()> {
        if self.positions.len() == expected * 3 && self.orientations.len() == expected * 4 {
            Ok(())
        } else {
            Err(PhysicsError::MalformedSnapshot {
                expected,
                positions: self.positions.len(),
                orientations: self.orientations.len(),
            })
        }
    }

    /// Pose of the body in `slot`.
    pub fn pose(&self, slot: usize) -> Option<(Vec3, Quat)> {
        let positions: &[[f32; 3]] = bytemuck::try_cast_slice(&self.positions).ok()?;
        let orientations: &[[f32; 4]] = bytemuck::try_cast_slice(&self.orientations).ok()?;
        let position = positions.get(slot)?;
        let orientation = orientations.get(slot)?;
        Some((Vec3::from_array(*position), Quat::from_array(*orientation)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Quat)> + '_ {
        (0..self.len()).map_while(|slot| self.pose(slot))
    }
}

/// Receiver of per-slot poses, typically the visual scene.
pub trait Presenter {
    fn apply(&mut self, slot: usize, position: Vec3, orientation: Quat);
}

/// Validate `snapshot` and hand every pose to `presenter`.
///
/// A malformed snapshot is logged and rejected without touching the
/// presenter; the caller simply skips this frame.
pub fn apply_snapshot<P: Presenter + ?Sized>(
    presenter: &mut P,
    snapshot: &TransformSnapshot,
    expected: usize,
) -> Result<()> {
    if let Err(err) = snapshot.validate(expected) {
        error!(step = snapshot.step, %err, "skipping snapshot");
        return Err(err);
    }
    for (slot, (position, orientation)) in snapshot.iter().enumerate() {
        presenter.apply(slot, position, orientation);
    }
    Ok(())
}
