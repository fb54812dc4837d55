//! Visuals driven by snapshots.
//!
//! One [`Visual`] per snapshot slot, registered in the same order the tracked
//! bodies were created. Static scenery gets a fixed transform once and is
//! never touched by snapshots.

use glam::{Quat, Vec3};
use hoops_physics::transform::{
    to_transform_matrix, to_transform_matrix_scaled, to_transform_matrix_with_offset,
};
use hoops_physics::{apply_snapshot, Pose, Presenter, TransformSnapshot};
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub name: String,
    pub scale: Vec3,
    /// Last pose applied, `None` until the first snapshot arrives.
    pub pose: Option<(Vec3, Quat)>,
    pub transform: [[f32; 4]; 4],
}

#[derive(Debug, Default)]
pub struct VisualRegistry {
    visuals: Vec<Visual>,
    scenery: Vec<(String, [[f32; 4]; 4])>,
    applied_frames: u64,
    skipped_frames: u64,
    last_step: u64,
}

impl VisualRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the visual for the next snapshot slot and return that slot.
    pub fn register(&mut self, name: impl Into<String>, scale: Vec3) -> usize {
        self.visuals.push(Visual {
            name: name.into(),
            scale,
            pose: None,
            transform: to_transform_matrix(Vec3::ZERO, Quat::IDENTITY),
        });
        self.visuals.len() - 1
    }

    /// Place a piece of static scenery that hangs off a body at `offset`.
    pub fn place_scenery(&mut self, name: impl Into<String>, body: &Pose, offset: &Pose) {
        let transform = to_transform_matrix_with_offset(body.position, body.orientation, offset);
        self.scenery.push((name.into(), transform));
    }

    /// Apply `snapshot` if it matches the registered visuals. Returns whether
    /// the frame was applied; mismatched frames are skipped whole.
    pub fn present(&mut self, snapshot: &TransformSnapshot) -> bool {
        let expected = self.visuals.len();
        if apply_snapshot(self, snapshot, expected).is_ok() {
            self.applied_frames += 1;
            self.last_step = snapshot.step;
            true
        } else {
            self.skipped_frames += 1;
            false
        }
    }

    pub fn visual(&self, slot: usize) -> Option<&Visual> {
        self.visuals.get(slot)
    }

    pub fn position(&self, slot: usize) -> Option<Vec3> {
        self.visual(slot)?.pose.map(|(position, _)| position)
    }

    pub fn scenery(&self) -> &[(String, [[f32; 4]; 4])] {
        &self.scenery
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn applied_frames(&self) -> u64 {
        self.applied_frames
    }

    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Step counter of the last applied snapshot.
    pub fn last_step(&self) -> u64 {
        self.last_step
    }
}

impl Presenter for VisualRegistry {
    fn apply(&mut self, slot: usize, position: Vec3, orientation: Quat) {
        if let Some(visual) = self.visuals.get_mut(slot) {
            visual.pose = Some((position, orientation));
            visual.transform = to_transform_matrix_scaled(position, orientation, visual.scale);
            trace!(slot, name = %visual.name, %position, "visual moved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(step: u64, positions: Vec<f32>, orientations: Vec<f32>) -> TransformSnapshot {
        TransformSnapshot {
            step,
            positions,
            orientations,
        }
    }

    #[test]
    fn applies_matching_snapshot() {
        let mut visuals = VisualRegistry::new();
        let slot = visuals.register("ball", Vec3::splat(0.29));
        assert_eq!(slot, 0);

        let applied = visuals.present(&snapshot(3, vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0, 1.0]));
        assert!(applied);
        assert_eq!(visuals.position(0), Some(Vec3::new(1.0, 2.0, 3.0)));
        let transform = visuals.visual(0).unwrap().transform;
        assert!((transform[0][0] - 0.29).abs() < 1e-6);
        assert_eq!(transform[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(visuals.last_step(), 3);
    }

    #[test]
    fn skips_snapshot_for_unknown_body_count() {
        let mut visuals = VisualRegistry::new();
        visuals.register("ball", Vec3::ONE);
        visuals.register("second ball", Vec3::ONE);

        let applied = visuals.present(&snapshot(1, vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0, 1.0]));
        assert!(!applied);
        assert_eq!(visuals.skipped_frames(), 1);
        assert_eq!(visuals.applied_frames(), 0);
        assert_eq!(visuals.position(0), None);
    }

    #[test]
    fn scenery_follows_its_body() {
        let mut visuals = VisualRegistry::new();
        visuals.place_scenery(
            "backboard",
            &Pose::from_position(Vec3::new(-7.5, 3.0, 0.0)),
            &Pose::from_position(Vec3::new(-0.4, 0.36, 0.0)),
        );
        let (name, transform) = &visuals.scenery()[0];
        assert_eq!(name, "backboard");
        assert!((transform[3][0] + 7.9).abs() < 1e-5);
        assert!((transform[3][1] - 3.36).abs() < 1e-5);
    }
}
