//! Scripted pointer input.
//!
//! Stands in for a mouse: a list of frame-indexed actions that the frame loop
//! forwards to the simulation as drag commands. Points are world positions;
//! picking what lies under the cursor is the caller's business.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Grab the ball at `point`.
    Grab { point: Vec3 },
    Move { point: Vec3 },
    Release { throw: bool },
}

#[derive(Debug, Clone, Default)]
pub struct PointerScript {
    actions: Vec<(u64, PointerAction)>,
    cursor: usize,
}

impl PointerScript {
    /// Actions are replayed in frame order; ties keep insertion order.
    pub fn new(mut actions: Vec<(u64, PointerAction)>) -> Self {
        actions.sort_by_key(|&(frame, _)| frame);
        Self { actions, cursor: 0 }
    }

    /// Grab the ball at `ball`, lift it and swing it towards `target`, then
    /// let go with a throw.
    pub fn throw_demo(ball: Vec3, target: Vec3) -> Self {
        const GRAB_FRAME: u64 = 30;
        const LIFT_FRAMES: u64 = 20;
        const SWING_FRAMES: u64 = 10;

        let lifted = ball + Vec3::new(0.0, 1.2, 0.0);
        let toward = Vec3::new(target.x - ball.x, 0.0, target.z - ball.z).normalize_or_zero();
        let swung = lifted + toward * 0.8 + Vec3::new(0.0, 0.6, 0.0);

        let mut actions = vec![(GRAB_FRAME, PointerAction::Grab { point: ball })];
        for i in 1..=LIFT_FRAMES {
            let t = i as f32 / LIFT_FRAMES as f32;
            actions.push((GRAB_FRAME + i, PointerAction::Move { point: ball.lerp(lifted, t) }));
        }
        for i in 1..=SWING_FRAMES {
            let t = i as f32 / SWING_FRAMES as f32;
            actions.push((
                GRAB_FRAME + LIFT_FRAMES + i,
                PointerAction::Move { point: lifted.lerp(swung, t) },
            ));
        }
        actions.push((
            GRAB_FRAME + LIFT_FRAMES + SWING_FRAMES + 1,
            PointerAction::Release { throw: true },
        ));
        Self::new(actions)
    }

    /// Actions due at or before `frame` that have not been handed out yet.
    pub fn due(&mut self, frame: u64) -> Vec<PointerAction> {
        let start = self.cursor;
        while self
            .actions
            .get(self.cursor)
            .is_some_and(|&(at, _)| at <= frame)
        {
            self.cursor += 1;
        }
        self.actions[start..self.cursor]
            .iter()
            .map(|&(_, action)| action)
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.actions.len()
    }

    /// Frame of the last scripted action.
    pub fn last_frame(&self) -> Option<u64> {
        self.actions.last().map(|&(frame, _)| frame)
    }
}
