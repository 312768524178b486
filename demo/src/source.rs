use {
    nalgebra as na,
    rand::Rng,
    retarget::{BodiesChanged, Joint, TrackableId, TrackedBody},
};

/// Stand-in for a real tracking source: one body that appears, waves its
/// hands for a while and disappears on the last tick.
pub struct SyntheticSource {
    id: TrackableId,
    tick: u32,
    ticks: u32,
    jitter: f32,
}

impl SyntheticSource {
    pub fn new<R: Rng>(ticks: u32, jitter: f32, rng: &mut R) -> Self {
        SyntheticSource {
            id: TrackableId(rng.gen(), rng.gen()),
            tick: 0,
            ticks,
            jitter,
        }
    }

    pub fn next_event<R: Rng>(&mut self, rng: &mut R) -> Option<BodiesChanged> {
        if self.tick >= self.ticks {
            return None;
        }
        let tick = self.tick;
        self.tick += 1;

        let mut body = TrackedBody::with_joints(self.id);
        body.pose = na::Isometry3::translation(0.0, 0.0, -2.0);
        body.height_scale = 1.04;

        let t = tick as f32 * 0.25;
        let left_y = 0.9 + 0.15 * t.sin() + self.noise(rng);
        let right_y = 0.9 + 0.15 * (t + std::f32::consts::FRAC_PI_2).sin() + self.noise(rng);

        body.joint_mut(Joint::LEFT_HAND_ANCHOR).unwrap().anchor_pose =
            na::Isometry3::translation(-0.3, left_y, -1.8);
        body.joint_mut(Joint::RIGHT_HAND_ANCHOR).unwrap().anchor_pose =
            na::Isometry3::translation(0.3, right_y, -1.8);

        let mut event = BodiesChanged::default();
        if tick == 0 {
            event.added.push(body);
        } else if tick + 1 == self.ticks {
            event.removed.push(body);
        } else {
            event.updated.push(body);
        }
        Some(event)
    }

    fn noise<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.jitter > 0.0 {
            rng.gen_range(-self.jitter..self.jitter)
        } else {
            0.0
        }
    }
}
