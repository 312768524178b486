use {
    crate::{
        body::{BodiesChanged, TrackableId, TrackedBody},
        broker::TrackingEvents,
        config::Config,
        joint::Joint,
        rig::{Rig, RigPrefab},
        scene::{self, Children, Global3},
        stats,
    },
    ahash::AHashMap,
    bumpalo::Bump,
    hecs::{Entity, World},
    nalgebra as na,
};

struct Binding {
    /// Entity mirroring the tracked body's own transform; the rig hangs
    /// under it.
    anchor: Entity,
    rig: Rig,
}

/// Tracks detected bodies across ticks, retargets their poses onto
/// instantiated rigs and keeps hand-position histories for statistics.
///
/// All mutation funnels through [`BodyTracker::on_bodies_changed`];
/// the binding table is never exposed.
pub struct BodyTracker {
    prefab: RigPrefab,
    filter_window: usize,
    running: bool,
    bindings: AHashMap<TrackableId, Binding>,
    left_hand: Vec<na::Vector3<f32>>,
    right_hand: Vec<na::Vector3<f32>>,
}

impl BodyTracker {
    pub fn new(prefab: RigPrefab, config: &Config) -> Self {
        BodyTracker {
            prefab,
            filter_window: config.filter_window,
            running: false,
            bindings: AHashMap::new(),
            left_hand: Vec::new(),
            right_hand: Vec::new(),
        }
    }

    /// Begins consuming tracking events. Mirrors the source subscription
    /// boundary: events delivered while stopped are ignored.
    pub fn start(&mut self) {
        if !self.running {
            tracing::info!("body tracker started");
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::info!("body tracker stopped");
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Per-tick pass: drains the broker and processes every event.
    pub fn advance(
        &mut self,
        world: &mut World,
        events: &mut TrackingEvents,
        bump: &Bump,
    ) {
        if !self.running {
            return;
        }
        for event in events.read() {
            self.on_bodies_changed(world, &event, bump);
        }
    }

    /// Single synchronous entry point for one tracking update.
    pub fn on_bodies_changed(
        &mut self,
        world: &mut World,
        event: &BodiesChanged,
        bump: &Bump,
    ) {
        for body in &event.added {
            self.add_body(world, body, bump);
        }
        for body in &event.updated {
            self.update_body(world, body);
        }
        for body in &event.removed {
            self.remove_body(world, body.id, bump);
        }

        // The source only ever produces one body anchor; report the first
        // estimate it gives us this tick.
        let height_scale = event
            .added
            .first()
            .or_else(|| event.updated.first())
            .map(|body| body.height_scale);
        if let Some(height_scale) = height_scale {
            tracing::debug!("estimated height scale factor: {:.10}", height_scale);
        }
    }

    fn add_body(&mut self, world: &mut World, body: &TrackedBody, bump: &Bump) {
        if !self.bindings.contains_key(&body.id) {
            tracing::info!("adding a new skeleton [{}]", body.id);
            let anchor = world.spawn((Global3::from_iso(body.pose), Children::default()));
            let rig = Rig::instantiate(&self.prefab, anchor, world, bump);
            self.bindings.insert(body.id, Binding { anchor, rig });
        }

        // Newly bound or not, the pose is applied.
        if let Some(binding) = self.bindings.get(&body.id) {
            binding.rig.mapping().apply_pose(world, body);
        }
    }

    fn update_body(&mut self, world: &mut World, body: &TrackedBody) {
        let binding = match self.bindings.get(&body.id) {
            Some(binding) => binding,
            // No implicit creation on update.
            None => return,
        };

        if let Ok(mut global) = world.get_mut::<Global3>(binding.anchor) {
            *global = Global3::from_iso(body.pose);
        }
        binding.rig.mapping().apply_pose(world, body);

        if let Some(sample) = body.joint(Joint::LEFT_HAND_ANCHOR) {
            self.left_hand.push(sample.anchor_pose.translation.vector);
        }
        if let Some(sample) = body.joint(Joint::RIGHT_HAND_ANCHOR) {
            self.right_hand.push(sample.anchor_pose.translation.vector);
        }

        self.report_hand_stats();
    }

    fn remove_body(&mut self, world: &mut World, id: TrackableId, bump: &Bump) {
        // Unknown ids are not an error.
        if let Some(binding) = self.bindings.remove(&id) {
            tracing::info!("removing a skeleton [{}]", id);
            scene::despawn_subtree(world, binding.anchor, bump);
        }
    }

    fn report_hand_stats(&self) {
        for &(side, history) in &[("left", &self.left_hand), ("right", &self.right_hand)] {
            let filtered = stats::vertical_minima(history, self.filter_window);
            match (stats::mean(&filtered), stats::standard_deviation(&filtered)) {
                (Ok(mean), Ok(sd)) => tracing::info!(
                    "{} hand mean: ({:.3}, {:.3}, {:.3}) sd: ({:.3}, {:.3}, {:.3})",
                    side,
                    mean.x,
                    mean.y,
                    mean.z,
                    sd.x,
                    sd.y,
                    sd.z,
                ),
                // Not enough filtered samples yet.
                _ => {}
            }
        }
    }

    /// Anchor entities of all currently bound bodies, e.g. for a global
    /// transform refresh.
    pub fn anchors(&self) -> impl Iterator<Item = Entity> + '_ {
        self.bindings.values().map(|binding| binding.anchor)
    }

    pub fn rig(&self, id: TrackableId) -> Option<&Rig> {
        self.bindings.get(&id).map(|binding| &binding.rig)
    }

    pub fn tracked_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn left_hand_history(&self) -> &[na::Vector3<f32>] {
        &self.left_hand
    }

    pub fn right_hand_history(&self) -> &[na::Vector3<f32>] {
        &self.right_hand
    }

    /// External reset of the hand histories.
    pub fn clear_history(&mut self) {
        self.left_hand.clear();
        self.right_hand.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> BodyTracker {
        let mut tracker =
            BodyTracker::new(RigPrefab::full_skeleton(), &Config::default());
        tracker.start();
        tracker
    }

    #[test]
    fn start_stop_gates_advance() {
        let mut world = World::new();
        let bump = Bump::new();
        let mut events = TrackingEvents::new();
        let mut tracker = tracker();
        tracker.stop();

        let mut event = BodiesChanged::default();
        event.added.push(TrackedBody::with_joints(TrackableId(1, 1)));
        events.add(event);

        tracker.advance(&mut world, &mut events, &bump);
        assert_eq!(tracker.tracked_count(), 0);

        tracker.start();
        tracker.advance(&mut world, &mut events, &bump);
        assert_eq!(tracker.tracked_count(), 1);
    }

    #[test]
    fn histories_reset_on_clear() {
        let mut world = World::new();
        let bump = Bump::new();
        let id = TrackableId(3, 4);
        let mut tracker = tracker();

        let mut event = BodiesChanged::default();
        event.added.push(TrackedBody::with_joints(id));
        tracker.on_bodies_changed(&mut world, &event, &bump);

        let mut event = BodiesChanged::default();
        event.updated.push(TrackedBody::with_joints(id));
        tracker.on_bodies_changed(&mut world, &event, &bump);
        assert_eq!(tracker.left_hand_history().len(), 1);

        tracker.clear_history();
        assert!(tracker.left_hand_history().is_empty());
        assert!(tracker.right_hand_history().is_empty());
    }
}
