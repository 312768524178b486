use {
    crate::joint::Joint,
    nalgebra as na,
    std::fmt::{self, Display},
};

/// Opaque identifier of one physically tracked body.
///
/// Stable for the lifetime of the body and never reused while the body is
/// still tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackableId(pub u64, pub u64);

impl Display for TrackableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{:016x}-{:016x}", self.0, self.1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    None,
    Limited,
    Tracking,
}

/// One joint of a body's full joint set as delivered by the tracking
/// source. `local_pose` is relative to the parent joint, `anchor_pose` is
/// in the body anchor's space and is the one sampled for statistics.
#[derive(Clone, Copy, Debug)]
pub struct JointSample {
    pub index: u8,
    pub parent: Option<u8>,
    pub local_scale: na::Vector3<f32>,
    pub local_pose: na::Isometry3<f32>,
    pub anchor_scale: na::Vector3<f32>,
    pub anchor_pose: na::Isometry3<f32>,
    pub tracked: bool,
}

impl JointSample {
    pub fn identity(joint: Joint) -> Self {
        JointSample {
            index: joint.index() as u8,
            parent: joint.parent().map(|parent| parent.index() as u8),
            local_scale: na::Vector3::new(1.0, 1.0, 1.0),
            local_pose: na::Isometry3::identity(),
            anchor_scale: na::Vector3::new(1.0, 1.0, 1.0),
            anchor_pose: na::Isometry3::identity(),
            tracked: false,
        }
    }
}

/// Snapshot of one tracked body for a single update tick.
#[derive(Clone, Debug)]
pub struct TrackedBody {
    pub id: TrackableId,
    /// World pose of the body anchor itself.
    pub pose: na::Isometry3<f32>,
    /// Empty until the source has created the joint set,
    /// `Joint::COUNT` entries afterwards.
    pub joints: Vec<JointSample>,
    /// Estimated height scale factor relative to the default skeleton.
    pub height_scale: f32,
    pub state: TrackingState,
}

impl TrackedBody {
    pub fn new(id: TrackableId) -> Self {
        TrackedBody {
            id,
            pose: na::Isometry3::identity(),
            joints: Vec::new(),
            height_scale: 1.0,
            state: TrackingState::Tracking,
        }
    }

    /// A body with the full joint set created, every joint at identity.
    pub fn with_joints(id: TrackableId) -> Self {
        let mut body = TrackedBody::new(id);
        body.joints = Joint::ALL.iter().map(|&joint| JointSample::identity(joint)).collect();
        body
    }

    pub fn joints_created(&self) -> bool {
        !self.joints.is_empty()
    }

    pub fn joint(&self, joint: Joint) -> Option<&JointSample> {
        self.joints.get(joint.index())
    }

    pub fn joint_mut(&mut self, joint: Joint) -> Option<&mut JointSample> {
        self.joints.get_mut(joint.index())
    }
}

/// Per-tick payload from the tracking source. The three sets are disjoint.
#[derive(Clone, Debug, Default)]
pub struct BodiesChanged {
    pub added: Vec<TrackedBody>,
    pub updated: Vec<TrackedBody>,
    pub removed: Vec<TrackedBody>,
}

impl BodiesChanged {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}
