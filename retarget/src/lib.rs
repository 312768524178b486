//! Retargets tracked human-body poses onto instantiated skeleton rigs and
//! derives outlier-filtered statistics from hand joint positions.

pub mod body;
pub mod broker;
pub mod config;
pub mod joint;
pub mod rig;
pub mod scene;
pub mod stats;
pub mod tracker;

pub use self::{
    body::{BodiesChanged, JointSample, TrackableId, TrackedBody, TrackingState},
    broker::{EventBroker, TrackingEvents},
    config::Config,
    joint::Joint,
    rig::{BoneMapping, Rig, RigPrefab},
    tracker::BodyTracker,
};
