use {
    crate::{
        body::TrackedBody,
        joint::Joint,
        scene::{self, Children, Local3, Name},
    },
    bumpalo::{collections::Vec as BVec, Bump},
    color_eyre::Report,
    eyre::WrapErr,
    hecs::{Entity, World},
    nalgebra as na,
    std::path::Path,
};

/// Serialized description of one rig node.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PrefabNode {
    pub name: String,
    /// Index of the parent node within the prefab.
    /// `None` attaches the node to the rig root.
    pub parent: Option<usize>,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default = "rotation_identity")]
    pub rotation: [f32; 4],
}

fn rotation_identity() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl PrefabNode {
    fn iso(&self) -> na::Isometry3<f32> {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz, rw] = self.rotation;
        na::Isometry3 {
            rotation: na::Unit::new_normalize(na::Quaternion::new(rw, rx, ry, rz)),
            translation: na::Translation3::new(tx, ty, tz),
        }
    }
}

/// Skeleton hierarchy instantiated once per tracked body.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RigPrefab {
    pub nodes: Vec<PrefabNode>,
}

impl RigPrefab {
    /// The canonical full-body skeleton: one node per joint label,
    /// parented along the joint hierarchy, all transforms at identity.
    pub fn full_skeleton() -> Self {
        RigPrefab {
            nodes: Joint::ALL
                .iter()
                .map(|&joint| PrefabNode {
                    name: joint.name().to_owned(),
                    parent: joint.parent().map(Joint::index),
                    translation: [0.0; 3],
                    rotation: rotation_identity(),
                })
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Report> {
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to open rig prefab '{}'", path.display()))?;
        Ok(ron::de::from_reader(file)?)
    }
}

/// Association of joint slots with the scene nodes of one rig.
///
/// Owned by the rig it was built for. Rebuilding clears every slot first,
/// so a slot never retains a node from a previous traversal.
pub struct BoneMapping {
    nodes: [Option<Entity>; Joint::COUNT],
}

impl BoneMapping {
    pub fn empty() -> Self {
        BoneMapping {
            nodes: [None; Joint::COUNT],
        }
    }

    /// Builds a mapping by breadth-first traversal from `root`.
    ///
    /// Every traversed node except `root` itself is classified by its
    /// `Name` against the joint labels. Unrecognized names are warned
    /// about and skipped; duplicate labels overwrite (last one wins).
    pub fn build(world: &World, root: Entity, bump: &Bump) -> Self {
        let mut mapping = BoneMapping::empty();
        mapping.rebuild(world, root, bump);
        mapping
    }

    pub fn rebuild(&mut self, world: &World, root: Entity, bump: &Bump) {
        self.nodes = [None; Joint::COUNT];

        let mut queue = BVec::new_in(bump);
        queue.push(root);
        let mut head = 0;

        while head < queue.len() {
            let node = queue[head];
            head += 1;

            if let Ok(children) = world.get::<Children>(node) {
                queue.extend(children.iter());
            }

            if node == root {
                continue;
            }

            let name = match world.get::<Name>(node) {
                Ok(name) => name,
                Err(_) => continue,
            };

            match Joint::from_name(name.as_str()) {
                Some(joint) => self.nodes[joint.index()] = Some(node),
                None => {
                    tracing::warn!("node name '{}' not recognized as a joint", name.as_str())
                }
            }
        }
    }

    pub fn node(&self, joint: Joint) -> Option<Entity> {
        self.nodes[joint.index()]
    }

    pub fn mapped_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Retargets `body`'s local joint poses onto the mapped nodes.
    ///
    /// Does nothing when the body's joint set has not been created yet.
    /// Unmapped slots are skipped.
    pub fn apply_pose(&self, world: &World, body: &TrackedBody) {
        if !body.joints_created() {
            return;
        }

        for (slot, sample) in self.nodes.iter().zip(&body.joints) {
            let node = match slot {
                Some(node) => *node,
                None => continue,
            };
            if let Ok(mut local) = world.get_mut::<Local3>(node) {
                local.iso = sample.local_pose;
            }
        }
    }
}

/// One instantiated skeleton with its bone mapping, bound to a single
/// tracked body.
pub struct Rig {
    root: Entity,
    mapping: BoneMapping,
}

impl Rig {
    /// Spawns `prefab` under `parent` and maps its bones. The returned
    /// handle is the only owner of the mapping.
    pub fn instantiate(
        prefab: &RigPrefab,
        parent: Entity,
        world: &mut World,
        bump: &Bump,
    ) -> Rig {
        let root = scene::spawn_node(world, parent, "Skeleton", na::Isometry3::identity());

        let mut spawned = Vec::with_capacity(prefab.nodes.len());
        for (index, node) in prefab.nodes.iter().enumerate() {
            let parent_entity = match node.parent {
                None => root,
                Some(parent_index) if parent_index < index => spawned[parent_index],
                Some(parent_index) => {
                    tracing::warn!(
                        "prefab node '{}' refers to parent {} ahead of it, attaching to root",
                        node.name,
                        parent_index,
                    );
                    root
                }
            };
            let entity = scene::spawn_node(world, parent_entity, &node.name, node.iso());
            spawned.push(entity);
        }

        let mapping = BoneMapping::build(world, root, bump);
        Rig { root, mapping }
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn mapping(&self) -> &BoneMapping {
        &self.mapping
    }

    pub fn mapping_mut(&mut self) -> &mut BoneMapping {
        &mut self.mapping
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{body::TrackableId, scene::Global3},
        std::sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    fn world_with_root() -> (World, Entity) {
        let mut world = World::new();
        let root = world.spawn((Global3::identity(), Children::default()));
        (world, root)
    }

    /// Counts warning events emitted on the current thread.
    struct WarnCount(Arc<AtomicUsize>);

    impl tracing::Subscriber for WarnCount {
        fn enabled(&self, metadata: &tracing::Metadata<'_>) -> bool {
            *metadata.level() == tracing::Level::WARN
        }

        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }

        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

        fn event(&self, _: &tracing::Event<'_>) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }

        fn enter(&self, _: &tracing::span::Id) {}

        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn full_skeleton_maps_every_slot() {
        let (mut world, parent) = world_with_root();
        let bump = Bump::new();

        let rig = Rig::instantiate(&RigPrefab::full_skeleton(), parent, &mut world, &bump);

        assert_eq!(rig.mapping().mapped_count(), Joint::COUNT);
        for &joint in &Joint::ALL {
            assert!(rig.mapping().node(joint).is_some());
        }
    }

    #[test]
    fn prefab_load_error_names_the_path() {
        let err = RigPrefab::load(Path::new("./no-such-rig.ron")).unwrap_err();
        assert!(format!("{:#}", err).contains("no-such-rig.ron"));
    }

    #[test]
    fn unrecognized_names_are_omitted_and_warned_once() {
        let (mut world, parent) = world_with_root();
        let bump = Bump::new();

        let root = scene::spawn_node(&mut world, parent, "Skeleton", na::Isometry3::identity());
        scene::spawn_node(&mut world, root, "Hips", na::Isometry3::identity());
        scene::spawn_node(&mut world, root, "Pelvis", na::Isometry3::identity());
        scene::spawn_node(&mut world, root, "Backpack", na::Isometry3::identity());

        let warnings = Arc::new(AtomicUsize::new(0));
        let mapping = tracing::subscriber::with_default(WarnCount(warnings.clone()), || {
            BoneMapping::build(&world, root, &bump)
        });

        assert_eq!(mapping.mapped_count(), 1);
        assert!(mapping.node(Joint::Hips).is_some());
        // One diagnostic per unrecognized name, nothing more.
        assert_eq!(warnings.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn traversal_root_is_not_classified() {
        let (mut world, parent) = world_with_root();
        let bump = Bump::new();

        // A root named after a joint is only a traversal seed.
        let root = scene::spawn_node(&mut world, parent, "Hips", na::Isometry3::identity());
        scene::spawn_node(&mut world, root, "Head", na::Isometry3::identity());

        let mapping = BoneMapping::build(&world, root, &bump);

        assert!(mapping.node(Joint::Hips).is_none());
        assert!(mapping.node(Joint::Head).is_some());
    }

    #[test]
    fn duplicate_label_last_one_wins() {
        let (mut world, parent) = world_with_root();
        let bump = Bump::new();

        let root = scene::spawn_node(&mut world, parent, "Skeleton", na::Isometry3::identity());
        let _first = scene::spawn_node(&mut world, root, "Head", na::Isometry3::identity());
        let second = scene::spawn_node(&mut world, root, "Head", na::Isometry3::identity());

        let mapping = BoneMapping::build(&world, root, &bump);

        assert_eq!(mapping.node(Joint::Head), Some(second));
    }

    #[test]
    fn rebuild_clears_stale_slots() {
        let (mut world, parent) = world_with_root();
        let bump = Bump::new();

        let root = scene::spawn_node(&mut world, parent, "Skeleton", na::Isometry3::identity());
        let head = scene::spawn_node(&mut world, root, "Head", na::Isometry3::identity());

        let mut mapping = BoneMapping::build(&world, root, &bump);
        assert!(mapping.node(Joint::Head).is_some());

        world.get_mut::<Name>(head).unwrap().0 = "Helmet".into();
        mapping.rebuild(&world, root, &bump);

        assert!(mapping.node(Joint::Head).is_none());
    }

    #[test]
    fn apply_pose_moves_mapped_nodes_only() {
        let (mut world, parent) = world_with_root();
        let bump = Bump::new();

        let rig = Rig::instantiate(&RigPrefab::full_skeleton(), parent, &mut world, &bump);

        let mut body = TrackedBody::with_joints(TrackableId(1, 0));
        body.joint_mut(Joint::Head).unwrap().local_pose =
            na::Isometry3::translation(0.0, 1.7, 0.0);

        rig.mapping().apply_pose(&world, &body);

        let head = rig.mapping().node(Joint::Head).unwrap();
        let local = world.get::<Local3>(head).unwrap();
        assert!((local.iso.translation.vector.y - 1.7).abs() < 1e-6);
    }

    #[test]
    fn apply_pose_without_joint_set_is_a_noop() {
        let (mut world, parent) = world_with_root();
        let bump = Bump::new();

        let rig = Rig::instantiate(&RigPrefab::full_skeleton(), parent, &mut world, &bump);
        let body = TrackedBody::new(TrackableId(1, 0));

        rig.mapping().apply_pose(&world, &body);

        let hips = rig.mapping().node(Joint::Hips).unwrap();
        let local = world.get::<Local3>(hips).unwrap();
        assert_eq!(local.iso, na::Isometry3::identity());
    }
}
