use {
    bumpalo::{collections::Vec as BVec, Bump},
    hecs::{Entity, World},
    nalgebra as na,
    smallvec::SmallVec,
};

/// Display name of a scene node. Rig nodes carry their joint label here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name(pub Box<str>);

impl Name {
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Name(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Transform relative to the parent node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Local3 {
    pub parent: Entity,
    pub iso: na::Isometry3<f32>,
    pub scale: na::Vector3<f32>,
}

impl Local3 {
    pub fn identity(parent: Entity) -> Self {
        Local3 {
            parent,
            iso: na::Isometry3::identity(),
            scale: na::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_iso(parent: Entity, iso: na::Isometry3<f32>) -> Self {
        Local3 {
            parent,
            iso,
            scale: na::Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Accumulated world transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Global3 {
    pub iso: na::Isometry3<f32>,
}

impl Global3 {
    pub fn identity() -> Self {
        Global3 {
            iso: na::Isometry3::identity(),
        }
    }

    pub fn from_iso(iso: na::Isometry3<f32>) -> Self {
        Global3 { iso }
    }

    pub fn append_local(&self, local: &Local3) -> Self {
        Global3 {
            iso: self.iso * local.iso,
        }
    }
}

/// Child entities in attachment order. Kept explicit because bone mapping
/// traverses parent-to-child.
#[derive(Clone, Debug, Default)]
pub struct Children(pub SmallVec<[Entity; 8]>);

impl Children {
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Spawns a named node under `parent` and links it into the parent's
/// child list.
pub fn spawn_node(
    world: &mut World,
    parent: Entity,
    name: &str,
    iso: na::Isometry3<f32>,
) -> Entity {
    let entity = world.spawn((
        Name::new(name),
        Local3::from_iso(parent, iso),
        Global3::identity(),
        Children::default(),
    ));

    match world.get_mut::<Children>(parent) {
        Ok(mut children) => children.0.push(entity),
        Err(_) => {
            tracing::warn!("node '{}' spawned under a parent without a child list", name)
        }
    }

    entity
}

/// Recomputes `Global3` for every node below `root`, from `root`'s own
/// global transform.
pub fn refresh_globals(world: &World, root: Entity, bump: &Bump) {
    let root_global = match world.get::<Global3>(root) {
        Ok(global) => *global,
        Err(_) => Global3::identity(),
    };

    let mut stack = BVec::new_in(bump);
    stack.push((root, root_global));

    while let Some((entity, global)) = stack.pop() {
        let children: SmallVec<[Entity; 8]> = match world.get::<Children>(entity) {
            Ok(children) => children.0.clone(),
            Err(_) => continue,
        };

        for child in children {
            let local = match world.get::<Local3>(child) {
                Ok(local) => *local,
                Err(_) => continue,
            };
            let next = global.append_local(&local);
            if let Ok(mut child_global) = world.get_mut::<Global3>(child) {
                *child_global = next;
            }
            stack.push((child, next));
        }
    }
}

/// Despawns `root` and everything attached below it, unlinking `root` from
/// its parent's child list.
pub fn despawn_subtree(world: &mut World, root: Entity, bump: &Bump) {
    if let Ok(local) = world.get::<Local3>(root) {
        let parent = local.parent;
        drop(local);
        if let Ok(mut children) = world.get_mut::<Children>(parent) {
            children.0.retain(|entity| *entity != root);
        }
    }

    let mut doomed = BVec::new_in(bump);
    let mut stack = BVec::new_in(bump);
    stack.push(root);

    while let Some(entity) = stack.pop() {
        doomed.push(entity);
        if let Ok(children) = world.get::<Children>(entity) {
            stack.extend(children.iter());
        }
    }

    for entity in doomed {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(world: &mut World) -> (Entity, Entity, Entity) {
        let root = world.spawn((Global3::identity(), Children::default()));
        let mid = spawn_node(
            world,
            root,
            "mid",
            na::Isometry3::translation(1.0, 0.0, 0.0),
        );
        let leaf = spawn_node(
            world,
            mid,
            "leaf",
            na::Isometry3::translation(0.0, 2.0, 0.0),
        );
        (root, mid, leaf)
    }

    #[test]
    fn globals_accumulate_down_the_chain() {
        let mut world = World::new();
        let bump = Bump::new();
        let (root, _, leaf) = chain(&mut world);

        refresh_globals(&world, root, &bump);

        let global = world.get::<Global3>(leaf).unwrap();
        let translation = global.iso.translation.vector;
        assert!((translation - na::Vector3::new(1.0, 2.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn despawn_removes_whole_subtree() {
        let mut world = World::new();
        let bump = Bump::new();
        let (root, mid, leaf) = chain(&mut world);

        despawn_subtree(&mut world, mid, &bump);

        assert!(world.contains(root));
        assert!(!world.contains(mid));
        assert!(!world.contains(leaf));
        assert!(world.get::<Children>(root).unwrap().is_empty());
    }
}
