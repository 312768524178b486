use {ahash::AHashMap, once_cell::sync::Lazy};

macro_rules! joints {
    ($($name:ident = $index:literal / $parent:expr,)*) => {
        /// Joint slots of the full-body skeleton.
        ///
        /// Discriminants are the dense joint indices delivered by the
        /// tracking source, so `joint as usize` addresses pose arrays
        /// directly.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Joint {
            $($name = $index,)*
        }

        impl Joint {
            pub const COUNT: usize = 91;

            /// All joints in index order.
            pub const ALL: [Joint; Joint::COUNT] = [$(Joint::$name,)*];

            /// The label rig nodes are matched against. Case-sensitive.
            pub fn name(self) -> &'static str {
                match self {
                    $(Joint::$name => stringify!($name),)*
                }
            }

            pub fn parent(self) -> Option<Joint> {
                match self {
                    $(Joint::$name => $parent,)*
                }
            }
        }
    };
}

joints! {
    Root = 0 / None,
    Hips = 1 / Some(Joint::Root),
    LeftUpLeg = 2 / Some(Joint::Hips),
    LeftLeg = 3 / Some(Joint::LeftUpLeg),
    LeftFoot = 4 / Some(Joint::LeftLeg),
    LeftToes = 5 / Some(Joint::LeftFoot),
    LeftToesEnd = 6 / Some(Joint::LeftToes),
    RightUpLeg = 7 / Some(Joint::Hips),
    RightLeg = 8 / Some(Joint::RightUpLeg),
    RightFoot = 9 / Some(Joint::RightLeg),
    RightToes = 10 / Some(Joint::RightFoot),
    RightToesEnd = 11 / Some(Joint::RightToes),
    Spine1 = 12 / Some(Joint::Hips),
    Spine2 = 13 / Some(Joint::Spine1),
    Spine3 = 14 / Some(Joint::Spine2),
    Spine4 = 15 / Some(Joint::Spine3),
    Spine5 = 16 / Some(Joint::Spine4),
    Spine6 = 17 / Some(Joint::Spine5),
    Spine7 = 18 / Some(Joint::Spine6),
    LeftShoulder1 = 19 / Some(Joint::Spine7),
    LeftArm = 20 / Some(Joint::LeftShoulder1),
    LeftForearm = 21 / Some(Joint::LeftArm),
    LeftHand = 22 / Some(Joint::LeftForearm),
    LeftHandIndexStart = 23 / Some(Joint::LeftHand),
    LeftHandIndex1 = 24 / Some(Joint::LeftHandIndexStart),
    LeftHandIndex2 = 25 / Some(Joint::LeftHandIndex1),
    LeftHandIndex3 = 26 / Some(Joint::LeftHandIndex2),
    LeftHandIndexEnd = 27 / Some(Joint::LeftHandIndex3),
    LeftHandMidStart = 28 / Some(Joint::LeftHand),
    LeftHandMid1 = 29 / Some(Joint::LeftHandMidStart),
    LeftHandMid2 = 30 / Some(Joint::LeftHandMid1),
    LeftHandMid3 = 31 / Some(Joint::LeftHandMid2),
    LeftHandMidEnd = 32 / Some(Joint::LeftHandMid3),
    LeftHandPinkyStart = 33 / Some(Joint::LeftHand),
    LeftHandPinky1 = 34 / Some(Joint::LeftHandPinkyStart),
    LeftHandPinky2 = 35 / Some(Joint::LeftHandPinky1),
    LeftHandPinky3 = 36 / Some(Joint::LeftHandPinky2),
    LeftHandPinkyEnd = 37 / Some(Joint::LeftHandPinky3),
    LeftHandRingStart = 38 / Some(Joint::LeftHand),
    LeftHandRing1 = 39 / Some(Joint::LeftHandRingStart),
    LeftHandRing2 = 40 / Some(Joint::LeftHandRing1),
    LeftHandRing3 = 41 / Some(Joint::LeftHandRing2),
    LeftHandRingEnd = 42 / Some(Joint::LeftHandRing3),
    LeftHandThumbStart = 43 / Some(Joint::LeftHand),
    LeftHandThumb1 = 44 / Some(Joint::LeftHandThumbStart),
    LeftHandThumb2 = 45 / Some(Joint::LeftHandThumb1),
    LeftHandThumbEnd = 46 / Some(Joint::LeftHandThumb2),
    Neck1 = 47 / Some(Joint::Spine7),
    Neck2 = 48 / Some(Joint::Neck1),
    Neck3 = 49 / Some(Joint::Neck2),
    Neck4 = 50 / Some(Joint::Neck3),
    Head = 51 / Some(Joint::Neck4),
    Jaw = 52 / Some(Joint::Head),
    Chin = 53 / Some(Joint::Jaw),
    LeftEye = 54 / Some(Joint::Head),
    LeftEyeLowerLid = 55 / Some(Joint::LeftEye),
    LeftEyeUpperLid = 56 / Some(Joint::LeftEye),
    LeftEyeball = 57 / Some(Joint::LeftEye),
    Nose = 58 / Some(Joint::Head),
    RightEye = 59 / Some(Joint::Head),
    RightEyeLowerLid = 60 / Some(Joint::RightEye),
    RightEyeUpperLid = 61 / Some(Joint::RightEye),
    RightEyeball = 62 / Some(Joint::RightEye),
    RightShoulder1 = 63 / Some(Joint::Spine7),
    RightArm = 64 / Some(Joint::RightShoulder1),
    RightForearm = 65 / Some(Joint::RightArm),
    RightHand = 66 / Some(Joint::RightForearm),
    RightHandIndexStart = 67 / Some(Joint::RightHand),
    RightHandIndex1 = 68 / Some(Joint::RightHandIndexStart),
    RightHandIndex2 = 69 / Some(Joint::RightHandIndex1),
    RightHandIndex3 = 70 / Some(Joint::RightHandIndex2),
    RightHandIndexEnd = 71 / Some(Joint::RightHandIndex3),
    RightHandMidStart = 72 / Some(Joint::RightHand),
    RightHandMid1 = 73 / Some(Joint::RightHandMidStart),
    RightHandMid2 = 74 / Some(Joint::RightHandMid1),
    RightHandMid3 = 75 / Some(Joint::RightHandMid2),
    RightHandMidEnd = 76 / Some(Joint::RightHandMid3),
    RightHandPinkyStart = 77 / Some(Joint::RightHand),
    RightHandPinky1 = 78 / Some(Joint::RightHandPinkyStart),
    RightHandPinky2 = 79 / Some(Joint::RightHandPinky1),
    RightHandPinky3 = 80 / Some(Joint::RightHandPinky2),
    RightHandPinkyEnd = 81 / Some(Joint::RightHandPinky3),
    RightHandRingStart = 82 / Some(Joint::RightHand),
    RightHandRing1 = 83 / Some(Joint::RightHandRingStart),
    RightHandRing2 = 84 / Some(Joint::RightHandRing1),
    RightHandRing3 = 85 / Some(Joint::RightHandRing2),
    RightHandRingEnd = 86 / Some(Joint::RightHandRing3),
    RightHandThumbStart = 87 / Some(Joint::RightHand),
    RightHandThumb1 = 88 / Some(Joint::RightHandThumbStart),
    RightHandThumb2 = 89 / Some(Joint::RightHandThumb1),
    RightHandThumbEnd = 90 / Some(Joint::RightHandThumb2),
}

static NAME_TO_JOINT: Lazy<AHashMap<&'static str, Joint>> =
    Lazy::new(|| Joint::ALL.iter().map(|&joint| (joint.name(), joint)).collect());

impl Joint {
    /// Fingertip joints sampled for hand statistics.
    pub const LEFT_HAND_ANCHOR: Joint = Joint::LeftHandIndexEnd;
    pub const RIGHT_HAND_ANCHOR: Joint = Joint::RightHandIndexEnd;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Joint> {
        Joint::ALL.get(index).copied()
    }

    /// Classifies a node label. Exact match against `Joint::name`,
    /// resolved through a map built once.
    pub fn from_name(name: &str) -> Option<Joint> {
        NAME_TO_JOINT.get(name).copied()
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense() {
        for (index, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), index);
            assert_eq!(Joint::from_index(index), Some(*joint));
        }
        assert_eq!(Joint::from_index(Joint::COUNT), None);
    }

    #[test]
    fn names_roundtrip() {
        for &joint in &Joint::ALL {
            assert_eq!(Joint::from_name(joint.name()), Some(joint));
        }
        assert_eq!(Joint::from_name("Pelvis"), None);
        // Matching is case-sensitive.
        assert_eq!(Joint::from_name("root"), None);
    }

    #[test]
    fn parents_precede_children() {
        assert_eq!(Joint::Root.parent(), None);
        for &joint in &Joint::ALL[1..] {
            let parent = joint.parent().unwrap();
            assert!(parent.index() < joint.index());
        }
    }

    #[test]
    fn hand_anchor_indices() {
        assert_eq!(Joint::LEFT_HAND_ANCHOR.index(), 27);
        assert_eq!(Joint::RIGHT_HAND_ANCHOR.index(), 71);
    }
}
