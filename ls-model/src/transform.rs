#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }

    /// Unit vector along the axis.
    pub const fn unit(self) -> [f32; 3] {
        match self {
            Self::X => [1.0, 0.0, 0.0],
            Self::Y => [0.0, 1.0, 0.0],
            Self::Z => [0.0, 0.0, 1.0],
        }
    }

    /// Ones on the two components off the axis, zero along it.
    pub const fn across(self) -> [f32; 3] {
        match self {
            Self::X => [0.0, 1.0, 1.0],
            Self::Y => [1.0, 0.0, 1.0],
            Self::Z => [1.0, 1.0, 0.0],
        }
    }
}

/// One step of a render entry's transform list, applied around the
/// unit-cube center before geometry emission and exactly undone after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformStep {
    Rotate { axis: Axis, degrees: f32 },
    Scale { axis: Axis, factor: f32 },
}

impl TransformStep {
    pub const fn rotate(axis: Axis, degrees: f32) -> Self {
        Self::Rotate { axis, degrees }
    }

    pub const fn scale(axis: Axis, factor: f32) -> Self {
        Self::Scale { axis, factor }
    }

    /// Rotations negate, scales reciprocate.
    pub fn inverse(self) -> Self {
        match self {
            Self::Rotate { axis, degrees } => Self::Rotate {
                axis,
                degrees: -degrees,
            },
            Self::Scale { axis, factor } => Self::Scale {
                axis,
                factor: 1.0 / factor,
            },
        }
    }
}
