use serde::{Deserialize, Serialize};

/// Collision layer a collider lives on (0..32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layer(pub u8);

impl Layer {
    pub const DEFAULT: Layer = Layer(0);
    pub const GROUND: Layer = Layer(1);
    pub const WALL: Layer = Layer(2);
    pub const OBJECTS: Layer = Layer(3);
    pub const PLATFORM: Layer = Layer(4);
    pub const LAVA: Layer = Layer(5);
    pub const WATER: Layer = Layer(6);

    /// Single-layer mask. Indices wrap at 32.
    pub const fn mask(self) -> LayerMask {
        LayerMask(1u32 << (self.0 & 31))
    }
}

/// Set of collision layers, used to select what a probe can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn from_layers(layers: &[Layer]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < layers.len() {
            bits |= layers[i].mask().0;
            i += 1;
        }
        LayerMask(bits)
    }

    pub const fn union(self, other: LayerMask) -> Self {
        LayerMask(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, layer: Layer) -> bool {
        self.0 & layer.mask().0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        self.union(rhs)
    }
}
