use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PalpableKind {
    Fruit,
    Droplet,
    TinyDroplet,
    Banana,
}

/// The object a hyper-dash has to reach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct HyperDashTarget {
    pub start_time: f64,
    pub effective_x: f32,
}

/// An object the catcher can physically catch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalpableCatchHitObject {
    /// Unique within one beatmap. Used to find this object's plate entries.
    pub id: usize,
    pub kind: PalpableKind,
    pub start_time: f64,
    pub original_x: f32,
    #[serde(default)]
    pub x_offset: f32,
    #[serde(default)]
    pub last_in_combo: bool,
    #[serde(default)]
    pub kiai: bool,
    #[serde(default)]
    pub hyper_dash_target: Option<HyperDashTarget>,
}

impl PalpableCatchHitObject {
    pub fn new(id: usize, kind: PalpableKind, start_time: f64, original_x: f32) -> Self {
        Self {
            id,
            kind,
            start_time,
            original_x,
            x_offset: 0.0,
            last_in_combo: false,
            kiai: false,
            hyper_dash_target: None,
        }
    }

    pub fn fruit(id: usize, start_time: f64, original_x: f32) -> Self {
        Self::new(id, PalpableKind::Fruit, start_time, original_x)
    }

    pub fn with_last_in_combo(mut self) -> Self {
        self.last_in_combo = true;
        self
    }

    pub fn with_hyper_dash_target(mut self, target: &PalpableCatchHitObject) -> Self {
        self.hyper_dash_target = Some(HyperDashTarget::new(
            target.start_time,
            target.effective_x(),
        ));
        self
    }

    /// Horizontal position after offsets, kept on the playfield.
    pub fn effective_x(&self) -> f32 {
        (self.original_x + self.x_offset).clamp(0.0, CATCH_PLAYFIELD_WIDTH)
    }

    pub fn hyper_dash(&self) -> bool {
        self.hyper_dash_target.is_some()
    }

    pub fn is_banana(&self) -> bool {
        self.kind == PalpableKind::Banana
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatchHitObject {
    Palpable(PalpableCatchHitObject),
    JuiceStream {
        start_time: f64,
        nested: Vec<PalpableCatchHitObject>,
    },
    BananaShower {
        start_time: f64,
        end_time: f64,
        bananas: Vec<PalpableCatchHitObject>,
    },
}

impl CatchHitObject {
    pub fn start_time(&self) -> f64 {
        match self {
            CatchHitObject::Palpable(object) => object.start_time,
            CatchHitObject::JuiceStream { start_time, .. }
            | CatchHitObject::BananaShower { start_time, .. } => *start_time,
        }
    }

    pub fn as_palpable(&self) -> Option<&PalpableCatchHitObject> {
        match self {
            CatchHitObject::Palpable(object) => Some(object),
            _ => None,
        }
    }

    pub fn nested(&self) -> &[PalpableCatchHitObject] {
        match self {
            CatchHitObject::Palpable(_) => &[],
            CatchHitObject::JuiceStream { nested, .. } => nested,
            CatchHitObject::BananaShower { bananas, .. } => bananas,
        }
    }
}

/// Every palpable object in judgement order: top-level objects followed by
/// their nested objects, stably sorted by start time.
pub fn flatten_palpable(objects: &[CatchHitObject]) -> Vec<PalpableCatchHitObject> {
    let mut flat: Vec<PalpableCatchHitObject> = objects
        .iter()
        .flat_map(|object| object.as_palpable().into_iter().chain(object.nested()))
        .cloned()
        .collect();
    flat.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    flat
}
