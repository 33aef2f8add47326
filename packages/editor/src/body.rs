//! # Body Types
//!
//! A body type is a hit-location table: the roll used to pick a location and
//! the ordered list of locations. A location can carry a nested sub-table
//! (e.g. the parts of a hand).
//!
//! Roll ranges are derived, not stored: `update()` walks each table and
//! hands out consecutive roll values from the roll's minimum according to
//! each location's slot count.

use crate::reorder::{self, Identified, MoveOutcome};
use crate::{Document, FactoryDefault, KeyAllocator};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Stable identity of a hit location inside one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub u64);

/// Hit-location table
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct Body {
    pub name: String,

    /// Dice expression, e.g. `"3d"`
    pub roll: String,

    #[serde(default)]
    pub locations: Vec<HitLocation>,
}

/// One row of a hit-location table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitLocation {
    #[serde(skip)]
    pub id: LocationId,

    /// Focus-key prefix for the fields of this row
    #[serde(skip)]
    pub key_prefix: String,

    pub loc_id: String,
    pub choice_name: String,
    pub table_name: String,

    #[serde(default)]
    pub slots: u32,

    #[serde(default)]
    pub hit_penalty: i32,

    #[serde(default)]
    pub dr_bonus: i32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_table: Option<Body>,

    /// Derived by [`Body::update`]
    #[serde(skip)]
    pub roll_range: String,
}

// Identity, focus keys and derived ranges are not content
impl Hash for HitLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.loc_id.hash(state);
        self.choice_name.hash(state);
        self.table_name.hash(state);
        self.slots.hash(state);
        self.hit_penalty.hash(state);
        self.dr_bonus.hash(state);
        self.description.hash(state);
        self.sub_table.hash(state);
    }
}

impl Identified for HitLocation {
    type Id = LocationId;

    fn identity(&self) -> &LocationId {
        &self.id
    }
}

impl HitLocation {
    pub fn new(loc_id: &str, name: &str, slots: u32, hit_penalty: i32) -> Self {
        Self {
            id: LocationId::default(),
            key_prefix: String::new(),
            loc_id: loc_id.to_string(),
            choice_name: name.to_string(),
            table_name: name.to_string(),
            slots,
            hit_penalty,
            dr_bonus: 0,
            description: String::new(),
            sub_table: None,
            roll_range: String::new(),
        }
    }

    pub fn with_dr_bonus(mut self, dr_bonus: i32) -> Self {
        self.dr_bonus = dr_bonus;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_sub_table(mut self, sub_table: Body) -> Self {
        self.sub_table = Some(sub_table);
        self
    }

    /// Assign this row's range starting at `start`; returns the next start
    fn update_roll_range(&mut self, start: i32) -> i32 {
        let slots = i32::try_from(self.slots).unwrap_or(i32::MAX);
        self.roll_range = match slots {
            0 => "-".to_string(),
            1 => start.to_string(),
            _ => format!("{}-{}", start, start.saturating_add(slots - 1)),
        };
        if let Some(sub_table) = &mut self.sub_table {
            sub_table.update();
        }
        start.saturating_add(slots)
    }
}

impl Body {
    pub fn new(name: &str, roll: &str) -> Self {
        Self {
            name: name.to_string(),
            roll: roll.to_string(),
            locations: vec![],
        }
    }

    /// Recompute roll ranges for this table and every sub-table
    pub fn update(&mut self) {
        let mut start = roll_minimum(&self.roll);
        for location in &mut self.locations {
            start = location.update_roll_range(start);
        }
    }

    /// Total slots in this table (not counting sub-tables)
    pub fn slot_count(&self) -> u32 {
        self.locations.iter().map(|location| location.slots).sum()
    }

    pub fn find(&self, id: LocationId) -> Option<&HitLocation> {
        for location in &self.locations {
            if location.id == id {
                return Some(location);
            }
            if let Some(found) = location.sub_table.as_ref().and_then(|sub| sub.find(id)) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_mut(&mut self, id: LocationId) -> Option<&mut HitLocation> {
        for location in &mut self.locations {
            if location.id == id {
                return Some(location);
            }
            if let Some(found) = location.sub_table.as_mut().and_then(|sub| sub.find_mut(id)) {
                return Some(found);
            }
        }
        None
    }

    /// The table whose own `locations` list holds `id`
    pub fn locate_table_mut(&mut self, id: LocationId) -> Option<&mut Body> {
        if self.locations.iter().any(|location| location.id == id) {
            return Some(self);
        }
        for location in &mut self.locations {
            if let Some(found) = location
                .sub_table
                .as_mut()
                .and_then(|sub| sub.locate_table_mut(id))
            {
                return Some(found);
            }
        }
        None
    }

    /// Relocate a row within its own table and refresh roll ranges
    pub fn move_location(&mut self, id: LocationId, target: usize) -> MoveOutcome {
        let outcome = match self.locate_table_mut(id) {
            Some(table) => reorder::move_item(&mut table.locations, &id, target),
            None => MoveOutcome::NotFound,
        };
        if outcome.changed() {
            self.update();
        }
        outcome
    }

    fn rekey_locations(&mut self, keys: &mut KeyAllocator) {
        for location in &mut self.locations {
            location.id = LocationId(keys.next_id());
            location.key_prefix = keys.next_prefix();
            if let Some(sub_table) = &mut location.sub_table {
                sub_table.rekey_locations(keys);
            }
        }
    }

    /// Standard humanoid table
    pub fn humanoid() -> Self {
        let mut body = Body::new("Humanoid", "3d");
        body.locations = vec![
            HitLocation::new("eye", "Eye", 0, -9)
                .with_description("An attack that misses by 1 hits the torso instead."),
            HitLocation::new("skull", "Skull", 2, -7)
                .with_dr_bonus(2)
                .with_description("An attack that misses by 1 hits the torso instead."),
            HitLocation::new("face", "Face", 1, -5)
                .with_description("An attack that misses by 1 hits the torso instead."),
            HitLocation::new("leg", "Right Leg", 2, -2),
            HitLocation::new("arm", "Right Arm", 1, -2),
            HitLocation::new("torso", "Torso", 2, 0),
            HitLocation::new("groin", "Groin", 1, -3)
                .with_description("An attack that misses by 1 hits the torso instead."),
            HitLocation::new("arm", "Left Arm", 1, -2),
            HitLocation::new("leg", "Left Leg", 2, -2),
            HitLocation::new("hand", "Hand", 1, -4),
            HitLocation::new("foot", "Foot", 1, -4),
            HitLocation::new("neck", "Neck", 2, -5)
                .with_description("An attack that misses by 1 hits the torso instead."),
            HitLocation::new("vitals", "Vitals", 0, -3)
                .with_description("An attack that misses by 1 hits the torso instead."),
        ];
        body.update();
        body
    }
}

impl Document for Body {
    fn rekey(&mut self, keys: &mut KeyAllocator) {
        self.rekey_locations(keys);
        self.update();
    }
}

impl FactoryDefault for Body {
    fn factory() -> Self {
        Body::humanoid()
    }
}

/// Lowest total of a dice expression such as `3d`, `2d6+1` or `d-1`.
/// Saturates at the bounds of `i32`.
pub fn roll_minimum(roll: &str) -> i32 {
    let roll = roll.trim().to_ascii_lowercase();
    let Some(d) = roll.find('d') else {
        return roll.parse().unwrap_or(0);
    };

    let count: i32 = match roll[..d].trim() {
        "" => 1,
        digits => digits.parse().unwrap_or(1),
    };

    let rest = &roll[d + 1..];
    let modifier: i32 = match rest.find(|c: char| c == '+' || c == '-') {
        Some(sign) => rest[sign..].replace('+', "").parse().unwrap_or(0),
        None => 0,
    };

    count.saturating_add(modifier)
}
