//! Hero image reordering by swapping with a neighbour.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::HeroImage;
use crate::types::HeroImageId;

/// Which neighbour to swap with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown direction: {0}")]
pub struct UnknownDirection(String);

/// One record's new `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub id: HeroImageId,
    pub order: i64,
}

/// The two updates that swap a record with its neighbour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan {
    pub moved: OrderUpdate,
    pub neighbour: OrderUpdate,
}

impl SwapPlan {
    /// Apply the swap to a local copy of the list.
    ///
    /// The list is left re-sorted by `order`, which is what the view shows
    /// until the refetch replaces it.
    pub fn apply(&self, heroes: &mut [HeroImage]) {
        for hero in heroes.iter_mut() {
            if hero.id == self.moved.id {
                hero.order = self.moved.order;
            } else if hero.id == self.neighbour.id {
                hero.order = self.neighbour.order;
            }
        }
        sort_by_order(heroes);
    }

    /// Both updates, moved record first.
    #[must_use]
    pub fn updates(&self) -> [&OrderUpdate; 2] {
        [&self.moved, &self.neighbour]
    }
}

/// Stable sort by `order` ascending.
pub fn sort_by_order(heroes: &mut [HeroImage]) {
    heroes.sort_by_key(|h| h.order);
}

/// Plan moving `id` one slot in `direction` within `sorted`.
///
/// Returns `None` when the record is missing or already at the edge it is
/// moving towards.
#[must_use]
pub fn plan_move(sorted: &[HeroImage], id: &HeroImageId, direction: Direction) -> Option<SwapPlan> {
    let current = sorted.iter().position(|h| &h.id == id)?;
    let target = match direction {
        Direction::Up => current.checked_sub(1)?,
        Direction::Down => current + 1,
    };
    let moved = sorted.get(current)?;
    let neighbour = sorted.get(target)?;

    Some(SwapPlan {
        moved: OrderUpdate {
            id: moved.id.clone(),
            order: neighbour.order,
        },
        neighbour: OrderUpdate {
            id: neighbour.id.clone(),
            order: moved.order,
        },
    })
}
