use thiserror::Error;

use crate::config::DebugDropConfig;

/// Milliseconds on the host's monotonic clock.
pub type Millis = u64;

/// Largest value a 24-bit `0xRRGGBB` colour can hold.
pub const MAX_RGB: u32 = 0xFF_FFFF;

/// A single drop notification.
///
/// Fields are stored as the host supplied them; [`DropEvent::validate`] is
/// applied by the banner engine before the event can become active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    /// Stable key for the kind of drop. Not unique across time.
    pub id: String,
    pub headline: String,
    /// Rarity rank, used for styling only.
    pub tier: u32,
    pub quantity: u32,
    pub created_at: Millis,
    /// `0xRRGGBB`.
    pub primary_color: u32,
    /// `0xRRGGBB`.
    pub secondary_color: u32,
}

/// Why a drop was refused by the banner engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DropRejected {
    #[error("drop '{id}' has quantity 0")]
    ZeroQuantity { id: String },
    #[error("drop '{id}' has {field} color {value:#X} outside 24-bit RGB")]
    InvalidColor {
        id: String,
        field: &'static str,
        value: u32,
    },
}

impl DropEvent {
    /// Builds the debug sample drop stamped at `now`.
    pub fn from_sample(sample: &DebugDropConfig, now: Millis) -> Self {
        Self {
            id: sample.id.clone(),
            headline: sample.headline.clone(),
            tier: sample.tier,
            quantity: sample.quantity,
            created_at: now,
            primary_color: sample.primary_color,
            secondary_color: sample.secondary_color,
        }
    }

    pub fn validate(&self) -> Result<(), DropRejected> {
        if self.quantity < 1 {
            return Err(DropRejected::ZeroQuantity { id: self.id.clone() });
        }
        for (field, value) in [
            ("primary", self.primary_color),
            ("secondary", self.secondary_color),
        ] {
            if value > MAX_RGB {
                return Err(DropRejected::InvalidColor {
                    id: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}
