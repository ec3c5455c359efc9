//! Tile solver constants.

/// Delay between painted cells in animated mode (milliseconds)
pub const WFC_DEFAULT_STEP_DELAY_MS: u64 = 15;
