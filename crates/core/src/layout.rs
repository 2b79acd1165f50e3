//! Responsive-layout heuristics. These only shape presentation; they are not
//! scoring parameters.

/// Viewport widths below this show one item per block.
pub const NARROW_MAX_WIDTH: u32 = 720;
/// Viewport widths below this (and at least [`NARROW_MAX_WIDTH`]) show two.
pub const MEDIUM_MAX_WIDTH: u32 = 1024;
/// Viewport heights below this switch the test page to its compact layout.
pub const COMPACT_MAX_HEIGHT: u32 = 900;

/// Number of items requested per block for a viewport width.
#[must_use]
pub fn block_size_for_width(width: u32) -> u8 {
    if width < NARROW_MAX_WIDTH {
        1
    } else if width < MEDIUM_MAX_WIDTH {
        2
    } else {
        3
    }
}

#[must_use]
pub fn is_compact_height(height: u32) -> bool {
    height < COMPACT_MAX_HEIGHT
}
