//! Positioned, resizable, stackable workspace elements

use serde::{Deserialize, Serialize};

/// Smallest width or height an element may be resized to
pub const MIN_ELEMENT_SIZE: f64 = 100.0;

/// Number of elements in the default layout
pub const DEFAULT_ELEMENT_COUNT: u32 = 5;

const DEFAULT_WIDTH: f64 = 300.0;
const DEFAULT_HEIGHT: f64 = 100.0;
const DEFAULT_ORIGIN: f64 = 10.0;
const DEFAULT_STAGGER: f64 = 40.0;

/// One rectangle on the workspace
///
/// Serialized in camelCase (`zIndex`) to match the persisted slot format.
/// Position and size are whatever the workspace reported, fractions included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutElement {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Higher is drawn in front
    pub z_index: i64,
}

/// The layout used on first load and after a reset
///
/// Element `i` (0-based) has id `i + 1`, sits at `(10 + 40i, 10 + 40i)`,
/// measures 300×100 and stacks at `i + 1`.
pub fn default_layout() -> Vec<LayoutElement> {
    (0..DEFAULT_ELEMENT_COUNT)
        .map(|i| {
            let offset = DEFAULT_ORIGIN + DEFAULT_STAGGER * f64::from(i);
            LayoutElement {
                id: i + 1,
                x: offset,
                y: offset,
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
                z_index: i64::from(i) + 1,
            }
        })
        .collect()
}

/// Raise a requested size to the minimum on each axis
pub fn clamp_size(width: f64, height: f64) -> (f64, f64) {
    (width.max(MIN_ELEMENT_SIZE), height.max(MIN_ELEMENT_SIZE))
}
