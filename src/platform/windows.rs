//! General Windows platform utilities
//!
//! Conversions between Win32 rectangles and domain boxes. Win32 works in
//! integer pixels; the domain works in `f64`, so conversions round.

use crate::domain::BoundingBox;
use windows::Win32::Foundation::RECT;

/// Converts a domain box to a Windows RECT structure
pub fn bounds_to_win32_rect(bounds: &BoundingBox) -> RECT {
    RECT {
        left: bounds.left.round() as i32,
        top: bounds.top.round() as i32,
        right: bounds.right.round() as i32,
        bottom: bounds.bottom.round() as i32,
    }
}

/// Converts a Windows RECT to a domain box
pub fn win32_rect_to_bounds(rect: &RECT) -> BoundingBox {
    BoundingBox::new(
        f64::from(rect.left),
        f64::from(rect.top),
        f64::from(rect.right),
        f64::from(rect.bottom),
    )
}
