//! Pure geometry math for zoom transforms and overlay placement
//!
//! Everything in this module is side-effect free. The view feeds in its
//! cached client size, frame extents and location; these functions compute
//! where the zoomed window and the overlay label belong.

use serde::{Deserialize, Serialize};

use crate::constants::overlay;
use crate::types::{Dimensions, Position};

/// Reference point kept fixed while a window zooms.
///
/// Corners, edge midpoints and the center of the window's outer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomAnchor {
    Nw,
    N,
    Ne,
    W,
    C,
    E,
    Sw,
    S,
    Se,
}

impl ZoomAnchor {
    /// All nine anchors, for iteration in callers and tests
    pub const ALL: [ZoomAnchor; 9] = [
        ZoomAnchor::Nw,
        ZoomAnchor::N,
        ZoomAnchor::Ne,
        ZoomAnchor::W,
        ZoomAnchor::C,
        ZoomAnchor::E,
        ZoomAnchor::Sw,
        ZoomAnchor::S,
        ZoomAnchor::Se,
    ];
}

fn to_i16(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Client size after applying an integer zoom factor.
///
/// Chrome is deliberately excluded: borders and title bars do not scale.
pub fn zoomed_client_size(factor: u16, client: Dimensions) -> Dimensions {
    let scale = |v: u16| (u32::from(factor) * u32::from(v)).min(u32::from(u16::MAX)) as u16;
    Dimensions::new(scale(client.width), scale(client.height))
}

/// Top-left outer position of a window growing from `old_outer` to
/// `new_outer` such that the anchor point stays fixed.
///
/// `Nw` keeps the origin unchanged; `C` centers the larger window on the
/// old center; `Ne` keeps the right edge aligned while growing downward,
/// and so on for the remaining anchors.
pub fn zoom_placement(
    anchor: ZoomAnchor,
    location: Position,
    old_outer: Dimensions,
    new_outer: Dimensions,
) -> Position {
    let x = i32::from(location.x);
    let y = i32::from(location.y);
    let ow = i32::from(old_outer.width);
    let oh = i32::from(old_outer.height);
    let nw = i32::from(new_outer.width);
    let nh = i32::from(new_outer.height);

    let centered_x = x - nw / 2 + ow / 2;
    let right_x = x - nw + ow;
    let centered_y = y - nh / 2 + oh / 2;
    let bottom_y = y - nh + oh;

    let (px, py) = match anchor {
        ZoomAnchor::Nw => (x, y),
        ZoomAnchor::N => (centered_x, y),
        ZoomAnchor::Ne => (right_x, y),
        ZoomAnchor::W => (x, centered_y),
        ZoomAnchor::C => (centered_x, centered_y),
        ZoomAnchor::E => (right_x, centered_y),
        ZoomAnchor::Sw => (x, bottom_y),
        ZoomAnchor::S => (centered_x, bottom_y),
        ZoomAnchor::Se => (right_x, bottom_y),
    };

    Position::new(to_i16(px), to_i16(py))
}

/// Overlay label geometry for a container at `location` with the given
/// client and outer sizes.
///
/// The label is inset 5 pixels from each client-area edge. The horizontal
/// offset splits the chrome width evenly (symmetric side borders); the
/// vertical offset takes the full chrome height minus the bottom border,
/// which is assumed as wide as a side border.
pub fn overlay_rect(
    location: Position,
    client: Dimensions,
    outer: Dimensions,
) -> (Position, Dimensions) {
    let inset = i32::from(overlay::LABEL_INSET);
    let chrome_w = i32::from(outer.width) - i32::from(client.width);
    let chrome_h = i32::from(outer.height) - i32::from(client.height);

    let x = i32::from(location.x) + inset + chrome_w / 2;
    let y = i32::from(location.y) + inset + chrome_h - chrome_w / 2;

    let size = Dimensions::new(
        client.width.saturating_sub(2 * overlay::LABEL_INSET),
        client.height.saturating_sub(2 * overlay::LABEL_INSET),
    );

    (Position::new(to_i16(x), to_i16(y)), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameExtents;

    const FRAME: FrameExtents = FrameExtents {
        left: 8,
        right: 8,
        top: 22,
        bottom: 8,
    };

    /// The point of the outer rectangle a given anchor pins in place
    fn anchor_point(anchor: ZoomAnchor, location: Position, outer: Dimensions) -> (i32, i32) {
        let x = i32::from(location.x);
        let y = i32::from(location.y);
        let w = i32::from(outer.width);
        let h = i32::from(outer.height);
        match anchor {
            ZoomAnchor::Nw => (x, y),
            ZoomAnchor::N => (x + w / 2, y),
            ZoomAnchor::Ne => (x + w, y),
            ZoomAnchor::W => (x, y + h / 2),
            ZoomAnchor::C => (x + w / 2, y + h / 2),
            ZoomAnchor::E => (x + w, y + h / 2),
            ZoomAnchor::Sw => (x, y + h),
            ZoomAnchor::S => (x + w / 2, y + h),
            ZoomAnchor::Se => (x + w, y + h),
        }
    }

    #[test]
    fn test_zoomed_client_size_scales_without_chrome() {
        let client = Dimensions::new(784, 570);
        assert_eq!(zoomed_client_size(2, client), Dimensions::new(1568, 1140));
        assert_eq!(zoomed_client_size(1, client), client);
    }

    #[test]
    fn test_zoomed_client_size_saturates() {
        let client = Dimensions::new(40000, 100);
        let zoomed = zoomed_client_size(3, client);
        assert_eq!(zoomed.width, u16::MAX);
        assert_eq!(zoomed.height, 300);
    }

    #[test]
    fn test_nw_anchor_keeps_origin() {
        let location = Position::new(120, 45);
        let old = Dimensions::new(800, 600);
        let new = Dimensions::new(1584, 1170);
        assert_eq!(zoom_placement(ZoomAnchor::Nw, location, old, new), location);
    }

    #[test]
    fn test_center_anchor_centers_on_old_center() {
        let location = Position::new(100, 100);
        let old = Dimensions::new(800, 600);
        let new = Dimensions::new(1600, 1200);
        let placed = zoom_placement(ZoomAnchor::C, location, old, new);
        // Old center (500, 400) must remain the new center
        assert_eq!(placed, Position::new(-300, -200));
    }

    #[test]
    fn test_ne_anchor_keeps_right_edge() {
        let location = Position::new(100, 50);
        let old = Dimensions::new(800, 600);
        let new = Dimensions::new(1600, 1200);
        let placed = zoom_placement(ZoomAnchor::Ne, location, old, new);
        assert_eq!(i32::from(placed.x) + 1600, 100 + 800);
        assert_eq!(placed.y, 50);
    }

    #[test]
    fn test_anchor_point_fixed_for_all_anchors() {
        let location = Position::new(137, 81);
        let client = Dimensions::new(783, 571); // odd sizes exercise rounding
        let old_outer = client.with_frame(FRAME);
        let new_client = zoomed_client_size(2, client);
        let new_outer = new_client.with_frame(FRAME);

        for anchor in ZoomAnchor::ALL {
            let placed = zoom_placement(anchor, location, old_outer, new_outer);
            let before = anchor_point(anchor, location, old_outer);
            let after = anchor_point(anchor, placed, new_outer);
            assert!(
                (before.0 - after.0).abs() <= 1 && (before.1 - after.1).abs() <= 1,
                "anchor {:?} drifted: before {:?}, after {:?}",
                anchor,
                before,
                after
            );
        }
    }

    #[test]
    fn test_overlay_rect_sample() {
        // Outer 800x600, client 784x570 (from a framed window)
        let location = Position::new(0, 0);
        let client = Dimensions::new(784, 570);
        let outer = Dimensions::new(800, 600);

        let (pos, size) = overlay_rect(location, client, outer);
        assert_eq!(size, Dimensions::new(774, 560));
        assert_eq!(pos, Position::new(13, 27));
    }

    #[test]
    fn test_overlay_rect_offsets_follow_location() {
        let location = Position::new(250, -40);
        let client = Dimensions::new(784, 570);
        let outer = Dimensions::new(800, 600);

        let (pos, _) = overlay_rect(location, client, outer);
        assert_eq!(pos, Position::new(250 + 13, -40 + 27));
    }

    #[test]
    fn test_overlay_rect_borderless() {
        // No chrome: label sits at the plain 5-pixel inset
        let location = Position::new(10, 20);
        let client = Dimensions::new(400, 300);

        let (pos, size) = overlay_rect(location, client, client);
        assert_eq!(pos, Position::new(15, 25));
        assert_eq!(size, Dimensions::new(390, 290));
    }

    #[test]
    fn test_overlay_rect_tiny_client_saturates() {
        let (_, size) = overlay_rect(
            Position::default(),
            Dimensions::new(8, 6),
            Dimensions::new(8, 6),
        );
        assert_eq!(size, Dimensions::new(0, 0));
    }

    #[test]
    fn test_zoom_anchor_serialization() {
        assert_eq!(serde_json::to_string(&ZoomAnchor::Ne).unwrap(), "\"ne\"");
        let anchor: ZoomAnchor = serde_json::from_str("\"sw\"").unwrap();
        assert_eq!(anchor, ZoomAnchor::Sw);
    }
}
