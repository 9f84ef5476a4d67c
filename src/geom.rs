use macroquad::prelude::Rect;

/// Axis-aligned rectangle intersection with the map's query semantics:
/// degenerate rectangles (non-positive width or height, on either side)
/// never intersect, and touching edges do not count as overlap.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    if a.w <= 0.0 || a.h <= 0.0 || b.w <= 0.0 || b.h <= 0.0 {
        return false;
    }
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(2.0, 2.0, 4.0, 4.0);
        let c = Rect::new(10.0, 10.0, 4.0, 4.0);

        assert!(rects_intersect(a, b));
        assert!(rects_intersect(b, a));
        assert_eq!(rects_intersect(a, c), rects_intersect(c, a));
    }

    #[test]
    fn degenerate_rects_never_intersect() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let zero_w = Rect::new(1.0, 1.0, 0.0, 4.0);
        let neg_h = Rect::new(1.0, 1.0, 4.0, -1.0);

        assert!(!rects_intersect(a, zero_w));
        assert!(!rects_intersect(zero_w, a));
        assert!(!rects_intersect(a, neg_h));
        assert!(!rects_intersect(neg_h, neg_h));
    }

    #[test]
    fn touching_edges_do_not_count() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let right = Rect::new(2.0, 0.0, 2.0, 2.0);
        let below = Rect::new(0.0, 2.0, 2.0, 2.0);
        let corner = Rect::new(2.0, 2.0, 2.0, 2.0);

        assert!(!rects_intersect(a, right));
        assert!(!rects_intersect(a, below));
        assert!(!rects_intersect(a, corner));
        assert!(rects_intersect(a, Rect::new(1.9, 0.0, 2.0, 2.0)));
    }
}
