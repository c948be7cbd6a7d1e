//! Replaying recorded outlines into a [`BezPath`].
//!
//! Outlines are recorded once with skrifa (a `Vec<PathElement>` is itself an
//! [`OutlinePen`]) and then replayed, possibly several times, into a single
//! [`OverstrikePen`].

use kurbo::{BezPath, Point};
use skrifa::outline::{pen::PathElement, OutlinePen};

/// Send each recorded element to `pen`, in order.
pub fn replay(elements: &[PathElement], pen: &mut impl OutlinePen) {
    for el in elements {
        match *el {
            PathElement::MoveTo { x, y } => pen.move_to(x, y),
            PathElement::LineTo { x, y } => pen.line_to(x, y),
            PathElement::QuadTo { cx0, cy0, x, y } => pen.quad_to(cx0, cy0, x, y),
            PathElement::CurveTo {
                cx0,
                cy0,
                cx1,
                cy1,
                x,
                y,
            } => pen.curve_to(cx0, cy0, cx1, cy1, x, y),
            PathElement::Close => pen.close(),
        }
    }
}

/// Accumulates every subpath it is given into one [`BezPath`].
///
/// Points are moved right by the current shift, which can change between
/// replays so that one path holds several horizontally offset copies.
#[derive(Debug, Default)]
pub struct OverstrikePen {
    path: BezPath,
    dx: f64,
}

impl OverstrikePen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift applied to everything drawn from now on.
    pub fn set_shift(&mut self, dx: f64) {
        self.dx = dx;
    }

    pub fn into_path(self) -> BezPath {
        self.path
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(x as f64 + self.dx, y as f64)
    }
}

impl OutlinePen for OverstrikePen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(self.point(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(self.point(x, y));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c0 = self.point(cx0, cy0);
        self.path.quad_to(c0, self.point(x, y));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1) = (self.point(cx0, cy0), self.point(cx1, cy1));
        self.path.curve_to(c0, c1, self.point(x, y));
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;
    use pretty_assertions::assert_eq;

    fn triangle() -> Vec<PathElement> {
        let mut rec: Vec<PathElement> = Vec::new();
        rec.move_to(0.0, 0.0);
        rec.line_to(100.0, 0.0);
        rec.quad_to(100.0, 100.0, 50.0, 150.0);
        rec.close();
        rec
    }

    #[test]
    fn replay_preserves_order() {
        let rec = triangle();
        let mut copy: Vec<PathElement> = Vec::new();
        replay(&rec, &mut copy);
        assert_eq!(rec, copy);
    }

    #[test]
    fn shift_moves_only_x() {
        let mut pen = OverstrikePen::new();
        pen.set_shift(25.0);
        replay(&triangle(), &mut pen);
        assert_eq!(
            pen.into_path().elements(),
            &[
                PathEl::MoveTo((25.0, 0.0).into()),
                PathEl::LineTo((125.0, 0.0).into()),
                PathEl::QuadTo((125.0, 100.0).into(), (75.0, 150.0).into()),
                PathEl::ClosePath,
            ]
        );
    }

    #[test]
    fn two_replays_share_one_path() {
        let rec = triangle();
        let mut pen = OverstrikePen::new();
        replay(&rec, &mut pen);
        pen.set_shift(10.0);
        replay(&rec, &mut pen);
        let path = pen.into_path();
        assert_eq!(path.elements().len(), 8);
        assert_eq!(path.elements()[0], PathEl::MoveTo((0.0, 0.0).into()));
        assert_eq!(path.elements()[4], PathEl::MoveTo((10.0, 0.0).into()));
        assert_eq!(
            path.elements()[6],
            PathEl::QuadTo((110.0, 100.0).into(), (60.0, 150.0).into())
        );
    }
}
