use gallery_shared::math::Aabb;
use glam::Vec3;
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as MapLine, Rectangle};
use ratatui::widgets::{Block, Borders};

use crate::state::WalkState;

const MARGIN: f64 = 1.0;
const HEADING_LEN: f64 = 0.8;

/// Top-down projection: world X to the right, world -Z up the screen.
pub fn to_map(p: Vec3) -> (f64, f64) {
    (p.x as f64, -p.z as f64)
}

/// Footprint of a box on the map as `(x, y, width, height)`.
pub fn footprint(b: &Aabb) -> (f64, f64, f64, f64) {
    let size = b.size();
    (b.min.x as f64, -b.max.z as f64, size.x as f64, size.z as f64)
}

/// Map extents covering every box and point, with a margin.
pub fn map_bounds<'a>(
    boxes: impl IntoIterator<Item = &'a Aabb>,
    points: &[Vec3],
) -> ([f64; 2], [f64; 2]) {
    let mut x = [f64::MAX, f64::MIN];
    let mut y = [f64::MAX, f64::MIN];
    let mut include = |px: f64, py: f64| {
        x = [x[0].min(px), x[1].max(px)];
        y = [y[0].min(py), y[1].max(py)];
    };
    for b in boxes {
        let (bx, by, w, h) = footprint(b);
        include(bx, by);
        include(bx + w, by + h);
    }
    for p in points {
        let (px, py) = to_map(*p);
        include(px, py);
    }
    if x[0] > x[1] {
        return ([-MARGIN, MARGIN], [-MARGIN, MARGIN]);
    }
    (
        [x[0] - MARGIN, x[1] + MARGIN],
        [y[0] - MARGIN, y[1] + MARGIN],
    )
}

pub fn render(frame: &mut Frame, state: &WalkState, area: Rect) {
    let scene = state.walk.scene();
    let position = state.walk.position();
    let heading = state.walk.view().horizontal_forward();
    let target = state.walk.target();

    let (x_bounds, y_bounds) = map_bounds(
        scene
            .collidables()
            .iter()
            .map(|c| &c.bounds)
            .chain(scene.interactables().iter().map(|i| &i.bounds)),
        &[position, state.spawn],
    );

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Map ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for c in scene.collidables() {
                let (x, y, width, height) = footprint(&c.bounds);
                ctx.draw(&Rectangle {
                    x,
                    y,
                    width,
                    height,
                    color: Color::Gray,
                });
            }
            for (i, item) in scene.interactables().iter().enumerate() {
                let (x, y, width, height) = footprint(&item.bounds);
                let color = if target == Some(i) {
                    Color::Yellow
                } else {
                    Color::Magenta
                };
                ctx.draw(&Rectangle {
                    x,
                    y,
                    width,
                    height,
                    color,
                });
            }

            let (px, py) = to_map(position);
            ctx.draw(&MapLine {
                x1: px,
                y1: py,
                x2: px + heading.x as f64 * HEADING_LEN,
                y2: py - heading.z as f64 * HEADING_LEN,
                color: Color::Green,
            });
            ctx.print(px, py, Span::styled("@", Style::default().fg(Color::Green).bold()));
        });

    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_is_up() {
        let (_, y_near) = to_map(Vec3::new(0.0, 1.7, 4.0));
        let (_, y_far) = to_map(Vec3::new(0.0, 1.7, -2.0));
        assert!(y_far > y_near);
    }

    #[test]
    fn test_footprint_flips_depth() {
        let b = Aabb::new(Vec3::new(-1.0, 0.0, -3.0), Vec3::new(1.0, 2.0, -2.0));
        assert_eq!(footprint(&b), (-1.0, 2.0, 2.0, 1.0));
    }

    #[test]
    fn test_bounds_cover_boxes_and_points() {
        let b = Aabb::new(Vec3::new(-3.0, 0.0, -3.0), Vec3::new(3.0, 4.0, 3.0));
        let (x, y) = map_bounds([&b], &[Vec3::new(0.0, 1.7, 12.0)]);
        assert_eq!(x, [-4.0, 4.0]);
        assert_eq!(y, [-13.0, 4.0]);
    }

    #[test]
    fn test_bounds_empty() {
        let (x, y) = map_bounds(std::iter::empty(), &[]);
        assert_eq!(x, [-MARGIN, MARGIN]);
        assert_eq!(y, [-MARGIN, MARGIN]);
    }
}
