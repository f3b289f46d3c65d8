use std::f64::consts::PI;

use serde::Serialize;

use crate::geometry::{config::GeometryConfig, point::Point};
use crate::graph::{
    ids::StateId,
    store::{GraphStore, Transition},
};

/// Half-angle of the arrowhead wings on straight edges and self-loops.
const STRAIGHT_WING_ANGLE: f64 = PI / 6.0;
/// Curved edges use narrower wings.
const CURVED_WING_ANGLE: f64 = PI / 8.0;
const SELF_LOOP_START_ANGLE: f64 = 7.0 * PI / 4.0;
const SELF_LOOP_END_ANGLE: f64 = 5.0 * PI / 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Tip of an arrow and the two wing endpoints drawn back from it.
pub struct Arrowhead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
}

impl Arrowhead {
    /// Build an arrowhead at `tip` for a line arriving with direction `angle`.
    fn new(tip: Point, angle: f64, length: f64, wing_angle: f64) -> Self {
        Arrowhead {
            tip,
            left: tip.polar_offset(angle - wing_angle, -length),
            right: tip.polar_offset(angle + wing_angle, -length),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Where and how one transition is drawn.
/// `anchor` is the center of the reward/action/probability label box.
pub enum EdgeLayout {
    Straight {
        start: Point,
        end: Point,
        anchor: Point,
        arrowhead: Arrowhead,
    },
    /// Quadratic curve, used when an edge runs the other way between the same pair.
    /// The control point doubles as the label anchor.
    Curved {
        start: Point,
        end: Point,
        control: Point,
        arrowhead: Arrowhead,
    },
    SelfLoop {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anchor: Point,
        arrowhead: Arrowhead,
    },
}

impl EdgeLayout {
    pub fn anchor(&self) -> Point {
        match self {
            EdgeLayout::Straight { anchor, .. } | EdgeLayout::SelfLoop { anchor, .. } => *anchor,
            EdgeLayout::Curved { control, .. } => *control,
        }
    }

    pub fn is_curved(&self) -> bool {
        matches!(self, EdgeLayout::Curved { .. })
    }

    pub fn arrowhead(&self) -> Arrowhead {
        match self {
            EdgeLayout::Straight { arrowhead, .. }
            | EdgeLayout::Curved { arrowhead, .. }
            | EdgeLayout::SelfLoop { arrowhead, .. } => *arrowhead,
        }
    }
}

/// Read-only view that lays out edges for the current transition set.
#[derive(Debug, Clone, Copy)]
pub struct GeometryResolver<'a> {
    graph: &'a GraphStore,
    config: GeometryConfig,
}

impl<'a> GeometryResolver<'a> {
    pub fn new(graph: &'a GraphStore, config: GeometryConfig) -> Self {
        GeometryResolver { graph, config }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// True iff some transition runs `to -> from`.
    pub fn has_opposite(&self, from: StateId, to: StateId) -> bool {
        self.graph
            .transitions()
            .iter()
            .any(|t| t.from() == to && t.to() == from)
    }

    /// First state (in creation order) whose circle contains `point`.
    pub fn state_at(&self, point: Point) -> Option<StateId> {
        self.graph
            .states()
            .iter()
            .find(|state| state.position().distance_to(point) < self.config.state_radius)
            .map(|state| state.id())
    }

    /// Lay out the edge between two states.
    /// Returns `None` when either state is unknown to the graph.
    pub fn edge_layout(&self, from: StateId, to: StateId) -> Option<EdgeLayout> {
        if from == to {
            return self.self_loop_layout(from);
        }

        let from_center = self.graph.state(from)?.position();
        let to_center = self.graph.state(to)?.position();
        let radius = self.config.state_radius;

        let start = from_center.polar_offset(from_center.angle_to(to_center), radius);
        let end = to_center.polar_offset(to_center.angle_to(from_center), radius);
        let mid = start.midpoint(end);

        if !self.has_opposite(from, to) {
            let arrowhead = Arrowhead::new(
                end,
                start.angle_to(end),
                self.config.arrowhead_length,
                STRAIGHT_WING_ANGLE,
            );
            return Some(EdgeLayout::Straight {
                start,
                end,
                anchor: mid,
                arrowhead,
            });
        }

        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let length = dx.hypot(dy);
        // Overlapping circles leave no direction to offset along.
        let control = if length > 0.0 {
            let offset = self.config.curve_offset;
            Point::new(mid.x - offset * dy / length, mid.y + offset * dx / length)
        } else {
            mid
        };
        let arrowhead = Arrowhead::new(
            end,
            control.angle_to(end),
            self.config.arrowhead_length,
            CURVED_WING_ANGLE,
        );

        Some(EdgeLayout::Curved {
            start,
            end,
            control,
            arrowhead,
        })
    }

    /// Lay out a loop of fixed radius sitting on top of the state's circle.
    pub fn self_loop_layout(&self, state: StateId) -> Option<EdgeLayout> {
        let position = self.graph.state(state)?.position();
        let loop_radius = self.config.self_loop_radius;
        let center = Point::new(
            position.x,
            position.y - self.config.state_radius - loop_radius,
        );
        let anchor = Point::new(
            position.x,
            position.y - self.config.state_radius - 2.0 * loop_radius,
        );
        let tip = center.polar_offset(SELF_LOOP_END_ANGLE, loop_radius);
        let arrowhead = Arrowhead::new(
            tip,
            SELF_LOOP_END_ANGLE - PI / 2.0,
            self.config.arrowhead_length,
            STRAIGHT_WING_ANGLE,
        );

        Some(EdgeLayout::SelfLoop {
            center,
            radius: loop_radius,
            start_angle: SELF_LOOP_START_ANGLE,
            end_angle: SELF_LOOP_END_ANGLE,
            anchor,
            arrowhead,
        })
    }

    /// Lay out a stored transition.
    pub fn transition_layout(&self, transition: &Transition) -> Option<EdgeLayout> {
        self.edge_layout(transition.from(), transition.to())
    }

    /// Lay out every transition of the graph, skipping dangling ones.
    pub fn layouts(&self) -> Vec<(&'a Transition, EdgeLayout)> {
        self.graph
            .transitions()
            .iter()
            .filter_map(|t| self.transition_layout(t).map(|layout| (t, layout)))
            .collect()
    }
}
