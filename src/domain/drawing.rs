//! Drawing object types for chart annotations
//!
//! All drawing points are stored in surface pixel coordinates.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

use super::geometry::Point;
use crate::config::ShapeColor;
use crate::shapes;

/// Stable identifier of a drawing, unique per annotator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawingId(pub u64);

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of study object a drawing represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeType {
    TrendLine,
    Ray,
    ExtendedLine,
    HorizontalLine,
    VerticalLine,
    HorizontalRay,
    CrossLine,
    TrendAngle,
    InfoLine,
    ParallelChannel,
    FlatChannel,
    Pitchfork,
}

impl ShapeType {
    pub const ALL: [ShapeType; 12] = [
        ShapeType::TrendLine,
        ShapeType::Ray,
        ShapeType::ExtendedLine,
        ShapeType::HorizontalLine,
        ShapeType::VerticalLine,
        ShapeType::HorizontalRay,
        ShapeType::CrossLine,
        ShapeType::TrendAngle,
        ShapeType::InfoLine,
        ShapeType::ParallelChannel,
        ShapeType::FlatChannel,
        ShapeType::Pitchfork,
    ];

    /// Name used by tool palettes and scripts
    pub fn name(self) -> &'static str {
        match self {
            ShapeType::TrendLine => "trendLine",
            ShapeType::Ray => "ray",
            ShapeType::ExtendedLine => "extendedLine",
            ShapeType::HorizontalLine => "horizontalLine",
            ShapeType::VerticalLine => "verticalLine",
            ShapeType::HorizontalRay => "horizontalRay",
            ShapeType::CrossLine => "crossLine",
            ShapeType::TrendAngle => "trendAngle",
            ShapeType::InfoLine => "infoLine",
            ShapeType::ParallelChannel => "parallelChannel",
            ShapeType::FlatChannel => "flatChannel",
            ShapeType::Pitchfork => "pitchfork",
        }
    }

    /// Points a drawing needs before it can be committed
    pub fn min_points(self) -> usize {
        shapes::handler(self).min_points
    }

    /// How the pointer places this shape's points
    pub fn placement(self) -> Placement {
        shapes::handler(self).placement
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ShapeType::ALL.into_iter().find(|shape| shape.name() == s) {
            Some(shape) => Ok(shape),
            None => bail!("unknown shape type: {s}"),
        }
    }
}

/// How pointer input places the points of a shape
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// A single point that follows the cursor until release
    Follow,
    /// Press sets point 0, dragging sets point 1, release commits
    Drag,
    /// Every press fixes one point; the gesture commits when all are placed
    Clicks,
}

/// Tool currently chosen in the host's tool palette
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tool {
    /// Pointer presses select and drag existing drawings
    #[default]
    Select,
    /// Pointer presses start a new drawing of this shape
    Draw(ShapeType),
}

impl Tool {
    pub fn shape(self) -> Option<ShapeType> {
        match self {
            Tool::Select => None,
            Tool::Draw(shape) => Some(shape),
        }
    }
}

impl From<ShapeType> for Tool {
    fn from(shape: ShapeType) -> Self {
        Tool::Draw(shape)
    }
}

impl FromStr for Tool {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" | "none" => Ok(Tool::Select),
            other => other.parse().map(Tool::Draw),
        }
    }
}

impl TryFrom<String> for Tool {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tool> for String {
    fn from(tool: Tool) -> Self {
        match tool {
            Tool::Select => "select".to_string(),
            Tool::Draw(shape) => shape.name().to_string(),
        }
    }
}

/// A committed or in-progress chart drawing
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingObject {
    pub id: DrawingId,
    pub shape: ShapeType,
    /// Control points, meaning depends on `shape`
    pub points: Vec<Point>,
    pub color: ShapeColor,
    pub line_width: f32,
    /// Selected drawings show their control points as handles
    pub selected: bool,
}

impl DrawingObject {
    pub fn new(
        id: DrawingId,
        shape: ShapeType,
        origin: Point,
        color: ShapeColor,
        line_width: f32,
    ) -> Self {
        Self {
            id,
            shape,
            points: vec![origin],
            color,
            line_width,
            selected: false,
        }
    }

    /// Has enough points to be committed
    pub fn is_complete(&self) -> bool {
        self.points.len() >= self.shape.min_points()
    }

    /// Stroke weight, one pixel heavier while selected
    pub fn stroke_width(&self) -> f32 {
        if self.selected {
            self.line_width + 1.0
        } else {
            self.line_width
        }
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_points_table() {
        assert_eq!(ShapeType::TrendLine.min_points(), 2);
        assert_eq!(ShapeType::HorizontalLine.min_points(), 1);
        assert_eq!(ShapeType::VerticalLine.min_points(), 1);
        assert_eq!(ShapeType::CrossLine.min_points(), 1);
        assert_eq!(ShapeType::HorizontalRay.min_points(), 2);
        assert_eq!(ShapeType::FlatChannel.min_points(), 2);
        assert_eq!(ShapeType::ParallelChannel.min_points(), 3);
        assert_eq!(ShapeType::Pitchfork.min_points(), 3);
    }

    #[test]
    fn test_placement_matches_point_count() {
        for shape in ShapeType::ALL {
            let expected = match shape.min_points() {
                1 => Placement::Follow,
                2 => Placement::Drag,
                _ => Placement::Clicks,
            };
            assert_eq!(shape.placement(), expected, "{shape}");
        }
    }

    #[test]
    fn test_shape_names_parse_back() {
        for shape in ShapeType::ALL {
            assert_eq!(shape.name().parse::<ShapeType>().unwrap(), shape);
        }
        assert!("circle".parse::<ShapeType>().is_err());
    }

    #[test]
    fn test_tool_parsing() {
        assert_eq!("select".parse::<Tool>().unwrap(), Tool::Select);
        assert_eq!("none".parse::<Tool>().unwrap(), Tool::Select);
        assert_eq!(
            "pitchfork".parse::<Tool>().unwrap(),
            Tool::Draw(ShapeType::Pitchfork)
        );
        let tool: Tool = serde_json::from_str("\"infoLine\"").unwrap();
        assert_eq!(tool.shape(), Some(ShapeType::InfoLine));
    }

    #[test]
    fn test_selected_stroke_is_heavier() {
        let mut drawing = DrawingObject::new(
            DrawingId(1),
            ShapeType::TrendLine,
            Point::new(0.0, 0.0),
            ShapeColor::default(),
            2.0,
        );
        assert_eq!(drawing.stroke_width(), 2.0);
        drawing.selected = true;
        assert_eq!(drawing.stroke_width(), 3.0);
        assert!(!drawing.is_complete());
        drawing.points.push(Point::new(1.0, 1.0));
        assert!(drawing.is_complete());
    }
}
