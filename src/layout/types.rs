use serde::Serialize;

use crate::ir::DiagramKind;

/// A fully positioned diagram: canvas size plus the scene to draw on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub kind: DiagramKind,
    pub width: f32,
    pub height: f32,
    pub scene: Scene,
}

impl Layout {
    pub fn empty(kind: DiagramKind, width: f32, height: f32) -> Self {
        Self {
            kind,
            width,
            height,
            scene: Scene::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub markers: Vec<ArrowMarker>,
    pub elements: Vec<SceneElement>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, shape: impl Into<Shape>) {
        self.elements.push(SceneElement {
            class: None,
            shape: shape.into(),
        });
    }

    pub fn push_classed(&mut self, class: &'static str, shape: impl Into<Shape>) {
        self.elements.push(SceneElement {
            class: Some(class),
            shape: shape.into(),
        });
    }

    /// Push a text block unless it has no lines.
    pub fn push_text(&mut self, class: &'static str, text: TextShape) {
        if !text.lines.is_empty() {
            self.push_classed(class, text);
        }
    }

    pub fn with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Shape> + 'a {
        self.elements
            .iter()
            .filter(move |el| el.class == Some(class))
            .map(|el| &el.shape)
    }

    /// Register an arrow marker for `color` and return its id.
    pub fn arrow_marker(&mut self, color: &str) -> String {
        if let Some(marker) = self.markers.iter().find(|m| m.color == color) {
            return marker.id.clone();
        }
        let id = format!("arrow-{}", self.markers.len());
        self.markers.push(ArrowMarker {
            id: id.clone(),
            color: color.to_string(),
        });
        id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowMarker {
    pub id: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneElement {
    pub class: Option<&'static str>,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Rect(RectShape),
    Line(LineShape),
    Path(PathShape),
    Circle(CircleShape),
    Ellipse(EllipseShape),
    Text(TextShape),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
    pub dasharray: Option<String>,
    pub opacity: Option<f32>,
    pub round_cap: bool,
}

impl Stroke {
    pub fn new(color: &str, width: f32) -> Self {
        Self {
            color: color.to_string(),
            width,
            dasharray: None,
            opacity: None,
            round_cap: false,
        }
    }

    pub fn dashed(mut self, pattern: &str) -> Self {
        self.dasharray = Some(pattern.to_string());
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn round(mut self) -> Self {
        self.round_cap = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub color: String,
    pub opacity: Option<f32>,
}

impl Fill {
    pub fn new(color: &str) -> Self {
        Self {
            color: color.to_string(),
            opacity: None,
        }
    }

    pub fn with_opacity(color: &str, opacity: f32) -> Self {
        Self {
            color: color.to_string(),
            opacity: Some(opacity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectShape {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rx: f32,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

impl RectShape {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rx: 0.0,
            fill: None,
            stroke: None,
        }
    }

    pub fn rounded(mut self, rx: f32) -> Self {
        self.rx = rx;
        self
    }

    pub fn fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineShape {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub stroke: Stroke,
    pub marker_end: Option<String>,
}

impl LineShape {
    pub fn new(from: (f32, f32), to: (f32, f32), stroke: Stroke) -> Self {
        Self {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            stroke,
            marker_end: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathShape {
    pub d: String,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleShape {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

impl CircleShape {
    pub fn new(cx: f32, cy: f32, r: f32) -> Self {
        Self {
            cx,
            cy,
            r,
            fill: None,
            stroke: None,
        }
    }

    pub fn fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EllipseShape {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub color: String,
    pub anchor: TextAnchor,
    pub letter_spacing: Option<f32>,
}

impl TextStyle {
    pub fn new(font_family: &str, font_size: f32, color: &str) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
            font_weight: 400,
            color: color.to_string(),
            anchor: TextAnchor::Start,
            letter_spacing: None,
        }
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.font_weight = weight;
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn centered(self) -> Self {
        self.anchor(TextAnchor::Middle)
    }

    pub fn letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = Some(spacing);
        self
    }
}

/// One baseline-positioned line of a text block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub content: String,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextShape {
    pub x: f32,
    pub lines: Vec<TextLine>,
    pub style: TextStyle,
    /// Rotation in degrees around `(x, first line y)`.
    pub rotate: Option<f32>,
}

impl TextShape {
    /// Single-line label with its baseline at `y`.
    pub fn single(x: f32, y: f32, content: &str, style: TextStyle) -> Self {
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            vec![TextLine {
                content: content.to_string(),
                y,
            }]
        };
        Self {
            x,
            lines,
            style,
            rotate: None,
        }
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

macro_rules! impl_into_shape {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Shape {
                fn from(value: $ty) -> Self {
                    Shape::$variant(value)
                }
            }
        )*
    };
}

impl_into_shape!(
    Rect => RectShape,
    Line => LineShape,
    Path => PathShape,
    Circle => CircleShape,
    Ellipse => EllipseShape,
    Text => TextShape,
);
