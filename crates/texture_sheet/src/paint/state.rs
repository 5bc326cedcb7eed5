use super::color::Color;
use super::font::Font;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    /// Horizontal offset of the text box from the anchor for text `width` wide.
    pub fn offset(self, width: f32) -> f32 {
        match self {
            TextAlign::Start => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::End => -width,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
    Bottom,
}

impl TextBaseline {
    /// Vertical offset of the text box from the anchor for text `height` tall.
    ///
    /// The bitmap face has no descenders, so alphabetic and bottom coincide.
    pub fn offset(self, height: f32) -> f32 {
        match self {
            TextBaseline::Top => 0.0,
            TextBaseline::Middle => -height / 2.0,
            TextBaseline::Alphabetic | TextBaseline::Bottom => -height,
        }
    }
}

/// Mutable drawing state consulted by every surface primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintState {
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f32,
    pub font: Font,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            font: Font::default(),
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
        }
    }
}
