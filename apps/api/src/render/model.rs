//! Slide data model handed across the rendering boundary.
//!
//! Pure data, all distances in inches from the slide's top-left corner. The
//! assembler produces it; a `DeckBackend` consumes it. Nothing here knows
//! about OOXML.

use serde::{Deserialize, Serialize};

use crate::assets::AssetKind;

/// Bounding box of a shape, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub left_in: f64,
    pub top_in: f64,
    pub width_in: f64,
    pub height_in: f64,
}

/// Solid RGB text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const NAVY: Color = Color { r: 0, g: 0, b: 128 };

    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One styled run inside a paragraph. `link` marks an external hyperlink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub link: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            link: None,
        }
    }
}

/// One paragraph: runs sharing a font size, color, and alignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub font_pt: u32,
    pub color: Color,
    pub align: Align,
}

impl Paragraph {
    pub fn line(text: impl Into<String>, font_pt: u32, color: Color, align: Align) -> Self {
        Paragraph {
            runs: vec![TextRun::plain(text)],
            font_pt,
            color,
            align,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    pub frame: Frame,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub frame: Frame,
    pub asset: AssetKindRef,
}

/// Serializable mirror of `AssetKind` (keeps the model serde-friendly without
/// dragging filesystem concerns into the wire types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKindRef {
    TitleBackground,
    BodyBackground,
    FinalBackground,
    MissionImage,
    TeamImage,
}

impl From<AssetKindRef> for AssetKind {
    fn from(value: AssetKindRef) -> Self {
        match value {
            AssetKindRef::TitleBackground => AssetKind::TitleBackground,
            AssetKindRef::BodyBackground => AssetKind::BodyBackground,
            AssetKindRef::FinalBackground => AssetKind::FinalBackground,
            AssetKindRef::MissionImage => AssetKind::MissionImage,
            AssetKindRef::TeamImage => AssetKind::TeamImage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Text(TextBox),
    Picture(Picture),
}

/// One slide: a full-bleed background plus its shapes in z-order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub background: AssetKindRef,
    pub shapes: Vec<Shape>,
}

/// The assembled deck, in slide order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_uppercase() {
        assert_eq!(Color::NAVY.hex(), "000080");
        assert_eq!(Color::WHITE.hex(), "FFFFFF");
    }

    #[test]
    fn test_asset_ref_round_trip() {
        assert_eq!(AssetKind::from(AssetKindRef::MissionImage), AssetKind::MissionImage);
    }
}
