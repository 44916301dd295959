//! Deck Assembler — lays a `DeckPlan` onto the eleven fixed slides.
//!
//! Produces pure shape data; every vertical position goes through the single
//! placement law in `layout::placement`. The only fallible part is probing
//! image dimensions for aspect-fit scaling.

use crate::assets::{AssetCatalog, AssetKind};
use crate::deck::pipeline::DeckPlan;
use crate::errors::AppError;
use crate::layout::geometry::{
    SlideGeometry, BULLET_WRAP_CHARS, HOOK_WRAP_CHARS, STORY_WRAP_CHARS, TEAM_WRAP_WORDS,
};
use crate::layout::{block_height_in, vertical_start, wrap_chars, wrap_words};
use crate::render::model::{
    Align, AssetKindRef, Color, Frame, Paragraph, Picture, Shape, Slide, SlideDeck, TextBox,
    TextRun,
};

const TITLE_BAR_PT: u32 = 36;
const BULLET_PT: u32 = 28;
const HEADLINE_BULLET_PT: u32 = 32;
const SURE_BULLET_PT: u32 = 26;
const HOOK_PT: u32 = 32;
const STORY_PT: u32 = 28;
const TEAM_PT: u32 = 30;
const FOOTER_PT: u32 = 14;
const CENTERED_BOX_WIDTH_IN: f64 = 9.5;
const TEAM_PANEL_WIDTH_IN: f64 = 5.2;
const TEAM_GAP_IN: f64 = 0.6;

/// Placeholder glyph for slides whose text ended up empty.
const EMPTY_LINE_FALLBACK: &str = "\u{2014}";

/// Builds the full eleven-slide deck from a plan.
pub fn assemble_deck(
    plan: &DeckPlan,
    assets: &AssetCatalog,
    geom: &SlideGeometry,
) -> Result<SlideDeck, AppError> {
    let slides = vec![
        title_slide(plan, geom),
        mission_slide(assets, geom)?,
        bullet_slide(geom, "WHAT IS IT?", &plan.what_top3, HEADLINE_BULLET_PT),
        hook_slide(plan, geom),
        team_slide(plan, assets, geom)?,
        bullet_slide(geom, "HOW DOES IT WORK?", &plan.how, BULLET_PT),
        bullet_slide(geom, "DOWNSIDES", &plan.downsides, BULLET_PT),
        sure_slide(plan, geom),
        bullet_slide(geom, "CAN YOU DO IT?", &plan.cydi, BULLET_PT),
        story_slide(plan, geom),
        thanks_slide(),
    ];

    Ok(SlideDeck { slides })
}

// ────────────────────────────────────────────────────────────────────────────
// Slides
// ────────────────────────────────────────────────────────────────────────────

fn title_slide(plan: &DeckPlan, _geom: &SlideGeometry) -> Slide {
    let title = TextBox {
        frame: Frame {
            left_in: 1.0,
            top_in: 2.2,
            width_in: 11.0,
            height_in: 1.8,
        },
        paragraphs: vec![Paragraph::line(&plan.title, 54, Color::WHITE, Align::Center)],
    };

    let meta_lines = [(plan.author.as_str(), 22), (plan.place.as_str(), 20), (plan.date.as_str(), 20)];
    let meta = TextBox {
        frame: Frame {
            left_in: 1.0,
            top_in: 3.8,
            width_in: 11.0,
            height_in: 2.0,
        },
        paragraphs: meta_lines
            .into_iter()
            .map(|(text, pt)| Paragraph::line(text, pt, Color::WHITE, Align::Center))
            .collect(),
    };

    Slide {
        background: AssetKindRef::TitleBackground,
        shapes: vec![Shape::Text(title), Shape::Text(meta)],
    }
}

fn mission_slide(assets: &AssetCatalog, geom: &SlideGeometry) -> Result<Slide, AppError> {
    let max_w = geom.slide_width_in - 1.8;
    let max_h = geom.content_region().height_in() * 0.9;
    let picture = centered_picture(
        AssetKind::MissionImage,
        AssetKindRef::MissionImage,
        assets,
        geom,
        max_w,
        max_h,
    )?;

    Ok(Slide {
        background: AssetKindRef::BodyBackground,
        shapes: vec![title_bar("OUR MISSION"), Shape::Picture(picture)],
    })
}

fn hook_slide(plan: &DeckPlan, geom: &SlideGeometry) -> Slide {
    Slide {
        background: AssetKindRef::BodyBackground,
        shapes: vec![
            title_bar("WHAT ARE WE ABOUT?"),
            centered_paragraph(geom, &plan.hook, HOOK_PT, HOOK_WRAP_CHARS),
        ],
    }
}

fn team_slide(
    plan: &DeckPlan,
    assets: &AssetCatalog,
    geom: &SlideGeometry,
) -> Result<Slide, AppError> {
    let region = geom.content_region();
    let max_h = region.height_in();

    // Image pinned to the left panel.
    let (px_w, px_h) = assets.dimensions(AssetKind::TeamImage)?;
    let (img_w, img_h) = fit_within(px_w, px_h, TEAM_PANEL_WIDTH_IN, max_h);
    let img_top = vertical_start(&region, img_h, geom.uplift_ratio);
    let picture = Picture {
        frame: Frame {
            left_in: geom.margin_left_in,
            top_in: img_top,
            width_in: img_w,
            height_in: img_h,
        },
        asset: AssetKindRef::TeamImage,
    };

    // Blurb fills the space right of the image, two words per line.
    let text_left = geom.margin_left_in + img_w + TEAM_GAP_IN;
    let text_width = (geom.slide_width_in - text_left - geom.margin_right_in).max(1.0);
    let lines = wrap_words(&plan.team_blurb, TEAM_WRAP_WORDS);
    let block_h = block_height_in(lines.len(), TEAM_PT);
    let text_top = vertical_start(&region, block_h, geom.uplift_ratio);
    let blurb = TextBox {
        frame: Frame {
            left_in: text_left,
            top_in: text_top,
            width_in: text_width,
            height_in: block_h + 0.2,
        },
        paragraphs: lines
            .into_iter()
            .map(|line| Paragraph::line(line, TEAM_PT, Color::BLACK, Align::Left))
            .collect(),
    };

    Ok(Slide {
        background: AssetKindRef::BodyBackground,
        shapes: vec![title_bar("OUR TEAM"), Shape::Picture(picture), Shape::Text(blurb)],
    })
}

fn sure_slide(plan: &DeckPlan, geom: &SlideGeometry) -> Slide {
    let mut shapes = vec![
        title_bar("ARE YOU SURE?"),
        bullet_block(geom, &plan.sure_texts, SURE_BULLET_PT),
    ];
    if let Some(footer) = footer_links(geom, &plan.sure_links) {
        shapes.push(footer);
    }
    Slide {
        background: AssetKindRef::BodyBackground,
        shapes,
    }
}

fn story_slide(plan: &DeckPlan, geom: &SlideGeometry) -> Slide {
    Slide {
        background: AssetKindRef::BodyBackground,
        shapes: vec![
            title_bar("REAL-WORLD EXAMPLE"),
            centered_paragraph(geom, &plan.story, STORY_PT, STORY_WRAP_CHARS),
        ],
    }
}

fn thanks_slide() -> Slide {
    Slide {
        background: AssetKindRef::FinalBackground,
        shapes: vec![Shape::Text(TextBox {
            frame: Frame {
                left_in: 1.0,
                top_in: 3.0,
                width_in: 11.0,
                height_in: 1.5,
            },
            paragraphs: vec![Paragraph::line("THANK YOU", 44, Color::WHITE, Align::Center)],
        })],
    }
}

fn bullet_slide(geom: &SlideGeometry, title: &str, lines: &[String], font_pt: u32) -> Slide {
    Slide {
        background: AssetKindRef::BodyBackground,
        shapes: vec![title_bar(title), bullet_block(geom, lines, font_pt)],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shape builders
// ────────────────────────────────────────────────────────────────────────────

/// Uppercase ribbon title across the top of a body slide.
fn title_bar(text: &str) -> Shape {
    Shape::Text(TextBox {
        frame: Frame {
            left_in: 0.9,
            top_in: 0.35,
            width_in: 11.2,
            height_in: 1.3,
        },
        paragraphs: vec![Paragraph::line(
            text.to_uppercase(),
            TITLE_BAR_PT,
            Color::WHITE,
            Align::Left,
        )],
    })
}

/// Left-aligned bullet list, wrapped at the bullet char budget, vertically
/// placed in the content region.
fn bullet_block(geom: &SlideGeometry, lines: &[String], font_pt: u32) -> Shape {
    let raw: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| !l.trim().is_empty())
        .collect();
    let raw: Vec<&str> = if raw.is_empty() { vec![EMPTY_LINE_FALLBACK] } else { raw };

    let wrapped: Vec<Vec<String>> = raw
        .iter()
        .map(|line| wrap_chars(line, BULLET_WRAP_CHARS))
        .collect();
    let total_lines: usize = wrapped.iter().map(Vec::len).sum();
    let block_h = block_height_in(total_lines, font_pt);
    let top = vertical_start(&geom.content_region(), block_h, geom.uplift_ratio);

    let mut paragraphs = Vec::with_capacity(total_lines);
    for chunks in &wrapped {
        for (j, chunk) in chunks.iter().enumerate() {
            let text = if j == 0 {
                format!("\u{2022} {chunk}")
            } else {
                format!("  {chunk}")
            };
            paragraphs.push(Paragraph::line(text, font_pt, Color::BLACK, Align::Left));
        }
    }

    Shape::Text(TextBox {
        frame: Frame {
            left_in: geom.margin_left_in,
            top_in: top,
            width_in: geom.body_width_in(),
            height_in: block_h + 0.1,
        },
        paragraphs,
    })
}

/// Horizontally centered paragraph block in a fixed-width box.
fn centered_paragraph(geom: &SlideGeometry, text: &str, font_pt: u32, wrap_limit: usize) -> Shape {
    let source = if text.trim().is_empty() { EMPTY_LINE_FALLBACK } else { text };
    let chunks = wrap_chars(source, wrap_limit);
    let block_h = block_height_in(chunks.len(), font_pt);
    let top = vertical_start(&geom.content_region(), block_h, geom.uplift_ratio);
    let left = ((geom.slide_width_in - CENTERED_BOX_WIDTH_IN) / 2.0).max(0.5);

    Shape::Text(TextBox {
        frame: Frame {
            left_in: left,
            top_in: top,
            width_in: CENTERED_BOX_WIDTH_IN,
            height_in: block_h + 0.2,
        },
        paragraphs: chunks
            .into_iter()
            .map(|line| Paragraph::line(line, font_pt, Color::BLACK, Align::Center))
            .collect(),
    })
}

/// Right-aligned `[1] [2] …` hyperlink references in the footer strip.
fn footer_links(geom: &SlideGeometry, links: &[String]) -> Option<Shape> {
    if links.is_empty() {
        return None;
    }

    let mut runs = Vec::with_capacity(links.len() * 2);
    for (i, url) in links.iter().enumerate() {
        if i > 0 {
            runs.push(TextRun::plain("  "));
        }
        runs.push(TextRun {
            text: format!("[{}]", i + 1),
            link: Some(url.clone()),
        });
    }

    Some(Shape::Text(TextBox {
        frame: Frame {
            left_in: geom.margin_left_in,
            top_in: geom.footer_top_in,
            width_in: geom.body_width_in(),
            height_in: 0.5,
        },
        paragraphs: vec![Paragraph {
            runs,
            font_pt: FOOTER_PT,
            color: Color::NAVY,
            align: Align::Right,
        }],
    }))
}

/// Aspect-fit picture, horizontally centered, vertically placed by the shared
/// placement law.
fn centered_picture(
    kind: AssetKind,
    kind_ref: AssetKindRef,
    assets: &AssetCatalog,
    geom: &SlideGeometry,
    max_w: f64,
    max_h: f64,
) -> Result<Picture, AppError> {
    let (px_w, px_h) = assets.dimensions(kind)?;
    let (w, h) = fit_within(px_w, px_h, max_w, max_h);
    let region = geom.content_region();
    let top = vertical_start(&region, h, geom.uplift_ratio);
    let left = (geom.slide_width_in - w) / 2.0;

    Ok(Picture {
        frame: Frame {
            left_in: left,
            top_in: top,
            width_in: w,
            height_in: h,
        },
        asset: kind_ref,
    })
}

/// Scales pixel dimensions to the largest size fitting in `max_w × max_h`
/// while preserving aspect ratio.
fn fit_within(px_w: u32, px_h: u32, max_w: f64, max_h: f64) -> (f64, f64) {
    let aspect = f64::from(px_w.max(1)) / f64::from(px_h.max(1));
    if aspect >= max_w / max_h {
        (max_w, max_w / aspect)
    } else {
        (max_h * aspect, max_h)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::pipeline::build_plan;
    use crate::models::deck::{BulletRow, DeckRequest};

    fn catalog() -> (tempfile::TempDir, AssetCatalog) {
        let dir = tempfile::tempdir().unwrap();
        let catalog = AssetCatalog::new(dir.path());
        catalog.ensure_all().unwrap();
        (dir, catalog)
    }

    fn sample_plan() -> DeckPlan {
        let high = |text: &str| BulletRow {
            text: text.to_string(),
            high: true,
            ..BulletRow::default()
        };
        build_plan(&DeckRequest {
            title: "Uber for cats".to_string(),
            author: "A. Author".to_string(),
            hook: "From nap to vet in one tap!".to_string(),
            story: "A cat came home before dinner.".to_string(),
            what: (0..8).map(|i| high(&format!("what {i}"))).collect(),
            how: (0..4).map(|i| high(&format!("how {i}"))).collect(),
            sure: vec![
                BulletRow {
                    text: "peer-reviewed".to_string(),
                    high: true,
                    link: Some("https://example.test/paper".to_string()),
                    ..BulletRow::default()
                },
                high("more evidence"),
            ],
            cydi: vec![high("pilot shipped")],
            ..DeckRequest::default()
        })
    }

    #[test]
    fn test_deck_has_eleven_slides() {
        let (_dir, assets) = catalog();
        let deck = assemble_deck(&sample_plan(), &assets, &SlideGeometry::default()).unwrap();
        assert_eq!(deck.slides.len(), 11);
    }

    #[test]
    fn test_title_bars_are_uppercase() {
        let Shape::Text(bar) = title_bar("Our Mission") else {
            panic!("title bar must be text");
        };
        assert_eq!(bar.paragraphs[0].runs[0].text, "OUR MISSION");
    }

    #[test]
    fn test_bullet_block_prefixes_and_indents() {
        let geom = SlideGeometry::default();
        let lines = vec!["a bullet that is long enough to wrap across the char budget".to_string()];
        let Shape::Text(block) = bullet_block(&geom, &lines, BULLET_PT) else {
            panic!("bullet block must be text");
        };
        assert!(block.paragraphs.len() > 1, "long bullet should wrap");
        assert!(block.paragraphs[0].runs[0].text.starts_with("\u{2022} "));
        assert!(block.paragraphs[1].runs[0].text.starts_with("  "));
    }

    #[test]
    fn test_empty_bullet_slide_shows_dash() {
        let geom = SlideGeometry::default();
        let Shape::Text(block) = bullet_block(&geom, &[], BULLET_PT) else {
            panic!();
        };
        assert_eq!(block.paragraphs.len(), 1);
        assert_eq!(block.paragraphs[0].runs[0].text, format!("\u{2022} {EMPTY_LINE_FALLBACK}"));
    }

    #[test]
    fn test_block_tops_stay_inside_content_region() {
        let geom = SlideGeometry::default();
        let many: Vec<String> = (0..40).map(|i| format!("bullet number {i}")).collect();
        let Shape::Text(block) = bullet_block(&geom, &many, BULLET_PT) else {
            panic!();
        };
        assert!(block.frame.top_in >= geom.content_top_in - 1e-9);
    }

    #[test]
    fn test_centered_paragraph_box_is_horizontally_centered() {
        let geom = SlideGeometry::default();
        let Shape::Text(block) = centered_paragraph(&geom, "hello world", HOOK_PT, HOOK_WRAP_CHARS)
        else {
            panic!();
        };
        let expected_left = (geom.slide_width_in - CENTERED_BOX_WIDTH_IN) / 2.0;
        assert!((block.frame.left_in - expected_left).abs() < 1e-9);
    }

    #[test]
    fn test_footer_links_numbered_in_order() {
        let geom = SlideGeometry::default();
        let links = vec!["https://a.test".to_string(), "https://b.test".to_string()];
        let Some(Shape::Text(footer)) = footer_links(&geom, &links) else {
            panic!("two links must yield a footer");
        };
        let texts: Vec<&str> = footer.paragraphs[0]
            .runs
            .iter()
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(texts, vec!["[1]", "  ", "[2]"]);
        assert_eq!(footer.paragraphs[0].runs[0].link.as_deref(), Some("https://a.test"));
        assert_eq!(footer.paragraphs[0].align, Align::Right);
    }

    #[test]
    fn test_footer_omitted_without_links() {
        assert!(footer_links(&SlideGeometry::default(), &[]).is_none());
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        // 2:1 landscape image into a 4x4 box → 4 wide, 2 tall
        let (w, h) = fit_within(200, 100, 4.0, 4.0);
        assert!((w - 4.0).abs() < 1e-9 && (h - 2.0).abs() < 1e-9);
        // 1:2 portrait image into a 4x4 box → 2 wide, 4 tall
        let (w, h) = fit_within(100, 200, 4.0, 4.0);
        assert!((w - 2.0).abs() < 1e-9 && (h - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_mission_picture_centered_horizontally() {
        let (_dir, assets) = catalog();
        let geom = SlideGeometry::default();
        let deck = assemble_deck(&sample_plan(), &assets, &geom).unwrap();
        let Some(Shape::Picture(pic)) = deck.slides[1]
            .shapes
            .iter()
            .find(|s| matches!(s, Shape::Picture(_)))
        else {
            panic!("mission slide must carry a picture");
        };
        let center = pic.frame.left_in + pic.frame.width_in / 2.0;
        assert!((center - geom.slide_width_in / 2.0).abs() < 1e-6);
    }
}
