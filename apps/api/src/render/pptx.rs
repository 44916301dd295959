//! PresentationML serialization — turns a `SlideDeck` into `.pptx` bytes.
//!
//! The deck model arrives fully laid out (frames in inches); this backend only
//! converts to EMU, emits the OOXML parts, and packages them. Frame validation
//! happens here because malformed geometry is the one way a build can fail
//! after selection and layout have run.

use std::collections::BTreeMap;

use bytes::Bytes;
use quick_xml::escape::escape;

use crate::assets::{AssetCatalog, AssetKind};
use crate::errors::AppError;
use crate::render::model::{Align, Frame, Paragraph, Shape, Slide, SlideDeck};
use crate::render::package::PackageWriter;
use crate::render::DeckBackend;

/// MIME type of the serialized document.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Download filename for the built deck.
pub const PPTX_FILENAME: &str = "pitch_deck.pptx";

const EMU_PER_INCH: f64 = 914_400.0;

/// 16:9 slide canvas, 13.333" × 7.5".
const SLIDE_CX: i64 = 12_192_000;
const SLIDE_CY: i64 = 6_858_000;

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

const XMLNS: &str = "xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>";

/// The default `DeckBackend`: serializes to OOXML PresentationML.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxBackend;

impl DeckBackend for PptxBackend {
    fn render(&self, deck: &SlideDeck, assets: &AssetCatalog) -> Result<Bytes, AppError> {
        validate_deck(deck)?;

        // Media registry: each asset kind becomes one shared media part.
        let mut media: BTreeMap<AssetKind, usize> = BTreeMap::new();
        for slide in &deck.slides {
            register_media(&mut media, slide.background.into());
            for shape in &slide.shapes {
                if let Shape::Picture(pic) = shape {
                    register_media(&mut media, pic.asset.into());
                }
            }
        }

        let mut package = PackageWriter::new();

        package.add_rels("_rels/.rels", root_rels().as_bytes())?;
        package.add_part(
            "ppt/presentation.xml",
            CT_PRESENTATION,
            presentation_xml(deck.slides.len()).as_bytes(),
        )?;
        package.add_rels(
            "ppt/_rels/presentation.xml.rels",
            presentation_rels(deck.slides.len()).as_bytes(),
        )?;

        package.add_part(
            "ppt/slideMasters/slideMaster1.xml",
            CT_SLIDE_MASTER,
            slide_master_xml().as_bytes(),
        )?;
        package.add_rels(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            master_rels().as_bytes(),
        )?;
        package.add_part(
            "ppt/slideLayouts/slideLayout1.xml",
            CT_SLIDE_LAYOUT,
            slide_layout_xml().as_bytes(),
        )?;
        package.add_rels(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            layout_rels().as_bytes(),
        )?;
        package.add_part("ppt/theme/theme1.xml", CT_THEME, theme_xml().as_bytes())?;

        for (index, slide) in deck.slides.iter().enumerate() {
            let number = index + 1;
            let (slide_xml, rels_xml) = serialize_slide(slide, &media);
            package.add_part(
                &format!("ppt/slides/slide{number}.xml"),
                CT_SLIDE,
                slide_xml.as_bytes(),
            )?;
            package.add_rels(
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                rels_xml.as_bytes(),
            )?;
        }

        for (kind, media_index) in &media {
            let bytes = assets.read(*kind)?;
            package.add_media(&format!("ppt/media/image{media_index}.png"), &bytes)?;
        }

        Ok(Bytes::from(package.finish()?))
    }
}

fn register_media(media: &mut BTreeMap<AssetKind, usize>, kind: AssetKind) {
    let next = media.len() + 1;
    media.entry(kind).or_insert(next);
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_deck(deck: &SlideDeck) -> Result<(), AppError> {
    for (index, slide) in deck.slides.iter().enumerate() {
        for shape in &slide.shapes {
            let frame = match shape {
                Shape::Text(text) => &text.frame,
                Shape::Picture(pic) => &pic.frame,
            };
            validate_frame(frame, index + 1)?;
        }
    }
    Ok(())
}

fn validate_frame(frame: &Frame, slide_number: usize) -> Result<(), AppError> {
    let values = [frame.left_in, frame.top_in, frame.width_in, frame.height_in];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::Render(format!(
            "slide {slide_number}: non-finite frame {frame:?}"
        )));
    }
    if frame.width_in <= 0.0 || frame.height_in <= 0.0 {
        return Err(AppError::Render(format!(
            "slide {slide_number}: non-positive frame extent {frame:?}"
        )));
    }
    Ok(())
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

// ────────────────────────────────────────────────────────────────────────────
// Slide serialization
// ────────────────────────────────────────────────────────────────────────────

/// Emits one slide part and its relationships. The layout relationship is
/// always `rId1`; images and hyperlinks get the following ids.
fn serialize_slide(slide: &Slide, media: &BTreeMap<AssetKind, usize>) -> (String, String) {
    let mut rels = String::from(XML_DECL);
    rels.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    rels.push_str(&format!(
        "<Relationship Id=\"rId1\" Type=\"{REL_SLIDE_LAYOUT}\" Target=\"../slideLayouts/slideLayout1.xml\"/>"
    ));
    let mut next_rel = 2usize;

    let mut body = String::new();
    let mut shape_id = 2u32;

    // Full-bleed background picture first so everything else draws over it.
    let bg_rel = format!("rId{next_rel}");
    next_rel += 1;
    let bg_media = media[&AssetKind::from(slide.background)];
    rels.push_str(&format!(
        "<Relationship Id=\"{bg_rel}\" Type=\"{REL_IMAGE}\" Target=\"../media/image{bg_media}.png\"/>"
    ));
    body.push_str(&picture_xml(
        shape_id,
        &bg_rel,
        0,
        0,
        SLIDE_CX,
        SLIDE_CY,
    ));
    shape_id += 1;

    for shape in &slide.shapes {
        match shape {
            Shape::Picture(pic) => {
                let rel = format!("rId{next_rel}");
                next_rel += 1;
                let media_index = media[&AssetKind::from(pic.asset)];
                rels.push_str(&format!(
                    "<Relationship Id=\"{rel}\" Type=\"{REL_IMAGE}\" Target=\"../media/image{media_index}.png\"/>"
                ));
                body.push_str(&picture_xml(
                    shape_id,
                    &rel,
                    emu(pic.frame.left_in),
                    emu(pic.frame.top_in),
                    emu(pic.frame.width_in),
                    emu(pic.frame.height_in),
                ));
                shape_id += 1;
            }
            Shape::Text(text) => {
                body.push_str(&textbox_open(shape_id, &text.frame));
                for paragraph in &text.paragraphs {
                    body.push_str(&paragraph_xml(paragraph, &mut rels, &mut next_rel));
                }
                body.push_str("</p:txBody></p:sp>");
                shape_id += 1;
            }
        }
    }

    rels.push_str("</Relationships>");

    let slide_xml = format!(
        "{XML_DECL}<p:sld {XMLNS}><p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
         <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
         {body}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
    );

    (slide_xml, rels)
}

fn picture_xml(id: u32, rel: &str, x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Picture {id}\"/>\
         <p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"{rel}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
         <p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>"
    )
}

fn textbox_open(id: u32, frame: &Frame) -> String {
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"TextBox {id}\"/>\
         <p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>\
         <p:txBody><a:bodyPr wrap=\"square\"><a:normAutofit/></a:bodyPr><a:lstStyle/>",
        x = emu(frame.left_in),
        y = emu(frame.top_in),
        cx = emu(frame.width_in),
        cy = emu(frame.height_in),
    )
}

fn paragraph_xml(paragraph: &Paragraph, rels: &mut String, next_rel: &mut usize) -> String {
    let algn = match paragraph.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    let size = paragraph.font_pt * 100;
    let color = paragraph.color.hex();

    let mut xml = format!("<a:p><a:pPr algn=\"{algn}\"/>");
    for run in &paragraph.runs {
        let hlink = match run.link.as_deref() {
            Some(url) => {
                let rel = format!("rId{next_rel}");
                *next_rel += 1;
                rels.push_str(&format!(
                    "<Relationship Id=\"{rel}\" Type=\"{REL_HYPERLINK}\" Target=\"{}\" TargetMode=\"External\"/>",
                    escape(url)
                ));
                format!("<a:hlinkClick r:id=\"{rel}\"/>")
            }
            None => String::new(),
        };
        xml.push_str(&format!(
            "<a:r><a:rPr lang=\"en-US\" sz=\"{size}\" dirty=\"0\">\
             <a:solidFill><a:srgbClr val=\"{color}\"/></a:solidFill>{hlink}</a:rPr>\
             <a:t>{}</a:t></a:r>",
            escape(&run.text)
        ));
    }
    xml.push_str("</a:p>");
    xml
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed package parts
// ────────────────────────────────────────────────────────────────────────────

fn root_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_OFFICE_DOCUMENT}\" Target=\"ppt/presentation.xml\"/>\
         </Relationships>"
    )
}

fn presentation_xml(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 0..slide_count {
        slide_ids.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            256 + i,
            2 + i
        ));
    }
    format!(
        "{XML_DECL}<p:presentation {XMLNS}>\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{slide_ids}</p:sldIdLst>\
         <p:sldSz cx=\"{SLIDE_CX}\" cy=\"{SLIDE_CY}\"/>\
         <p:notesSz cx=\"{SLIDE_CY}\" cy=\"{SLIDE_CX}\"/>\
         </p:presentation>"
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let mut xml = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_SLIDE_MASTER}\" Target=\"slideMasters/slideMaster1.xml\"/>"
    );
    for i in 0..slide_count {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{REL_SLIDE}\" Target=\"slides/slide{}.xml\"/>",
            2 + i,
            1 + i
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn empty_sp_tree() -> &'static str {
    "<p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
     <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
     <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr></p:spTree>"
}

fn slide_master_xml() -> String {
    format!(
        "{XML_DECL}<p:sldMaster {XMLNS}><p:cSld>{tree}</p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" \
         accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" \
         accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
         </p:sldMaster>",
        tree = empty_sp_tree()
    )
}

fn master_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_SLIDE_LAYOUT}\" Target=\"../slideLayouts/slideLayout1.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{REL_THEME}\" Target=\"../theme/theme1.xml\"/>\
         </Relationships>"
    )
}

fn slide_layout_xml() -> String {
    format!(
        "{XML_DECL}<p:sldLayout {XMLNS}><p:cSld name=\"Blank\">{tree}</p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>",
        tree = empty_sp_tree()
    )
}

fn layout_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_SLIDE_MASTER}\" Target=\"../slideMasters/slideMaster1.xml\"/>\
         </Relationships>"
    )
}

fn theme_xml() -> String {
    let fill_styles = "<a:fillStyleLst>\
        <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
        <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
        <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:fillStyleLst>";
    let line_styles = "<a:lnStyleLst>\
        <a:ln w=\"6350\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
        <a:ln w=\"12700\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
        <a:ln w=\"19050\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln></a:lnStyleLst>";
    let effect_styles = "<a:effectStyleLst>\
        <a:effectStyle><a:effectLst/></a:effectStyle>\
        <a:effectStyle><a:effectLst/></a:effectStyle>\
        <a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>";
    let bg_styles = "<a:bgFillStyleLst>\
        <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
        <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
        <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:bgFillStyleLst>";

    format!(
        "{XML_DECL}<a:theme xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"Deck\">\
         <a:themeElements>\
         <a:clrScheme name=\"Deck\">\
         <a:dk1><a:srgbClr val=\"000000\"/></a:dk1><a:lt1><a:srgbClr val=\"FFFFFF\"/></a:lt1>\
         <a:dk2><a:srgbClr val=\"44546A\"/></a:dk2><a:lt2><a:srgbClr val=\"E7E6E6\"/></a:lt2>\
         <a:accent1><a:srgbClr val=\"4472C4\"/></a:accent1><a:accent2><a:srgbClr val=\"ED7D31\"/></a:accent2>\
         <a:accent3><a:srgbClr val=\"A5A5A5\"/></a:accent3><a:accent4><a:srgbClr val=\"FFC000\"/></a:accent4>\
         <a:accent5><a:srgbClr val=\"5B9BD5\"/></a:accent5><a:accent6><a:srgbClr val=\"70AD47\"/></a:accent6>\
         <a:hlink><a:srgbClr val=\"0563C1\"/></a:hlink><a:folHlink><a:srgbClr val=\"954F72\"/></a:folHlink>\
         </a:clrScheme>\
         <a:fontScheme name=\"Deck\">\
         <a:majorFont><a:latin typeface=\"Calibri Light\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
         <a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
         </a:fontScheme>\
         <a:fmtScheme name=\"Deck\">{fill_styles}{line_styles}{effect_styles}{bg_styles}</a:fmtScheme>\
         </a:themeElements></a:theme>"
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
