// src/loader.rs
//
// Fetches the SVG resource and reads its declared size from the root element.
// Only the root <svg> start tag is inspected; the markup itself is grafted
// into the viewport untouched.

use crate::error::{Result, ViewerError};
use crate::geometry::{ContentBox, ContentPoint, Size};
use gloo_net::http::Request;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn parse(raw: &str) -> Option<Self> {
        let values: Vec<f64> = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse::<f64>)
            .collect::<std::result::Result<_, _>>()
            .ok()?;
        match values.as_slice() {
            [min_x, min_y, width, height] if *width > 0.0 && *height > 0.0 => Some(Self {
                min_x: *min_x,
                min_y: *min_y,
                width: *width,
                height: *height,
            }),
            _ => None,
        }
    }
}

/// Size information declared on the root `<svg>` element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SvgMetrics {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub view_box: Option<ViewBox>,
}

impl SvgMetrics {
    /// Builds the content box. `fallback` is the viewport's rendered size,
    /// used for whichever dimension the document leaves undeclared.
    pub fn content_box(&self, fallback: Size) -> ContentBox {
        if let Some(vb) = self.view_box {
            let (css_w, css_h) = match (self.width, self.height) {
                (Some(w), Some(h)) => (w, h),
                (Some(w), None) => (w, w * vb.height / vb.width),
                (None, Some(h)) => (h * vb.width / vb.height, h),
                (None, None) => (vb.width, vb.height),
            };
            return ContentBox::new(
                Size::new(vb.width, vb.height),
                ContentPoint::new(vb.min_x, vb.min_y),
                ContentPoint::new(vb.width / css_w, vb.height / css_h),
            );
        }

        // A single declared dimension is kept; only the missing one comes
        // from the viewport.
        let base = Size::new(
            self.width.unwrap_or(fallback.width),
            self.height.unwrap_or(fallback.height),
        );
        ContentBox::new(base, ContentPoint::default(), ContentPoint::new(1.0, 1.0))
    }
}

/// Accepts unitless and `px` lengths. Percentages and other units count as
/// "not declared".
fn parse_length(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => None,
    }
}

fn read_root(element: &BytesStart) -> Result<SvgMetrics> {
    let mut metrics = SvgMetrics::default();
    for attr in element.attributes().flatten() {
        let value = attr
            .unescape_value()
            .map_err(|e| ViewerError::Load(format!("bad attribute value: {}", e)))?;
        match attr.key.local_name().as_ref() {
            b"width" => metrics.width = parse_length(&value),
            b"height" => metrics.height = parse_length(&value),
            b"viewBox" => metrics.view_box = ViewBox::parse(&value),
            _ => {}
        }
    }
    Ok(metrics)
}

/// Reads width, height and viewBox from the root `<svg>` element.
pub fn measure_svg(markup: &str) -> Result<SvgMetrics> {
    let mut reader = Reader::from_str(markup);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"svg" {
                    return read_root(e);
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                return Err(ViewerError::Load(format!(
                    "root element is <{}>, expected <svg>",
                    name
                )));
            }
            Ok(Event::Eof) => {
                return Err(ViewerError::Load("document has no <svg> element".to_string()))
            }
            Err(e) => return Err(ViewerError::Load(format!("malformed SVG: {}", e))),
            _ => {}
        }
    }
}

/// GET the resource and return its body. Non-2xx responses are errors.
pub async fn fetch_svg(url: &str) -> Result<String> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| ViewerError::Load(format!("request to {} failed: {:?}", url, e)))?;
    if !resp.ok() {
        return Err(ViewerError::Load(format!(
            "HTTP {} for {}",
            resp.status(),
            url
        )));
    }
    resp.text()
        .await
        .map_err(|e| ViewerError::Load(format!("failed to read response text: {:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: Size = Size {
        width: 640.0,
        height: 480.0,
    };

    #[test]
    fn test_view_box_parse() {
        let vb = ViewBox::parse("0 0 200 100").unwrap();
        assert_eq!(vb.width, 200.0);
        assert_eq!(ViewBox::parse("-10,-20, 30 40").unwrap().min_y, -20.0);
        assert!(ViewBox::parse("0 0 0 10").is_none());
        assert!(ViewBox::parse("0 0 10").is_none());
        assert!(ViewBox::parse("a b c d").is_none());
    }

    #[test]
    fn test_measure_with_view_box_and_size() {
        let svg = r#"<?xml version="1.0"?>
            <!-- exported -->
            <svg xmlns="http://www.w3.org/2000/svg" width="1000px" height="500" viewBox="10 20 2000 1000">
                <rect width="10" height="10"/>
            </svg>"#;
        let metrics = measure_svg(svg).unwrap();
        assert_eq!(metrics.width, Some(1000.0));
        assert_eq!(metrics.height, Some(500.0));

        let content = metrics.content_box(FALLBACK);
        assert_eq!(content.base, Size::new(2000.0, 1000.0));
        assert_eq!(content.origin, ContentPoint::new(10.0, 20.0));
        assert_eq!(content.units_per_css, ContentPoint::new(2.0, 2.0));
        assert_eq!(content.css_size(), Size::new(1000.0, 500.0));
    }

    #[test]
    fn test_view_box_only_and_single_dimension() {
        let content = measure_svg(r#"<svg viewBox="0 0 400 200"/>"#)
            .unwrap()
            .content_box(FALLBACK);
        assert_eq!(content.units_per_css, ContentPoint::new(1.0, 1.0));

        let content = measure_svg(r#"<svg width="200" viewBox="0 0 400 200"></svg>"#)
            .unwrap()
            .content_box(FALLBACK);
        assert_eq!(content.css_size(), Size::new(200.0, 100.0));
    }

    #[test]
    fn test_no_intrinsic_size_falls_back_to_viewport() {
        let content = measure_svg(r#"<svg width="100%" height="100%"></svg>"#)
            .unwrap()
            .content_box(FALLBACK);
        assert_eq!(content.base, FALLBACK);
        assert_eq!(content.origin, ContentPoint::default());

        let content = measure_svg("<svg></svg>").unwrap().content_box(FALLBACK);
        assert_eq!(content.base, FALLBACK);
    }

    #[test]
    fn test_single_dimension_without_view_box_keeps_it() {
        let content = measure_svg(r#"<svg width="1200"></svg>"#)
            .unwrap()
            .content_box(FALLBACK);
        assert_eq!(content.base, Size::new(1200.0, 480.0));
        assert_eq!(content.units_per_css, ContentPoint::new(1.0, 1.0));

        let content = measure_svg(r#"<svg width="50%" height="900px"></svg>"#)
            .unwrap()
            .content_box(FALLBACK);
        assert_eq!(content.base, Size::new(640.0, 900.0));
    }

    #[test]
    fn test_non_svg_root_is_rejected() {
        assert!(matches!(
            measure_svg("<html><body/></html>"),
            Err(ViewerError::Load(_))
        ));
        assert!(matches!(measure_svg(""), Err(ViewerError::Load(_))));
    }

    #[test]
    fn test_namespaced_root() {
        let metrics = measure_svg(r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" width="30" height="40"/>"#)
            .unwrap();
        assert_eq!(metrics.width, Some(30.0));
        assert_eq!(metrics.height, Some(40.0));
    }
}
