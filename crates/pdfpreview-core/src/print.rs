//! Print document markup
//!
//! Builds the standalone HTML written into the print window: one
//! `.print-page` block per page, in order, each forcing a page break except
//! the last.

use crate::engine::Surface;
use crate::error::ViewerError;

/// One rendered page as it appears in the print document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintPage {
    pub page_number: u32,
    /// Image source for the page (usually a `data:` URL)
    pub image_src: String,
    pub width: u32,
    pub height: u32,
}

impl PrintPage {
    /// Snapshot a rendered print surface
    pub fn from_surface<S: Surface>(page_number: u32, surface: &S) -> Result<Self, ViewerError> {
        let image_src = surface
            .snapshot()
            .map_err(|e| ViewerError::render_failure(page_number, e))?;
        Ok(Self {
            page_number,
            image_src,
            width: surface.width(),
            height: surface.height(),
        })
    }
}

const PRINT_STYLES: &str = r#"
        body {
            margin: 0;
            padding: 20px;
            font-family: Arial, sans-serif;
        }
        .print-page {
            width: 100%;
            max-width: 210mm;
            margin: 0 auto 20px auto;
            background: white;
            box-shadow: 0 0 10px rgba(0, 0, 0, 0.1);
            page-break-after: always;
            break-after: page;
        }
        .print-page:last-child {
            page-break-after: auto;
            break-after: auto;
        }
        .print-page img {
            width: 100%;
            height: auto;
            display: block;
        }
        @media print {
            body {
                padding: 0;
            }
            .print-page {
                box-shadow: none;
                margin: 0;
                max-width: none;
            }
        }
"#;

/// Build the full print document for `pages`
pub fn print_markup(title: &str, pages: &[PrintPage]) -> String {
    let mut body = String::new();
    for page in pages {
        body.push_str(&format!(
            "    <div class=\"print-page\" data-page=\"{}\"><img src=\"{}\" width=\"{}\" height=\"{}\" alt=\"Page {}\"></div>\n",
            page.page_number,
            escape_html(&page.image_src),
            page.width,
            page.height,
            page.page_number
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n    <title>{}</title>\n    <style>{}    </style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        PRINT_STYLES,
        body
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(n: u32) -> PrintPage {
        PrintPage {
            page_number: n,
            image_src: format!("data:image/png;base64,PAGE{}", n),
            width: 612,
            height: 792,
        }
    }

    #[test]
    fn test_one_block_per_page_in_order() {
        let markup = print_markup("Report", &[page(1), page(2), page(3)]);
        assert_eq!(markup.matches("class=\"print-page\"").count(), 3);

        let first = markup.find("data-page=\"1\"").unwrap();
        let second = markup.find("data-page=\"2\"").unwrap();
        let third = markup.find("data-page=\"3\"").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_page_breaks_between_pages() {
        let markup = print_markup("Report", &[page(1)]);
        assert!(markup.contains("page-break-after: always"));
        assert!(markup.contains(".print-page:last-child"));
        assert!(markup.contains("@media print"));
    }

    #[test]
    fn test_title_is_escaped() {
        let markup = print_markup("<Q&A> \"draft\"", &[]);
        assert!(markup.contains("<title>&lt;Q&amp;A&gt; &quot;draft&quot;</title>"));
    }

    #[test]
    fn test_empty_document() {
        let markup = print_markup("Empty", &[]);
        assert!(!markup.contains("class=\"print-page\""));
        assert!(markup.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&'\""), "a&lt;b&gt;&amp;&#39;&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
