use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::constants::{
    HOST_VULNERABILITIES_MARKER, PATCHES_BY_HOST_MARKER, PATCH_LINKS_MARKER, PATCH_LIST_MARKER,
};
use crate::error::{ReportError, Result};
use crate::metrics::ParserMetrics;

/// The four sub-tables of a patch report, still as CSV text.
/// Each span has its leading whitespace and blank lines removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSections<'a> {
    pub patch_list: &'a str,
    pub patches_by_host: &'a str,
    pub host_vulnerabilities: &'a str,
    pub patch_links: &'a str,
}

/// Locates the sections of one report format.
///
/// The join logic only sees [`RawSections`], so supporting another export
/// layout means adding an implementation here.
pub trait ReportLayout: Send + Sync {
    fn name(&self) -> &'static str;

    fn split<'a>(&self, document: &'a str) -> Result<RawSections<'a>>;
}

/// A marker line and the pattern that finds it. Matching is case-sensitive and
/// anchored to the line start. `R` mode lets `$` match before `\r\n` as well.
struct SectionMarker {
    literal: &'static str,
    pattern: Regex,
}

impl SectionMarker {
    /// The exact literal, alone on its line
    fn exact(literal: &'static str) -> Self {
        Self::with_pattern(literal, format!("(?mR)^{}$", regex::escape(literal)))
    }

    /// The literal at the start of a line, followed by anything up to the line end
    fn line_prefix(literal: &'static str) -> Self {
        Self::with_pattern(literal, format!("(?mR)^{}[^\r\n]*", regex::escape(literal)))
    }

    fn with_pattern(literal: &'static str, pattern: String) -> Self {
        let pattern = Regex::new(&pattern).expect("escaped marker literal is a valid pattern");
        Self { literal, pattern }
    }
}

static QUALYS_MARKERS: Lazy<[SectionMarker; 4]> = Lazy::new(|| {
    [
        SectionMarker::exact(PATCH_LIST_MARKER),
        SectionMarker::exact(PATCHES_BY_HOST_MARKER),
        // Trailing cells after this marker are tolerated
        SectionMarker::line_prefix(HOST_VULNERABILITIES_MARKER),
        SectionMarker::exact(PATCH_LINKS_MARKER),
    ]
});

/// The Qualys "patch report" CSV export: Patch List, Patches by Host,
/// Host Vulnerabilities Fixed by Patch, Patch Links, in that order.
#[derive(Debug, Default, Clone, Copy)]
pub struct QualysPatchLayout;

impl ReportLayout for QualysPatchLayout {
    fn name(&self) -> &'static str {
        "qualys_patch_report"
    }

    fn split<'a>(&self, document: &'a str) -> Result<RawSections<'a>> {
        // (marker start, body start) for each marker, searched in document order
        let mut bounds = [(0usize, 0usize); 4];
        let mut cursor = 0;
        for (i, marker) in QUALYS_MARKERS.iter().enumerate() {
            let found = match marker.pattern.find_at(document, cursor) {
                Some(m) => m,
                None => {
                    warn!(marker = marker.literal, "Section marker not found");
                    ParserMetrics::record_missing_section(marker.literal);
                    return Err(ReportError::MissingSection {
                        marker: marker.literal,
                    });
                }
            };
            debug!(marker = marker.literal, offset = found.start(), "Found section marker");
            bounds[i] = (found.start(), found.end());
            cursor = found.end();
        }

        let body = move |i: usize| -> &'a str {
            let end = bounds.get(i + 1).map_or(document.len(), |next| next.0);
            document[bounds[i].1..end].trim_start()
        };

        ParserMetrics::record_sections_split(bounds.len());
        Ok(RawSections {
            patch_list: body(0),
            patches_by_host: body(1),
            host_vulnerabilities: body(2),
            patch_links: body(3),
        })
    }
}
