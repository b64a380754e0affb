use std::borrow::Cow;

use crate::constants::{PATCH_QID, QID};
use crate::types::Row;

/// Build a clean [`Row`] from raw header/cell pairs.
///
/// Header names are trimmed and the `Patch QID` synonym becomes `QID`, so rows
/// from every section join on the same key. No other names change. If two
/// headers normalize to the same key, the cell further right wins.
pub fn normalize_keys<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (canonical_key(k.as_ref()), v))
        .collect()
}

/// Canonical form of a single header name
pub fn canonical_key(raw: &str) -> String {
    match raw.trim() {
        PATCH_QID => QID.to_string(),
        key => key.to_string(),
    }
}

/// Rewrite `\r\n` and lone `\r` line breaks as `\n`, quoted cells included.
/// Borrows when the text has no carriage returns.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_header_whitespace() {
        let row = normalize_keys([(" IP ", "10.0.0.1"), ("\tOS CPE", "cpe:/o:linux")]);
        assert_eq!(row.get("IP"), Some("10.0.0.1"));
        assert_eq!(row.get("OS CPE"), Some("cpe:/o:linux"));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_patch_qid_becomes_qid() {
        let row = normalize_keys([("Patch QID", "375940"), (" Patch QID ", "375941")]);
        assert_eq!(row.get("QID"), Some("375941"));
        assert!(!row.contains_key("Patch QID"));
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let row = normalize_keys([("Title", "  padded  ")]);
        assert_eq!(row.get("Title"), Some("  padded  "));
    }

    #[test]
    fn test_other_names_untouched() {
        assert_eq!(canonical_key("QID"), "QID");
        assert_eq!(canonical_key("Patch Qid"), "Patch Qid");
        assert_eq!(canonical_key("OS/SW"), "OS/SW");
    }

    #[test]
    fn test_line_endings_become_lf() {
        assert_eq!(
            normalize_line_endings("a,b\r\nc,\"d\r\ne\"\rf\n"),
            "a,b\nc,\"d\ne\"\nf\n"
        );
        assert!(matches!(normalize_line_endings("a,b\nc\n"), Cow::Borrowed(_)));
    }
}
