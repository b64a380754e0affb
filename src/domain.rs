//! Typed records for each report section and for the merged output row.
//!
//! Every field is optional: a cell missing from a ragged row, or an enrichment
//! field with no join partner, is `None` and renders as an empty cell.

use crate::constants::{
    DNS, IP, LINK, NETBIOS, OS, OS_CPE, OS_SW, PUBLISHED, QID, SEVERITY, TITLE, VENDOR_ID,
    VULNERABILITY_COUNT,
};
use crate::types::Row;

/// Records that can be matched on the report's join key (QID)
pub trait JoinKey {
    fn join_key(&self) -> Option<&str>;
}

/// One row of the "Patch List" section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchCatalogRecord {
    pub qid: Option<String>,
    pub vendor_id: Option<String>,
    pub severity: Option<String>,
    pub title: Option<String>,
    pub published: Option<String>,
}

impl PatchCatalogRecord {
    pub fn from_row(mut row: Row) -> Self {
        Self {
            qid: row.take(QID),
            vendor_id: row.take(VENDOR_ID),
            severity: row.take(SEVERITY),
            title: row.take(TITLE),
            published: row.take(PUBLISHED),
        }
    }
}

/// One row of the "Patches by Host" section; the base of the output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPatchRecord {
    pub ip: Option<String>,
    pub dns: Option<String>,
    pub netbios: Option<String>,
    pub os: Option<String>,
    pub os_cpe: Option<String>,
    pub qid: Option<String>,
    pub vulnerability_count: Option<String>,
    /// Columns this record type does not name, kept for custom output layouts
    pub extra: Row,
}

impl HostPatchRecord {
    pub fn from_row(mut row: Row) -> Self {
        Self {
            ip: row.take(IP),
            dns: row.take(DNS),
            netbios: row.take(NETBIOS),
            os: row.take(OS),
            os_cpe: row.take(OS_CPE),
            qid: row.take(QID),
            vulnerability_count: row.take(VULNERABILITY_COUNT),
            extra: row,
        }
    }
}

/// One row of the "Host Vulnerabilities Fixed by Patch" section.
/// Counted in the run summary; it does not feed the output rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostVulnerabilityRecord {
    pub ip: Option<String>,
    pub qid: Option<String>,
    pub fields: Row,
}

impl HostVulnerabilityRecord {
    pub fn from_row(mut row: Row) -> Self {
        Self {
            ip: row.take(IP),
            qid: row.take(QID),
            fields: row,
        }
    }
}

/// One (QID, link) row of the "Patch Links." section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchLinkRecord {
    pub qid: Option<String>,
    pub os_sw: Option<String>,
    pub link: Option<String>,
}

impl PatchLinkRecord {
    pub fn from_row(mut row: Row) -> Self {
        Self {
            qid: row.take(QID),
            os_sw: row.take(OS_SW),
            link: row.take(LINK),
        }
    }
}

/// All links of one QID collapsed into a single record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedLinkRecord {
    pub qid: String,
    /// Taken from the last raw link record seen for this QID
    pub os_sw: Option<String>,
    /// Links in encounter order, joined with `", "`
    pub link: String,
}

/// A host/patch row widened with link and catalog fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedRecord {
    pub host: HostPatchRecord,
    pub os_sw: Option<String>,
    pub link: Option<String>,
    pub vendor_id: Option<String>,
    pub severity: Option<String>,
    pub title: Option<String>,
    pub published: Option<String>,
}

impl MergedRecord {
    /// Value of an output column, `None` when the record has no value for it
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            IP => &self.host.ip,
            DNS => &self.host.dns,
            NETBIOS => &self.host.netbios,
            OS => &self.host.os,
            OS_CPE => &self.host.os_cpe,
            QID => &self.host.qid,
            VULNERABILITY_COUNT => &self.host.vulnerability_count,
            OS_SW => &self.os_sw,
            LINK => &self.link,
            VENDOR_ID => &self.vendor_id,
            SEVERITY => &self.severity,
            TITLE => &self.title,
            PUBLISHED => &self.published,
            other => return self.host.extra.get(other),
        };
        value.as_deref()
    }
}

impl From<HostPatchRecord> for MergedRecord {
    fn from(host: HostPatchRecord) -> Self {
        Self {
            host,
            ..Default::default()
        }
    }
}

impl JoinKey for PatchCatalogRecord {
    fn join_key(&self) -> Option<&str> {
        self.qid.as_deref()
    }
}

impl JoinKey for HostPatchRecord {
    fn join_key(&self) -> Option<&str> {
        self.qid.as_deref()
    }
}

impl JoinKey for AggregatedLinkRecord {
    fn join_key(&self) -> Option<&str> {
        Some(&self.qid)
    }
}

impl JoinKey for MergedRecord {
    fn join_key(&self) -> Option<&str> {
        self.host.join_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_record_keeps_unknown_columns() {
        let row: Row = [("IP", "10.0.0.1"), ("QID", "Q1"), ("Asset Tag", "rack-7")]
            .into_iter()
            .collect();
        let host = HostPatchRecord::from_row(row);

        assert_eq!(host.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(host.qid.as_deref(), Some("Q1"));
        assert_eq!(host.extra.get("Asset Tag"), Some("rack-7"));
        assert!(!host.extra.contains_key("IP"));
    }

    #[test]
    fn test_merged_field_lookup() {
        let row: Row = [("IP", "10.0.0.1"), ("QID", "Q1"), ("Asset Tag", "rack-7")]
            .into_iter()
            .collect();
        let mut merged = MergedRecord::from(HostPatchRecord::from_row(row));
        merged.title = Some("OpenSSL Bug".to_string());

        assert_eq!(merged.field("IP"), Some("10.0.0.1"));
        assert_eq!(merged.field("Title"), Some("OpenSSL Bug"));
        assert_eq!(merged.field("Asset Tag"), Some("rack-7"));
        assert_eq!(merged.field("Severity"), None);
        assert_eq!(merged.field(""), None);
        assert_eq!(merged.join_key(), Some("Q1"));
    }

    #[test]
    fn test_ragged_catalog_row_leaves_fields_absent() {
        let row: Row = [("QID", "Q9"), ("Vendor ID", "MS20-001")].into_iter().collect();
        let record = PatchCatalogRecord::from_row(row);

        assert_eq!(record.qid.as_deref(), Some("Q9"));
        assert_eq!(record.vendor_id.as_deref(), Some("MS20-001"));
        assert!(record.title.is_none());
        assert!(record.published.is_none());
    }
}
