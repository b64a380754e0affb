use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::constants::{LINK, OS_SW, PUBLISHED, SEVERITY, TITLE, VENDOR_ID};
use crate::domain::{AggregatedLinkRecord, JoinKey, MergedRecord, PatchCatalogRecord};
use crate::metrics::EnrichMetrics;

/// The columns a base record takes from a secondary record type
pub trait JoinColumns<S> {
    /// Names of the copied columns, for logging
    const COLUMNS: &'static [&'static str];

    /// Copy the columns from `matched`, or clear them when there is no match.
    /// Must touch no other field.
    fn copy_columns(&mut self, matched: Option<&S>);
}

/// Key lookup over a secondary record set.
///
/// Built in input order with last-wins on duplicate keys: a later record
/// replaces an earlier one with the same key value. Records without a key are
/// never indexed.
pub struct JoinIndex<'a, S> {
    by_key: HashMap<&'a str, &'a S>,
    duplicates: usize,
}

impl<'a, S: JoinKey> JoinIndex<'a, S> {
    pub fn build(secondary: &'a [S]) -> Self {
        let mut by_key = HashMap::with_capacity(secondary.len());
        let mut duplicates = 0;
        for record in secondary {
            if let Some(key) = record.join_key() {
                if by_key.insert(key, record).is_some() {
                    duplicates += 1;
                }
            }
        }
        Self { by_key, duplicates }
    }

    pub fn get(&self, key: &str) -> Option<&'a S> {
        self.by_key.get(key).copied()
    }

    /// Number of records shadowed by a later record with the same key
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Match counts of one join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub matched: usize,
    pub unmatched: usize,
}

/// Left outer join of `secondary` onto `base`, in place.
///
/// Every base record is kept, in its original order. A record whose key has a
/// partner in `secondary` receives that partner's columns; a record without a
/// partner (or without a key) gets those columns cleared.
#[instrument(skip_all, fields(join = name, base = base.len(), secondary = secondary.len()))]
pub fn left_outer_join<B, S>(name: &str, base: &mut [B], secondary: &[S]) -> JoinStats
where
    B: JoinKey + JoinColumns<S>,
    S: JoinKey,
{
    let index = JoinIndex::build(secondary);
    let mut stats = JoinStats::default();

    for record in base.iter_mut() {
        let matched = record.join_key().and_then(|key| index.get(key));
        if matched.is_some() {
            stats.matched += 1;
        } else {
            stats.unmatched += 1;
        }
        record.copy_columns(matched);
    }

    let columns = <B as JoinColumns<S>>::COLUMNS;
    debug!(
        columns = ?columns,
        matched = stats.matched,
        unmatched = stats.unmatched,
        duplicates = index.duplicates(),
        "Join complete"
    );
    EnrichMetrics::record_join(name, stats.matched, stats.unmatched);
    EnrichMetrics::record_duplicate_keys(index.duplicates());
    stats
}

impl JoinColumns<AggregatedLinkRecord> for MergedRecord {
    const COLUMNS: &'static [&'static str] = &[OS_SW, LINK];

    fn copy_columns(&mut self, matched: Option<&AggregatedLinkRecord>) {
        match matched {
            Some(links) => {
                self.os_sw = links.os_sw.clone();
                self.link = Some(links.link.clone());
            }
            None => {
                self.os_sw = None;
                self.link = None;
            }
        }
    }
}

impl JoinColumns<PatchCatalogRecord> for MergedRecord {
    const COLUMNS: &'static [&'static str] = &[VENDOR_ID, SEVERITY, TITLE, PUBLISHED];

    fn copy_columns(&mut self, matched: Option<&PatchCatalogRecord>) {
        self.vendor_id = matched.and_then(|p| p.vendor_id.clone());
        self.severity = matched.and_then(|p| p.severity.clone());
        self.title = matched.and_then(|p| p.title.clone());
        self.published = matched.and_then(|p| p.published.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HostPatchRecord;

    fn host(ip: &str, qid: Option<&str>) -> MergedRecord {
        MergedRecord::from(HostPatchRecord {
            ip: Some(ip.to_string()),
            qid: qid.map(str::to_string),
            ..Default::default()
        })
    }

    fn catalog(qid: &str, title: &str) -> PatchCatalogRecord {
        PatchCatalogRecord {
            qid: Some(qid.to_string()),
            title: Some(title.to_string()),
            severity: Some("5".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_unmatched_rows_are_kept_in_order() {
        let mut base = vec![
            host("10.0.0.1", Some("Q1")),
            host("10.0.0.2", Some("Q404")),
            host("10.0.0.3", Some("Q1")),
        ];
        let stats = left_outer_join("catalog", &mut base, &[catalog("Q1", "OpenSSL Bug")]);

        assert_eq!(stats, JoinStats { matched: 2, unmatched: 1 });
        assert_eq!(base.len(), 3);
        assert_eq!(base[0].host.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(base[0].title.as_deref(), Some("OpenSSL Bug"));
        assert_eq!(base[1].host.ip.as_deref(), Some("10.0.0.2"));
        assert!(base[1].title.is_none());
        assert!(base[1].severity.is_none());
        assert_eq!(base[2].title.as_deref(), Some("OpenSSL Bug"));
    }

    #[test]
    fn test_last_record_wins_on_duplicate_key() {
        let secondary = vec![catalog("Q1", "first"), catalog("Q1", "second")];
        let index = JoinIndex::build(&secondary);
        assert_eq!(index.len(), 1);
        assert_eq!(index.duplicates(), 1);

        let mut base = vec![host("10.0.0.1", Some("Q1"))];
        left_outer_join("catalog", &mut base, &secondary);
        assert_eq!(base[0].title.as_deref(), Some("second"));
    }

    #[test]
    fn test_missing_key_never_matches() {
        let secondary = vec![PatchCatalogRecord {
            qid: None,
            title: Some("keyless".to_string()),
            ..Default::default()
        }];
        let mut base = vec![host("10.0.0.1", None)];
        let stats = left_outer_join("catalog", &mut base, &secondary);

        assert_eq!(stats.unmatched, 1);
        assert!(base[0].title.is_none());
    }

    #[test]
    fn test_join_only_touches_its_columns() {
        let mut base = vec![host("10.0.0.1", Some("Q1"))];
        base[0].link = Some("http://a".to_string());

        left_outer_join("catalog", &mut base, &[catalog("Q1", "OpenSSL Bug")]);
        assert_eq!(base[0].link.as_deref(), Some("http://a"));
        assert_eq!(base[0].host.qid.as_deref(), Some("Q1"));
    }

    #[test]
    fn test_link_join_copies_link_and_os_sw() {
        let links = vec![AggregatedLinkRecord {
            qid: "Q1".to_string(),
            os_sw: Some("Windows".to_string()),
            link: "http://a, http://b".to_string(),
        }];
        let mut base = vec![host("10.0.0.1", Some("Q1")), host("10.0.0.2", Some("Q2"))];
        left_outer_join("links", &mut base, &links);

        assert_eq!(base[0].link.as_deref(), Some("http://a, http://b"));
        assert_eq!(base[0].os_sw.as_deref(), Some("Windows"));
        assert!(base[1].link.is_none());
        assert!(base[1].os_sw.is_none());
    }

    #[test]
    fn test_unmatched_join_clears_previous_values() {
        let mut base = vec![host("10.0.0.1", Some("Q2"))];
        base[0].title = Some("stale".to_string());
        left_outer_join("catalog", &mut base, &[catalog("Q1", "OpenSSL Bug")]);
        assert!(base[0].title.is_none());
    }

    #[test]
    fn test_join_columns_name_output_fields() {
        let links = vec![AggregatedLinkRecord {
            qid: "Q1".to_string(),
            os_sw: Some("Windows".to_string()),
            link: "http://a".to_string(),
        }];
        let secondary = vec![PatchCatalogRecord {
            qid: Some("Q1".to_string()),
            vendor_id: Some("V1".to_string()),
            severity: Some("5".to_string()),
            title: Some("OpenSSL Bug".to_string()),
            published: Some("2020-01-01".to_string()),
        }];
        let mut base = vec![host("10.0.0.1", Some("Q1"))];
        left_outer_join("links", &mut base, &links);
        left_outer_join("catalog", &mut base, &secondary);

        let link_columns = <MergedRecord as JoinColumns<AggregatedLinkRecord>>::COLUMNS;
        let catalog_columns = <MergedRecord as JoinColumns<PatchCatalogRecord>>::COLUMNS;
        for column in link_columns.iter().chain(catalog_columns) {
            assert!(base[0].field(column).is_some(), "{column} not filled");
        }
    }
}
