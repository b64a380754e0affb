use std::collections::HashMap;
use tracing::{debug, warn};

use crate::constants::LINK_SEPARATOR;
use crate::domain::{AggregatedLinkRecord, PatchLinkRecord};
use crate::metrics::EnrichMetrics;

/// Collapse raw (QID, link) rows into one record per QID.
///
/// Groups come out in first-seen QID order. Links are joined with `", "` in
/// the order their rows appear. `OS/SW` follows the last row seen for the
/// QID, matching the last-wins policy of the join index. Rows without a QID
/// are skipped; rows without a link add no link text.
pub fn aggregate_links(raw: Vec<PatchLinkRecord>) -> Vec<AggregatedLinkRecord> {
    let raw_rows = raw.len();
    let mut groups: Vec<(AggregatedLinkRecord, Vec<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (position, record) in raw.into_iter().enumerate() {
        let Some(qid) = record.qid else {
            warn!(row = position + 1, "Patch link row has no QID; skipping");
            continue;
        };

        let slot = match index.get(&qid) {
            Some(&slot) => slot,
            None => {
                index.insert(qid.clone(), groups.len());
                groups.push((
                    AggregatedLinkRecord {
                        qid,
                        ..Default::default()
                    },
                    Vec::new(),
                ));
                groups.len() - 1
            }
        };

        let (aggregate, links) = &mut groups[slot];
        aggregate.os_sw = record.os_sw;
        if let Some(link) = record.link {
            links.push(link);
        }
    }

    let aggregated: Vec<AggregatedLinkRecord> = groups
        .into_iter()
        .map(|(mut aggregate, links)| {
            aggregate.link = links.join(LINK_SEPARATOR);
            aggregate
        })
        .collect();

    debug!(raw_rows, groups = aggregated.len(), "Aggregated patch links");
    EnrichMetrics::record_links_aggregated(raw_rows, aggregated.len());
    aggregated
}
