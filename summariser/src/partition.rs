use itertools::Itertools;
use std::collections::BTreeMap;

use crate::collection::RunCollection;
use crate::model::{Implementation, InstanceBucket, RunRecord};

/// The runs of one instance count, split by implementation.
#[derive(Debug, Default, PartialEq)]
pub struct ImplementationGroups<'a> {
    pub iframe: Vec<&'a RunRecord>,
    pub web_component: Vec<&'a RunRecord>,
}

/// Partition a [`RunCollection`] by instance count and then by implementation.
///
/// Every instance count seen in the collection gets a bucket, including the unresolved one. Runs
/// with an [`Implementation::Unknown`] implementation count towards creating a bucket but are not
/// placed in either group. Within a group the collection order is kept.
///
/// Returns the buckets as a [`BTreeMap`], so iteration is in ascending instance count with the
/// unresolved bucket last.
pub fn partition_by_instances(
    collection: &RunCollection,
) -> BTreeMap<InstanceBucket, ImplementationGroups<'_>> {
    collection
        .iter()
        .into_group_map_by(|record| record.instance_bucket())
        .into_iter()
        .map(|(bucket, records)| {
            let groups = records
                .into_iter()
                .fold(ImplementationGroups::default(), |mut groups, record| {
                    match record.implementation {
                        Implementation::Iframe => groups.iframe.push(record),
                        Implementation::WebComponent => groups.web_component.push(record),
                        Implementation::Unknown => {}
                    }
                    groups
                });
            log::debug!(
                "Partition for instances={bucket}: {} iframe, {} web-component",
                groups.iframe.len(),
                groups.web_component.len()
            );
            (bucket, groups)
        })
        .collect()
}
