//! Set difference between what the source holds and what the downstream
//! API has already ingested.

use std::collections::HashSet;

use crate::model::{IngestedFileSet, SourceItem, SourceItemSet};

/// Returns the items from `source_set` whose filename is not present in
/// `ingested_set`. Pure, no I/O; comparison is exact, case-sensitive
/// string equality. Names in `ingested_set` that never occur at the
/// source are ignored.
pub fn filter(source_set: &SourceItemSet, ingested_set: &IngestedFileSet) -> HashSet<SourceItem> {
    source_set
        .items
        .iter()
        .filter(|item| !ingested_set.contains(&item.filename))
        .cloned()
        .collect()
}
