//! Endpoint selection
//!
//! Decides which records receive a probe. Selection never removes records:
//! unselected endpoints stay in the output with `NotRequested`.

use api_survey_common::{EndpointRecord, HttpMethod, MethodAllowList, RunConfig};

/// Ordered indices of the records eligible for probing
///
/// Indices are unique, ascending, and refer to the record slice the
/// selection was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }
}

/// Whether a single method passes the method policy
///
/// DELETE is only eligible when `include_delete` is set, even if the
/// allow-list names it explicitly.
pub fn is_eligible(
    method: HttpMethod,
    allow_list: Option<&MethodAllowList>,
    include_delete: bool,
) -> bool {
    if method == HttpMethod::Delete && !include_delete {
        return false;
    }
    allow_list.map_or(true, |list| list.allows(method))
}

/// Select the records to probe
///
/// Applies the method policy, then keeps the first `limit` eligible records
/// in declaration order.
pub fn select(
    records: &[EndpointRecord],
    allow_list: Option<&MethodAllowList>,
    include_delete: bool,
    limit: Option<usize>,
) -> Selection {
    let eligible = records
        .iter()
        .enumerate()
        .filter(|(_, record)| is_eligible(record.method, allow_list, include_delete))
        .map(|(index, _)| index);

    let indices = match limit {
        Some(limit) => eligible.take(limit).collect(),
        None => eligible.collect(),
    };

    Selection { indices }
}

/// [`select`] driven by a [`RunConfig`]
pub fn select_for(records: &[EndpointRecord], config: &RunConfig) -> Selection {
    select(
        records,
        config.method_allow_list.as_ref(),
        config.include_delete,
        config.limit,
    )
}
