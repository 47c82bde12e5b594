// Sample grouping - fans flat live samples out into per-variable series
use crate::domain::query::QuerySpec;
use crate::domain::telemetry::{ParsedSample, TimeSeriesPoint, VariableGroup};
use std::collections::HashMap;

/// Group samples by variable id.
///
/// Points keep upstream order inside a group. The order of the groups
/// themselves is unspecified.
pub fn group_samples(samples: Vec<ParsedSample>, spec: &QuerySpec) -> Vec<VariableGroup> {
    let mut grouped: HashMap<i64, Vec<TimeSeriesPoint>> = HashMap::new();
    for sample in samples {
        grouped
            .entry(sample.variable_id)
            .or_default()
            .push(sample.point);
    }

    grouped
        .into_iter()
        .map(|(variable_id, points)| {
            let name = spec
                .display_name(variable_id)
                .map(str::to_string)
                .unwrap_or_else(|| variable_id.to_string());
            tracing::debug!(variable_id, name = %name, count = points.len(), "Grouped values");
            VariableGroup {
                variable_id,
                name,
                points,
            }
        })
        .collect()
}
