// Frame assembler - builds the output tables for one query
use crate::application::grouping::group_samples;
use crate::application::normalizer::NormalizedPayload;
use crate::domain::frame::{Field, FieldValues, Frame};
use crate::domain::query::QuerySpec;
use crate::domain::telemetry::{AlarmRecord, EventRecord, VariableGroup};

pub const ALARMS_FRAME: &str = "Alarms";
pub const EVENTS_FRAME: &str = "Events";

/// Frames come out as alarms, events, then one per live variable, whatever
/// order the payloads were handed in.
pub fn assemble(spec: &QuerySpec, mut payloads: Vec<NormalizedPayload>) -> Vec<Frame> {
    payloads.sort_by_key(NormalizedPayload::kind);

    let mut frames = Vec::new();
    for payload in payloads {
        match payload {
            NormalizedPayload::Alarms(alarms) if spec.is_alarm => {
                frames.push(alarm_frame(&alarms));
            }
            NormalizedPayload::Events(events) if spec.is_event => {
                frames.push(event_frame(&events));
            }
            NormalizedPayload::Samples(samples) if spec.is_live => {
                for group in group_samples(samples, spec) {
                    tracing::debug!(variable_id = group.variable_id, name = %group.name, "Building series frame");
                    frames.push(series_frame(&group));
                }
            }
            other => {
                tracing::warn!(kind = other.kind().as_str(), "Ignoring result for inactive flag");
            }
        }
    }
    frames
}

pub fn alarm_frame(alarms: &[AlarmRecord]) -> Frame {
    Frame::new(
        ALARMS_FRAME,
        vec![
            Field::new(
                "Description",
                FieldValues::String(alarms.iter().map(|a| a.description.clone()).collect()),
            ),
            Field::new(
                "Activation Time",
                FieldValues::Time(alarms.iter().map(|a| a.activation).collect()),
            ),
            Field::new(
                "Termination Time",
                FieldValues::Time(alarms.iter().map(|a| a.termination).collect()),
            ),
        ],
    )
}

pub fn event_frame(events: &[EventRecord]) -> Frame {
    Frame::new(
        EVENTS_FRAME,
        vec![
            Field::new(
                "Description",
                FieldValues::String(events.iter().map(|e| e.description.clone()).collect()),
            ),
            Field::new(
                "Timestamp",
                FieldValues::Time(events.iter().map(|e| e.timestamp).collect()),
            ),
        ],
    )
}

pub fn series_frame(group: &VariableGroup) -> Frame {
    Frame::new(
        group.name.clone(),
        vec![
            Field::new(
                "time",
                FieldValues::Time(group.points.iter().map(|p| Some(p.time)).collect()),
            ),
            Field::new(
                "value",
                FieldValues::Number(group.points.iter().map(|p| p.value).collect()),
            ),
        ],
    )
}
