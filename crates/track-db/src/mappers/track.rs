//! Tracked message entity <-> model mapper

use track_core::entities::{RecipientRollup, TrackOpenSummary, TrackedMessage};
use track_core::value_objects::TrackingId;

use crate::models::{RecipientRollupModel, TrackModel, TrackSummaryModel};

/// Convert TrackModel to TrackedMessage entity
impl From<TrackModel> for TrackedMessage {
    fn from(model: TrackModel) -> Self {
        TrackedMessage {
            id: TrackingId::new(model.id),
            recipient: model.recipient,
            subject: model.subject,
            notes: model.notes,
            message_group_id: model.message_group_id,
            pinned: model.pinned,
            created_at: model.created_at,
            first_open_notified_at: model.first_open_notified_at,
            follow_up_notified_at: model.follow_up_notified_at,
        }
    }
}

/// Convert TrackSummaryModel to TrackOpenSummary entity
impl From<TrackSummaryModel> for TrackOpenSummary {
    fn from(model: TrackSummaryModel) -> Self {
        TrackOpenSummary {
            track: TrackedMessage {
                id: TrackingId::new(model.id),
                recipient: model.recipient,
                subject: model.subject,
                notes: model.notes,
                message_group_id: model.message_group_id,
                pinned: model.pinned,
                created_at: model.created_at,
                first_open_notified_at: model.first_open_notified_at,
                follow_up_notified_at: model.follow_up_notified_at,
            },
            total_opens: model.total_opens,
            genuine_opens: model.genuine_opens,
            first_open_at: model.first_open_at,
            last_open_at: model.last_open_at,
        }
    }
}

/// Convert RecipientRollupModel to RecipientRollup entity
impl From<RecipientRollupModel> for RecipientRollup {
    fn from(model: RecipientRollupModel) -> Self {
        RecipientRollup {
            recipient: model.recipient,
            created_at: model.created_at,
            genuine_opens: model.genuine_opens,
            last_genuine_open_at: model.last_genuine_open_at,
        }
    }
}
