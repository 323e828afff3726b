//! Per-recipient engagement scoring

/// Weight of the opened-tracks / sent-tracks ratio
const OPEN_RATE_WEIGHT: f64 = 0.5;
/// Weight of the recency decay term
const RECENCY_WEIGHT: f64 = 0.3;
/// Weight of the open-depth term
const DEPTH_WEIGHT: f64 = 0.2;
/// Days for the recency term to decay to 1/e
const RECENCY_DECAY_DAYS: f64 = 30.0;
/// Genuine opens at which the depth term reaches 0.5
const DEPTH_PIVOT: f64 = 5.0;

/// Aggregated inputs for one recipient address
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngagementInput {
    /// Tracked messages listing this address
    pub tracks_sent: u64,
    /// Of those, how many have at least one genuine open
    pub tracks_opened: u64,
    /// Genuine opens across all of the recipient's tracks
    pub genuine_opens: u64,
    /// Days since the most recent genuine open, None when never opened
    pub days_since_last_open: Option<f64>,
}

/// Engagement score in the closed range [0, 100]
///
/// score = 100 * (0.5 * open_rate + 0.3 * recency + 0.2 * depth)
///   open_rate = tracks_opened / tracks_sent          (0 when nothing sent)
///   recency   = exp(-days_since_last_open / 30)      (0 when never opened)
///   depth     = genuine_opens / (genuine_opens + 5)
///
/// Each term is monotonic: more opened tracks, more recent activity, or more
/// total opens never lowers the score, and a recipient with zero genuine
/// opens scores exactly 0. Rounded to one decimal.
pub fn engagement_score(input: &EngagementInput) -> f64 {
    let open_rate = if input.tracks_sent == 0 {
        0.0
    } else {
        input.tracks_opened as f64 / input.tracks_sent as f64
    };

    let recency = input
        .days_since_last_open
        .map(|days| (-days.max(0.0) / RECENCY_DECAY_DAYS).exp())
        .unwrap_or(0.0);

    let opens = input.genuine_opens as f64;
    let depth = opens / (opens + DEPTH_PIVOT);

    let score =
        100.0 * (OPEN_RATE_WEIGHT * open_rate + RECENCY_WEIGHT * recency + DEPTH_WEIGHT * depth);
    (score.clamp(0.0, 100.0) * 10.0).round() / 10.0
}
