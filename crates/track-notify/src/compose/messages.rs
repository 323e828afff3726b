//! Notification message composition.
//!
//! Pure functions from domain entities to mail content. Keeping composition
//! separate from the transport lets the texts be unit tested without a
//! relay.

use chrono::{DateTime, Duration, Utc};

use track_core::entities::{OpenEvent, TrackedMessage};

/// Timestamp style used inside notification bodies
const TIMESTAMP_FORMAT: &str = "%B %d, %Y at %I:%M %p";

/// A composed notification: subject plus plain and HTML bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Humanize the interval between sending and opening
///
/// Seconds only show under an hour, minutes only under a day. Negative
/// intervals (clock skew) and sub-second ones read as "immediately".
pub fn format_elapsed(sent_at: DateTime<Utc>, opened_at: DateTime<Utc>) -> String {
    let total_seconds = (opened_at - sent_at).num_seconds();
    if total_seconds < 0 {
        return "immediately".to_string();
    }

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(pluralize(days, "day"));
    }
    if hours > 0 {
        parts.push(pluralize(hours, "hour"));
    }
    if minutes > 0 && days == 0 {
        parts.push(pluralize(minutes, "minute"));
    }
    if seconds > 0 && days == 0 && hours == 0 {
        parts.push(pluralize(seconds, "second"));
    }

    if parts.is_empty() {
        return "immediately".to_string();
    }
    parts.join(", ")
}

fn pluralize(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Local-part of the first listed address, or "Someone"
fn recipient_name(track: &TrackedMessage) -> &str {
    track
        .recipient
        .as_deref()
        .filter(|r| !r.is_empty())
        .map(|r| r.split('@').next().unwrap_or(r))
        .unwrap_or("Someone")
}

fn display_recipient(track: &TrackedMessage) -> &str {
    track.recipient.as_deref().unwrap_or("Unknown")
}

fn display_subject(track: &TrackedMessage) -> &str {
    track.subject.as_deref().unwrap_or("(no subject)")
}

/// Compose the notification for the first genuine open of a track
pub fn first_open_email(track: &TrackedMessage, open: &OpenEvent) -> EmailContent {
    let name = recipient_name(track);
    let recipient = display_recipient(track);
    let subject_line = display_subject(track);
    let elapsed = format_elapsed(track.created_at, open.opened_at);
    let location = open
        .location()
        .unwrap_or_else(|| "Unknown location".to_string());
    let opened = open.opened_at.format(TIMESTAMP_FORMAT);

    let subject = format!("{name} read your message {elapsed} after you sent it");

    let text = format!(
        "{name} read your message!\n\
         {elapsed} after you sent it\n\
         \n\
         To: {recipient}\n\
         Subject: {subject_line}\n\
         Opened: {opened}\n\
         Location: {location}\n\
         \n\
         This is the first real open (excluding email privacy proxies).\n"
    );

    let html = format!(
        r#"<html>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; padding: 20px;">
    <h2 style="color: #27ae60;">{name} read your message!</h2>
    <p style="font-size: 18px; color: #333;"><strong>{elapsed}</strong> after you sent it</p>
    <table style="border-collapse: collapse; margin-top: 15px;">
        <tr>
            <td style="padding: 8px 15px 8px 0; color: #666; font-weight: bold;">To:</td>
            <td style="padding: 8px 0;">{recipient}</td>
        </tr>
        <tr>
            <td style="padding: 8px 15px 8px 0; color: #666; font-weight: bold;">Subject:</td>
            <td style="padding: 8px 0;">{subject_line}</td>
        </tr>
        <tr>
            <td style="padding: 8px 15px 8px 0; color: #666; font-weight: bold;">Opened:</td>
            <td style="padding: 8px 0;">{opened}</td>
        </tr>
        <tr>
            <td style="padding: 8px 15px 8px 0; color: #666; font-weight: bold;">Location:</td>
            <td style="padding: 8px 0;">{location}</td>
        </tr>
    </table>
    <p style="margin-top: 20px; color: #888; font-size: 12px;">
        This is the first real open (excluding email privacy proxies).
    </p>
</body>
</html>"#
    );

    EmailContent { subject, text, html }
}

/// Compose the reminder for a track that stayed unopened
pub fn follow_up_email(track: &TrackedMessage, now: DateTime<Utc>) -> EmailContent {
    let recipient = display_recipient(track);
    let subject_line = display_subject(track);
    let days_ago = (now - track.created_at).max(Duration::zero()).num_days();
    let sent = track.created_at.format(TIMESTAMP_FORMAT);

    let subject = format!("Follow-up Reminder: {subject_line}");

    let text = format!(
        "Time to follow up?\n\
         \n\
         Your email hasn't been opened in {days_ago} days. Consider sending a follow-up!\n\
         \n\
         To: {recipient}\n\
         Subject: {subject_line}\n\
         Sent: {sent}\n\
         \n\
         This email has not been opened (excluding automated proxy prefetches).\n"
    );

    let html = format!(
        r#"<html>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; padding: 20px;">
    <h2 style="color: #e67e22;">Time to follow up?</h2>
    <p style="color: #555; font-size: 16px;">
        Your email hasn't been opened in <strong>{days_ago} days</strong>. Consider sending a follow-up!
    </p>
    <table style="border-collapse: collapse; margin-top: 15px;">
        <tr>
            <td style="padding: 8px 15px 8px 0; color: #666; font-weight: bold;">To:</td>
            <td style="padding: 8px 0;">{recipient}</td>
        </tr>
        <tr>
            <td style="padding: 8px 15px 8px 0; color: #666; font-weight: bold;">Subject:</td>
            <td style="padding: 8px 0;">{subject_line}</td>
        </tr>
        <tr>
            <td style="padding: 8px 15px 8px 0; color: #666; font-weight: bold;">Sent:</td>
            <td style="padding: 8px 0;">{sent}</td>
        </tr>
    </table>
    <p style="margin-top: 20px; color: #888; font-size: 12px;">
        This email has not been opened (excluding automated proxy prefetches).
    </p>
</body>
</html>"#
    );

    EmailContent { subject, text, html }
}
