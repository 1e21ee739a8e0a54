//! External action bridge
//!
//! Translates deep-link style URIs delivered from outside the process into
//! tracking commands. Anything unrecognised is dropped silently; the
//! coordinator buffers at most one command until the engine is ready.

use goaltimer_domain::TrackingAction;

/// Parse an externally-delivered URI into a tracking command.
///
/// Recognises any scheme addressing the `tracking` host with an
/// `action=pause` or `action=stop` parameter; everything else is `None`.
pub fn parse_tracking_action(url: &str) -> Option<TrackingAction> {
    if !url.contains("://tracking") {
        return None;
    }
    let raw = url.split_once("action=")?.1;
    let value = raw.split(['&', '#']).next().unwrap_or("");
    match value {
        "pause" => Some(TrackingAction::Pause),
        "stop" => Some(TrackingAction::Stop),
        _ => None,
    }
}
