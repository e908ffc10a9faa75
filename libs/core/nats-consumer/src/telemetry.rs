//! Trace context extraction and per-message spans.
//!
//! Each message is processed inside one span carrying the broker metadata
//! and, when the publisher propagated a W3C `traceparent` header, the
//! upstream trace id. The span is closed on every path, early returns
//! included, because the worker drives all processing through it.

use crate::consumer::InboundMessage;
use crate::outcome::ProcessingOutcome;
use tracing::{field, info_span, Span};

/// Header carrying W3C trace context.
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Extract the trace id from a `traceparent` header value.
///
/// Format: `{version:2}-{trace_id:32}-{parent_id:16}-{flags:2}`, all
/// lowercase hex. An all-zero trace id is invalid.
pub fn parse_trace_id(traceparent: &str) -> Option<&str> {
    let mut parts = traceparent.split('-');
    let version = parts.next()?;
    let trace_id = parts.next()?;
    let parent_id = parts.next()?;
    let flags = parts.next()?;

    if version.len() != 2 || trace_id.len() != 32 || parent_id.len() != 16 || flags.len() != 2 {
        return None;
    }

    let is_hex = |s: &str| s.chars().all(|c| c.is_ascii_hexdigit());
    if !is_hex(version) || !is_hex(trace_id) || !is_hex(parent_id) || !is_hex(flags) {
        return None;
    }

    if trace_id.chars().all(|c| c == '0') {
        return None;
    }

    Some(trace_id)
}

/// Open the processing span for one delivery attempt.
///
/// Records subject, stream, stream sequence, delivery sequence, and
/// `redelivery_count = max(0, delivery_count - 1)`. The `trace_id` field
/// is filled from the propagated context when present; `outcome` is
/// recorded by [`record_outcome`] once the attempt resolves.
pub fn message_span(message: &InboundMessage) -> Span {
    let span = info_span!(
        "process_message",
        subject = %message.subject,
        stream = %message.stream,
        stream_sequence = message.stream_sequence,
        delivery_sequence = message.delivery_sequence,
        redelivery_count = (message.delivery_count - 1).max(0),
        trace_id = field::Empty,
        outcome = field::Empty,
    );

    if let Some(trace_id) = message
        .header(TRACEPARENT_HEADER)
        .and_then(parse_trace_id)
    {
        span.record("trace_id", trace_id);
    }

    span
}

/// Record the final outcome on the message span.
pub fn record_outcome(span: &Span, outcome: &ProcessingOutcome) {
    let label = match outcome {
        ProcessingOutcome::Ack => "ack",
        ProcessingOutcome::RetryWithDelay(_) => "retry",
        ProcessingOutcome::DeadLetter(_) => "dlq",
    };
    span.record("outcome", label);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_traceparent() {
        let value = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
        assert_eq!(
            parse_trace_id(value),
            Some("4bf92f3577b34da6a3ce929d0e0e4736")
        );
    }

    #[test]
    fn test_parse_rejects_zero_trace_id() {
        let value = "00-00000000000000000000000000000000-00f067aa0ba902b7-01";
        assert_eq!(parse_trace_id(value), None);
    }

    #[test]
    fn test_parse_rejects_malformed_values() {
        assert_eq!(parse_trace_id(""), None);
        assert_eq!(parse_trace_id("not-a-traceparent"), None);
        // Trace id too short.
        assert_eq!(parse_trace_id("00-4bf92f35-00f067aa0ba902b7-01"), None);
        // Non-hex characters.
        assert_eq!(
            parse_trace_id("00-zzzz2f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
            None
        );
    }
}
