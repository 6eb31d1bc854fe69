//! Human-readable rendering of a [`CycleReport`].

use savewarden_core::{CycleReport, Notification};

use crate::styled_output::{MessageType, println_styled};

/// Every line of `report` with the style it is printed in, in report order.
pub fn styled_lines(report: &CycleReport) -> Vec<(MessageType, String)> {
    let mut lines = Vec::new();
    for err in &report.rejected {
        lines.push((MessageType::Warning, format!("Skipping {err}")));
    }
    for request in &report.planned {
        lines.push((MessageType::Dim, format!("Would delete {}", request.save)));
    }
    for save in &report.deleted {
        lines.push((MessageType::Success, format!("Deleted {save}")));
    }
    for save in &report.already_gone {
        lines.push((MessageType::Dim, format!("Already gone: {save}")));
    }
    for failure in &report.failures {
        lines.push((
            MessageType::Error,
            format!("Failed to delete {}: {}", failure.save, failure.error),
        ));
    }
    for notification in &report.notifications {
        let msg_type = match notification {
            Notification::ProtectionStopped { .. } => MessageType::Warning,
            _ => MessageType::Info,
        };
        lines.push((msg_type, notification.to_string()));
    }
    lines
}

/// Print `report` to stdout, one line per event.
pub fn print_report(report: &CycleReport) {
    for (msg_type, line) in styled_lines(report) {
        println_styled(msg_type, &line);
    }
}
