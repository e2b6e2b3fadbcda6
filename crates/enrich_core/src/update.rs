use crate::event::{download_ref_for, CANCELLED_MESSAGE};
use crate::{
    Effect, FailureCause, JobStatus, JobTracker, Msg, ProgressEvent, StatusReport, StreamFrame,
    TrackerState,
};

/// Pure update function: applies a message to the tracker and returns any effects.
///
/// Terminal states absorb every message. Push-channel messages are only
/// honoured while streaming and poll results only while polling, so late
/// deliveries from an abandoned transport are dropped.
pub fn update(mut tracker: JobTracker, msg: Msg) -> (JobTracker, Vec<Effect>) {
    if tracker.state().is_terminal() {
        return (tracker, Vec::new());
    }

    let state = tracker.state();
    let effects = match msg {
        Msg::Start { job_id } if state == TrackerState::Idle => {
            tracker.begin(job_id.clone());
            vec![Effect::OpenStream { job_id }]
        }
        Msg::StreamFrame(frame) if state.is_streaming() => on_stream_frame(&mut tracker, frame),
        Msg::StreamMalformed { detail } if state.is_streaming() => {
            let event = tracker.fail(
                FailureCause::Protocol,
                Some(format!("malformed progress frame: {detail}")),
            );
            vec![Effect::CloseStream, Effect::Notify(event)]
        }
        Msg::StreamTransportError { detail } if state.is_streaming() => {
            tracker.fall_back(detail);
            match tracker.job_id() {
                Some(job_id) => vec![
                    Effect::CloseStream,
                    Effect::StartPolling {
                        job_id: job_id.to_string(),
                    },
                ],
                None => vec![Effect::CloseStream],
            }
        }
        Msg::PollSucceeded(report) if state == TrackerState::PollingFallback => {
            on_poll_report(&mut tracker, report)
        }
        Msg::PollFailed { cause, detail } if state == TrackerState::PollingFallback => {
            let event = tracker.fail(cause, Some(detail));
            vec![Effect::StopPolling, Effect::Notify(event)]
        }
        Msg::CancelRequested => {
            let mut effects = Vec::with_capacity(2);
            if state.is_streaming() {
                effects.push(Effect::CloseStream);
            } else if state == TrackerState::PollingFallback {
                effects.push(Effect::StopPolling);
            }
            let event = tracker.fail(FailureCause::Cancelled, Some(CANCELLED_MESSAGE.to_string()));
            effects.push(Effect::Notify(event));
            effects
        }
        _ => Vec::new(),
    };

    (tracker, effects)
}

fn on_stream_frame(tracker: &mut JobTracker, frame: StreamFrame) -> Vec<Effect> {
    match frame {
        StreamFrame::Progress {
            progress,
            total,
            percentage,
            message,
        } => {
            let event = ProgressEvent::progress(progress, total, percentage, message);
            tracker.record_progress(event.clone(), TrackerState::Streaming);
            vec![Effect::Notify(event)]
        }
        StreamFrame::Completed { download_url } => {
            let download_ref = download_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| download_ref_for(tracker.job_id().unwrap_or_default()));
            let event = tracker.complete(download_ref);
            vec![Effect::CloseStream, Effect::Notify(event)]
        }
        StreamFrame::Error { error } => {
            let event = tracker.fail(FailureCause::Server, error);
            vec![Effect::CloseStream, Effect::Notify(event)]
        }
        StreamFrame::Unknown => Vec::new(),
    }
}

fn on_poll_report(tracker: &mut JobTracker, report: StatusReport) -> Vec<Effect> {
    match report.status {
        JobStatus::Completed => {
            let download_ref = download_ref_for(tracker.job_id().unwrap_or_default());
            let event = tracker.complete(download_ref);
            vec![Effect::StopPolling, Effect::Notify(event)]
        }
        JobStatus::Failed => {
            let event = tracker.fail(FailureCause::Server, report.error);
            vec![Effect::StopPolling, Effect::Notify(event)]
        }
        JobStatus::Uploaded | JobStatus::Processing | JobStatus::Running | JobStatus::Unknown => {
            let event = ProgressEvent::progress(
                report.progress,
                report.total,
                report.percentage,
                report.message,
            );
            tracker.record_progress(event.clone(), TrackerState::PollingFallback);
            vec![Effect::Notify(event)]
        }
    }
}
