//! Command reply construction for `restore` and `cleanup`, isolated from
//! the callback/sweep logic so reply-formatting is unit-testable without a
//! real host.

use crate::decoder::RestoreOutcome;
use crate::host::HostReply;
use crate::sweeper::SweepSummary;

/// Render a [`RestoreOutcome`] into the reply the `restore` command gives
/// the host.
pub fn restore_reply(outcome: RestoreOutcome) -> HostReply {
    match outcome {
        RestoreOutcome::Restored => HostReply::Ok,
        RestoreOutcome::NotFound => HostReply::Null,
        RestoreOutcome::Expired => HostReply::Error("key has expired".to_string()),
        RestoreOutcome::Corrupted => HostReply::Error("corrupted data".to_string()),
        RestoreOutcome::NotInitialized => HostReply::Error("store not initialized".to_string()),
        RestoreOutcome::InvalidKey => HostReply::Error("invalid key".to_string()),
        RestoreOutcome::StoreError(msg) => HostReply::Error(msg),
        RestoreOutcome::HostError(msg) => HostReply::Error(msg),
    }
}

/// Render a [`SweepSummary`] into the `cleanup` command's four-element
/// array reply.
pub fn cleanup_reply(summary: SweepSummary) -> HostReply {
    HostReply::CleanupSummary {
        scanned: summary.scanned,
        cleaned: summary.cleaned,
    }
}
