//! Command-line interface definition.

use clap::Parser;

/// permsweep - remove legacy tracker events from users' Google Calendars
///
/// One-shot migration cleanup: reads connected users from the legacy user
/// table and deletes the tracker-created events from each user's primary
/// calendar. Safe to re-run; already-deleted events simply are not found
/// again.
#[derive(Debug, Parser)]
#[command(name = "permsweep")]
#[command(author, version, about)]
pub struct Cli {
    /// Show what would be deleted without issuing any delete calls
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}
