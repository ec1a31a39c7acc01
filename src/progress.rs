//! Progress reporting for long-running rehashes.
//!
//! A table never owns its progress reporting. It borrows an observer for the
//! duration of a rehash and tells it how many entries have been migrated.

/// Receives step counts while a table migrates its entries.
pub trait ProgressObserver: Send + Sync {
    /// Called once before the first entry is migrated.
    fn start(&self, label: &str, steps: usize);

    /// Called after each migrated entry. `done` counts from 1 to `steps`.
    fn step(&self, done: usize, steps: usize);

    /// Called once after the last entry is migrated.
    fn end(&self, label: &str, steps: usize);
}

/// Reports progress through the `log` facade in ten percent increments.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn start(&self, label: &str, steps: usize) {
        log::info!("{label}: migrating {steps} entries");
    }

    fn step(&self, done: usize, steps: usize) {
        if reports_step(done, steps) {
            log::info!("{}% ({done}/{steps})", done * 100 / steps);
        }
    }

    fn end(&self, label: &str, steps: usize) {
        log::info!("{label}: migrated {steps} entries");
    }
}

/// Whether `done` falls on a ten percent boundary. The final step is left to
/// [`ProgressObserver::end`].
fn reports_step(done: usize, steps: usize) -> bool {
    let tenth = (steps / 10).max(1);
    done % tenth == 0 && done < steps
}
