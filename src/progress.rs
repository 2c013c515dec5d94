//! Terminal progress bar with a per-match ETA.

use std::io::Write;
use std::time::Instant;

const BAR_WIDTH: usize = 50;

/// Render the bar line, e.g. `Progress: |███---| 42.0% match XYZ | ETA: 01m 30s`.
fn render(done: usize, total: usize, suffix: &str) -> String {
    let fraction = if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    };
    let filled = (BAR_WIDTH as f64 * fraction) as usize;
    let bar: String = "█".repeat(filled) + &"-".repeat(BAR_WIDTH - filled);
    format!("Progress: |{}| {:.1}% {}", bar, fraction * 100.0, suffix)
}

/// Remaining time estimate from the average pace so far.
fn eta_suffix(done: usize, total: usize, started: Instant) -> String {
    if done == 0 {
        return String::new();
    }
    let avg = started.elapsed().as_secs_f64() / done as f64;
    let remaining = (total.saturating_sub(done)) as f64 * avg;
    let secs = remaining as u64;
    format!(" | ETA: {:02}m {:02}s", secs / 60, secs % 60)
}

pub struct ProgressBar {
    total: usize,
    done: usize,
    started: Instant,
}

impl ProgressBar {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            done: 0,
            started: Instant::now(),
        }
    }

    /// Advance by one and redraw the line.
    pub fn tick(&mut self, label: &str) {
        let eta = eta_suffix(self.done, self.total, self.started);
        self.done += 1;
        let line = render(self.done, self.total, &format!("{}{}", label, eta));
        print!("\r{}", line);
        let _ = std::io::stdout().flush();
    }

    /// Draw the completed bar and move to the next line.
    pub fn finish(&self) {
        if self.total > 0 {
            println!("\r{}", render(self.total, self.total, "done"));
        }
    }
}
