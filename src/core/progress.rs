//! Progress computation and console rendering for downloads
//!
//! Snapshots are pure data derived from (bytes transferred, total size,
//! elapsed time); the reporter renders them as a single rewritten console
//! line, throttled so redraws only happen on real advancement.

use std::io::Write;

/// Number of cells in the rendered progress bar
const BAR_WIDTH: usize = 20;

/// Display unit chosen by magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    KiB,
    MiB,
}

impl SizeUnit {
    /// Unit used to display a transfer of `reference_size` bytes.
    pub fn for_size(reference_size: u64) -> Self {
        if reference_size >= 1024 * 1024 {
            SizeUnit::MiB
        } else {
            SizeUnit::KiB
        }
    }

    fn divisor(self) -> f64 {
        match self {
            SizeUnit::KiB => 1024.0,
            SizeUnit::MiB => 1024.0 * 1024.0,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SizeUnit::KiB => "KiB",
            SizeUnit::MiB => "MiB",
        }
    }
}

/// State of a transfer at one reporting tick.
///
/// `percent` and `eta_secs` are `None` when the total size is unknown (or
/// zero) or when no throughput has been observed yet; they are never NaN and
/// never negative.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot {
    pub transferred: u64,
    pub total: Option<u64>,
    pub percent: Option<f64>,
    pub unit: SizeUnit,
    pub elapsed_secs: f64,
    pub eta_secs: Option<f64>,
}

impl ProgressSnapshot {
    pub fn new(transferred: u64, total: Option<u64>, elapsed_secs: f64) -> Self {
        let total = total.filter(|size| *size > 0);

        let percent =
            total.map(|size| (transferred as f64 / size as f64 * 100.0).clamp(0.0, 100.0));

        let unit = SizeUnit::for_size(total.unwrap_or(transferred));

        let eta_secs = total.and_then(|size| {
            if elapsed_secs <= 0.0 {
                return None;
            }
            let speed = transferred as f64 / elapsed_secs;
            if speed > 0.0 {
                Some(size.saturating_sub(transferred) as f64 / speed)
            } else {
                None
            }
        });

        Self {
            transferred,
            total,
            percent,
            unit,
            elapsed_secs,
            eta_secs,
        }
    }

    /// Bytes transferred expressed in the display unit.
    pub fn scaled_transferred(&self) -> f64 {
        self.transferred as f64 / self.unit.divisor()
    }

    /// Total size expressed in the display unit.
    pub fn scaled_total(&self) -> Option<f64> {
        self.total.map(|size| size as f64 / self.unit.divisor())
    }
}

/// Renders snapshots to stdout, at most once per `step` percentage points.
///
/// The first call always renders. When the percentage is unavailable the bar
/// stays empty and percent/ETA print as `--`; without a percentage to
/// advance, no further lines are emitted.
pub struct ProgressReporter {
    step: f64,
    rendered: bool,
    last_percent: Option<f64>,
}

impl ProgressReporter {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            rendered: false,
            last_percent: None,
        }
    }

    /// Render `snapshot` if it advanced far enough; returns whether a line
    /// was written.
    pub fn report(&mut self, snapshot: &ProgressSnapshot) -> bool {
        if !self.should_render(snapshot) {
            return false;
        }
        self.rendered = true;
        self.last_percent = snapshot.percent;

        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "\r{}", render_line(snapshot));
        let _ = stdout.flush();
        true
    }

    /// Terminate the progress line once anything was rendered.
    pub fn finish(&self) {
        if self.rendered {
            println!();
        }
    }

    fn should_render(&self, snapshot: &ProgressSnapshot) -> bool {
        if !self.rendered {
            return true;
        }
        match (snapshot.percent, self.last_percent) {
            (Some(percent), Some(last)) => percent - last >= self.step,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

fn render_line(snapshot: &ProgressSnapshot) -> String {
    let (bar, percent_text) = match snapshot.percent {
        Some(percent) => {
            let filled = (percent / 100.0 * BAR_WIDTH as f64) as usize;
            let filled = filled.min(BAR_WIDTH);
            (
                format!("{}{}", "=".repeat(filled), " ".repeat(BAR_WIDTH - filled)),
                format!("{:.2}%", percent),
            )
        }
        None => (" ".repeat(BAR_WIDTH), "--".to_string()),
    };

    let eta_text = match snapshot.eta_secs {
        Some(eta) => format!("{:.2}s", eta),
        None => "--".to_string(),
    };

    match snapshot.scaled_total() {
        Some(total) => format!(
            "[{}] {}  {:.2} {} / {:.2} {}  Time Remaining: {}",
            bar,
            percent_text,
            snapshot.scaled_transferred(),
            snapshot.unit.label(),
            total,
            snapshot.unit.label(),
            eta_text,
        ),
        None => format!(
            "[{}] {}  {:.2} {} transferred  Time Remaining: {}",
            bar,
            percent_text,
            snapshot.scaled_transferred(),
            snapshot.unit.label(),
            eta_text,
        ),
    }
}
