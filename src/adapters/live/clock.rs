//! System clock used to stamp evaluation reports.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Reads the wall clock on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::eval::{render_report, Metrics};

    #[test]
    fn report_is_stamped_with_the_current_time() {
        let clock: &dyn Clock = &LiveClock;
        let before = Utc::now();
        let stamp = clock.now();
        assert!(stamp >= before && stamp <= Utc::now());

        let text = render_report(Path::new("d.csv"), &Metrics::default(), &[], stamp);
        let expected = stamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        assert!(text.contains(&format!("- Generated: {expected}")));
    }
}
