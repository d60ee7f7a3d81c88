//! Sliding-window planning for the captioning job.

use anyhow::{anyhow, Result};

use crate::sequence;

/// Window and sampling parameters for one captioning run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowParams {
    /// Frames sampled per clip.
    pub num_frames: usize,
    /// Frames before the center frame in each window.
    pub frames_before: usize,
    /// Frames after the center frame in each window.
    pub frames_after: usize,
    /// Step between consecutive center frames.
    pub interval: usize,
    /// Shift applied to the first center frame.
    pub offset: usize,
}

impl WindowParams {
    pub fn validate(&self) -> Result<()> {
        if self.num_frames == 0 {
            return Err(anyhow!("a clip must sample at least one frame"));
        }
        if self.interval == 0 {
            return Err(anyhow!("window interval must be greater than zero"));
        }
        Ok(())
    }
}

/// One planned window: indices into the sorted frame list. `end` is
/// inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub center: usize,
    pub start: usize,
    pub end: usize,
}

/// Outcome of planning: the windows to caption plus the count dropped by
/// the session-boundary rule.
#[derive(Clone, Debug)]
pub struct WindowPlan {
    pub windows: Vec<Window>,
    pub skipped: usize,
}

/// Plan caption windows over a sorted frame-name sequence.
///
/// Centers step from `frames_before + offset` to the last index that still
/// leaves `frames_after` frames, in steps of `interval`. A window whose
/// start and end frames carry different session prefixes spans two
/// recordings and is skipped.
pub fn plan_windows(names: &[String], params: &WindowParams) -> Result<WindowPlan> {
    params.validate()?;

    let mut plan = WindowPlan {
        windows: Vec::new(),
        skipped: 0,
    };
    let Some(limit) = names.len().checked_sub(params.frames_after) else {
        return Ok(plan);
    };

    let mut center = params.frames_before + params.offset;
    while center < limit {
        let start = center - params.frames_before;
        let end = center + params.frames_after;

        let start_session = sequence::session_prefix(&names[start])?;
        let end_session = sequence::session_prefix(&names[end])?;
        if start_session == end_session {
            plan.windows.push(Window { center, start, end });
        } else {
            log::debug!(
                "skipping window centered on {}: spans sessions {} and {}",
                names[center],
                start_session,
                end_session
            );
            plan.skipped += 1;
        }
        center += params.interval;
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(session: &str, count: usize) -> Vec<String> {
        assert_eq!(session.len(), sequence::SESSION_PREFIX_LEN);
        (0..count)
            .map(|i| format!("{session}_frame_{i:04}_05.jpg"))
            .collect()
    }

    fn params(before: usize, after: usize, interval: usize, offset: usize) -> WindowParams {
        WindowParams {
            num_frames: 4,
            frames_before: before,
            frames_after: after,
            interval,
            offset,
        }
    }

    #[test]
    fn centers_step_across_the_valid_range() {
        let names = names("rec_a_00001", 12);
        let plan = plan_windows(&names, &params(2, 2, 3, 0)).unwrap();

        let centers: Vec<usize> = plan.windows.iter().map(|w| w.center).collect();
        assert_eq!(centers, vec![2, 5, 8]);
        assert_eq!(plan.windows[0].start, 0);
        assert_eq!(plan.windows[0].end, 4);
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn offset_shifts_the_first_center() {
        let names = names("rec_a_00001", 12);
        let plan = plan_windows(&names, &params(2, 2, 3, 1)).unwrap();

        let centers: Vec<usize> = plan.windows.iter().map(|w| w.center).collect();
        assert_eq!(centers, vec![3, 6, 9]);
    }

    #[test]
    fn windows_spanning_two_sessions_are_skipped() {
        let mut all = names("rec_a_00001", 6);
        all.extend(names("rec_b_00001", 6));

        let plan = plan_windows(&all, &params(2, 2, 1, 0)).unwrap();

        // Any window whose [start, end] crosses the 6-frame boundary drops.
        for window in &plan.windows {
            let start_session = &all[window.start][..sequence::SESSION_PREFIX_LEN];
            let end_session = &all[window.end][..sequence::SESSION_PREFIX_LEN];
            assert_eq!(start_session, end_session);
        }
        assert_eq!(plan.skipped, 4);
        assert_eq!(plan.windows.len() + plan.skipped, 8);
    }

    #[test]
    fn short_sequences_produce_no_windows() {
        let names = names("rec_a_00001", 4);
        let plan = plan_windows(&names, &params(32, 32, 100, 0)).unwrap();
        assert!(plan.windows.is_empty());
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let names = names("rec_a_00001", 8);
        assert!(plan_windows(&names, &params(1, 1, 0, 0)).is_err());
    }
}
