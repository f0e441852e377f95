// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulation clock
//!
//! The clock starts at `u32::MAX` so that the first advance yields tick 0.

/// Current tick, tick limit and infinite-run flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationClock {
    tick: u32,
    simulation_ticks: u32,
    infinite_run: bool,
    timer_count: u32,
}

impl SimulationClock {
    pub fn new(simulation_ticks: u32, infinite_run: bool) -> Self {
        Self {
            tick: u32::MAX,
            simulation_ticks,
            infinite_run,
            timer_count: 0,
        }
    }

    /// Current tick (`u32::MAX` before the first advance)
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn simulation_ticks(&self) -> u32 {
        self.simulation_ticks
    }

    pub fn infinite_run(&self) -> bool {
        self.infinite_run
    }

    /// Timer events seen so far, including ignored ones
    pub fn timer_count(&self) -> u32 {
        self.timer_count
    }

    pub(crate) fn count_timer_event(&mut self) -> u32 {
        let count = self.timer_count;
        self.timer_count = self.timer_count.wrapping_add(1);
        count
    }

    /// Move to the next tick and return it
    pub fn advance(&mut self) -> u32 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    /// Step back one tick so the current tick runs again after a resume
    pub fn rollback(&mut self) {
        self.tick = self.tick.wrapping_sub(1);
    }

    /// True once the configured run length has been reached
    pub fn is_finished(&self) -> bool {
        !self.infinite_run && self.tick >= self.simulation_ticks
    }

    /// New run length for the next resume
    pub fn set_run_length(&mut self, simulation_ticks: u32, infinite_run: bool) {
        self.simulation_ticks = simulation_ticks;
        self.infinite_run = infinite_run;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_advance_is_tick_zero() {
        let mut clock = SimulationClock::new(10, false);
        assert_eq!(clock.advance(), 0);
        assert_eq!(clock.advance(), 1);
    }

    #[test]
    fn test_finished_at_limit() {
        let mut clock = SimulationClock::new(2, false);
        clock.advance();
        assert!(!clock.is_finished());
        clock.advance();
        assert!(!clock.is_finished());
        clock.advance();
        assert!(clock.is_finished());
        clock.rollback();
        assert_eq!(clock.tick(), 1);
    }

    #[test]
    fn test_infinite_run_never_finishes() {
        let mut clock = SimulationClock::new(0, true);
        for _ in 0..100 {
            clock.advance();
            assert!(!clock.is_finished());
        }
    }
}
