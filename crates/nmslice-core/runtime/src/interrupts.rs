// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Interrupt masking
//!
//! The platform exposes "disable and return previous state" / "restore state"
//! primitives. [`CriticalSection`] wraps them in a guard that restores the
//! previous state when dropped, so every exit path (early return included)
//! unmasks.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Which interrupts a critical section masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InterruptMask {
    /// Regular interrupts only (timer, packet DMA completion)
    Irq = 1,
    /// Every interrupt, fast interrupts (inbound packets) included
    All = 2,
}

/// Platform interrupt control
pub trait InterruptControl {
    /// Opaque saved state returned by `disable`
    type State: Copy;

    /// Mask interrupts, returning the state to restore later
    fn disable(&self, mask: InterruptMask) -> Self::State;

    /// Restore a state returned by `disable`
    fn restore(&self, state: Self::State);
}

/// Scoped interrupt mask; restores the previous state on drop
#[must_use = "interrupts are restored as soon as the guard is dropped"]
pub struct CriticalSection<'a, I: InterruptControl> {
    control: &'a I,
    saved: I::State,
}

impl<'a, I: InterruptControl> CriticalSection<'a, I> {
    /// Mask interrupts until the guard is dropped
    pub fn enter(control: &'a I, mask: InterruptMask) -> Self {
        let saved = control.disable(mask);
        Self { control, saved }
    }

    /// Restore now (equivalent to dropping the guard)
    pub fn exit(self) {}
}

impl<I: InterruptControl> Drop for CriticalSection<'_, I> {
    fn drop(&mut self) {
        self.control.restore(self.saved);
    }
}

/// Software interrupt controller for host builds and tests
///
/// Tracks the current mask level and how many sections were entered.
#[derive(Debug, Default)]
pub struct HostInterrupts {
    level: AtomicU8,
    entered: AtomicU32,
}

impl HostInterrupts {
    /// Create an unmasked controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mask, `None` when unmasked
    pub fn current_mask(&self) -> Option<InterruptMask> {
        match self.level.load(Ordering::Acquire) {
            1 => Some(InterruptMask::Irq),
            2 => Some(InterruptMask::All),
            _ => None,
        }
    }

    /// True while any interrupt is masked
    pub fn is_masked(&self) -> bool {
        self.level.load(Ordering::Acquire) != 0
    }

    /// Number of critical sections entered so far
    pub fn sections_entered(&self) -> u32 {
        self.entered.load(Ordering::Relaxed)
    }
}

impl InterruptControl for HostInterrupts {
    type State = u8;

    fn disable(&self, mask: InterruptMask) -> u8 {
        self.entered.fetch_add(1, Ordering::Relaxed);
        let requested = mask as u8;
        let previous = self.level.load(Ordering::Acquire);
        // Masking never lowers an already stronger mask
        self.level.store(previous.max(requested), Ordering::Release);
        previous
    }

    fn restore(&self, state: u8) {
        self.level.store(state, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_on_drop() {
        let irq = HostInterrupts::new();
        {
            let _cs = CriticalSection::enter(&irq, InterruptMask::All);
            assert_eq!(irq.current_mask(), Some(InterruptMask::All));
        }
        assert!(!irq.is_masked());
        assert_eq!(irq.sections_entered(), 1);
    }

    #[test]
    fn test_nested_sections_restore_outer_mask() {
        let irq = HostInterrupts::new();
        let outer = CriticalSection::enter(&irq, InterruptMask::Irq);
        {
            let _inner = CriticalSection::enter(&irq, InterruptMask::All);
            assert_eq!(irq.current_mask(), Some(InterruptMask::All));
        }
        assert_eq!(irq.current_mask(), Some(InterruptMask::Irq));
        outer.exit();
        assert_eq!(irq.current_mask(), None);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn bail(irq: &HostInterrupts) -> Option<()> {
            let _cs = CriticalSection::enter(irq, InterruptMask::Irq);
            None::<()>?;
            Some(())
        }
        let irq = HostInterrupts::new();
        assert!(bail(&irq).is_none());
        assert!(!irq.is_masked());
    }
}
