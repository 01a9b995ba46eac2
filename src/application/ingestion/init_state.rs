use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of the one-time bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    Uninitialized,
    Initializing,
    Ready,
}

impl InitPhase {
    fn as_u8(self) -> u8 {
        match self {
            InitPhase::Uninitialized => 0,
            InitPhase::Initializing => 1,
            InitPhase::Ready => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => InitPhase::Initializing,
            2 => InitPhase::Ready,
            _ => InitPhase::Uninitialized,
        }
    }
}

/// Atomic holder for [`InitPhase`]; only one caller can move it out of
/// `Uninitialized`
#[derive(Debug)]
pub struct InitializationState {
    phase: AtomicU8,
}

impl InitializationState {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(InitPhase::Uninitialized.as_u8()),
        }
    }

    pub fn phase(&self) -> InitPhase {
        InitPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Claim initialization. Returns the phase that blocked the claim when
    /// another caller already owns or finished it.
    pub fn try_begin(&self) -> Result<(), InitPhase> {
        self.phase
            .compare_exchange(
                InitPhase::Uninitialized.as_u8(),
                InitPhase::Initializing.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(InitPhase::from_u8)
    }

    /// `Initializing` -> `Ready`
    pub fn complete(&self) {
        self.phase
            .store(InitPhase::Ready.as_u8(), Ordering::Release);
    }

    /// `Initializing` -> `Uninitialized`, after a failed bootstrap
    pub fn abandon(&self) {
        self.phase
            .store(InitPhase::Uninitialized.as_u8(), Ordering::Release);
    }
}

impl Default for InitializationState {
    fn default() -> Self {
        Self::new()
    }
}
