/// Interaction lock: ref-counted suspension of player control.
///
/// Each modal subsystem holds its own slot in the lock. Locomotion is
/// stopped when the first slot is taken and resumed only when the last
/// one is released, so one subsystem closing never frees the player
/// while another is still on screen.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Host-side player movement control.
pub trait Locomotion {
    fn stop_movement(&mut self);
    fn resume_movement(&mut self);
}

/// A modal interaction that can suspend player control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subsystem {
    Dialogue,
    Fragment,
    Retelling,
    Inventory,
    Thought,
}

impl Subsystem {
    const ALL: [Subsystem; 5] = [
        Subsystem::Dialogue,
        Subsystem::Fragment,
        Subsystem::Retelling,
        Subsystem::Inventory,
        Subsystem::Thought,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

struct LockState {
    held: Cell<u8>,
    issued: Cell<u8>,
    locomotion: RefCell<Box<dyn Locomotion>>,
}

impl fmt::Debug for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockState")
            .field("held", &self.held.get())
            .field("issued", &self.issued.get())
            .finish()
    }
}

/// Owner of the shared lock. Hands out one writer handle per subsystem
/// and any number of read-only views.
#[derive(Debug, Clone)]
pub struct InteractionLock {
    state: Rc<LockState>,
}

impl InteractionLock {
    pub fn new(locomotion: Box<dyn Locomotion>) -> Self {
        Self {
            state: Rc::new(LockState {
                held: Cell::new(0),
                issued: Cell::new(0),
                locomotion: RefCell::new(locomotion),
            }),
        }
    }

    /// Writer handle for one subsystem's slot. Each subsystem's handle
    /// is issued once; later requests get `None`.
    pub fn handle(&self, subsystem: Subsystem) -> Option<LockHandle> {
        let bit = subsystem.bit();
        let issued = self.state.issued.get();
        if issued & bit != 0 {
            tracing::warn!(?subsystem, "lock handle already issued");
            return None;
        }
        self.state.issued.set(issued | bit);
        Some(LockHandle {
            subsystem,
            state: Rc::clone(&self.state),
        })
    }

    pub fn view(&self) -> LockView {
        LockView {
            state: Rc::clone(&self.state),
        }
    }
}

/// Acquire/release rights for a single subsystem.
#[derive(Debug)]
pub struct LockHandle {
    subsystem: Subsystem,
    state: Rc<LockState>,
}

impl LockHandle {
    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    /// Take this subsystem's slot. No-op if already held.
    pub fn acquire(&self) {
        let held = self.state.held.get();
        let bit = self.subsystem.bit();
        if held & bit != 0 {
            return;
        }
        self.state.held.set(held | bit);
        tracing::debug!(subsystem = ?self.subsystem, "interaction lock acquired");
        // Locomotion runs after the flags are updated and may read them.
        if held == 0 {
            self.state.locomotion.borrow_mut().stop_movement();
        }
    }

    /// Give up this subsystem's slot. No-op if not held.
    pub fn release(&self) {
        let held = self.state.held.get();
        let bit = self.subsystem.bit();
        if held & bit == 0 {
            return;
        }
        self.state.held.set(held & !bit);
        tracing::debug!(subsystem = ?self.subsystem, "interaction lock released");
        if held & !bit == 0 {
            self.state.locomotion.borrow_mut().resume_movement();
        }
    }

    pub fn is_held(&self) -> bool {
        self.state.held.get() & self.subsystem.bit() != 0
    }
}

/// Read-only view of which subsystems hold the lock.
#[derive(Debug, Clone)]
pub struct LockView {
    state: Rc<LockState>,
}

impl LockView {
    pub fn is_active(&self, subsystem: Subsystem) -> bool {
        self.state.held.get() & subsystem.bit() != 0
    }

    pub fn any_active(&self) -> bool {
        self.state.held.get() != 0
    }

    pub fn holders(&self) -> Vec<Subsystem> {
        Subsystem::ALL
            .into_iter()
            .filter(|s| self.is_active(*s))
            .collect()
    }

    pub fn dialogue_active(&self) -> bool {
        self.is_active(Subsystem::Dialogue)
    }

    pub fn fragment_active(&self) -> bool {
        self.is_active(Subsystem::Fragment)
    }

    pub fn retelling_active(&self) -> bool {
        self.is_active(Subsystem::Retelling)
    }
}
