use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error as ThisError;

///
/// Cancellation
///
/// Cloneable stop flag shared between a generation pass and whoever drives
/// it. The pass polls it between units of work and bails out with
/// `Cancelled`, leaving nothing emitted.
///

#[derive(Clone, Debug, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

///
/// Cancelled
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("generation cancelled")]
pub struct Cancelled;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = Cancellation::new();
        let observer = token.clone();
        assert_eq!(observer.check(), Ok(()));

        token.cancel();

        assert!(observer.is_cancelled());
        assert_eq!(observer.check(), Err(Cancelled));
    }
}
