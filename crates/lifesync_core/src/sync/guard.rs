//! Single-flight guard for sync.
//!
//! A second acquire while a permit is alive is refused, not queued. The
//! permit releases the flag on drop, so every exit path (completion,
//! timeout, failure, cancelled future) clears it.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SingleFlight {
    in_flight: AtomicBool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a permit, or `None` if another flight holds one.
    pub fn try_acquire(&self) -> Option<FlightPermit<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightPermit { flight: self })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of one flight.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.flight.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::SingleFlight;

    #[test]
    fn second_acquire_is_refused_until_drop() {
        let flight = SingleFlight::new();
        let permit = flight.try_acquire().expect("first acquire");
        assert!(flight.is_in_flight());
        assert!(flight.try_acquire().is_none());

        drop(permit);
        assert!(!flight.is_in_flight());
        assert!(flight.try_acquire().is_some());
    }
}
