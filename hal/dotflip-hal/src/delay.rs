//! Blocking delay abstraction
//!
//! Coil energize time and register settling are physical constraints, so
//! these waits block and cannot be cancelled.

/// Blocking delay provider
pub trait DelayUs {
    /// Wait at least `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Wait at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}

impl<T: DelayUs + ?Sized> DelayUs for &mut T {
    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingDelay {
        total_us: u64,
        calls: u32,
    }

    impl DelayUs for CountingDelay {
        fn delay_us(&mut self, us: u32) {
            self.total_us += us as u64;
            self.calls += 1;
        }
    }

    #[test]
    fn test_default_delay_ms() {
        let mut delay = CountingDelay {
            total_us: 0,
            calls: 0,
        };
        delay.delay_ms(3);
        assert_eq!(delay.total_us, 3_000);
        assert_eq!(delay.calls, 3);

        fn wait<D: DelayUs>(mut d: D) {
            d.delay_ms(2);
        }
        wait(&mut delay);
        assert_eq!(delay.total_us, 5_000);
    }
}
