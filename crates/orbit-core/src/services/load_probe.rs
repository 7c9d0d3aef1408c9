use sysinfo::System;

/// Source of the host load figure used for thermal protection.
pub trait LoadProbe: Send + Sync {
    /// Current 1-minute load average, or `0.0` when the platform has none.
    fn current_load(&self) -> f64;
}

/// Reads the real host load average.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoadProbe;

impl LoadProbe for SystemLoadProbe {
    fn current_load(&self) -> f64 {
        let load = System::load_average().one;
        if load.is_finite() && load >= 0.0 {
            load
        } else {
            0.0
        }
    }
}
