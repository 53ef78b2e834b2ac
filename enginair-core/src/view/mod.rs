//! Time-multiplexed view selection
//!
//! An elapsed-seconds counter, advanced once per tick, is the sole
//! driver of which screen is shown. It has no relation to wall-clock
//! time beyond the fixed tick period.

pub mod layout;

pub use layout::DisplayMultiplexer;

/// Seconds in one full view cycle
pub const VIEW_CYCLE_S: u8 = 10;

/// Last elapsed-second of the particulate window under the
/// alternating policy
const PARTICULATE_WINDOW_S: u8 = 5;

/// Which screen is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View {
    /// Four particulate mass concentrations
    Particulate,
    /// Temperature, humidity and CO2 rows
    Environmental,
    /// PM2.5 plus the full environmental triple in one fixed layout
    Combined,
}

/// How views are selected over time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewPolicy {
    /// Always render the combined layout
    Combined,
    /// Alternate particulate and environmental screens on the
    /// elapsed-seconds counter
    Alternating,
}

impl Default for ViewPolicy {
    fn default() -> Self {
        ViewPolicy::Combined
    }
}

/// Elapsed-seconds counter plus the configured policy
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    elapsed_s: u8,
    policy: ViewPolicy,
}

impl ViewState {
    pub const fn new(policy: ViewPolicy) -> Self {
        Self {
            elapsed_s: 0,
            policy,
        }
    }

    /// Current counter value, 0..VIEW_CYCLE_S
    pub fn elapsed_s(&self) -> u8 {
        self.elapsed_s
    }

    /// Advance the counter by one tick, wrapping to 0 at the cycle end
    pub fn tick(&mut self) {
        self.elapsed_s += 1;
        if self.elapsed_s >= VIEW_CYCLE_S {
            self.elapsed_s = 0;
        }
    }

    /// View to render for the current counter value
    pub fn active(&self) -> View {
        match self.policy {
            ViewPolicy::Combined => View::Combined,
            ViewPolicy::Alternating => {
                if self.elapsed_s <= PARTICULATE_WINDOW_S {
                    View::Particulate
                } else {
                    View::Environmental
                }
            }
        }
    }
}
