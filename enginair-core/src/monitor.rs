//! Tick-driven acquisition-and-presentation loop
//!
//! One tick = poll both sensors, render the active view from whatever
//! the store holds, advance the view counter. Tick pacing comes from
//! the caller (the firmware's 1 s ticker, or a test loop), so the core
//! never sleeps.

use crate::reading::ReadingStore;
use crate::report::{DiagnosticSink, ErrorReporter, Level};
use crate::scheduler::SensorScheduler;
use crate::traits::{Co2Sensor, FrameSurface, ParticulateSensor};
use crate::view::{DisplayMultiplexer, ViewPolicy, ViewState};

/// Nominal tick period the firmware paces the loop with
pub const TICK_PERIOD_S: u64 = 1;

/// Owns the whole acquisition-and-presentation pipeline for the life
/// of the device.
pub struct Monitor<P, C, S, D> {
    scheduler: SensorScheduler<P, C>,
    store: ReadingStore,
    view: ViewState,
    mux: DisplayMultiplexer,
    surface: S,
    reporter: ErrorReporter<D>,
}

impl<P, C, S, D> Monitor<P, C, S, D>
where
    P: ParticulateSensor,
    C: Co2Sensor,
    S: FrameSurface,
    D: DiagnosticSink,
{
    pub fn new(particulate: P, co2: C, surface: S, sink: D, policy: ViewPolicy) -> Self {
        Self {
            scheduler: SensorScheduler::new(particulate, co2),
            store: ReadingStore::new(),
            view: ViewState::new(policy),
            mux: DisplayMultiplexer::new(),
            surface,
            reporter: ErrorReporter::new(sink),
        }
    }

    /// Start both sensors and show the outcome in the message area.
    ///
    /// Init failures leave the device running degraded; the last
    /// diagnostic stays on screen until the first tick repaints.
    pub async fn init(&mut self) {
        self.reporter.note(Level::Banner, "enginair starting");
        self.scheduler.init(&mut self.reporter).await;

        if let Some(report) = self.reporter.last() {
            if self
                .mux
                .render_message(&mut self.surface, report)
                .await
                .is_err()
            {
                self.reporter.note(Level::Warn, "display: flush failed");
            }
        }
    }

    /// One full tick. Sensor and display errors are reported and
    /// absorbed; this never fails and never blocks beyond the I/O of
    /// the polls themselves.
    pub async fn tick(&mut self) {
        self.scheduler
            .acquire(&mut self.store, &mut self.reporter)
            .await;

        let active = self.view.active();
        if self
            .mux
            .render(&mut self.surface, &self.store, active)
            .await
            .is_err()
        {
            self.reporter.note(Level::Warn, "display: flush failed");
        }

        self.view.tick();
    }

    /// Latest readings (observable for tests and telemetry)
    pub fn store(&self) -> &ReadingStore {
        &self.store
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn last_report(&self) -> Option<&crate::report::Report> {
        self.reporter.last()
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::testutil::{
        env_reading, pm_reading, Co2Tick, FakeSurface, RecordingSink, ScriptedCo2, ScriptedPm,
    };
    use crate::traits::SensorError;

    fn monitor(
        pm: ScriptedPm,
        co2: ScriptedCo2,
        policy: ViewPolicy,
    ) -> Monitor<ScriptedPm, ScriptedCo2, FakeSurface, RecordingSink> {
        Monitor::new(pm, co2, FakeSurface::new(), RecordingSink::new(), policy)
    }

    #[test]
    fn combined_frame_after_one_good_tick() {
        let mut monitor = monitor(
            ScriptedPm::reading(pm_reading(12.3)),
            ScriptedCo2::ready(env_reading(810, 23.4, 45.6)),
            ViewPolicy::Combined,
        );

        block_on(monitor.tick());

        let surface = monitor.surface();
        assert_eq!(surface.text_at(0, 2), Some("12.3"));
        assert_eq!(surface.text_at(68, 2), Some("810ppm"));
        assert_eq!(surface.text_at(0, 18), Some("23.4"));
        assert_eq!(surface.text_at(68, 18), Some("45.6%"));
        assert_eq!(surface.flushes, 1);
    }

    #[test]
    fn stale_co2_value_stays_on_screen() {
        // Tick 1 delivers 790; the flag stays down afterwards.
        let co2 = ScriptedCo2::sequence(&[Co2Tick {
            ready: Ok(true),
            reading: Ok(env_reading(790, 22.0, 41.0)),
        }]);
        let mut monitor = monitor(
            ScriptedPm::reading(pm_reading(5.0)),
            co2,
            ViewPolicy::Combined,
        );

        block_on(monitor.tick());
        assert!(monitor.surface().contains_text("790ppm"));

        for _ in 0..4 {
            block_on(monitor.tick());
        }

        // Still 790, not zero and not blank.
        assert!(monitor.surface().contains_text("790ppm"));
        assert_eq!(monitor.store().latest_environmental().unwrap().co2_ppm, 790);
    }

    #[test]
    fn placeholder_until_first_environmental_read() {
        let mut monitor = monitor(
            ScriptedPm::reading(pm_reading(5.0)),
            ScriptedCo2::not_ready(),
            ViewPolicy::Combined,
        );

        block_on(monitor.tick());

        assert!(monitor.surface().contains_text("----"));
        assert!(monitor.store().latest_environmental().is_none());
    }

    #[test]
    fn transport_errors_never_stop_the_loop() {
        let mut monitor = monitor(
            ScriptedPm::failing(),
            ScriptedCo2::failing_read(),
            ViewPolicy::Combined,
        );

        for _ in 0..10 {
            block_on(monitor.tick());
        }

        // Every tick still cleared and flushed a frame.
        assert_eq!(monitor.surface().clears, 10);
        assert_eq!(monitor.surface().flushes, 10);
        assert!(monitor.last_report().is_some());
    }

    #[test]
    fn display_failure_is_reported_and_absorbed() {
        let mut monitor = Monitor::new(
            ScriptedPm::reading(pm_reading(1.0)),
            ScriptedCo2::not_ready(),
            FakeSurface::failing_flush(),
            RecordingSink::new(),
            ViewPolicy::Combined,
        );

        block_on(monitor.tick());
        block_on(monitor.tick());

        assert_eq!(
            monitor.last_report().unwrap().message.as_str(),
            "display: flush failed"
        );
    }

    #[test]
    fn init_failure_shows_message_and_keeps_running() {
        let co2 = ScriptedCo2::not_ready().with_failing_init();
        let mut monitor = monitor(
            ScriptedPm::reading(pm_reading(3.3)),
            co2,
            ViewPolicy::Combined,
        );

        block_on(monitor.init());
        assert_eq!(
            monitor.surface().text_at(0, 12),
            Some("[E] SCD4x: measurement start rejected")
        );

        block_on(monitor.tick());
        assert!(monitor.surface().contains_text("3.3"));
    }

    #[test]
    fn alternating_views_follow_the_counter() {
        let mut monitor = monitor(
            ScriptedPm::reading(pm_reading(2.5)),
            ScriptedCo2::ready(env_reading(600, 21.0, 38.0)),
            ViewPolicy::Alternating,
        );

        // Ticks render at elapsed 0..=5: particulate view
        for _ in 0..6 {
            block_on(monitor.tick());
            assert!(monitor.surface().contains_text("2.5"));
            assert!(!monitor.surface().contains_text("600ppm"));
        }

        // Elapsed 6..=9: environmental view
        for _ in 0..4 {
            block_on(monitor.tick());
            assert!(monitor.surface().contains_text("CO2:  600 ppm"));
        }

        // Wrapped back to the particulate window
        block_on(monitor.tick());
        assert!(monitor.surface().contains_text("2.5"));
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn co2_tick_strategy() -> impl Strategy<Value = Co2Tick> {
            prop_oneof![
                (400u16..2000).prop_map(|ppm| Co2Tick {
                    ready: Ok(true),
                    reading: Ok(env_reading(ppm, 21.0, 40.0)),
                }),
                Just(Co2Tick {
                    ready: Ok(false),
                    reading: Err(SensorError::Transport),
                }),
                Just(Co2Tick {
                    ready: Ok(true),
                    reading: Err(SensorError::Transport),
                }),
                Just(Co2Tick {
                    ready: Err(SensorError::Transport),
                    reading: Err(SensorError::Transport),
                }),
            ]
        }

        proptest! {
            /// Once a CO2 value is stored, no later tick may regress the
            /// slot to empty, and the visible value only changes on a
            /// successful read.
            #[test]
            fn stored_reading_never_regresses(script in proptest::collection::vec(co2_tick_strategy(), 1..16)) {
                let co2 = ScriptedCo2::sequence(&script);
                let mut monitor = monitor(
                    ScriptedPm::reading(pm_reading(1.0)),
                    co2,
                    ViewPolicy::Combined,
                );

                let mut last_seen: Option<u16> = None;
                for plan in &script {
                    block_on(monitor.tick());

                    let expected = match (plan.ready, plan.reading) {
                        (Ok(true), Ok(reading)) => Some(reading.co2_ppm),
                        _ => last_seen,
                    };
                    let stored = monitor.store().latest_environmental().map(|r| r.co2_ppm);
                    prop_assert_eq!(stored, expected);
                    last_seen = expected;
                }
            }
        }
    }
}
