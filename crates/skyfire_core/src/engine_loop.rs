// crates/skyfire_core/src/engine_loop.rs

use std::time::{Duration, Instant};

use skyfire_shared::GameLogic;
use tracing::trace;

/// Longest wall-clock gap fed into one iteration.
const MAX_FRAME_DT: f64 = 0.25;
/// Pacing sleeps shorter than this are skipped.
const MIN_SLEEP: f64 = 10e-6;

/// What one host-loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    pub ticks: u32,
    /// Interpolation factor of the render, if one happened.
    pub rendered: Option<f32>,
    /// How long the host may idle before the next iteration.
    pub sleep: Duration,
}

/// Fixed-timestep simulation with a decoupled, optionally paced render.
///
/// Real time accumulates in two lags. Every whole `tick` in the update lag
/// runs one simulation step; the remainder carries over and becomes the
/// render's interpolation factor. Rendering happens once the render lag
/// reaches the render interval (zero when unpaced).
pub struct EngineLoop {
    last_frame_time: Instant,
    update_lag: f64,
    render_lag: f64,
    sim_time: f64,
    tick: f64,
    refresh_rate: f64,
    ticks: u64,
    frames: u64,
}

impl EngineLoop {
    pub fn new(tick_rate: f64) -> Self {
        Self {
            last_frame_time: Instant::now(),
            update_lag: 0.0,
            render_lag: 0.0,
            sim_time: 0.0,
            tick: 1.0 / tick_rate,
            refresh_rate: 60.0,
            ticks: 0,
            frames: 0,
        }
    }

    /// Display refresh rate used for paced rendering.
    pub fn set_refresh_rate(&mut self, hz: f64) {
        if hz > 0.0 {
            self.refresh_rate = hz;
        }
    }

    /// Time since the previous call, clamped to 0.25s so that dragging the
    /// window or sitting on a breakpoint does not queue a burst of ticks.
    pub fn tick_timer(&mut self) -> f64 {
        let now = Instant::now();
        let frame_dt = now.duration_since(self.last_frame_time).as_secs_f64();
        self.last_frame_time = now;

        frame_dt.min(MAX_FRAME_DT)
    }

    pub fn render_interval(&self, vsync: bool) -> f64 {
        if vsync {
            1.0 / (self.refresh_rate + 0.5)
        } else {
            0.0
        }
    }

    /// Runs one iteration for `elapsed` seconds of real time: every due
    /// simulation tick, then at most one render.
    pub fn advance<G: GameLogic>(&mut self, elapsed: f64, game: &mut G) -> IterationReport {
        self.update_lag += elapsed;
        let mut ticks = 0;
        while self.update_lag >= self.tick {
            game.update(self.tick as f32, self.sim_time as f32);
            self.sim_time += self.tick;
            self.update_lag -= self.tick;
            ticks += 1;
        }
        self.ticks += u64::from(ticks);

        self.render_lag += elapsed;
        let render_interval = self.render_interval(game.vsync());
        let mut rendered = None;
        if self.render_lag >= render_interval {
            let alpha = (self.update_lag / self.tick) as f32;
            game.render(self.render_lag as f32, alpha);
            self.render_lag = 0.0;
            self.frames += 1;
            rendered = Some(alpha);
        }

        let until_next = (self.tick - self.update_lag).min(render_interval - self.render_lag);
        let sleep = if until_next > MIN_SLEEP {
            Duration::from_secs_f64(until_next / 2.0)
        } else {
            Duration::ZERO
        };

        trace!(ticks, ?rendered, ?sleep, "loop iteration");
        IterationReport {
            ticks,
            rendered,
            sleep,
        }
    }

    /// Drives `game` for `duration` seconds of simulated wall time in
    /// iterations of `frame_dt`, without sleeping.
    pub fn run_for<G: GameLogic>(&mut self, game: &mut G, duration: f64, frame_dt: f64) {
        let mut remaining = duration;
        while remaining > 0.0 {
            let elapsed = frame_dt.min(remaining);
            self.advance(elapsed, game);
            remaining -= elapsed;
        }
    }

    pub fn tick(&self) -> f64 {
        self.tick
    }

    /// Simulated seconds so far; always a whole number of ticks.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn total_ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use skyfire_shared::KeyEvent;

    /// Records what the loop asked of it.
    #[derive(Default)]
    struct Recorder {
        device: (),
        updates: Vec<(f32, f32)>,
        renders: Vec<(f32, f32)>,
        vsync: bool,
    }

    impl GameLogic for Recorder {
        type Device = ();

        fn device_mut(&mut self) -> &mut () {
            &mut self.device
        }

        fn update(&mut self, dt: f32, time: f32) {
            self.updates.push((dt, time));
        }

        fn render(&mut self, frame_time: f32, alpha: f32) {
            self.renders.push((frame_time, alpha));
        }

        fn vsync(&self) -> bool {
            self.vsync
        }

        fn handle_key(&mut self, _event: KeyEvent) {}
        fn set_focus(&mut self, _focused: bool) {}
        fn set_cursor(&mut self, _position: Vec2) {}
        fn resize(&mut self, _width: u32, _height: u32) {}
    }

    // 1/128 s ticks: every value below is exact in binary floating point.
    const TICK_RATE: f64 = 128.0;
    const TICK: f64 = 1.0 / 128.0;

    #[test]
    fn tick_count_does_not_depend_on_chunking() {
        let mut whole = Recorder::default();
        let mut engine = EngineLoop::new(TICK_RATE);
        engine.advance(TICK * 3.0 + TICK / 2.0, &mut whole);

        let mut chunked = Recorder::default();
        let mut chunked_engine = EngineLoop::new(TICK_RATE);
        for _ in 0..7 {
            chunked_engine.advance(TICK / 2.0, &mut chunked);
        }

        assert_eq!(whole.updates.len(), 3);
        assert_eq!(whole.updates, chunked.updates);
        assert_eq!(engine.sim_time(), chunked_engine.sim_time());
    }

    #[test]
    fn hundred_hertz_chunks_agree() {
        let mut one = Recorder::default();
        let mut engine = EngineLoop::new(100.0);
        let report = engine.advance(0.025, &mut one);

        let mut five = Recorder::default();
        let mut chunked = EngineLoop::new(100.0);
        let ticks: u32 = (0..5).map(|_| chunked.advance(0.005, &mut five).ticks).sum();

        assert_eq!(report.ticks, 2);
        assert_eq!(ticks, 2);
        assert_eq!(one.updates.len(), five.updates.len());
    }

    #[test]
    fn updates_see_time_before_the_step() {
        let mut game = Recorder::default();
        let mut engine = EngineLoop::new(TICK_RATE);
        engine.advance(TICK * 2.0, &mut game);
        assert_eq!(
            game.updates,
            vec![(TICK as f32, 0.0), (TICK as f32, TICK as f32)]
        );
        assert_eq!(engine.total_ticks(), 2);
    }

    #[test]
    fn alpha_is_the_leftover_fraction_of_a_tick() {
        let mut game = Recorder::default();
        let mut engine = EngineLoop::new(TICK_RATE);

        let report = engine.advance(TICK * 1.25, &mut game);
        assert_eq!(report.ticks, 1);
        assert_eq!(report.rendered, Some(0.25));

        let report = engine.advance(TICK * 0.5, &mut game);
        assert_eq!(report.ticks, 0);
        assert_eq!(report.rendered, Some(0.75));
        assert_eq!(game.renders[1], ((TICK * 0.5) as f32, 0.75));
    }

    #[test]
    fn paced_render_waits_for_the_interval() {
        let mut game = Recorder {
            vsync: true,
            ..Default::default()
        };
        let mut engine = EngineLoop::new(TICK_RATE);
        // Interval 1/64 s.
        engine.set_refresh_rate(63.5);

        let report = engine.advance(TICK, &mut game);
        assert_eq!(report.ticks, 1);
        assert_eq!(report.rendered, None);
        // Next tick is due in one full tick, the render in one tick as well.
        assert_eq!(report.sleep, Duration::from_secs_f64(TICK / 2.0));

        let report = engine.advance(TICK, &mut game);
        assert_eq!(report.rendered, Some(0.0));
        assert_eq!(engine.frames_rendered(), 1);
    }

    #[test]
    fn unpaced_loop_never_sleeps() {
        let mut game = Recorder::default();
        let mut engine = EngineLoop::new(TICK_RATE);
        let report = engine.advance(TICK / 4.0, &mut game);
        assert_eq!(report.sleep, Duration::ZERO);
        assert!(report.rendered.is_some());
    }

    #[test]
    fn run_for_covers_the_whole_duration() {
        let mut game = Recorder::default();
        let mut engine = EngineLoop::new(TICK_RATE);
        engine.run_for(&mut game, 1.0, TICK * 2.0);
        assert_eq!(engine.total_ticks(), 128);
        assert_eq!(engine.frames_rendered(), 64);
        assert_eq!(engine.sim_time(), 1.0);
    }
}
