//! Pointer gesture recognizers.
//!
//! [`ScrollGesture`] turns wheel events and touch drags into a scroll
//! distance along one axis and keeps momentum ("fling") going after a fast
//! release. [`ClickGesture`] reports presses and taps.
//!
//! Fling distance follows an exponential velocity decay:
//! `d(t) = v0 / k * (1 - e^(-k t))`, ending once `|v0 e^(-k t)|` drops under
//! the minimum fling velocity.

use core_config::GestureSection;
use core_events::{ModMask, PointerEvent, PointerKind, PointerPos, PointerSource};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Samples older than this before release do not contribute to velocity.
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn pick(self, p: PointerPos) -> f32 {
        match self {
            Axis::Horizontal => p.x,
            Axis::Vertical => p.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollState {
    #[default]
    Idle,
    Dragging,
    Flinging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTuning {
    pub touch_slop: f32,
    pub fling_min_velocity: f32,
    pub fling_decay: f32,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self::from(&GestureSection::default())
    }
}

impl From<&GestureSection> for GestureTuning {
    fn from(s: &GestureSection) -> Self {
        Self {
            touch_slop: s.touch_slop.max(0.0),
            fling_min_velocity: s.fling_min_velocity.max(1.0),
            fling_decay: s.fling_decay.max(0.1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Fling {
    start: Instant,
    /// Initial velocity in px/s, already in scroll direction.
    v0: f32,
    /// Whole pixels handed out so far.
    applied: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollGesture {
    tuning: GestureTuning,
    state: ScrollState,
    last: f32,
    samples: VecDeque<(Instant, f32)>,
    fling: Option<Fling>,
    residual: f32,
}

impl ScrollGesture {
    pub fn new(tuning: GestureTuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn is_flinging(&self) -> bool {
        self.state == ScrollState::Flinging
    }

    /// Cancel any drag or fling.
    pub fn stop(&mut self) {
        if self.state == ScrollState::Flinging {
            debug!(target: "editor.gesture", "fling_stopped");
        }
        self.state = ScrollState::Idle;
        self.fling = None;
        self.samples.clear();
        self.residual = 0.0;
    }

    /// Consume this frame's pointer events and return the whole-pixel
    /// distance to scroll by along `axis`.
    pub fn scroll(&mut self, events: &[PointerEvent], now: Instant, axis: Axis) -> i32 {
        let mut total = self.residual;
        for ev in events {
            match ev.kind {
                PointerKind::Scroll { dx, dy } => {
                    total += match axis {
                        Axis::Horizontal => dx,
                        Axis::Vertical => dy,
                    };
                }
                PointerKind::Press if ev.source == PointerSource::Touch => {
                    self.stop();
                    total = 0.0;
                    self.state = ScrollState::Dragging;
                    self.last = axis.pick(ev.position);
                    self.samples.push_back((ev.timestamp, self.last));
                }
                PointerKind::Drag | PointerKind::Release
                    if self.state == ScrollState::Dragging =>
                {
                    let v = axis.pick(ev.position);
                    total += self.last - v;
                    self.last = v;
                    self.samples.push_back((ev.timestamp, v));
                    if ev.kind == PointerKind::Release {
                        self.release(ev.timestamp);
                    }
                }
                PointerKind::Cancel => self.stop(),
                _ => {}
            }
        }
        let dist = total.round();
        self.residual = total - dist;
        dist as i32 + self.advance_fling(now)
    }

    fn release(&mut self, at: Instant) {
        let velocity = self.release_velocity(at);
        self.samples.clear();
        if velocity.abs() >= self.tuning.fling_min_velocity {
            debug!(target: "editor.gesture", velocity, "fling_started");
            self.state = ScrollState::Flinging;
            self.fling = Some(Fling {
                start: at,
                v0: velocity,
                applied: 0,
            });
        } else {
            self.state = ScrollState::Idle;
        }
    }

    /// Scroll velocity (px/s) over the samples in the window before `at`.
    fn release_velocity(&self, at: Instant) -> f32 {
        let recent: Vec<_> = self
            .samples
            .iter()
            .filter(|(t, _)| at.saturating_duration_since(*t) <= VELOCITY_WINDOW)
            .collect();
        let (Some(first), Some(last)) = (recent.first(), recent.last()) else {
            return 0.0;
        };
        let dt = last.0.saturating_duration_since(first.0).as_secs_f32();
        if dt <= f32::EPSILON {
            return 0.0;
        }
        // Finger moving towards smaller coordinates scrolls forward.
        (first.1 - last.1) / dt
    }

    fn advance_fling(&mut self, now: Instant) -> i32 {
        let Some(fling) = self.fling.as_mut() else {
            return 0;
        };
        let k = self.tuning.fling_decay;
        let t = now.saturating_duration_since(fling.start).as_secs_f32();
        let decay = (-k * t).exp();
        let dist = (fling.v0 / k * (1.0 - decay)).round() as i32;
        let step = dist - fling.applied;
        fling.applied = dist;
        if (fling.v0 * decay).abs() < self.tuning.fling_min_velocity {
            debug!(target: "editor.gesture", distance = dist, "fling_finished");
            self.state = ScrollState::Idle;
            self.fling = None;
        }
        step
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Button or finger went down.
    Press,
    /// Released close to where it went down.
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub kind: ClickKind,
    pub source: PointerSource,
    pub position: PointerPos,
    pub mods: ModMask,
}

#[derive(Debug, Clone, Default)]
pub struct ClickGesture {
    touch_slop: f32,
    pressed: Option<(PointerSource, PointerPos)>,
}

impl ClickGesture {
    pub fn new(tuning: GestureTuning) -> Self {
        Self {
            touch_slop: tuning.touch_slop,
            pressed: None,
        }
    }

    pub fn update(&mut self, events: &[PointerEvent]) -> Vec<Click> {
        let mut out = Vec::new();
        for ev in events {
            match ev.kind {
                PointerKind::Press => {
                    self.pressed = Some((ev.source, ev.position));
                    out.push(Click {
                        kind: ClickKind::Press,
                        source: ev.source,
                        position: ev.position,
                        mods: ev.mods,
                    });
                }
                PointerKind::Drag => {
                    if let Some((PointerSource::Touch, start)) = self.pressed
                        && self.beyond_slop(start, ev.position)
                    {
                        self.pressed = None;
                    }
                }
                PointerKind::Release => {
                    let Some((source, start)) = self.pressed.take() else {
                        continue;
                    };
                    if source == PointerSource::Touch && self.beyond_slop(start, ev.position) {
                        continue;
                    }
                    out.push(Click {
                        kind: ClickKind::Click,
                        source,
                        position: ev.position,
                        mods: ev.mods,
                    });
                }
                PointerKind::Cancel => self.pressed = None,
                PointerKind::Scroll { .. } => {}
            }
        }
        out
    }

    fn beyond_slop(&self, a: PointerPos, b: PointerPos) -> bool {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        dx * dx + dy * dy > self.touch_slop * self.touch_slop
    }
}
