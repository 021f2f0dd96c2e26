//! Replays parsed script steps against an `Editor`, one frame per `frame`
//! step, and reports what the host would see.

use crate::script::Step;
use anyhow::Result;
use core_config::{Config, ConfigContext};
use core_editor::{Editor, FrameInput, FrameOutput};
use core_events::{Clock, InputEvent, PointerEvent, PointerPos, PointerSource};
use core_layout::{Constraints, MonospaceShaper, Size};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Cell advance and line metrics of the demo shaper.
pub const CELL: i32 = 10;
pub const ASCENT: i32 = 12;
pub const DESCENT: i32 = 4;

/// Virtual clock advanced only by `wait` steps.
#[derive(Debug, Clone, Copy)]
pub struct ScriptClock {
    start: Instant,
    now: Instant,
}

impl ScriptClock {
    pub fn new(start: Instant) -> Self {
        Self { start, now: start }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn elapsed(&self, at: Instant) -> Duration {
        at.saturating_duration_since(self.start)
    }
}

impl Clock for ScriptClock {
    fn now(&self) -> Instant {
        self.now
    }
}

pub struct Player<W: Write> {
    editor: Editor,
    config: Config,
    clock: ScriptClock,
    shaper: MonospaceShaper,
    size: Size,
    pointer: Vec<PointerEvent>,
    keys: Vec<InputEvent>,
    frames: usize,
    out: W,
}

impl<W: Write> Player<W> {
    pub fn new(editor: Editor, config: Config, size: Size, out: W) -> Self {
        Self {
            editor,
            config,
            clock: ScriptClock::new(Instant::now()),
            shaper: MonospaceShaper::new(CELL, ASCENT, DESCENT),
            size,
            pointer: Vec::new(),
            keys: Vec::new(),
            frames: 0,
            out,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run every step; input still queued at the end goes out in a last frame.
    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for step in steps {
            self.step(step)?;
        }
        if !self.pointer.is_empty() || !self.keys.is_empty() {
            self.frame()?;
        }
        info!(target: "runtime", frames = self.frames, "script_finished");
        Ok(())
    }

    fn step(&mut self, step: &Step) -> Result<()> {
        let now = self.clock.now();
        match step {
            Step::Text(s) => self.keys.push(InputEvent::TextCommit(s.clone())),
            Step::Key(k) => self.keys.push(InputEvent::Key(*k)),
            Step::Focus => self.keys.push(InputEvent::FocusGained),
            Step::Blur => self.keys.push(InputEvent::FocusLost),
            Step::Click { x, y, mods } => {
                let press = PointerEvent::mouse_press(*x, *y, now).with_mods(*mods);
                let mut release = press;
                release.kind = core_events::PointerKind::Release;
                self.pointer.push(press);
                self.pointer.push(release);
            }
            Step::Touch { kind, x, y } => self.pointer.push(PointerEvent::new(
                *kind,
                PointerSource::Touch,
                PointerPos::new(*x, *y),
                core_events::ModMask::empty(),
                now,
            )),
            Step::Scroll { dx, dy } => self.pointer.push(PointerEvent::new(
                core_events::PointerKind::Scroll { dx: *dx, dy: *dy },
                PointerSource::Mouse,
                PointerPos::default(),
                core_events::ModMask::empty(),
                now,
            )),
            Step::Frame => self.frame()?,
            Step::Wait(d) => self.clock.advance(*d),
            Step::Resize { width, height } => self.resize(*width, *height),
            Step::Set(s) => {
                debug!(target: "runtime", len = s.len(), "set_text");
                self.editor.set_text(s);
            }
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Size::new(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        if let Some(w) = self
            .config
            .recompute_with_context(ConfigContext::new(width, height))
        {
            self.editor.set_caret_width(w);
        }
        debug!(target: "runtime", width, height, "resize");
    }

    fn frame(&mut self) -> Result<()> {
        let now = self.clock.now();
        let mut input = FrameInput::new(
            now,
            Constraints::new(Size::new(self.size.width, 0), self.size),
        );
        input.pointer = std::mem::take(&mut self.pointer);
        input.keys = std::mem::take(&mut self.keys);
        let out = self.editor.layout(&input, &self.shaper);
        self.frames += 1;
        self.report(now, &out)
    }

    fn report(&mut self, now: Instant, out: &FrameOutput) -> Result<()> {
        let redraw = match out.redraw_at {
            Some(at) => format!("+{}ms", self.clock.elapsed(at).as_millis()),
            None => "idle".to_string(),
        };
        writeln!(
            self.out,
            "frame {} t=+{}ms size={}x{} baseline={} redraw={}{}",
            self.frames,
            self.clock.elapsed(now).as_millis(),
            out.size.width,
            out.size.height,
            out.baseline,
            redraw,
            if out.focus_requested { " focus_requested" } else { "" },
        )?;
        let events = self.editor.drain_events();
        if !events.is_empty() {
            writeln!(self.out, "  events: {events:?}")?;
        }
        let pos = self.editor.caret_position();
        let scroll = self.editor.scroll_offset();
        writeln!(
            self.out,
            "  caret: byte {} line {} col {} x {} y {}; scroll {},{}",
            self.editor.caret(),
            pos.line,
            pos.col,
            pos.x.floor(),
            pos.y,
            scroll.x,
            scroll.y,
        )?;
        if let Some(anchor) = self.editor.selection_anchor() {
            writeln!(self.out, "  anchor: line {} col {}", anchor.line, anchor.col)?;
        }
        let lines = self.editor.lines();
        for region in self.editor.paint_text() {
            let text = lines
                .get(region.line)
                .map_or("", |l| l.text.trim_end_matches('\n'));
            writeln!(
                self.out,
                "  line {} @ ({},{}): {:?}",
                region.line, region.offset.x, region.offset.y, text
            )?;
        }
        if let Some(r) = self.editor.paint_caret() {
            writeln!(
                self.out,
                "  caret rect: ({},{})-({},{})",
                r.min.x, r.min.y, r.max.x, r.max.y
            )?;
        }
        Ok(())
    }
}
