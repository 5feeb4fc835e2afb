//! `wasm-bindgen` exports for driving a session from a browser.
//!
//! Host-driven: JavaScript owns the animation loop, forwards pointer events and calls `advance`
//! with a millisecond clock, then paints the records returned by `drawCommands` onto a 2D canvas.

use std::str::FromStr;
use std::time::Duration;

use js_sys::{Array, Function, Object, Reflect};
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::builder::SessionBuilder;
use crate::hanoi::Hanoi;
use crate::iwahswap::Iwahswap;
use crate::point::Vec2;
use crate::puzzle::Puzzle;
use crate::render::{DrawCommand, DrawList};
use crate::session::Session;
use crate::view::InteractionMode;

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn clock(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}

fn build<P: Puzzle>(initial: P, width: f64, height: f64) -> Result<Session<P>, JsValue> {
    SessionBuilder::new(initial)
        .viewport(width, height)
        .build()
        .map_err(|reasons| JsValue::from_str(&format!("invalid session: {reasons:?}")))
}

/// Flatten recorded drawing into plain objects tagged by `kind`.
fn to_js(list: &DrawList) -> Array {
    let out = Array::new();
    for command in list.commands() {
        let obj = Object::new();
        match command {
            DrawCommand::Clear { viewport } => {
                set_js(&obj, "kind", "clear".into());
                set_js(&obj, "width", viewport.x.into());
                set_js(&obj, "height", viewport.y.into());
            }
            DrawCommand::Line { from, to, color, width } => {
                set_js(&obj, "kind", "line".into());
                set_js(&obj, "x1", from.x.into());
                set_js(&obj, "y1", from.y.into());
                set_js(&obj, "x2", to.x.into());
                set_js(&obj, "y2", to.y.into());
                set_js(&obj, "color", color.as_str().into());
                set_js(&obj, "width", (*width).into());
            }
            DrawCommand::Circle { center, radius, fill, stroke } => {
                set_js(&obj, "kind", "circle".into());
                set_js(&obj, "x", center.x.into());
                set_js(&obj, "y", center.y.into());
                set_js(&obj, "radius", (*radius).into());
                if let Some(fill) = fill {
                    set_js(&obj, "fill", fill.as_str().into());
                }
                if let Some((color, width)) = stroke {
                    set_js(&obj, "stroke", color.as_str().into());
                    set_js(&obj, "strokeWidth", (*width).into());
                }
            }
            DrawCommand::Text { at, text, color } => {
                set_js(&obj, "kind", "text".into());
                set_js(&obj, "x", at.x.into());
                set_js(&obj, "y", at.y.into());
                set_js(&obj, "text", text.as_str().into());
                set_js(&obj, "color", color.as_str().into());
            }
        }
        out.push(&obj);
    }
    out
}

// wasm-bindgen cannot export generic types, so each bundled puzzle gets its own wrapper.
macro_rules! puzzle_graph {
    ($(#[$meta:meta])* $name:ident, $puzzle:ty) => {
        $(#[$meta])*
        #[wasm_bindgen]
        pub struct $name {
            session: Session<$puzzle>,
        }

        #[wasm_bindgen]
        impl $name {
            /// Begin exploring from the current position at clock `now_ms`.
            pub fn start(&mut self, now_ms: f64) {
                self.session.start(clock(now_ms));
            }

            pub fn stop(&mut self) {
                self.session.stop();
            }

            /// Run whatever is due at clock `now_ms`.
            pub fn advance(&mut self, now_ms: f64) {
                self.session.advance(clock(now_ms));
            }

            pub fn resize(&mut self, width: f64, height: f64) {
                self.session.view_mut().resize(Vec2::new(width, height));
            }

            /// One of `normal`, `drag` or `jump`.
            #[wasm_bindgen(js_name = setMode)]
            pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
                let mode = InteractionMode::from_str(mode).map_err(|err| JsValue::from_str(&err.to_string()))?;
                self.session.set_mode(mode);
                Ok(())
            }

            #[wasm_bindgen(js_name = pointerDown)]
            pub fn pointer_down(&mut self, x: f64, y: f64) {
                self.session.pointer_down(Vec2::new(x, y));
            }

            #[wasm_bindgen(js_name = pointerMove)]
            pub fn pointer_move(&mut self, x: f64, y: f64) {
                self.session.pointer_move(Vec2::new(x, y));
            }

            /// Returns whether the gesture ended in a jump.
            #[wasm_bindgen(js_name = pointerUp)]
            pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
                self.session.pointer_up(Vec2::new(x, y)).is_some()
            }

            #[wasm_bindgen(js_name = pointerLeave)]
            pub fn pointer_leave(&mut self) {
                self.session.pointer_leave();
            }

            pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
                self.session.wheel(Vec2::new(x, y), delta_y);
            }

            #[wasm_bindgen(js_name = pinchStart)]
            pub fn pinch_start(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
                self.session.pinch_start(Vec2::new(x1, y1), Vec2::new(x2, y2));
            }

            #[wasm_bindgen(js_name = pinchMove)]
            pub fn pinch_move(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
                self.session.pinch_move(Vec2::new(x1, y1), Vec2::new(x2, y2));
            }

            #[wasm_bindgen(js_name = pinchEnd)]
            pub fn pinch_end(&mut self) {
                self.session.pinch_end();
            }

            /// Play the move at `index` in the puzzle's direction list.
            #[wasm_bindgen(js_name = applyMove)]
            pub fn apply_move(&mut self, index: usize) -> bool {
                match <$puzzle as Puzzle>::direction(index) {
                    Some(mv) => self.session.apply_move(mv),
                    None => false,
                }
            }

            pub fn undo(&mut self) -> bool {
                self.session.undo()
            }

            pub fn reset(&mut self) {
                self.session.reset();
            }

            #[wasm_bindgen(js_name = stepTowardGoal)]
            pub fn step_toward_goal(&mut self) -> bool {
                self.session.step_toward_goal()
            }

            #[wasm_bindgen(js_name = isSolved)]
            pub fn is_solved(&self) -> bool {
                self.session.is_solved()
            }

            /// Key of the current position.
            pub fn key(&self) -> String {
                self.session.state().key().to_string()
            }

            /// Human readable picture of the current position.
            pub fn describe(&self) -> String {
                self.session.state().to_string()
            }

            #[wasm_bindgen(js_name = discoveredCount)]
            pub fn discovered_count(&self) -> usize {
                self.session.explorer().len()
            }

            #[wasm_bindgen(js_name = showGoalDistances)]
            pub fn show_goal_distances(&mut self, show: bool) {
                self.session.view_mut().options_mut().goal_distances = show;
            }

            /// Called with the key of every state jumped to by tapping.
            #[wasm_bindgen(js_name = onJump)]
            pub fn on_jump(&mut self, callback: Function) {
                self.session.view_mut().set_jump_callback(move |state: &$puzzle| {
                    let key = state.key();
                    if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(key.as_str())) {
                        warn!(%key, ?err, "jump callback threw");
                    }
                });
            }

            /// Everything to paint this frame, as `{ kind, ... }` records.
            #[wasm_bindgen(js_name = drawCommands)]
            pub fn draw_commands(&self) -> Array {
                let mut list = DrawList::default();
                self.session.draw(&mut list);
                to_js(&list)
            }
        }
    };
}

puzzle_graph!(
    /// The Tower of Hanoi state graph.
    HanoiGraph,
    Hanoi
);

puzzle_graph!(
    /// The Iwahswap state graph.
    IwahswapGraph,
    Iwahswap
);

#[wasm_bindgen]
impl HanoiGraph {
    #[wasm_bindgen(constructor)]
    pub fn new(disks: u8, width: f64, height: f64) -> Result<HanoiGraph, JsValue> {
        Ok(Self { session: build(Hanoi::new(disks), width, height)? })
    }
}

#[wasm_bindgen]
impl IwahswapGraph {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<IwahswapGraph, JsValue> {
        Ok(Self { session: build(Iwahswap::default(), width, height)? })
    }
}
