//! Drawing style state.
//!
//! A [`StateStack`] holds [`RenderState`] frames above a default frame that can
//! never be popped. Pushing adds a fresh default-valued frame. Path operations
//! take the active frame by reference instead of reading ambient state.

use crate::DEFAULT_CURVE_PRECISION;
use glam::Vec4;

/// One frame of drawing style.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderState {
    /// Fill color (RGBA). Fully transparent disables filling.
    pub fill: Vec4,
    /// Stroke color (RGBA). Fully transparent disables stroking.
    pub stroke: Vec4,
    /// Stroke width; widths above 1 produce mitered triangle strips.
    pub stroke_weight: f32,
    /// Edge softening applied by the rasterizer.
    pub anti_aliasing: f32,
    /// Maximum chord deviation when flattening curves.
    pub curve_precision: f32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            fill: Vec4::ONE,
            stroke: Vec4::ZERO,
            stroke_weight: 1.0,
            anti_aliasing: 1.0,
            curve_precision: DEFAULT_CURVE_PRECISION,
        }
    }
}

impl RenderState {
    /// Sets the fill color.
    pub fn with_fill(mut self, fill: Vec4) -> Self {
        self.fill = fill;
        self
    }

    /// Sets the stroke color.
    pub fn with_stroke(mut self, stroke: Vec4) -> Self {
        self.stroke = stroke;
        self
    }

    /// Sets the stroke width.
    pub fn with_stroke_weight(mut self, weight: f32) -> Self {
        self.stroke_weight = weight;
        self
    }

    /// Sets the anti-aliasing amount.
    pub fn with_anti_aliasing(mut self, amount: f32) -> Self {
        self.anti_aliasing = amount;
        self
    }

    /// Sets the curve precision.
    pub fn with_curve_precision(mut self, precision: f32) -> Self {
        self.curve_precision = precision;
        self
    }

    /// Returns true if the fill color is visible.
    pub fn fills(&self) -> bool {
        self.fill.w > 0.0
    }

    /// Returns true if the stroke color is visible.
    pub fn strokes(&self) -> bool {
        self.stroke.w > 0.0
    }
}

/// Stack of render states with a permanent default at the bottom.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    base: RenderState,
    frames: Vec<RenderState>,
}

impl StateStack {
    /// Creates a stack holding only `base`.
    pub fn new(base: RenderState) -> Self {
        Self {
            base,
            frames: Vec::new(),
        }
    }

    /// Returns the active frame.
    pub fn current(&self) -> &RenderState {
        self.frames.last().unwrap_or(&self.base)
    }

    /// Returns the active frame for modification.
    pub fn current_mut(&mut self) -> &mut RenderState {
        self.frames.last_mut().unwrap_or(&mut self.base)
    }

    /// Pushes a default-valued frame.
    pub fn push(&mut self) {
        self.frames.push(RenderState::default());
    }

    /// Discards the top frame. The default frame is never removed.
    pub fn pop(&mut self) {
        if self.frames.pop().is_none() {
            log::warn!("render state stack is empty; default state kept");
        }
    }

    /// Number of pushed frames above the default.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
