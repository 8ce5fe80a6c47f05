//! Horizontal value slider
//!
//! A minimal on-screen slider laid out in window pixels. The application keeps
//! its value in sync with the view depth; the renderer draws it as an overlay.

use earthsim_input::SliderControl;

/// Most tick marks a slider lays out; finer spacing is widened to fit
pub const MAX_TICKS: usize = 100;

/// A tick mark along the slider track
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Window x coordinate
    pub x: f32,
    /// Value at this tick
    pub value: f32,
}

/// A horizontal slider
#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    pub min: f32,
    pub max: f32,
    value: f32,
    /// Left edge in window pixels
    pub x: f32,
    /// Top edge in window pixels
    pub y: f32,
    /// Track length in pixels
    pub width: f32,
    /// Height of the interactive band in pixels
    pub height: f32,
    /// Value distance between tick marks
    pub major_tick_unit: f32,
    pub show_ticks: bool,
    /// Draw the value under each tick mark
    pub show_tick_labels: bool,
}

impl Default for Slider {
    fn default() -> Self {
        Self {
            min: -1000.0,
            max: 1000.0,
            value: 0.0,
            x: 200.0,
            y: 900.0,
            width: 1000.0,
            height: 24.0,
            major_tick_unit: 250.0,
            show_ticks: true,
            show_tick_labels: true,
        }
    }
}

impl Slider {
    /// Create a slider over `[min, max]` with default layout
    pub fn new(min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            value: 0.0_f32.clamp(min, max),
            ..Self::default()
        }
    }

    /// Builder: set position and length in window pixels
    pub fn with_layout(mut self, x: f32, y: f32, width: f32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width.max(1.0);
        self
    }

    /// Builder: set tick spacing and visibility
    pub fn with_ticks(mut self, major_tick_unit: f32, show_ticks: bool) -> Self {
        self.major_tick_unit = major_tick_unit;
        self.show_ticks = show_ticks;
        self
    }

    /// Builder: set tick label visibility
    pub fn with_tick_labels(mut self, show: bool) -> Self {
        self.show_tick_labels = show;
        self
    }

    /// Current value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Set the value, clamped to the range
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Vertical center of the track
    pub fn track_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Window x of a value
    pub fn x_for_value(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return self.x;
        }
        let t = ((value - self.min) / span).clamp(0.0, 1.0);
        self.x + t * self.width
    }

    /// Window x of the thumb center
    pub fn thumb_x(&self) -> f32 {
        self.x_for_value(self.value)
    }

    /// Tick marks from `min` to `max` at `major_tick_unit` spacing
    ///
    /// Both ends are always included. When the unit would give more than
    /// [`MAX_TICKS`] marks it is widened to a multiple of itself.
    pub fn ticks(&self) -> Vec<Tick> {
        let mut ticks = Vec::new();
        let span = self.max - self.min;
        let unit = self.major_tick_unit;
        if unit.is_finite() && unit > 0.0 && span > 0.0 {
            let stride = (span / unit / MAX_TICKS as f32).ceil().max(1.0);
            let unit = unit * stride;
            let count = ((span / unit).floor() as usize).min(MAX_TICKS);
            for i in 0..=count {
                let value = (self.min + unit * i as f32).min(self.max);
                ticks.push(Tick { x: self.x_for_value(value), value });
            }
        } else {
            ticks.push(Tick { x: self.x_for_value(self.min), value: self.min });
        }

        let last = ticks.last().map(|t| t.value).unwrap_or(self.min);
        if (self.max - last).abs() > f32::EPSILON * self.max.abs().max(1.0) {
            ticks.push(Tick { x: self.x_for_value(self.max), value: self.max });
        }
        ticks
    }
}

impl SliderControl for Slider {
    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    fn value_at(&self, x: f32) -> f32 {
        let t = ((x - self.x) / self.width).clamp(0.0, 1.0);
        self.min + t * (self.max - self.min)
    }
}
