//! Capabilities the hosting chart lends to the annotator

use anyhow::{Result, anyhow};
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::SurfaceSize;

/// The chart widget the drawings are overlaid on
///
/// Only the surface size is required. Coordinate conversions are optional and
/// default to failing, in which case price and time labels are left out.
pub trait ChartHost {
    /// Current pixel size of the drawing surface
    fn surface_size(&self) -> SurfaceSize;

    /// Price at a vertical pixel coordinate
    fn coordinate_to_price(&self, _y: f32) -> Result<f64> {
        Err(anyhow!("price scale not available"))
    }

    /// Time at a horizontal pixel coordinate
    fn coordinate_to_time(&self, _x: f32) -> Result<DateTime<Utc>> {
        Err(anyhow!("time scale not available"))
    }
}

/// Host with a fixed surface and no coordinate conversions
#[derive(Clone, Copy, Debug)]
pub struct FixedSurface(pub SurfaceSize);

impl ChartHost for FixedSurface {
    fn surface_size(&self) -> SurfaceSize {
        self.0
    }
}

/// Host with linear price and time scales, as used by the replay binary
#[derive(Clone, Copy, Debug)]
pub struct LinearChart {
    pub size: SurfaceSize,
    /// Price at y = 0
    pub price_top: f64,
    /// Price at y = height
    pub price_bottom: f64,
    /// Time at x = 0
    pub time_start: DateTime<Utc>,
    pub seconds_per_pixel: f64,
}

impl ChartHost for LinearChart {
    fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    fn coordinate_to_price(&self, y: f32) -> Result<f64> {
        if self.size.height <= 0.0 {
            return Err(anyhow!("empty surface has no price scale"));
        }
        let ratio = y as f64 / self.size.height as f64;
        Ok(self.price_top + (self.price_bottom - self.price_top) * ratio)
    }

    fn coordinate_to_time(&self, x: f32) -> Result<DateTime<Utc>> {
        let offset_ms = (x as f64 * self.seconds_per_pixel * 1000.0).round();
        if !offset_ms.is_finite() || offset_ms.abs() >= i64::MAX as f64 {
            return Err(anyhow!("time offset out of range at x = {x}"));
        }
        TimeDelta::try_milliseconds(offset_ms as i64)
            .and_then(|delta| self.time_start.checked_add_signed(delta))
            .ok_or_else(|| anyhow!("time out of range at x = {x}"))
    }
}
