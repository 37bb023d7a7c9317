//! Grid geometry: how many cells there are, where they go and how far
//! the grid scrolls.
//!
//! Cells are packed row-major below the top bar and the info bar. When the
//! rows do not fit the viewport width, every cell is scaled down by the same
//! factor; cells are never scaled up.

use anicheck_geometry::Size;
use nalgebra::Point2;

use crate::{Config, InspectorError};

pub const PADDING: f32 = 10.;
pub const TOP_BAR_HEIGHT: f32 = 100.;
pub const INFO_BAR_HEIGHT: f32 = 80.;
/// Where the first row starts.
pub const GRID_TOP: f32 = TOP_BAR_HEIGHT + INFO_BAR_HEIGHT;

/// Keeps cells from collapsing to nothing on viewports narrower than the padding.
const MIN_SCALE_FACTOR: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    columns_per_row: usize,
    cell_size: Size<f32>,
    viewport: Size<f32>,
    cell_count: usize,

    scale_factor: f32,
    /// Always within `[-max_scroll_y; 0]`
    scroll_offset_y: f32,
    max_scroll_y: f32,
}

impl LayoutEngine {
    pub fn new(config: &Config, viewport: Size<f32>) -> Self {
        let mut layout = Self {
            columns_per_row: config.columns_per_row.max(1),
            cell_size: Size::new(config.cell_width, config.cell_height),
            viewport: sanitize(viewport),
            cell_count: 0,
            scale_factor: 1.,
            scroll_offset_y: 0.,
            max_scroll_y: 0.,
        };
        layout.recompute(0);
        layout
    }

    /// The settings worth persisting.
    pub fn config(&self) -> Config {
        Config {
            columns_per_row: self.columns_per_row,
            cell_width: self.cell_size.w,
            cell_height: self.cell_size.h,
        }
    }

    /// The largest resource count over all groups, 0 without groups.
    pub fn required_cell_count(resource_counts: impl IntoIterator<Item = usize>) -> usize {
        resource_counts.into_iter().max().unwrap_or(0)
    }

    pub fn set_columns(&mut self, columns: usize) -> Result<(), InspectorError> {
        if columns == 0 {
            return Err(InspectorError::InvalidColumns(columns));
        }

        self.columns_per_row = columns;
        self.recompute(self.cell_count);
        Ok(())
    }

    pub fn set_cell_size(&mut self, width: f32, height: f32) -> Result<(), InspectorError> {
        let valid = |v: f32| v.is_finite() && v > 0.;
        if !valid(width) || !valid(height) {
            return Err(InspectorError::InvalidCellSize(width, height));
        }

        self.cell_size = Size::new(width, height);
        self.recompute(self.cell_count);
        Ok(())
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport = sanitize(Size::new(width, height));
        self.recompute(self.cell_count);
    }

    /// Refreshes the scale factor and the scroll bounds for `cell_count` cells.
    /// The scroll offset is clamped back into the new bounds.
    pub fn recompute(&mut self, cell_count: usize) {
        self.cell_count = cell_count;

        let columns = self.columns_per_row as f32;
        let available = self.viewport.w - 2. * PADDING;
        let ideal = columns * self.cell_size.w + (columns - 1.) * PADDING;
        self.scale_factor = if ideal > available {
            (available / ideal).max(MIN_SCALE_FACTOR)
        } else {
            1.
        };

        self.max_scroll_y = match cell_count.checked_sub(1) {
            Some(last) => {
                let bottom = self.cell_origin(last).y + self.cell_size.h * self.scale_factor;
                (bottom - self.viewport.h).max(0.)
            }
            None => 0.,
        };
        self.scroll_offset_y = self.scroll_offset_y.clamp(-self.max_scroll_y, 0.);

        log::debug!(
            "Layout: {cell_count} cells, {} per row, scale {:.4}, max scroll {}",
            self.columns_per_row,
            self.scale_factor,
            self.max_scroll_y
        );
    }

    /// Top left corner of the cell at the zero based `index`, before scrolling.
    pub fn cell_origin(&self, index: usize) -> Point2<f32> {
        let row = (index / self.columns_per_row) as f32;
        let column = (index % self.columns_per_row) as f32;

        Point2::new(
            PADDING + column * (self.cell_size.w * self.scale_factor + PADDING),
            GRID_TOP + row * (self.cell_size.h * self.scale_factor + PADDING),
        )
    }

    /// Moves the grid by `dy` pixels, positive values scroll back up.
    /// Returns whether the offset changed.
    pub fn scroll_by(&mut self, dy: f32) -> bool {
        if !dy.is_finite() {
            return false;
        }

        let offset = (self.scroll_offset_y + dy).clamp(-self.max_scroll_y, 0.);
        let changed = offset != self.scroll_offset_y;
        self.scroll_offset_y = offset;
        changed
    }

    pub fn columns_per_row(&self) -> usize {
        self.columns_per_row
    }

    pub fn cell_size(&self) -> Size<f32> {
        self.cell_size
    }

    pub fn viewport(&self) -> Size<f32> {
        self.viewport
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn scroll_offset_y(&self) -> f32 {
        self.scroll_offset_y
    }

    pub fn max_scroll_y(&self) -> f32 {
        self.max_scroll_y
    }
}

fn sanitize(size: Size<f32>) -> Size<f32> {
    let clean = |v: f32| if v.is_finite() { v.max(0.) } else { 0. };
    Size::new(clean(size.w), clean(size.h))
}
