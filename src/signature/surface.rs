//! Freehand drawing surface backing the signature pad

use super::raster::{self, Point, SignatureError};
use super::resize::ResizeObserver;
use image::{Rgba, RgbaImage};
use ratatui::layout::Rect;
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Horizontal padding kept between the surface and its container
const CONTAINER_PADDING: u16 = 2;

/// Notifications raised by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    DrawingStarted,
    /// Ink was added by a stroke
    Changed,
    DrawingEnded,
    Cleared,
    /// An asynchronously decoded image replaced the content
    Loaded,
}

/// Raster and pen configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    /// Backing raster width in pixels
    pub width: u32,
    /// Backing raster height in pixels
    pub height: u32,
    pub stroke_color: Rgba<u8>,
    pub stroke_width: f32,
    /// Preferred on-screen width in cells
    pub display_width: u16,
    /// On-screen height in cells
    pub display_rows: u16,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            width: 900,
            height: 200,
            stroke_color: Rgba([0, 0, 0, 255]),
            stroke_width: 2.0,
            display_width: 90,
            display_rows: 8,
        }
    }
}

type Decoded = Result<RgbaImage, SignatureError>;

/// Captures pen input into an owned raster.
///
/// Mutations queue [`SurfaceEvent`]s which the owner drains with
/// [`DrawingSurface::take_events`].
pub struct DrawingSurface {
    options: SurfaceOptions,
    raster: RgbaImage,
    has_ink: bool,
    is_drawing: bool,
    disabled: bool,
    last: Point,
    display_width: u16,
    events: Vec<SurfaceEvent>,
    decoded_tx: mpsc::UnboundedSender<Decoded>,
    decoded_rx: mpsc::UnboundedReceiver<Decoded>,
    pending_loads: usize,
    /// Blocking decodes still owed to `pending_loads`, oldest first
    decoders: VecDeque<JoinHandle<()>>,
    observer: Box<dyn ResizeObserver>,
}

impl DrawingSurface {
    pub fn new(options: SurfaceOptions, observer: Box<dyn ResizeObserver>) -> Self {
        let (decoded_tx, decoded_rx) = mpsc::unbounded_channel();
        Self {
            raster: raster::blank(options.width, options.height),
            display_width: options.display_width,
            options,
            has_ink: false,
            is_drawing: false,
            disabled: false,
            last: Point::default(),
            events: Vec::new(),
            decoded_tx,
            decoded_rx,
            pending_loads: 0,
            decoders: VecDeque::new(),
            observer,
        }
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn has_ink(&self) -> bool {
        self.has_ink
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Put the pen down at `point`
    pub fn begin(&mut self, point: Point) {
        if self.disabled {
            return;
        }
        self.is_drawing = true;
        self.last = point;
        self.events.push(SurfaceEvent::DrawingStarted);
    }

    /// Draw a segment from the last pen position to `point`
    pub fn extend(&mut self, point: Point) {
        if !self.is_drawing || self.disabled {
            return;
        }
        raster::stroke_segment(
            &mut self.raster,
            self.last,
            point,
            self.options.stroke_color,
            self.options.stroke_width,
        );
        self.last = point;
        self.has_ink = raster::has_ink(&self.raster);
        self.events.push(SurfaceEvent::Changed);
    }

    /// Lift the pen
    pub fn end(&mut self) {
        if !self.is_drawing {
            return;
        }
        self.is_drawing = false;
        self.events.push(SurfaceEvent::DrawingEnded);
    }

    /// Wipe the surface back to white
    pub fn clear(&mut self) {
        if self.disabled {
            return;
        }
        raster::fill_white(&mut self.raster);
        self.has_ink = false;
        self.events.push(SurfaceEvent::Cleared);
    }

    /// PNG data URL of the drawing, or `None` while the surface is blank
    pub fn serialize(&self) -> Option<String> {
        if !self.has_ink {
            return None;
        }
        match raster::encode_data_url(&self.raster) {
            Ok(encoded) => Some(encoded),
            Err(err) => {
                tracing::warn!("Failed to encode signature: {err}");
                None
            }
        }
    }

    /// Replace the content with a serialized image, or clear on `None`.
    ///
    /// Decoding happens off the calling path; the result is drawn by
    /// [`apply_pending`](Self::apply_pending) or [`settle`](Self::settle).
    pub fn load(&mut self, encoded: Option<&str>) {
        let Some(encoded) = encoded else {
            self.clear();
            return;
        };
        let encoded = encoded.to_string();
        let tx = self.decoded_tx.clone();
        self.pending_loads += 1;

        let decode = move || {
            // The surface may be gone by now; a closed channel drops the result
            let _ = tx.send(raster::decode_data_url(&encoded));
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.decoders.push_back(handle.spawn_blocking(decode));
            }
            Err(_) => decode(),
        }
    }

    /// Draw every decode that has completed, in completion order.
    /// Returns the number of results consumed.
    pub fn apply_pending(&mut self) -> usize {
        // A decode sends before it finishes, so prune first and drain after
        self.decoders.retain(|task| !task.is_finished());
        let mut applied = 0;
        while let Ok(decoded) = self.decoded_rx.try_recv() {
            self.apply_decoded(decoded);
            applied += 1;
        }
        if self.decoders.is_empty() {
            self.forget_lost_loads();
        }
        applied
    }

    /// Wait for all outstanding loads and draw them
    pub async fn settle(&mut self) {
        while self.pending_loads > 0 {
            if let Ok(decoded) = self.decoded_rx.try_recv() {
                self.apply_decoded(decoded);
                continue;
            }
            let Some(task) = self.decoders.pop_front() else {
                self.forget_lost_loads();
                break;
            };
            if let Err(err) = task.await {
                tracing::warn!("Signature decode task failed: {err}");
            }
        }
    }

    /// Drop the count of loads whose decode ended without a result
    fn forget_lost_loads(&mut self) {
        if self.pending_loads > 0 {
            tracing::warn!(
                "{} signature load(s) ended without a result",
                self.pending_loads
            );
            self.pending_loads = 0;
        }
    }

    fn apply_decoded(&mut self, decoded: Decoded) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        match decoded {
            Ok(image) => {
                raster::draw_over_white(&mut self.raster, &image);
                self.has_ink = raster::has_ink(&self.raster);
                self.events.push(SurfaceEvent::Loaded);
            }
            Err(err) => tracing::debug!("Ignoring undecodable signature image: {err}"),
        }
    }

    pub fn has_pending_loads(&self) -> bool {
        self.pending_loads > 0
    }

    /// Drain queued events in order
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current on-screen width in cells
    pub fn display_width(&self) -> u16 {
        self.display_width
    }

    /// Apply any container width change reported by the observer.
    /// Only the displayed width changes; the raster keeps its resolution.
    pub fn sync_display_width(&mut self) {
        if let Some(container) = self.observer.poll_width() {
            let width = self
                .options
                .display_width
                .min(container.saturating_sub(CONTAINER_PADDING))
                .max(1);
            if width != self.display_width {
                tracing::debug!("Signature pad display width {} -> {width}", self.display_width);
                self.display_width = width;
            }
        }
    }

    /// The rectangle the surface occupies inside `container`
    pub fn display_area(&self, container: Rect) -> Rect {
        Rect {
            x: container.x,
            y: container.y,
            width: self.display_width.min(container.width),
            height: self.options.display_rows.min(container.height),
        }
    }

    /// Map a terminal cell inside `area` to raster coordinates, sampling the
    /// cell center and scaling each axis by raster size over displayed size.
    pub fn map_cell(&self, area: Rect, column: u16, row: u16) -> Option<Point> {
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let scale_x = self.raster.width() as f32 / area.width as f32;
        let scale_y = self.raster.height() as f32 / area.height as f32;
        Some(Point::new(
            ((column - area.x) as f32 + 0.5) * scale_x,
            ((row - area.y) as f32 + 0.5) * scale_y,
        ))
    }
}

impl Drop for DrawingSurface {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl std::fmt::Debug for DrawingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSurface")
            .field("width", &self.raster.width())
            .field("height", &self.raster.height())
            .field("has_ink", &self.has_ink)
            .field("is_drawing", &self.is_drawing)
            .field("disabled", &self.disabled)
            .field("display_width", &self.display_width)
            .finish()
    }
}
