// Card renderer scale and artwork URLs.
// The renderer draws on a fixed canvas; on-screen size is expressed as a scale of it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::target::{SizeLog, SizeUpdate, SizedTarget};
use crate::types::{TargetKind, TargetSize};

/// Width of the card renderer's canvas in pixels.
pub const CANVAS_WIDTH: f64 = 1394.0;
/// Height of the card renderer's canvas in pixels.
pub const CANVAS_HEIGHT: f64 = 2031.0;

pub fn width_to_scale(width: f64) -> f64 {
    width / CANVAS_WIDTH
}

pub fn height_to_scale(height: f64) -> f64 {
    height / CANVAS_HEIGHT
}

/// Scale that makes the card occupy `size` along its axis.
pub fn size_to_scale(size: TargetSize) -> f64 {
    match size {
        TargetSize::Width(width) => width_to_scale(width),
        TargetSize::Height(height) => height_to_scale(height),
    }
}

/// Something driven by a scale factor, like the card renderer.
pub trait ScaleTarget {
    fn set_scale(&mut self, scale: f64);
}

impl ScaleTarget for SizeLog {
    fn set_scale(&mut self, scale: f64) {
        self.push(SizeUpdate::Scale(scale));
    }
}

/// Adapts a `ScaleTarget` so it can be bound to breakpoints that resolve sizes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaledTarget<T> {
    inner: T,
}

impl<T: ScaleTarget> ScaledTarget<T> {
    pub fn new(inner: T) -> Self {
        ScaledTarget { inner }
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: ScaleTarget> SizedTarget for ScaledTarget<T> {
    fn set_size(&mut self, size: TargetSize) {
        self.inner.set_scale(size_to_scale(size));
    }
}

/// Queue behind one card on the page: sizes for `setSize`, or scales for `setScale`.
#[derive(Debug, Clone, PartialEq)]
pub enum CardTarget {
    Size(SizeLog),
    Scale(ScaledTarget<SizeLog>),
}

impl CardTarget {
    pub fn new(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Size => CardTarget::Size(SizeLog::new()),
            TargetKind::Scale => CardTarget::Scale(ScaledTarget::new(SizeLog::new())),
        }
    }

    pub fn drain(&mut self) -> Vec<SizeUpdate> {
        match self {
            CardTarget::Size(log) => log.drain(),
            CardTarget::Scale(scaled) => scaled.inner_mut().drain(),
        }
    }
}

impl SizedTarget for CardTarget {
    fn set_size(&mut self, size: TargetSize) {
        match self {
            CardTarget::Size(log) => log.set_size(size),
            CardTarget::Scale(scaled) => scaled.set_size(size),
        }
    }
}

/// A `CardTarget` shared between a watcher subscription and whoever drains it.
#[derive(Debug, Clone)]
pub struct SharedCardTarget(Rc<RefCell<CardTarget>>);

impl SharedCardTarget {
    pub fn new(kind: TargetKind) -> Self {
        SharedCardTarget(Rc::new(RefCell::new(CardTarget::new(kind))))
    }

    pub fn drain(&self) -> Vec<SizeUpdate> {
        self.0.borrow_mut().drain()
    }
}

impl SizedTarget for SharedCardTarget {
    fn set_size(&mut self, size: TargetSize) {
        self.0.borrow_mut().set_size(size);
    }
}

/// Artwork URL for a card password: `<base>/<password>.jpg`.
/// Returns `None` when there is no password to look up.
pub fn card_image_url(base: &str, password: &str) -> Option<String> {
    if password.is_empty() {
        return None;
    }
    Some(format!("{}/{}.jpg", base.trim_end_matches('/'), password))
}
