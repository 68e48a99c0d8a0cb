//! Container resize observation for the signature surface

use tokio::sync::watch;

/// Reports size changes of the container holding a drawing surface
#[cfg_attr(test, mockall::automock)]
pub trait ResizeObserver {
    /// New container width in cells, if it changed since the last call
    fn poll_width(&mut self) -> Option<u16>;

    /// Stop observing. No further widths are reported afterwards.
    fn disconnect(&mut self);
}

/// Publishing half: the layout pass reports the container width here
#[derive(Debug)]
pub struct ContainerWidth {
    tx: watch::Sender<u16>,
}

impl ContainerWidth {
    /// Record the container width, waking observers only on change
    pub fn set(&self, width: u16) {
        self.tx.send_if_modified(|current| {
            if *current == width {
                false
            } else {
                *current = width;
                true
            }
        });
    }

    #[cfg(test)]
    pub fn has_observers(&self) -> bool {
        self.tx.receiver_count() > 0
    }
}

/// Observer backed by a watch channel
#[derive(Debug)]
pub struct WatchResizeObserver {
    rx: Option<watch::Receiver<u16>>,
}

impl ResizeObserver for WatchResizeObserver {
    fn poll_width(&mut self) -> Option<u16> {
        let rx = self.rx.as_mut()?;
        match rx.has_changed() {
            Ok(true) => Some(*rx.borrow_and_update()),
            _ => None,
        }
    }

    fn disconnect(&mut self) {
        self.rx = None;
    }
}

/// Create a linked width publisher and observer
pub fn container_width(initial: u16) -> (ContainerWidth, WatchResizeObserver) {
    let (tx, rx) = watch::channel(initial);
    (ContainerWidth { tx }, WatchResizeObserver { rx: Some(rx) })
}
