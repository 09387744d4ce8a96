use anyhow::{Context, Result};
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::types::ScreenRect;

/// Source of the available (work-area) rectangle
pub trait ScreenGeometry {
    fn available_rect(&self) -> Option<ScreenRect>;
}

/// Work area published by the window manager in `_NET_WORKAREA`
pub struct X11Workarea {
    conn: RustConnection,
    root: Window,
    net_workarea: Atom,
    fallback: ScreenRect,
}

impl X11Workarea {
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("Failed to connect to X11 server")?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let fallback = ScreenRect::from_origin_size(
            0,
            0,
            screen.width_in_pixels as i32,
            screen.height_in_pixels as i32,
        );

        let net_workarea = conn
            .intern_atom(false, b"_NET_WORKAREA")
            .context("Failed to intern _NET_WORKAREA atom")?
            .reply()
            .context("Failed to get reply for _NET_WORKAREA atom")?
            .atom;

        debug!(screen = screen_num, width = fallback.width(), height = fallback.height(), "Connected to X11 for screen geometry");
        Ok(Self { conn, root, net_workarea, fallback })
    }

    fn query_workarea(&self) -> Result<Option<ScreenRect>> {
        let reply = self
            .conn
            .get_property(false, self.root, self.net_workarea, AtomEnum::CARDINAL, 0, 4)
            .context("Failed to query _NET_WORKAREA")?
            .reply()
            .context("Failed to get reply for _NET_WORKAREA")?;

        let values: Vec<u32> = match reply.value32() {
            Some(values) => values.collect(),
            None => return Ok(None),
        };
        Ok(workarea_from_cardinals(&values))
    }
}

impl ScreenGeometry for X11Workarea {
    fn available_rect(&self) -> Option<ScreenRect> {
        match self.query_workarea() {
            Ok(Some(rect)) => Some(rect),
            Ok(None) => Some(self.fallback),
            Err(e) => {
                debug!(error = ?e, "Work area unavailable, using full screen");
                Some(self.fallback)
            }
        }
    }
}

/// First desktop's `x, y, width, height` from a `_NET_WORKAREA` value
fn workarea_from_cardinals(values: &[u32]) -> Option<ScreenRect> {
    match values {
        [x, y, width, height, ..] if *width > 0 && *height > 0 => Some(ScreenRect::from_origin_size(
            *x as i32,
            *y as i32,
            *width as i32,
            *height as i32,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workarea_from_cardinals() {
        assert_eq!(
            workarea_from_cardinals(&[0, 32, 1920, 1048]),
            Some(ScreenRect::new(0, 32, 1920, 1080))
        );
        assert_eq!(workarea_from_cardinals(&[0, 0, 0, 0]), None);
        assert_eq!(workarea_from_cardinals(&[0, 0]), None);
    }
}
