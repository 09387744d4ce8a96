//! Floating widget window implemented with egui/eframe
//!
//! The window is borderless, transparent and always on top. Its position
//! and size are driven entirely by `WidgetState`; every frame the app
//! advances the animations and pushes any geometry change to the window
//! manager through viewport commands.

pub mod constants;
pub mod fonts;
pub mod painter;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, channel};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{error, info, warn};

use crate::autostart::XdgAutostart;
use crate::config::JsonStore;
use crate::font::LabelFont;
use crate::network::{SpeedMonitor, SystemCounters};
use crate::state::mode_size;
use crate::tray::{TrayHandle, spawn_tray};
use crate::types::{Position, ScreenRect, WindowGeometry};
use crate::widget::{Command, Response, TrayState, Widget};
use crate::x11_utils::ScreenGeometry;
use constants::FRAME_INTERVAL_MS;
use fonts::{GalleyMetrics, install_label_font};
use painter::paint_widget;

/// Everything the window needs, prepared before the event loop starts
pub struct WidgetOptions {
    pub store: JsonStore,
    pub autostart: XdgAutostart,
    pub monitor: SpeedMonitor<SystemCounters>,
    pub label_font: Option<LabelFont>,
    pub screen: Option<Box<dyn ScreenGeometry>>,
    pub sample_interval: Duration,
    pub shutdown: Arc<AtomicBool>,
}

struct WidgetApp {
    widget: Widget<XdgAutostart>,
    monitor: SpeedMonitor<SystemCounters>,
    metrics: GalleyMetrics,
    screen_source: Option<Box<dyn ScreenGeometry>>,
    screen: ScreenRect,
    commands: Receiver<Command>,
    tray: Option<TrayHandle>,
    last_tray_state: TrayState,
    shutdown: Arc<AtomicBool>,
    sample_interval: Duration,
    next_sample: Instant,
    last_frame: Instant,
    applied_geometry: Option<WindowGeometry>,
    applied_visible: Option<bool>,
    flushed: bool,
}

impl WidgetApp {
    fn new(cc: &CreationContext<'_>, options: WidgetOptions) -> Self {
        info!("Initializing widget window");
        install_label_font(&cc.egui_ctx, options.label_font.as_ref());

        let pixels_per_point = cc.egui_ctx.pixels_per_point();
        let screen = query_screen(options.screen.as_deref(), pixels_per_point, monitor_rect(&cc.egui_ctx));
        let widget = Widget::new(options.store, options.autostart, screen);

        let (tx, commands) = channel();
        let last_tray_state = widget.tray_state();
        let egui_ctx = cc.egui_ctx.clone();
        let tray = match spawn_tray(last_tray_state, tx, Arc::new(move || egui_ctx.request_repaint())) {
            Ok(handle) => Some(handle),
            Err(err) => {
                error!(error = ?err, "Failed to start tray, continuing without it");
                None
            }
        };

        let now = Instant::now();
        Self {
            widget,
            monitor: options.monitor,
            metrics: GalleyMetrics::new(cc.egui_ctx.clone()),
            screen_source: options.screen,
            screen,
            commands,
            tray,
            last_tray_state,
            shutdown: options.shutdown,
            sample_interval: options.sample_interval,
            next_sample: now + options.sample_interval,
            last_frame: now,
            applied_geometry: None,
            applied_visible: None,
            flushed: false,
        }
    }

    fn request_exit(&mut self, ctx: &egui::Context) {
        if !self.flushed {
            self.widget.shutdown(self.screen);
            self.flushed = true;
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn process_commands(&mut self, ctx: &egui::Context) {
        while let Ok(command) = self.commands.try_recv() {
            if self.widget.dispatch(command, self.screen) == Response::Exit {
                info!("Quit requested from tray menu");
                self.flushed = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn sample_if_due(&mut self, ctx: &egui::Context, now: Instant) {
        if now < self.next_sample {
            return;
        }
        self.widget.set_speed(self.monitor.poll());

        self.next_sample += self.sample_interval;
        if self.next_sample <= now {
            // Fell behind (suspend, stalled frame); restart the cadence
            self.next_sample = now + self.sample_interval;
        }

        let fallback = monitor_rect(ctx).or(Some(self.screen));
        self.screen = query_screen(self.screen_source.as_deref(), ctx.pixels_per_point(), fallback);
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        // Local pointer coordinates are relative to where the window really
        // is, which can lag behind the geometry last requested
        let origin = ctx.input(|i| i.viewport().inner_rect).map(|rect| rect.min).unwrap_or_else(|| {
            let position = self.widget.state().geometry.position();
            egui::pos2(position.x as f32, position.y as f32)
        });
        let pointer = |local: egui::Pos2| {
            Position::new((origin.x + local.x).round() as i32, (origin.y + local.y).round() as i32)
        };

        if response.double_clicked() {
            self.widget.double_clicked(self.screen);
            return;
        }
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(local) = response.interact_pointer_pos()
        {
            self.widget.pointer_pressed(pointer(local));
        }
        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(local) = response.interact_pointer_pos()
        {
            self.widget.pointer_moved(pointer(local));
        }
        if response.drag_stopped() {
            self.widget.pointer_released(self.screen);
        }
    }

    fn apply_window_state(&mut self, ctx: &egui::Context) {
        let state = self.widget.state();

        if self.applied_visible != Some(state.visible) {
            // Hidden means fully transparent and click-through; a truly
            // unmapped window stops receiving frames and could not come back
            ctx.send_viewport_cmd(egui::ViewportCommand::MousePassthrough(!state.visible));
            self.applied_visible = Some(state.visible);
        }

        let geometry = state.geometry;
        if self.applied_geometry == Some(geometry) {
            return;
        }
        let previous = self.applied_geometry.replace(geometry);
        if previous.map(|g| g.position()) != Some(geometry.position()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                geometry.x as f32,
                geometry.y as f32,
            )));
        }
        if previous.map(|g| g.size()) != Some(geometry.size()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                geometry.width as f32,
                geometry.height as f32,
            )));
        }
    }

    fn sync_tray(&mut self) {
        let current = self.widget.tray_state();
        if current == self.last_tray_state {
            return;
        }
        self.last_tray_state = current;
        if let Some(tray) = &self.tray {
            tray.update(current);
        }
    }
}

impl eframe::App for WidgetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.shutdown.load(Ordering::Relaxed) {
            info!("Termination signal received, exiting");
            self.request_exit(ctx);
            return;
        }

        self.process_commands(ctx);

        let now = Instant::now();
        self.sample_if_due(ctx, now);
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.widget.tick(elapsed, self.screen, &self.metrics);

        egui::CentralPanel::default().frame(egui::Frame::NONE).show(ctx, |ui| {
            let rect = ui.max_rect();
            let state = self.widget.state();
            if !state.visible {
                return;
            }
            let frame = state.frame();
            let response = ui.interact(rect, ui.id().with("widget"), egui::Sense::click_and_drag());
            paint_widget(ui.painter(), rect, &frame);
            self.handle_pointer(ctx, &response);
        });

        self.apply_window_state(ctx);
        self.sync_tray();

        ctx.request_repaint_after(Duration::from_millis(FRAME_INTERVAL_MS));
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if !self.flushed {
            self.widget.shutdown(self.screen);
            self.flushed = true;
        }
        info!("Widget exiting");
    }
}

/// Monitor size reported by the windowing layer, in points
fn monitor_rect(ctx: &egui::Context) -> Option<ScreenRect> {
    ctx.input(|i| i.viewport().monitor_size)
        .map(|size| ScreenRect::from_origin_size(0, 0, size.x.round() as i32, size.y.round() as i32))
}

/// Available screen area in egui points
fn query_screen(source: Option<&dyn ScreenGeometry>, pixels_per_point: f32, fallback: Option<ScreenRect>) -> ScreenRect {
    let Some(pixels) = source.and_then(|s| s.available_rect()) else {
        return fallback.unwrap_or_else(|| {
            warn!("Screen geometry unavailable, assuming 1920x1080");
            ScreenRect::from_origin_size(0, 0, 1920, 1080)
        });
    };
    let scale = |v: i32| (v as f32 / pixels_per_point).round() as i32;
    ScreenRect::new(scale(pixels.left), scale(pixels.top), scale(pixels.right), scale(pixels.bottom))
}

pub fn run_widget(options: WidgetOptions, compact: bool) -> Result<()> {
    let size = mode_size(compact);
    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size.width as f32, size.height as f32])
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_taskbar(false)
            .with_resizable(false)
            .with_title("NetFloater"),
        ..Default::default()
    };

    eframe::run_native(
        "NetFloater",
        native_options,
        Box::new(|cc| Ok(Box::new(WidgetApp::new(cc, options)))),
    )
    .map_err(|err| anyhow!("Failed to launch widget window: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScreen(Option<ScreenRect>);

    impl ScreenGeometry for FixedScreen {
        fn available_rect(&self) -> Option<ScreenRect> {
            self.0
        }
    }

    #[test]
    fn test_query_screen_scales_to_points() {
        let source = FixedScreen(Some(ScreenRect::new(0, 64, 3840, 2160)));
        assert_eq!(query_screen(Some(&source), 2.0, None), ScreenRect::new(0, 32, 1920, 1080));
    }

    #[test]
    fn test_query_screen_fallback() {
        let last = ScreenRect::new(0, 0, 1280, 720);
        assert_eq!(query_screen(Some(&FixedScreen(None)), 1.0, Some(last)), last);
        assert_eq!(query_screen(None, 1.0, None), ScreenRect::new(0, 0, 1920, 1080));
    }
}
