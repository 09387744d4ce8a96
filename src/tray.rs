//! System tray icon via D-Bus StatusNotifier (ksni)
//!
//! The tray lives on its own thread with a small tokio runtime. Menu
//! entries never touch widget state: they send a `Command` to the GUI
//! thread and wake it. The GUI pushes the resulting `TrayState` back so
//! checkmarks follow what actually happened.

use anyhow::{Context, Result};
use ksni::TrayMethods;
use ksni::menu::{CheckmarkItem, StandardItem, SubMenu};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{error, info, warn};

use crate::i18n::{Label, Language};
use crate::widget::{Command, TrayState};

/// Called after a command is queued so the GUI loop picks it up
pub type Waker = Arc<dyn Fn() + Send + Sync>;

const ICON_SIZE: i32 = 16;

struct FloaterTray {
    state: TrayState,
    commands: Sender<Command>,
    wake: Waker,
}

impl FloaterTray {
    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!(command = ?command, "GUI loop gone, dropping tray command");
            return;
        }
        (self.wake)();
    }

    fn tr(&self, label: Label) -> String {
        self.state.language.tr(label).to_string()
    }
}

impl ksni::Tray for FloaterTray {
    fn id(&self) -> String {
        env!("CARGO_PKG_NAME").into()
    }

    fn title(&self) -> String {
        self.tr(Label::Tooltip)
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        vec![ksni::Icon {
            width: ICON_SIZE,
            height: ICON_SIZE,
            data: tray_icon_argb(),
        }]
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            title: self.tr(Label::Tooltip),
            ..Default::default()
        }
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        self.send(Command::ToggleVisible);
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        let languages = Language::ALL
            .into_iter()
            .map(|language| {
                CheckmarkItem {
                    label: language.native_name().into(),
                    checked: self.state.language == language,
                    activate: Box::new(move |this: &mut Self| this.send(Command::SetLanguage(language))),
                    ..Default::default()
                }
                .into()
            })
            .collect();

        vec![
            CheckmarkItem {
                label: self.tr(Label::StartOnLogin),
                checked: self.state.auto_start,
                activate: Box::new(|this: &mut Self| this.send(Command::ToggleAutoStart)),
                ..Default::default()
            }
            .into(),
            CheckmarkItem {
                label: self.tr(Label::ShowPercentage),
                checked: self.state.show_percentage,
                activate: Box::new(|this: &mut Self| this.send(Command::TogglePercentage)),
                ..Default::default()
            }
            .into(),
            SubMenu {
                label: self.tr(Label::Language),
                submenu: languages,
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: self.tr(Label::ShowHide),
                activate: Box::new(|this: &mut Self| this.send(Command::ToggleVisible)),
                ..Default::default()
            }
            .into(),
            ksni::MenuItem::Separator,
            StandardItem {
                label: self.tr(Label::Exit),
                icon_name: "application-exit".into(),
                activate: Box::new(|this: &mut Self| this.send(Command::Quit)),
                ..Default::default()
            }
            .into(),
        ]
    }
}

/// Sends refreshed checkmark state to the tray thread
pub struct TrayHandle {
    updates: UnboundedSender<TrayState>,
}

impl TrayHandle {
    pub fn update(&self, state: TrayState) {
        if self.updates.send(state).is_err() {
            warn!("Tray thread gone, skipping menu update");
        }
    }
}

/// Register the tray icon on a background thread
pub fn spawn_tray(initial: TrayState, commands: Sender<Command>, wake: Waker) -> Result<TrayHandle> {
    let (updates, mut pending) = unbounded_channel::<TrayState>();

    thread::Builder::new()
        .name("tray".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!(error = ?err, "Failed to build tray runtime");
                    return;
                }
            };

            runtime.block_on(async move {
                let tray = FloaterTray { state: initial, commands, wake };
                let handle = match tray.spawn().await {
                    Ok(handle) => handle,
                    Err(err) => {
                        error!(error = ?err, "Failed to register tray icon, continuing without tray");
                        return;
                    }
                };
                info!("Tray icon registered");

                while let Some(state) = pending.recv().await {
                    handle.update(move |tray: &mut FloaterTray| tray.state = state).await;
                }
            });
        })
        .context("Failed to spawn tray thread")?;

    Ok(TrayHandle { updates })
}

/// 16x16 ARGB32 (network byte order): green download dot, orange upload
/// dot, grey link between them
fn tray_icon_argb() -> Vec<u8> {
    const DOWNLOAD: [u8; 4] = [255, 76, 175, 80];
    const UPLOAD: [u8; 4] = [255, 255, 152, 0];
    const LINK: [u8; 4] = [180, 200, 200, 200];

    let inside = |px: f32, py: f32, cx: f32, cy: f32| (px - cx).powi(2) + (py - cy).powi(2) <= 9.0;

    let mut data = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let pixel = if inside(px, py, 5.0, 5.0) {
                DOWNLOAD
            } else if inside(px, py, 11.0, 11.0) {
                UPLOAD
            } else if x == y && (5..=11).contains(&x) {
                LINK
            } else {
                [0, 0, 0, 0]
            };
            data.extend_from_slice(&pixel);
        }
    }
    data
}
