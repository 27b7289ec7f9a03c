//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with three states (Idle, Recording,
//! Unavailable) and the application menu.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 32;
const PREVIEW_MAX_CHARS: usize = 60;

/// Ids of the tray menu entries, cheap to clone into the session thread.
#[derive(Debug, Clone)]
pub struct TrayMenuIds {
    /// Start or stop a toggle recording.
    pub toggle: MenuId,
    /// Re-inject the newest transcript.
    pub paste_last: MenuId,
    /// Re-read the config file.
    pub reload: MenuId,
    /// Open the config file in the default editor.
    pub open_settings: MenuId,
    /// Quit.
    pub exit: MenuId,
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    menu_ids: TrayMenuIds,
    state: TrayIconState,
}

impl TrayManager {
    /// Create a new tray manager in the idle state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let toggle = MenuItem::new("Toggle recording", true, None);
        let paste_last = MenuItem::new("Paste last transcript", true, None);
        let reload = MenuItem::new("Reload settings", true, None);
        let open_settings = MenuItem::new("Open settings file", true, None);
        let exit = MenuItem::new("Exit", true, None);

        let caller = Location::caller();
        let menu_err = |e: tray_icon::menu::Error| AppError::WindowError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(caller),
        };

        menu.append_items(&[
            &toggle,
            &paste_last,
            &PredefinedMenuItem::separator(),
            &reload,
            &open_settings,
            &PredefinedMenuItem::separator(),
            &exit,
        ])
        .map_err(menu_err)?;

        let menu_ids = TrayMenuIds {
            toggle: toggle.id().clone(),
            paste_last: paste_last.id().clone(),
            reload: reload.id().clone(),
            open_settings: open_settings.id().clone(),
            exit: exit.id().clone(),
        };

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(tooltip(TrayIconState::Idle, None))
            .with_menu(Box::new(menu))
            .with_icon(Self::load_icon(TrayIconState::Idle)?)
            .build()
            .map_err(|e| AppError::WindowError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            menu_ids,
            state: TrayIconState::Idle,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        self.tray_icon
            .set_icon(Some(Self::load_icon(state)?))
            .map_err(|e| AppError::WindowError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.state = state;
        self.set_tooltip(None)
    }

    /// Show live preview text in the tooltip.
    #[track_caller]
    pub fn set_preview(&mut self, preview: Option<&str>) -> AppResult<()> {
        self.set_tooltip(preview)
    }

    /// Menu entry ids.
    pub fn menu_ids(&self) -> &TrayMenuIds {
        &self.menu_ids
    }

    #[track_caller]
    fn set_tooltip(&mut self, preview: Option<&str>) -> AppResult<()> {
        self.tray_icon
            .set_tooltip(Some(tooltip(self.state, preview)))
            .map_err(|e| AppError::WindowError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let image = icon_image(state);
        let (width, height) = image.dimensions();

        Icon::from_rgba(image.into_raw(), width, height).map_err(|e| AppError::WindowError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Tooltip text for `state`, with an optional live preview.
pub fn tooltip(state: TrayIconState, preview: Option<&str>) -> String {
    let status = match state {
        TrayIconState::Idle => "Ready",
        TrayIconState::Recording => "Recording...",
        TrayIconState::Unavailable => "Transcription worker unavailable",
    };

    match preview {
        Some(text) if !text.is_empty() => {
            let mut shown: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
            if text.chars().count() > PREVIEW_MAX_CHARS {
                shown.push_str("...");
            }
            format!("Voice Typer - {status}\n{shown}")
        }
        _ => format!("Voice Typer - {status}"),
    }
}

/// Solid disc on a transparent background, colored by state.
pub fn icon_image(state: TrayIconState) -> RgbaImage {
    let fill = match state {
        TrayIconState::Idle => Rgba([107, 114, 128, 255]),
        TrayIconState::Recording => Rgba([220, 38, 38, 255]),
        TrayIconState::Unavailable => Rgba([217, 119, 6, 255]),
    };

    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 1.0;

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        if dx * dx + dy * dy <= radius * radius {
            fill
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
