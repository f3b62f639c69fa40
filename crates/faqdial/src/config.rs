use dialkit::items::{self, FaqItem};
use dialkit::layout::SizeParams;
use dialkit::ring::Slot;
use dialkit::widget::{Anchor, WidgetSettings};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FaqConfig {
    pub slot: Option<Slot>,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Ring and panel sizes; anything unset scales with the screen.
    pub layout: SizeParams,
    /// Width of the centred app column the widget is constrained to.
    pub frame_width: Option<f64>,
    pub anchor_right: f64,
    pub anchor_bottom: f64,
    pub min_visible: f64,
    pub small_screen_width: f64,
    pub debug_crosshair: bool,
    pub faqs: Vec<FaqConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = WidgetSettings::default();
        Self {
            layout: SizeParams::default(),
            frame_width: Some(420.0),
            anchor_right: defaults.anchor.right,
            anchor_bottom: defaults.anchor.bottom,
            min_visible: defaults.min_visible,
            small_screen_width: defaults.small_screen_width,
            debug_crosshair: false,
            faqs: Vec::new(),
        }
    }
}

impl Config {
    /// Explicit slots win; the rest fill the ring in listed order.
    pub fn items(&self) -> Vec<FaqItem> {
        if self.faqs.is_empty() {
            return items::default_items();
        }

        let mut ring = items::fill_ring(&[]);
        let mut taken = [false; dialkit::ring::SLOT_COUNT];

        self.faqs
            .iter()
            .filter_map(|faq| faq.slot.map(|slot| (slot.index(), faq)))
            .for_each(|(idx, faq)| {
                ring[idx] = FaqItem::new(&faq.title, &faq.body);
                taken[idx] = true;
            });

        let mut free = (0..ring.len()).filter(|&i| !taken[i]);
        for faq in self.faqs.iter().filter(|faq| faq.slot.is_none()) {
            match free.next() {
                Some(idx) => ring[idx] = FaqItem::new(&faq.title, &faq.body),
                None => log::warn!("No free slot left for '{}'", faq.title),
            }
        }
        ring
    }

    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            sizes: self.layout,
            anchor: Anchor {
                right: self.anchor_right,
                bottom: self.anchor_bottom,
            },
            min_visible: self.min_visible,
            small_screen_width: self.small_screen_width,
            debug_crosshair: self.debug_crosshair,
            items: self.items(),
            ..WidgetSettings::default()
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "faqdial").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("FAQDIAL"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// First run writes the commented default file so there is something to edit.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(p) => log::info!("Wrote default config to {}", p.display()),
            Err(e) => log::warn!("Could not write default config: {}", e),
        }
        return Config::default();
    }

    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let touched = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if touched
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
