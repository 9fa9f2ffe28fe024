//! Scene settings
//!
//! Every knob the control panel exposes, persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::sim::{DoublePendulum, ParticleBox, PendulumParams, Trace, WorldParams};

/// Live-adjustable settings for both scenes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle box physics and spawn parameters
    pub world: WorldParams,
    /// Double pendulum physical parameters
    pub pendulum: PendulumParams,

    // === Particle box controls ===
    /// Particles spawned by the "add" command
    pub ball_count: usize,
    /// Radius of obstacles placed by clicking
    pub obstacle_radius: f32,
    /// Box angle set by the slider (degrees)
    pub box_angle_deg: f32,
    /// Swing the box back and forth automatically
    pub auto_rotate: bool,

    // === Pendulum controls ===
    /// Draw the lower bob's path
    pub trace: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world: WorldParams::default(),
            pendulum: PendulumParams::default(),
            ball_count: 150,
            obstacle_radius: 18.0,
            box_angle_deg: 0.0,
            auto_rotate: false,
            trace: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "physics_toys_settings";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Push the particle box settings into a world
    ///
    /// The slider angle is skipped while auto-rotate drives the box.
    pub fn apply_to_world(&self, world: &mut ParticleBox) {
        world.apply_params(&self.world);
        if !self.auto_rotate {
            world.set_box_angle(self.box_angle_deg.to_radians());
        }
    }

    /// Push the pendulum settings into an integrator and its trace
    pub fn apply_to_pendulum(&self, pendulum: &mut DoublePendulum, trace: &mut Trace) {
        pendulum.params = self.pendulum.clone();
        trace.set_enabled(self.trace);
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: read JSON from the `PHYSICS_TOYS_SETTINGS` environment variable
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let key = Self::STORAGE_KEY.to_uppercase();
        match std::env::var(&key) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring {}: {}", key, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
