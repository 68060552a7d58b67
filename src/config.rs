use std::env;

use log::warn;

pub const TREE_HEIGHT: f32 = 13.0;
pub const TREE_BASE_RADIUS: f32 = 5.2;
/// World-space y of the bottom of the tree, the tree is centered on the origin.
pub const TREE_BOTTOM: f32 = TREE_HEIGHT * -0.5;
pub const SCATTER_RADIUS: f32 = 22.0;

/// A group counts as settled once its progress is this close to the target.
pub const SETTLE_EPSILON: f32 = 0.001;

pub struct NeedleConfig {
    pub count: usize,
    pub layer_count: usize,
    pub speed: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub thickness: f32,
    pub color: [f32; 4],
}

pub const NEEDLES: NeedleConfig = NeedleConfig {
    count: 4200,
    layer_count: 48,
    speed: 1.6,
    min_scale: 0.45,
    max_scale: 0.95,
    thickness: 0.6,
    color: [0.02, 0.32, 0.12, 0.0],
};

pub struct OrnamentConfig {
    pub count: usize,
    pub speed: f32,
    pub turns: f32,
    pub surface_offset: f32,
    pub scale: f32,
    pub palette: &'static [[f32; 4]],
}

pub const ORNAMENT_SPHERES: OrnamentConfig = OrnamentConfig {
    count: 160,
    speed: 1.2,
    turns: 9.0,
    surface_offset: 0.35,
    scale: 0.32,
    palette: &[
        [0.85, 0.65, 0.13, 0.0],
        [0.70, 0.04, 0.08, 0.0],
        [0.80, 0.80, 0.85, 0.0],
        [0.55, 0.02, 0.20, 0.0],
    ],
};

pub const ORNAMENT_DIAMONDS: OrnamentConfig = OrnamentConfig {
    count: 60,
    speed: 1.0,
    turns: 5.0,
    surface_offset: 0.5,
    scale: 0.38,
    palette: &[[0.95, 0.85, 0.45, 0.15], [0.75, 0.90, 1.00, 0.15]],
};

/// Y-rotation added to every settled diamond each frame.
pub const DIAMOND_SPIN_STEP: f32 = 0.01;

pub struct LightConfig {
    pub count: usize,
    pub speed: f32,
    pub turns: f32,
    pub surface_offset: f32,
    pub scale: f32,
    pub blink_frequency: f32,
    pub blink_phase_offset: f32,
    pub float_frequency: f32,
    pub float_amplitude: f32,
    pub color: [f32; 4],
}

pub const LIGHTS: LightConfig = LightConfig {
    count: 320,
    speed: 2.2,
    turns: 14.0,
    surface_offset: 0.2,
    scale: 0.09,
    blink_frequency: 3.0,
    blink_phase_offset: 0.7,
    float_frequency: 1.5,
    float_amplitude: 0.05,
    color: [1.0, 0.82, 0.45, 1.0],
};

pub struct TopperConfig {
    pub rest_height: f32,
    pub float_height: f32,
    pub speed: f32,
    pub bob_frequency: f32,
    pub bob_amplitude: f32,
    pub pulse_frequency: f32,
    pub pulse_amplitude: f32,
    pub spin_speed: f32,
    pub scale: f32,
    pub color: [f32; 4],
}

pub const TOPPER: TopperConfig = TopperConfig {
    rest_height: TREE_HEIGHT * 0.5 + 0.6,
    float_height: TREE_HEIGHT * 0.5 + 9.0,
    speed: 1.5,
    bob_frequency: 1.2,
    bob_amplitude: 0.15,
    pulse_frequency: 2.0,
    pulse_amplitude: 0.06,
    spin_speed: 0.5,
    scale: 0.9,
    color: [1.0, 0.85, 0.3, 1.0],
};

pub struct PivotConfig {
    pub formed_speed: f32,
    pub scattered_speed: f32,
    pub wobble_frequency: f32,
    pub wobble_amplitude: f32,
}

pub const PIVOT: PivotConfig = PivotConfig {
    formed_speed: 0.15,
    scattered_speed: 0.05,
    wobble_frequency: 0.4,
    wobble_amplitude: 0.12,
};

pub const DEFAULT_WISH_THEME: &str = "warmth, family and a quiet snowy night";

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub seed: Option<u64>,
    pub api_key: Option<String>,
    pub wish_theme: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("TINSEL_SEED").and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(e) => {
                warn!("Ignoring TINSEL_SEED={:?}: {}", raw, e);
                None
            }
        });
        let api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());
        let wish_theme = lookup("TINSEL_WISH_THEME")
            .filter(|theme| !theme.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WISH_THEME.to_owned());

        Self {
            seed,
            api_key,
            wish_theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = settings_from(&[]);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.wish_theme, DEFAULT_WISH_THEME);
    }

    #[test]
    fn reads_seed_key_and_theme() {
        let settings = settings_from(&[
            ("TINSEL_SEED", " 42 "),
            ("GEMINI_API_KEY", "secret"),
            ("TINSEL_WISH_THEME", "snow"),
        ]);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.wish_theme, "snow");
    }

    #[test]
    fn bad_seed_and_blank_key_are_dropped() {
        let settings = settings_from(&[("TINSEL_SEED", "pine"), ("GEMINI_API_KEY", "  ")]);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.api_key, None);
    }
}
