use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

pub const CHANT_PATH_ENV: &str = "FUTSAL_CHANT_PATH";
pub const FPS_ENV: &str = "FUTSAL_FPS";
pub const LOG_ENV: &str = "FUTSAL_LOG";

pub const DEFAULT_CHANT_PATH: &str = "assets/audio/chanting.mp3";
pub const DEFAULT_FPS: u32 = 60;
const FPS_RANGE: (u32, u32) = (10, 144);

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub chant_path: PathBuf,
    /// Glow frames per second.
    pub fps: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            chant_path: PathBuf::from(DEFAULT_CHANT_PATH),
            fps: DEFAULT_FPS,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let log_level = value(LOG_ENV).and_then(|v| LevelFilter::from_str(&v).ok());
        let chant_path = value(CHANT_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANT_PATH));
        let fps = value(FPS_ENV)
            .and_then(|v| v.parse::<u32>().ok())
            .map_or(DEFAULT_FPS, |fps| fps.clamp(FPS_RANGE.0, FPS_RANGE.1));

        Self { full_screen: false, log_level, chant_path, fps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(settings(&[]), AppSettings::default());
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            (LOG_ENV, "debug"),
            (CHANT_PATH_ENV, "/tmp/chant.wav"),
            (FPS_ENV, "30"),
        ]);
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
        assert_eq!(s.chant_path, PathBuf::from("/tmp/chant.wav"));
        assert_eq!(s.fps, 30);
    }

    #[test]
    fn fps_is_clamped_and_garbage_ignored() {
        assert_eq!(settings(&[(FPS_ENV, "1000")]).fps, 144);
        assert_eq!(settings(&[(FPS_ENV, "2")]).fps, 10);
        assert_eq!(settings(&[(FPS_ENV, "fast")]).fps, DEFAULT_FPS);
        assert_eq!(settings(&[(LOG_ENV, "loud")]).log_level, None);
        assert_eq!(settings(&[(CHANT_PATH_ENV, "  ")]).chant_path, PathBuf::from(DEFAULT_CHANT_PATH));
    }
}
