use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::gesture::Handedness;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub target_handedness: Handedness,
    pub limits: LimitsConfig,
    pub detector: DetectorConfig,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_frame_bytes: usize,
    pub max_socket_connections: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: 2 * 1024 * 1024,
            max_socket_connections: 64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub mock: bool,
    pub url: String,
    pub timeout_secs: u64,
    pub workers: usize,
    pub max_hands: usize,
    pub min_confidence: f32,
    pub flip_horizontal: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            mock: true,
            url: String::new(),
            timeout_secs: 5,
            workers: 2,
            max_hands: 1,
            min_confidence: 0.7,
            flip_horizontal: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let limits = LimitsConfig::default();
        let detector = DetectorConfig::default();
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 5000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            target_handedness: env_or_parse("TARGET_HANDEDNESS", Handedness::Right),
            limits: LimitsConfig {
                max_frame_bytes: env_or_parse("MAX_FRAME_BYTES", limits.max_frame_bytes),
                max_socket_connections: env_or_parse(
                    "MAX_SOCKET_CONNECTIONS",
                    limits.max_socket_connections,
                ),
            },
            detector: DetectorConfig {
                mock: env_or_bool("DETECTOR_MOCK", detector.mock),
                url: env_or("DETECTOR_URL", &detector.url),
                timeout_secs: env_or_parse("DETECTOR_TIMEOUT_SECS", detector.timeout_secs),
                workers: env_or_parse("DETECTOR_WORKERS", detector.workers),
                max_hands: env_or_parse("DETECTOR_MAX_HANDS", detector.max_hands),
                min_confidence: env_or_parse("DETECTOR_MIN_CONFIDENCE", detector.min_confidence),
                flip_horizontal: env_or_bool("DETECTOR_FLIP_HORIZONTAL", detector.flip_horizontal),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "HOST",
            "PORT",
            "RUST_LOG",
            "TARGET_HANDEDNESS",
            "MAX_FRAME_BYTES",
            "DETECTOR_MOCK",
            "DETECTOR_WORKERS",
            "DETECTOR_MIN_CONFIDENCE",
            "DETECTOR_FLIP_HORIZONTAL",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.target_handedness, Handedness::Right);
        assert_eq!(cfg.limits.max_frame_bytes, 2 * 1024 * 1024);
        assert_eq!(cfg.detector.workers, 2);
        assert!(cfg.detector.mock);
        assert!(cfg.detector.flip_horizontal);
    }

    #[test]
    fn parses_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "4000");
        env::set_var("TARGET_HANDEDNESS", "left");
        env::set_var("DETECTOR_WORKERS", "4");
        env::set_var("DETECTOR_MIN_CONFIDENCE", "0.5");
        env::set_var("DETECTOR_FLIP_HORIZONTAL", "off");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.target_handedness, Handedness::Left);
        assert_eq!(cfg.detector.workers, 4);
        assert_eq!(cfg.detector.min_confidence, 0.5);
        assert!(!cfg.detector.flip_horizontal);

        clear_keys(managed_keys());
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "bad");
        env::set_var("TARGET_HANDEDNESS", "both");
        env::set_var("MAX_FRAME_BYTES", "-1");
        env::set_var("DETECTOR_MOCK", "maybe");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.target_handedness, Handedness::Right);
        assert_eq!(cfg.limits.max_frame_bytes, 2 * 1024 * 1024);
        assert!(cfg.detector.mock);

        clear_keys(managed_keys());
    }
}
