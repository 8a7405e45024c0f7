use std::path::{Path, PathBuf};

use crate::util::env as env_util;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_FACT_BATCH_SIZE: usize = 1000;

/// Environment keys read by [`EtlConfig::from_env`].
pub const ENV_KEYS: [&str; 5] = [
    "VGSALES_DATA_DIR",
    "VGSALES_RAW_CSV",
    "VGSALES_PREPARED_CSV",
    "VGSALES_DW_PATH",
    "VGSALES_FACT_BATCH_SIZE",
];

/// File locations and tuning for one run of either pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub raw_csv: PathBuf,
    pub prepared_csv: PathBuf,
    pub warehouse_path: PathBuf,
    /// Fact rows per insert batch; has no effect on the loaded data.
    pub fact_batch_size: usize,
}

impl EtlConfig {
    /// Standard layout under `data_dir`: `raw/`, `prepared/` and `dw/`.
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            raw_csv: data_dir.join("raw").join("vgsales.csv"),
            prepared_csv: data_dir.join("prepared").join("vgsales_cleaned.csv"),
            warehouse_path: data_dir.join("dw").join("video_games_dw.sqlite"),
            fact_batch_size: DEFAULT_FACT_BATCH_SIZE,
        }
    }

    /// Standard layout, with any `VGSALES_*` variables applied on top.
    pub fn from_env() -> Self {
        let data_dir = env_util::env_path("VGSALES_DATA_DIR")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let mut cfg = Self::from_data_dir(data_dir);
        if let Some(p) = env_util::env_path("VGSALES_RAW_CSV") {
            cfg.raw_csv = p;
        }
        if let Some(p) = env_util::env_path("VGSALES_PREPARED_CSV") {
            cfg.prepared_csv = p;
        }
        if let Some(p) = env_util::env_path("VGSALES_DW_PATH") {
            cfg.warehouse_path = p;
        }
        cfg.fact_batch_size =
            normalize_batch_size(env_util::env_parse("VGSALES_FACT_BATCH_SIZE", 0usize));
        cfg
    }
}

/// Zero means "use the default".
pub fn normalize_batch_size(requested: usize) -> usize {
    if requested == 0 {
        DEFAULT_FACT_BATCH_SIZE
    } else {
        requested
    }
}
