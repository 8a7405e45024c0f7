pub mod load;
pub mod prepare;

use std::path::PathBuf;

use crate::config::{normalize_batch_size, EtlConfig};

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub raw_csv: Option<PathBuf>,
    pub prepared_csv: Option<PathBuf>,
    pub warehouse_path: Option<PathBuf>,
    pub batch_size: Option<usize>,
}

impl ConfigOverrides {
    pub fn resolve(&self) -> EtlConfig {
        let mut cfg = EtlConfig::from_env();
        if let Some(dir) = &self.data_dir {
            let from_dir = EtlConfig::from_data_dir(dir);
            cfg = EtlConfig {
                fact_batch_size: cfg.fact_batch_size,
                ..from_dir
            };
        }
        if let Some(p) = &self.raw_csv {
            cfg.raw_csv = p.clone();
        }
        if let Some(p) = &self.prepared_csv {
            cfg.prepared_csv = p.clone();
        }
        if let Some(p) = &self.warehouse_path {
            cfg.warehouse_path = p.clone();
        }
        if let Some(n) = self.batch_size {
            cfg.fact_batch_size = normalize_batch_size(n);
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_beat_data_dir() {
        let overrides = ConfigOverrides {
            data_dir: Some(PathBuf::from("/tmp/vg")),
            warehouse_path: Some(PathBuf::from("/tmp/other.sqlite")),
            batch_size: Some(0),
            ..ConfigOverrides::default()
        };
        let cfg = overrides.resolve();
        assert_eq!(cfg.raw_csv, PathBuf::from("/tmp/vg/raw/vgsales.csv"));
        assert_eq!(cfg.warehouse_path, PathBuf::from("/tmp/other.sqlite"));
        assert_eq!(cfg.fact_batch_size, crate::config::DEFAULT_FACT_BATCH_SIZE);
    }
}
