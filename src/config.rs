use clap::Parser;
use std::path::PathBuf;

use crate::generator::{DEFAULT_RECORD_COUNT, Generator};
use crate::viewport::{DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT, Viewport};

/// Runtime configuration shared by the web server and the terminal grid
///
/// Every flag can also be set through the matching `USERGRID_*` variable.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Synthetic user records in a windowed, sortable grid")]
pub struct Config {
    /// Record store file (.json or .bin.gz)
    #[arg(long, env = "USERGRID_STORE", default_value = "database/users.json")]
    pub store: PathBuf,

    /// Number of records to generate when the store is empty or regenerated
    #[arg(long, env = "USERGRID_COUNT", default_value_t = DEFAULT_RECORD_COUNT)]
    pub count: usize,

    /// Seed for reproducible generation
    #[arg(long, env = "USERGRID_SEED")]
    pub seed: Option<u64>,

    /// Address the web server listens on
    #[arg(long, env = "USERGRID_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    #[arg(long, env = "USERGRID_ROW_HEIGHT", default_value_t = DEFAULT_ROW_HEIGHT)]
    pub row_height: u32,

    #[arg(long, env = "USERGRID_VIEWPORT_HEIGHT", default_value_t = DEFAULT_VIEWPORT_HEIGHT)]
    pub viewport_height: u32,

    /// Extra rows rendered above and below the visible window
    #[arg(long, env = "USERGRID_OVERSCAN", default_value_t = DEFAULT_OVERSCAN)]
    pub overscan: usize,
}

impl Config {
    pub fn generator(&self) -> Generator {
        Generator::new(self.count, self.seed)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            row_height: self.row_height,
            height: self.viewport_height,
            overscan: self.overscan,
        }
    }
}
