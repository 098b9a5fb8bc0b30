//! Exchange configuration, validation, and error types.
//!
//! [`ExchangeConfig`] is the builder-input for a [`HaloExchanger`].
//! [`validate()`](ExchangeConfig::validate) checks what can be checked
//! without a pool; [`build()`](ExchangeConfig::build) computes the
//! partition geometry for the context's worker and constructs the
//! exchanger.

use std::error::Error;
use std::fmt;

use halo_core::Axis;
use halo_space::{GeometryError, Layout, PartitionGeometry};
use halo_transport::Transport;

use crate::context::CommContext;
use crate::exchanger::HaloExchanger;
use crate::policy::ExchangePolicy;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating or building an [`ExchangeConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Partition geometry could not be computed.
    Geometry(GeometryError),
    /// `directions_per_cell` is zero.
    NoDirections,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(e) => write!(f, "geometry: {e}"),
            Self::NoDirections => write!(f, "directions_per_cell must be at least 1"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Geometry(e) => Some(e),
            Self::NoDirections => None,
        }
    }
}

impl From<GeometryError> for ConfigError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

// ── ExchangeConfig ─────────────────────────────────────────────────

/// Everything needed to build a [`HaloExchanger`] for one worker.
///
/// The same config is handed to every worker in a pool; only the
/// [`CommContext`] differs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Strips or a two-row grid. Default: [`Layout::Split1D`].
    pub layout: Layout,
    /// Transfer ordering. Default: [`ExchangePolicy::ParityBlocking`].
    pub policy: ExchangePolicy,
    /// Values per cell. Default: 9 (D2Q9 lattice).
    pub directions_per_cell: usize,
    /// Global mesh width in cells, ghosts excluded. Default: 800.
    pub total_width: usize,
    /// Global mesh height in cells, ghosts excluded. Default: 160.
    pub total_height: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Split1D,
            policy: ExchangePolicy::ParityBlocking,
            directions_per_cell: 9,
            total_width: 800,
            total_height: 160,
        }
    }
}

impl ExchangeConfig {
    /// Check pool-independent invariants.
    ///
    /// Pool-dependent checks (pool parity, domain large enough for the
    /// partition count) run in [`build()`](Self::build).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directions_per_cell == 0 {
            return Err(ConfigError::NoDirections);
        }
        if self.total_width == 0 {
            return Err(GeometryError::EmptyDomain { axis: Axis::X }.into());
        }
        if self.total_height == 0 {
            return Err(GeometryError::EmptyDomain { axis: Axis::Y }.into());
        }
        Ok(())
    }

    /// Geometry of `ctx`'s partition under this config.
    pub fn geometry<T: Transport>(&self, ctx: &CommContext<T>) -> Result<PartitionGeometry, ConfigError> {
        self.validate()?;
        Ok(PartitionGeometry::compute(
            self.layout,
            self.total_width,
            self.total_height,
            ctx.rank().index(),
            ctx.pool_size(),
        )?)
    }

    /// Validate, compute the geometry, and construct the exchanger.
    pub fn build<T: Transport>(&self, ctx: &CommContext<T>) -> Result<HaloExchanger, ConfigError> {
        let geometry = self.geometry(ctx)?;
        Ok(HaloExchanger::new(
            geometry,
            self.policy,
            self.directions_per_cell,
        ))
    }
}
