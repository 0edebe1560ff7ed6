#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Small integer identifying a parameter within one node type.
pub type ParameterAddress = u64;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterUnit {
    Hertz,
    /// Signed or unsigned amount with no physical unit (depth, feedback).
    Generic,
    /// 0.0 = fully dry, 1.0 = fully wet.
    Mix,
    LinearGain,
}

/// One row of a node's parameter table.
///
/// Defaults and bounds are part of the preset contract: changing them
/// changes what saved presets sound like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDef {
    pub address: ParameterAddress,
    /// Stable machine-readable key used by presets and the CLI.
    pub identifier: &'static str,
    pub name: &'static str,
    pub unit: ParameterUnit,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    /// `false` means changes always apply immediately (discrete settings).
    pub ramped: bool,
}

impl ParameterDef {
    pub const fn ramped(
        address: ParameterAddress,
        identifier: &'static str,
        name: &'static str,
        unit: ParameterUnit,
        default: f32,
        min: f32,
        max: f32,
    ) -> Self {
        Self {
            address,
            identifier,
            name,
            unit,
            default,
            min,
            max,
            ramped: true,
        }
    }

    pub const fn stepped(
        address: ParameterAddress,
        identifier: &'static str,
        name: &'static str,
        unit: ParameterUnit,
        default: f32,
        min: f32,
        max: f32,
    ) -> Self {
        Self {
            ramped: false,
            ..Self::ramped(address, identifier, name, unit, default, min, max)
        }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Position of `address` in `params`, or `UnknownParameter`.
pub fn index_of(params: &[ParameterDef], address: ParameterAddress) -> Result<usize> {
    params
        .iter()
        .position(|def| def.address == address)
        .ok_or(Error::UnknownParameter { address })
}

pub fn find(params: &[ParameterDef], address: ParameterAddress) -> Result<&ParameterDef> {
    index_of(params, address).map(|index| &params[index])
}

pub fn find_by_identifier<'a>(
    params: &'a [ParameterDef],
    identifier: &str,
) -> Option<&'a ParameterDef> {
    params.iter().find(|def| def.identifier == identifier)
}
