//! Saved node configurations.
//!
//! A preset names a node kind, its settings, and parameter values keyed by
//! identifier rather than address, so a file stays readable and survives
//! parameters being reordered. Optional automation lanes ride along.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::automation::{Automation, AutomationEvent, AutomationLane};
use crate::error::{Error, Result};
use crate::nodes::param::{self, ParameterDef};
use crate::nodes::{create_node_with, DspNode, NodeKind, NodeSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePreset {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub settings: NodeSettings,
    #[serde(default)]
    pub values: BTreeMap<String, f32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub automation: BTreeMap<String, Vec<AutomationEvent>>,
}

impl NodePreset {
    /// Empty preset: every parameter at its default.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            settings: NodeSettings::default(),
            values: BTreeMap::new(),
            automation: BTreeMap::new(),
        }
    }

    /// Snapshot the current targets of `node`.
    pub fn capture(name: impl Into<String>, node: &dyn DspNode) -> Result<Self> {
        let mut preset = Self::new(name, node.kind());
        preset.settings = node.core().settings();
        for def in node.parameters() {
            preset
                .values
                .insert(def.identifier.to_string(), node.get_parameter(def.address)?);
        }
        Ok(preset)
    }

    pub fn with_value(mut self, identifier: impl Into<String>, value: f32) -> Self {
        self.values.insert(identifier.into(), value);
        self
    }

    fn lookup(&self, identifier: &str) -> Result<&'static ParameterDef> {
        param::find_by_identifier(self.kind.parameters(), identifier).ok_or_else(|| {
            Error::invalid(format!("{} has no parameter '{identifier}'", self.kind))
        })
    }

    /// Set every stored value on `node`, jumping rather than ramping.
    pub fn apply(&self, node: &mut dyn DspNode) -> Result<()> {
        if node.kind() != self.kind {
            return Err(Error::invalid(format!(
                "preset '{}' is for {}, not {}",
                self.name,
                self.kind,
                node.kind()
            )));
        }
        for (identifier, &value) in &self.values {
            let def = self.lookup(identifier)?;
            node.set_parameter(def.address, value, true)?;
        }
        tracing::debug!(preset = %self.name, kind = %self.kind, values = self.values.len(), "preset applied");
        Ok(())
    }

    /// Fresh uninitialized node configured by this preset.
    pub fn instantiate(&self) -> Result<Box<dyn DspNode>> {
        let mut node = create_node_with(self.kind, NodeSettings::with_ramp_seconds(self.settings.ramp_seconds)?);
        self.apply(node.as_mut())?;
        Ok(node)
    }

    /// Automation lanes with identifiers resolved to addresses. Curved
    /// events start from the preset's stored value for that parameter, or
    /// its default.
    pub fn automation(&self) -> Result<Automation> {
        let mut automation = Automation::new();
        for (identifier, events) in &self.automation {
            let def = self.lookup(identifier)?;
            // Re-validate what came off the wire
            events.iter().try_for_each(AutomationEvent::validate)?;
            let initial = self.values.get(identifier).copied().unwrap_or(def.default);
            automation.add_lane(AutomationLane::with_curves(def.address, initial, events.clone())?);
        }
        Ok(automation)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let preset = Self::from_json(&json)?;
        tracing::debug!(path = %path.as_ref().display(), preset = %preset.name, "preset loaded");
        Ok(preset)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
