//! Simulator device types and runtimes reported by `xcrun simctl`

use crate::runtime::tool::XCRUN;
use crate::runtime::ToolInvoker;
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceType {
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub product_family: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runtime {
    pub name: String,
    pub version: String,
    pub identifier: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
}

fn available_by_default() -> bool {
    true
}

impl Runtime {
    /// Older Xcode releases omit `platform`; the name carries it instead
    pub fn is_ios(&self) -> bool {
        match &self.platform {
            Some(platform) => platform == "iOS",
            None => self.name.starts_with("iOS "),
        }
    }
}

#[derive(Deserialize)]
struct DeviceTypeList {
    devicetypes: Vec<DeviceType>,
}

#[derive(Deserialize)]
struct RuntimeList {
    runtimes: Vec<Runtime>,
}

pub fn parse_device_types(json: &str) -> Result<Vec<DeviceType>> {
    let list: DeviceTypeList =
        serde_json::from_str(json).context("Failed to parse simulator device type list")?;
    Ok(list.devicetypes)
}

/// Available iOS runtimes only
pub fn parse_ios_runtimes(json: &str) -> Result<Vec<Runtime>> {
    let list: RuntimeList =
        serde_json::from_str(json).context("Failed to parse simulator runtime list")?;
    Ok(list
        .runtimes
        .into_iter()
        .filter(|r| r.is_available && r.is_ios())
        .collect())
}

pub fn device_types(invoker: &ToolInvoker<'_>) -> Result<Vec<DeviceType>> {
    let output = invoker.capture(&XCRUN, &["simctl", "list", "devicetypes", "-j"])?;
    parse_device_types(&output.stdout)
}

pub fn ios_runtimes(invoker: &ToolInvoker<'_>) -> Result<Vec<Runtime>> {
    let output = invoker.capture(&XCRUN, &["simctl", "list", "runtimes", "-j"])?;
    parse_ios_runtimes(&output.stdout)
}

/// Up to `limit` device names of the same family as `attempted`
///
/// The family is "iPhone" or "iPad" when the attempted name mentions it;
/// otherwise devices of either family qualify.
pub fn suggestions(devices: &[DeviceType], attempted: &str, limit: usize) -> Vec<String> {
    let families: &[&str] = if attempted.contains("iPhone") {
        &["iPhone"]
    } else if attempted.contains("iPad") {
        &["iPad"]
    } else {
        &["iPhone", "iPad"]
    };

    devices
        .iter()
        .filter(|d| families.iter().any(|family| d.name.contains(family)))
        .map(|d| d.name.clone())
        .take(limit)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const DEVICE_TYPES: &str = r#"{
  "devicetypes" : [
    { "productFamily" : "iPhone", "identifier" : "com.apple.CoreSimulator.SimDeviceType.iPhone-14", "name" : "iPhone 14" },
    { "productFamily" : "iPhone", "identifier" : "com.apple.CoreSimulator.SimDeviceType.iPhone-15", "name" : "iPhone 15" },
    { "productFamily" : "iPhone", "identifier" : "com.apple.CoreSimulator.SimDeviceType.iPhone-15-Plus", "name" : "iPhone 15 Plus" },
    { "productFamily" : "iPad", "identifier" : "com.apple.CoreSimulator.SimDeviceType.iPad-Air-5th-generation", "name" : "iPad Air (5th generation)" },
    { "productFamily" : "Apple Watch", "identifier" : "com.apple.CoreSimulator.SimDeviceType.Apple-Watch-Series-9-45mm", "name" : "Apple Watch Series 9 (45mm)" }
  ]
}"#;

    pub const RUNTIMES: &str = r#"{
  "runtimes" : [
    { "name" : "iOS 16.4", "version" : "16.4", "identifier" : "com.apple.CoreSimulator.SimRuntime.iOS-16-4", "platform" : "iOS", "isAvailable" : true },
    { "name" : "iOS 17.2", "version" : "17.2", "identifier" : "com.apple.CoreSimulator.SimRuntime.iOS-17-2", "platform" : "iOS", "isAvailable" : true },
    { "name" : "iOS 18.0", "version" : "18.0", "identifier" : "com.apple.CoreSimulator.SimRuntime.iOS-18-0", "platform" : "iOS", "isAvailable" : false },
    { "name" : "watchOS 10.2", "version" : "10.2", "identifier" : "com.apple.CoreSimulator.SimRuntime.watchOS-10-2", "platform" : "watchOS", "isAvailable" : true }
  ]
}"#;
}
