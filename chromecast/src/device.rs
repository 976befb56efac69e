use std::fmt;

use mdns_sd::ServiceInfo;

/// mDNS service type advertised by Google Cast receivers
pub const CAST_SERVICE_TYPE: &str = "_googlecast._tcp.local.";

/// Default CASTV2 control port
pub const DEFAULT_CAST_PORT: u16 = 8009;

/// A Cast receiver as advertised over mDNS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Friendly name shown in the Google Home app (e.g. "Living Room TV")
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Model name from the `md` TXT record (e.g. "Chromecast Ultra")
    pub model: Option<String>,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: DEFAULT_CAST_PORT,
            model: None,
        }
    }

    /// Build device info from a resolved mDNS service.
    ///
    /// The friendly name comes from the `fn` TXT record and falls back to the
    /// instance part of the service name. Returns `None` when the record
    /// carries no address.
    pub fn from_service(info: &ServiceInfo) -> Option<Self> {
        let host = info.get_addresses().iter().next()?.to_string();

        let name = info
            .get_properties()
            .get("fn")
            .map(|v| v.val_str().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| instance_name(info.get_fullname()).to_string());

        let model = info
            .get_properties()
            .get("md")
            .map(|v| v.val_str().to_string());

        let port = match info.get_port() {
            0 => DEFAULT_CAST_PORT,
            port => port,
        };

        Some(Self {
            name,
            host,
            port,
            model,
        })
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(model) = &self.model {
            write!(f, " ({})", model)?;
        }
        write!(f, " at {}:{}", self.host, self.port)
    }
}

/// Strip the service type from an mDNS full name
pub fn instance_name(fullname: &str) -> &str {
    fullname
        .strip_suffix(CAST_SERVICE_TYPE)
        .map(|name| name.trim_end_matches('.'))
        .unwrap_or(fullname)
}
