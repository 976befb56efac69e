use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use mdns_sd::{ServiceDaemon, ServiceEvent};

use crate::controller::{CastController, CastDevice};
use crate::device::{DeviceInfo, CAST_SERVICE_TYPE};
use crate::error::{CastError, Result};

/// Source of playback devices
pub trait Discover {
    type Device: CastDevice;

    /// Return every device that answered during the discovery window
    fn discover_all(&mut self) -> Result<Vec<Self::Device>>;

    /// Release discovery resources. Safe to call more than once.
    fn stop_discovery(&mut self);
}

/// Discovery service for finding Cast receivers over mDNS
pub struct MdnsDiscovery {
    timeout: Duration,
    daemon: Option<ServiceDaemon>,
}

impl MdnsDiscovery {
    /// Create a new discovery service that browses for `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            daemon: None,
        }
    }

    /// Browse for receivers and collect their advertisements
    pub fn browse(&mut self) -> Result<Vec<DeviceInfo>> {
        self.stop_discovery();

        let daemon = ServiceDaemon::new().map_err(|e| {
            CastError::DiscoveryFailed(format!("Failed to create mDNS daemon: {}", e))
        })?;
        let receiver = daemon
            .browse(CAST_SERVICE_TYPE)
            .map_err(|e| CastError::DiscoveryFailed(format!("mDNS browse failed: {}", e)))?;
        self.daemon = Some(daemon);

        debug!("Browsing for {} for {:?}", CAST_SERVICE_TYPE, self.timeout);

        let deadline = Instant::now() + self.timeout;
        let mut devices = Vec::new();
        let mut seen_names = HashSet::new();

        while let Ok(event) = receiver.recv_deadline(deadline) {
            match event {
                ServiceEvent::ServiceResolved(service) => {
                    let Some(device) = DeviceInfo::from_service(&service) else {
                        debug!("Skipping {} without address", service.get_fullname());
                        continue;
                    };

                    // Receivers answer on every interface, keep the first answer
                    if seen_names.insert(device.name.clone()) {
                        debug!("Discovered {}", device);
                        devices.push(device);
                    }
                }
                ServiceEvent::ServiceRemoved(_, fullname) => {
                    debug!("Receiver removed: {}", fullname);
                }
                _ => {}
            }
        }

        Ok(devices)
    }
}

impl Discover for MdnsDiscovery {
    type Device = CastController;

    fn discover_all(&mut self) -> Result<Vec<CastController>> {
        let devices = self.browse()?;
        Ok(devices.into_iter().map(CastController::new).collect())
    }

    fn stop_discovery(&mut self) {
        let Some(daemon) = self.daemon.take() else {
            return;
        };

        if let Err(e) = daemon.stop_browse(CAST_SERVICE_TYPE) {
            debug!("Failed to stop browsing: {}", e);
        }
        match daemon.shutdown() {
            Ok(_) => info!("mDNS discovery stopped"),
            Err(e) => warn!("Failed to shut down mDNS daemon: {}", e),
        }
    }
}

impl Drop for MdnsDiscovery {
    fn drop(&mut self) {
        self.stop_discovery();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_new() {
        let timeout = Duration::from_secs(5);
        let discovery = MdnsDiscovery::new(timeout);
        assert_eq!(discovery.timeout, timeout);
        assert!(discovery.daemon.is_none());
    }

    #[test]
    fn test_stop_discovery_without_browse_is_noop() {
        let mut discovery = MdnsDiscovery::new(Duration::from_millis(100));
        discovery.stop_discovery();
        discovery.stop_discovery();
        assert!(discovery.daemon.is_none());
    }
}
