use anyhow::{Context, Result};
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};

#[derive(Debug)]
pub struct WifiNetwork<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
    pub auth_method: AuthMethod,
}

impl<'a> WifiNetwork<'a> {
    pub const fn new(ssid: &'a str, password: &'a str) -> Self {
        Self {
            ssid,
            password,
            auth_method: if password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
        }
    }
}

/// Station-mode connection kept alive for the HTTP server
pub struct WifiManager {
    wifi: BlockingWifi<EspWifi<'static>>,
}

impl WifiManager {
    pub fn new(modem: Modem, sys_loop: EspSystemEventLoop) -> Result<Self> {
        let nvs = EspDefaultNvsPartition::take()?;
        let wifi = BlockingWifi::wrap(
            EspWifi::new(modem, sys_loop.clone(), Some(nvs))?,
            sys_loop,
        )?;
        Ok(Self { wifi })
    }

    /// Join the first of `networks` that shows up in a scan
    pub fn connect(&mut self, networks: &[WifiNetwork<'_>]) -> Result<()> {
        let available = self.scan_networks()?;
        info!("Found {} available networks", available.len());

        for network in networks {
            if !available.iter().any(|ssid| ssid == network.ssid) {
                continue;
            }
            info!("Attempting to connect to network: {}", network.ssid);
            match self.connect_to_network(network) {
                Ok(()) => {
                    if let Ok(ip_info) = self.wifi.wifi().sta_netif().get_ip_info() {
                        info!("Connected to {}, IP: {}", network.ssid, ip_info.ip);
                    }
                    return Ok(());
                }
                Err(e) => warn!("Failed to connect to {}: {:?}", network.ssid, e),
            }
        }

        Err(anyhow::anyhow!("No known networks available"))
    }

    fn scan_networks(&mut self) -> Result<Vec<String>> {
        self.wifi
            .set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
        self.wifi.start()?;

        let ap_infos = self.wifi.scan()?;
        Ok(ap_infos.iter().map(|ap| ap.ssid.as_str().to_string()).collect())
    }

    fn connect_to_network(&mut self, network: &WifiNetwork<'_>) -> Result<()> {
        let wifi_config = Configuration::Client(ClientConfiguration {
            ssid: network
                .ssid
                .try_into()
                .map_err(|_| anyhow::anyhow!("SSID too long"))?,
            password: network
                .password
                .try_into()
                .map_err(|_| anyhow::anyhow!("password too long"))?,
            auth_method: network.auth_method,
            ..Default::default()
        });

        self.wifi.set_configuration(&wifi_config)?;
        self.wifi.connect().context("associating")?;
        self.wifi.wait_netif_up().context("waiting for DHCP")?;
        Ok(())
    }
}
