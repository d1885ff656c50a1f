//! Bluetooth module
//!
//! Advertises the watch, accepts one central at a time and reports every
//! connect and disconnect to the watchface.

// Core
use core::{
    mem,
    sync::atomic::{AtomicBool, Ordering},
};

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral,
    },
    raw, Config, Softdevice,
};

// Crate
use crate::EventSender;
use pinetime_wordclock::Event;

const DEVICE_NAME: &[u8] = b"WordClock";

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .full_name("WordClock")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .build();

/// Link state, readable before the first connectivity event arrives
static CONNECTED: AtomicBool = AtomicBool::new(false);

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

pub fn generate_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Current link state
pub fn is_connected() -> bool {
    CONNECTED.load(Ordering::Relaxed)
}

async fn set_connected(connected: bool, events: &EventSender) {
    CONNECTED.store(connected, Ordering::Relaxed);
    events.send(Event::ConnectivityChanged(connected)).await;
}

/// Advertise, serve a central until it leaves, repeat.
pub async fn run(sd: &'static Softdevice, server: &'static Server, events: EventSender) -> ! {
    let config = peripheral::Config::default();
    loop {
        let advertisement = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, advertisement, &config).await {
            Ok(conn) => conn,
            Err(err) => {
                defmt::warn!("Advertising failed: {:?}", err);
                continue;
            }
        };

        defmt::info!("Central connected");
        set_connected(true, &events).await;

        let err = gatt_server::run(&conn, server, |event| match event {
            ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
                defmt::debug!("Battery notifications: {}", notifications);
            }
        })
        .await;

        defmt::info!("Central disconnected: {:?}", err);
        set_connected(false, &events).await;
    }
}
