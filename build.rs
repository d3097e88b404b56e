use std::env;

fn main() {
    // Only the firmware build links against ESP-IDF; host builds run the library tests.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    println!("cargo:rerun-if-env-changed=POMODESK_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=POMODESK_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=POMODESK_SET_TIME");
}
