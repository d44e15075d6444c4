//! Links the PRU userspace library when real hardware support is enabled.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Default builds use the in-process mock and need no native code.
    if std::env::var_os("CARGO_FEATURE_FFI").is_some() {
        println!("cargo:rustc-link-lib=prussdrv");
    }
}
