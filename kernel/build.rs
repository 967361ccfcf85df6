use std::env;

fn main() {
    println!("cargo:rerun-if-changed=linker.ld");

    // The linker script only applies to the bare-metal image
    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("aarch64")
        && env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none")
    {
        let dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
        println!("cargo:rustc-link-arg-bins=-T{}/linker.ld", dir);
    }
}
