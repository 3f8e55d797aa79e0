fn main() {
    println!("cargo:rerun-if-changed=src/trampoline.c");

    cc::Build::new()
        .file("src/trampoline.c")
        .flag_if_supported("--std=c99")
        .flag_if_supported("-Wall")
        .flag_if_supported("-Wextra")
        .flag_if_supported("-pedantic")
        .opt_level(3)
        .flag_if_supported("-flto")
        .flag_if_supported("-ffat-lto-objects")
        .compile("stackpad_trampoline");
}
