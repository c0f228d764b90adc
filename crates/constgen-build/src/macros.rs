/// Build-script entry point: run the constgen pipeline into `OUT_DIR`.
///
/// Takes the config path (default `constgen.toml`), relative to the crate
/// being built. Must be called from a function returning a `Result` whose
/// error type accepts `GenerateError`.
#[macro_export]
macro_rules! build {
    () => {
        $crate::build!($crate::config::DEFAULT_CONFIG_FILE)
    };

    ($config:expr) => {
        //
        // CARGO
        //
        // rerun when the script, the config or any registry manifest changes;
        // the manifest lines are printed by the pipeline once the config
        // has been read
        //

        println!("cargo:rerun-if-changed=build.rs");

        //
        // ARTIFACTS
        //

        $crate::build_script(::std::path::Path::new($config))?;
    };
}
