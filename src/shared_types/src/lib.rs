//! Foreign-language bindings for the AgriBot core are generated by `build.rs`
//! into `generated/`.
