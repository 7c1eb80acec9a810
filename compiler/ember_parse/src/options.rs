//! Per-compilation settings.

use std::path::Path;

/// Target triple used unless the caller asks for another.
pub const DEFAULT_TARGET_TRIPLE: &str = "x86_64-pc-linux-gnu";

/// Settings for one call to [`compile`](crate::compile).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Module identifier and `source_filename` of the emitted module.
    pub module_name: String,
    /// Name of the function treated as the program entry point.
    pub entry_point: String,
    /// Written into the module by backends that record one.
    pub target_triple: String,
}

impl CompileOptions {
    /// Options for compiling the file at `path`, named after its file name.
    pub fn for_path(path: &Path) -> Self {
        let module_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        CompileOptions {
            module_name,
            ..CompileOptions::default()
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            module_name: "main.em".to_string(),
            entry_point: "main".to_string(),
            target_triple: DEFAULT_TARGET_TRIPLE.to_string(),
        }
    }
}
