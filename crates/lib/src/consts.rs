/// Application name, used for generated file headers and environment variables.
pub const APP_NAME: &str = "strata";

/// Default name of a build description file.
pub const BUILD_FILE_NAME: &str = "build.lua";

/// Default base output directory, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Environment variable overriding the base output directory.
pub const OUTPUT_DIR_ENV: &str = "STRATA_OUTPUT_DIR";

/// Name of the generated ninja file inside the output directory.
pub const NINJA_FILE_NAME: &str = "build.ninja";

/// Files with this suffix are Go test sources.
pub const TEST_FILE_SUFFIX: &str = "_test.go";

/// Length of the truncated graph hash.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;
