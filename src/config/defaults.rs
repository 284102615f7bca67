//! Default configuration values

/// Relative path of the isolated environment directory
pub const ENV_DIR: &str = ".venv";

/// Relative path of the dependency manifest
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Internal identifier of the registered Jupyter kernel
pub const KERNEL_NAME: &str = "cdi-ml";

/// Display label of the registered Jupyter kernel
pub const KERNEL_DISPLAY_NAME: &str = "Python (CDI ML)";

/// Base interpreter used when no override is given
pub const DEFAULT_PYTHON: &str = "python3";

/// Environment variable selecting the base interpreter
pub const PYTHON_ENV_VAR: &str = "CDIML_PYTHON";

/// Environment variable overriding the Jupyter data directory
pub const JUPYTER_DATA_DIR_ENV: &str = "JUPYTER_DATA_DIR";

/// Minimum interpreter version the course notebooks support
pub const MIN_PYTHON_VERSION: &str = "3.9.0";
