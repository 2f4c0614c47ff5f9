pub mod scripts {
    pub const SHEBANG: &str = "#!/bin/bash";

    /// Install directory of the grid server under test; every driver script
    /// starts by changing into it.
    pub const TEST_WORKDIR: &str = "/var/lib/grid";

    pub const RUNNER_CMD: &str = "python3 scripts/run_tests.py --xml_output";

    /// Literal placeholder rewritten by the test-executor pod before the
    /// script runs.
    pub const HOSTNAMES_PLACEHOLDER: &str = "TEST_HOST_NAMES";

    pub const DRIVER_SUFFIX: &str = "_test_list.sh";
}

pub mod forensics {
    pub const SERVER_LOG_DIR: &str = "/var/lib/grid/log";
    pub const TEST_REPORT_DIR: &str = "/var/lib/grid/test-reports";

    /// May not exist on every image; the copy is allowed to fail in-script.
    pub const SYSTEM_LOG_DIR: &str = "/var/log/grid";
}

pub mod archives {
    pub const RESULTS_SUFFIX: &str = "test-results";
    pub const ZIP_EXTENSION: &str = "zip";
}

pub mod modes {
    /// The test-executor pods run as a different user than the staging step.
    pub const RUN_DIR: u32 = 0o777;
    pub const DRIVER_SCRIPT: u32 = 0o777;
    pub const PACKAGED_ARCHIVE: u32 = 0o775;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_constants() {
        assert_eq!(scripts::SHEBANG, "#!/bin/bash");
        assert_eq!(scripts::DRIVER_SUFFIX, "_test_list.sh");
    }

    #[test]
    fn test_archive_constants() {
        assert_eq!(archives::RESULTS_SUFFIX, "test-results");
        assert_eq!(archives::ZIP_EXTENSION, "zip");
    }
}
