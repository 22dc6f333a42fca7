//! Default configuration values

/// Command expanding spec macros into literal directives
pub const EXPAND_COMMAND: &str = "rpmspec";

/// Repository definition pointing yum at freshly built packages
pub const LOCAL_REPO_CONFIG: &str = "/etc/yum.repos.d/local.repo";

/// Name of the `[section]` in the local repository definition
pub const LOCAL_REPO_ID: &str = "local";

/// `_build_name_fmt` handed to rpmbuild; the `%%` survive `--define`
pub const BUILD_NAME_FMT: &str = "%%{NAME}-%%{VERSION}-%%{RELEASE}.%%{ARCH}.rpm";

/// Subdirectory of the build root receiving downloaded sources
pub const SOURCES_SUBDIR: &str = "SOURCES";

/// File extension of package descriptors
pub const SPEC_EXTENSION: &str = "spec";

/// Environment variable naming the GitHub Actions output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Output key listing successfully built spec paths
pub const SUCCESSFUL_OUTPUT_KEY: &str = "successful";

/// Tools the build driver invokes
pub const REQUIRED_TOOLS: &[&str] = &["rpmspec", "rpmbuild", "spectool", "yum-builddep"];

/// Tools needed only for the local repository and extra packages
pub const REPO_TOOLS: &[&str] = &["createrepo", "yum"];
