//! RPM build driver
//!
//! Builds packages with the usual RPM tooling: `yum-builddep` for build
//! dependencies, `spectool` for remote sources and `rpmbuild` for the build
//! itself. Built packages are published through a local yum repository so
//! later packages in the queue can install them as dependencies.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::defaults::{BUILD_NAME_FMT, LOCAL_REPO_ID, SOURCES_SUBDIR};
use crate::core::builder::BuildDriver;
use crate::core::descriptor::PackageDescriptor;
use crate::error::DriverError;
use crate::infra::actions::Group;
use crate::infra::filesystem;
use crate::infra::runner::{CommandRunner, Invocation};

/// Settings for [`RpmBuildDriver`]
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Pass `--nocheck` to rpmbuild
    pub nocheck: bool,
    /// Packages installed with yum before anything is built
    pub extra_packages: Vec<String>,
    /// Local repository definition path; `None` disables the repository
    pub repo_config_path: Option<PathBuf>,
    /// Directory scanned by createrepo for built packages
    pub repo_source_dir: PathBuf,
}

/// Local yum repository of freshly built packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepo {
    /// Directory scanned for RPMs
    pub source_dir: PathBuf,
    /// Repository metadata output directory
    pub output_dir: PathBuf,
    /// createrepo cache directory
    pub cache_dir: PathBuf,
}

impl LocalRepo {
    /// Allocate persistent temporary directories for a repository over `source_dir`
    pub fn allocate(source_dir: PathBuf) -> Result<Self, DriverError> {
        Ok(Self {
            source_dir,
            output_dir: persistent_temp_dir("yumrepo_")?,
            cache_dir: persistent_temp_dir("createrepo-cache_")?,
        })
    }

    /// `createrepo` invocation updating the repository metadata
    pub fn createrepo(&self) -> Invocation {
        Invocation::new("createrepo")
            .args(["-q", "-u"])
            .arg("-c")
            .arg(&self.cache_dir)
            .arg("-o")
            .arg(&self.output_dir)
            .arg(&self.source_dir)
    }

    /// Contents of the yum repository definition
    pub fn repo_definition(&self) -> String {
        format!(
            "[{LOCAL_REPO_ID}]\nname=Local development packages\nbaseurl=file://{}\nenabled=1\ngpgcheck=0\nprotect=1\npriority=1\n",
            self.output_dir.display()
        )
    }
}

fn persistent_temp_dir(prefix: &str) -> Result<PathBuf, DriverError> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .map(tempfile::TempDir::keep)
        .map_err(|e| DriverError::Io {
            path: std::env::temp_dir(),
            error: e.to_string(),
        })
}

/// Builds packages with rpmbuild
#[derive(Debug)]
pub struct RpmBuildDriver<R> {
    runner: R,
    options: DriverOptions,
    repo: Option<LocalRepo>,
}

impl<R: CommandRunner> RpmBuildDriver<R> {
    /// Create a driver running tools through `runner`
    pub fn new(runner: R, options: DriverOptions) -> Self {
        Self {
            runner,
            options,
            repo: None,
        }
    }

    /// The local repository, once prepared
    pub fn local_repo(&self) -> Option<&LocalRepo> {
        self.repo.as_ref()
    }

    fn install_extra_packages(&self) -> Result<(), DriverError> {
        let _group = Group::start("Installing extra packages");
        tracing::info!("Installing extra packages: {}", self.options.extra_packages.join(", "));

        self.runner.run(
            &Invocation::new("yum")
                .args(["-y", "install"])
                .args(self.options.extra_packages.iter().cloned()),
        )
    }

    fn create_local_repo(&mut self, config_path: &Path) -> Result<(), DriverError> {
        let _group = Group::start("Creating local repo");

        let repo = LocalRepo::allocate(self.options.repo_source_dir.clone())?;
        tracing::info!("Creating local repo in {}", repo.output_dir.display());

        self.runner.run(&repo.createrepo())?;
        self.clean_metadata()?;

        filesystem::write_file(config_path, &repo.repo_definition()).map_err(|e| {
            DriverError::Io {
                path: config_path.to_path_buf(),
                error: e.to_string(),
            }
        })?;

        self.repo = Some(repo);
        Ok(())
    }

    fn update_local_repo(&self) -> Result<(), DriverError> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };
        let _group = Group::start("Updating local repo");

        self.runner.run(&repo.createrepo())?;
        self.clean_metadata()
    }

    fn clean_metadata(&self) -> Result<(), DriverError> {
        self.runner
            .run(&Invocation::new("yum").args(["clean", "metadata"]))
    }

    fn install_build_deps(&self, descriptor: &PackageDescriptor) -> Result<(), DriverError> {
        let _group = Group::start(&format!(
            "Installing build dependencies for package \"{}\"",
            descriptor.name
        ));

        self.runner.run(
            &Invocation::new("yum-builddep")
                .arg("-y")
                .arg(&descriptor.source_path),
        )
    }

    /// Fetch remote sources into `<build_root>/SOURCES`
    ///
    /// spectool chokes on some unexpanded specs, so it is fed the expanded
    /// text through a temporary file.
    fn download_sources(&self, descriptor: &PackageDescriptor) -> Result<(), DriverError> {
        let _group = Group::start(&format!(
            "Downloading sources for package \"{}\"",
            descriptor.name
        ));

        let dest = descriptor.build_root.join(SOURCES_SUBDIR);
        filesystem::create_dir_all(&dest).map_err(|e| DriverError::Io {
            path: dest.clone(),
            error: e.to_string(),
        })?;

        let io_err = |e: std::io::Error| DriverError::Io {
            path: std::env::temp_dir(),
            error: e.to_string(),
        };
        let mut spec = tempfile::Builder::new()
            .prefix("spec-")
            .tempfile()
            .map_err(io_err)?;
        spec.write_all(descriptor.expanded_text.as_bytes())
            .and_then(|()| spec.flush())
            .map_err(io_err)?;

        self.runner.run(
            &Invocation::new("spectool")
                .arg("-g")
                .arg("-C")
                .arg(&dest)
                .arg(spec.path()),
        )
    }

    fn rpmbuild(&self, descriptor: &PackageDescriptor) -> Result<(), DriverError> {
        let _group = Group::start(&format!("Building package \"{}\"", descriptor.name));
        self.runner.run(&rpmbuild_invocation(descriptor, self.options.nocheck))
    }
}

/// `rpmbuild` invocation for `descriptor`
pub fn rpmbuild_invocation(descriptor: &PackageDescriptor, nocheck: bool) -> Invocation {
    let mut invocation = Invocation::new("rpmbuild").arg("-ba");
    if nocheck {
        invocation = invocation.arg("--nocheck");
    }
    invocation
        .arg(&descriptor.source_path)
        .arg("--define")
        .arg(format!("_topdir {}", descriptor.build_root.display()))
        .arg("--define")
        .arg(format!("_build_name_fmt {BUILD_NAME_FMT}"))
}

impl<R: CommandRunner> BuildDriver for RpmBuildDriver<R> {
    fn prepare(&mut self) -> Result<(), DriverError> {
        if !self.options.extra_packages.is_empty() {
            self.install_extra_packages()?;
        }

        if let Some(config_path) = self.options.repo_config_path.clone() {
            self.create_local_repo(&config_path)?;
        }

        Ok(())
    }

    fn build(&mut self, descriptor: &PackageDescriptor) -> Result<(), DriverError> {
        self.install_build_deps(descriptor)?;
        self.download_sources(descriptor)?;
        self.rpmbuild(descriptor)?;
        self.update_local_repo()
    }
}
