use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item};

/// The dependencies of the crate invoking a proc-macro, used to find the path
/// generated code must use to reach another workspace crate.
///
/// # Example
///
/// ```rust, no_run
/// # use vc_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_serial"));
/// ```
///
/// # Resolution rules
///
/// Dependencies are matched by package name, so renamed dependencies
/// (`serial = { package = "vc_serial", .. }`) resolve to the name used in code.
///
/// 1. If the requested crate is a dependency, return `::name_in_code`.
/// 2. If the requested name starts with `vc_` and the facade crate `vc_data`
///    is a dependency, return `::vc_data::short_name` (`vc_serial` becomes
///    `::vc_data::serial`).
/// 3. Repeat 1-2 with `dev-dependencies`.
/// 4. Otherwise fall back to `::name`.
///
/// A crate whose own macros are used inside it should declare
/// `extern crate self as name;` so the fallback resolves.
#[derive(Debug)]
pub struct Manifest {
    /// Package name to the name used in code.
    dependencies: BTreeMap<String, String>,
    dev_dependencies: BTreeMap<String, String>,
    modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_data";
const CRATE_PREFIX: &str = "vc_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be set by cargo");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
        std::fs::metadata(path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn load(path: &Path, modified_time: SystemTime) -> Self {
        let source = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        let document = Document::parse(source)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()));

        Self {
            dependencies: Self::collect(document.get("dependencies")),
            dev_dependencies: Self::collect(document.get("dev-dependencies")),
            modified_time,
        }
    }

    fn collect(section: Option<&Item>) -> BTreeMap<String, String> {
        let Some(Item::Table(deps)) = section else {
            return BTreeMap::new();
        };

        deps.iter()
            .map(|(name, item)| {
                let package = item.get("package").and_then(Item::as_str).unwrap_or(name);
                (package.to_owned(), name.replace('-', "_"))
            })
            .collect()
    }

    fn parse_path(path: &str) -> syn::Path {
        syn::parse_str(path).unwrap_or_else(|e| panic!("invalid crate path `{path}`: {e}"))
    }

    fn find_in(deps: &BTreeMap<String, String>, name: &str) -> Option<syn::Path> {
        if let Some(alias) = deps.get(name) {
            return Some(Self::parse_path(&format!("::{alias}")));
        }

        let module = name.strip_prefix(CRATE_PREFIX)?;
        let facade = deps.get(FACADE_NAME)?;
        Some(Self::parse_path(&format!("::{facade}::{module}")))
    }

    /// Path to the package named `name` as seen from the invoking crate. See
    /// the type documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        Self::find_in(&self.dependencies, name)
            .or_else(|| Self::find_in(&self.dev_dependencies, name))
            .unwrap_or_else(|| Self::parse_path(&format!("::{name}")))
    }

    /// Runs `func` with the manifest of the invoking crate.
    ///
    /// Manifests are cached per path and reloaded when the file changes.
    /// Still call this once per macro invocation and reuse the result.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time =
            Self::modified_time(&path).expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = manifests.get(&path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }
        drop(manifests);

        let manifest = Self::load(&path, modified_time);
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Manifest;
    use std::collections::BTreeMap;
    use std::time::SystemTime;

    use quote::ToTokens;

    fn manifest(deps: &[(&str, &str)]) -> Manifest {
        Manifest {
            dependencies: deps
                .iter()
                .map(|&(package, name)| (package.to_owned(), name.to_owned()))
                .collect(),
            dev_dependencies: BTreeMap::new(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    fn path(manifest: &Manifest, name: &str) -> String {
        manifest
            .get_crate_path(name)
            .to_token_stream()
            .to_string()
            .replace(' ', "")
    }

    #[test]
    fn direct_dependency() {
        let m = manifest(&[("vc_serial", "vc_serial"), ("vc_data", "vc_data")]);
        assert_eq!(path(&m, "vc_serial"), "::vc_serial");
    }

    #[test]
    fn through_facade() {
        let m = manifest(&[("vc_data", "data")]);
        assert_eq!(path(&m, "vc_serial"), "::data::serial");
        assert_eq!(path(&m, "serde"), "::serde");
    }

    #[test]
    fn fallback() {
        let m = manifest(&[]);
        assert_eq!(path(&m, "vc_serial"), "::vc_serial");
    }
}
