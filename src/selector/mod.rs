//! Per-file analyzer options.
//!
//! Every file gets the base options; files recognized by path as URL
//! routing modules, admin modules or test modules get one extra layer
//! of overrides on top.

use crate::models::FileConfiguration;
use std::path::Path;

const BASE_OPTIONS: &[(&str, &str)] = &[
    ("--include-ids", "yes"),
    ("--no-docstring-rgx", "__.*__|get_absolute_url"),
    ("--good-names", "i,j,k,v,qs,urlpatterns,register"),
    (
        "--generated-members",
        "objects,DoesNotExist,id,pk,_default_manager,_meta",
    ),
];

/// ModelAdmin already exposes 37 public methods.
const MAX_PUBLIC_METHODS: &str = "40";

/// Wildcard import, unused wildcard import, missing docstring.
const URLS_DISABLED: &str = "W0614,W0401,C0111";

const MISSING_DOCSTRING: &str = "C0111";

const TEST_METHOD_RGX: &str = "[a-zA-Z0-9]+$";

const TEST_GOOD_NAMES: &str = "r,c";

/// Kind of module, as far as option overrides are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Default,
    Urls,
    Admin,
    Tests,
}

impl Role {
    /// Classify a path. The first matching role wins.
    pub fn detect(path: &str) -> Self {
        if path.contains("urls") {
            Role::Urls
        } else if path.ends_with("admin.py") {
            Role::Admin
        } else if path.contains("tests") {
            Role::Tests
        } else {
            Role::Default
        }
    }

    fn apply(self, cfg: &mut FileConfiguration) {
        match self {
            Role::Default => {}
            Role::Urls => cfg.set("--disable-msg", URLS_DISABLED),
            Role::Admin => cfg.set("--max-public-methods", MAX_PUBLIC_METHODS),
            Role::Tests => {
                cfg.set("--max-public-methods", MAX_PUBLIC_METHODS);
                cfg.set("--method-rgx", TEST_METHOD_RGX);
                let good_names = match cfg.get("--good-names") {
                    Some(base) => format!("{},{}", base, TEST_GOOD_NAMES),
                    None => TEST_GOOD_NAMES.to_string(),
                };
                cfg.set("--good-names", good_names);
                cfg.set("--disable-msg", MISSING_DOCSTRING);
            }
        }
    }
}

/// Builds the option set for each candidate file.
#[derive(Debug, Clone)]
pub struct ConfigSelector {
    base: FileConfiguration,
}

impl Default for ConfigSelector {
    fn default() -> Self {
        let mut base = FileConfiguration::new();
        for (key, value) in BASE_OPTIONS {
            base.set(*key, *value);
        }
        Self { base }
    }
}

impl ConfigSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the file at `path`.
    pub fn select(&self, path: &Path) -> FileConfiguration {
        let role = Role::detect(&path.to_string_lossy());
        let mut cfg = self.base.clone();
        role.apply(&mut cfg);
        cfg
    }
}
