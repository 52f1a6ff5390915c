//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }

    pub fn repo() -> String {
        "".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "pages".into()
    }

    pub fn demos_dir() -> String {
        "demos".into()
    }

    pub fn output() -> PathBuf {
        "build".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub mod css {
        use std::path::PathBuf;

        pub fn input() -> PathBuf {
            "css/main.css".into()
        }

        pub fn command() -> Option<Vec<String>> {
            None
        }
    }

    pub mod js {
        use std::path::PathBuf;

        pub fn entry() -> PathBuf {
            "javascript/main.js".into()
        }

        pub fn bundle_command() -> Vec<String> {
            vec!["esbuild".into()]
        }

        pub fn lint_command() -> Vec<String> {
            vec!["eslint".into()]
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        4000
    }
}

// ============================================================================
// [deploy] Section Defaults
// ============================================================================

pub mod deploy {
    pub fn provider() -> String {
        "github".into()
    }

    pub mod github {
        use std::path::PathBuf;

        pub fn url() -> String {
            "https://github.com/alice/alice.github.io".into()
        }

        pub fn branch() -> String {
            "gh-pages".into()
        }

        pub fn token_path() -> Option<PathBuf> {
            None
        }
    }
}
