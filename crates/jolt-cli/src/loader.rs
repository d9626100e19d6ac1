//! Loader names accepted at the CLI boundary.

/// How an input file's contents are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Loader {
    Base64,
    Binary,
    Copy,
    Css,
    DataUrl,
    #[default]
    Default,
    Empty,
    File,
    GlobalCss,
    Js,
    Json,
    Jsx,
    LocalCss,
    Text,
    Ts,
    Tsx,
}

/// `(name, loader)` pairs in the order shown in error messages.
pub const LOADER_NAMES: &[(&str, Loader)] = &[
    ("base64", Loader::Base64),
    ("binary", Loader::Binary),
    ("copy", Loader::Copy),
    ("css", Loader::Css),
    ("dataurl", Loader::DataUrl),
    ("default", Loader::Default),
    ("empty", Loader::Empty),
    ("file", Loader::File),
    ("global-css", Loader::GlobalCss),
    ("js", Loader::Js),
    ("json", Loader::Json),
    ("jsx", Loader::Jsx),
    ("local-css", Loader::LocalCss),
    ("text", Loader::Text),
    ("ts", Loader::Ts),
    ("tsx", Loader::Tsx),
];

impl Loader {
    /// Parse a loader name. Unknown names get an error enumerating the
    /// valid values.
    pub fn from_name(name: &str) -> Result<Loader, String> {
        match LOADER_NAMES.iter().find(|(n, _)| *n == name) {
            Some((_, loader)) => Ok(*loader),
            None => {
                let valid: Vec<&str> = LOADER_NAMES.iter().map(|(n, _)| *n).collect();
                Err(format!(
                    "Invalid loader value: {name:?} (valid: {})",
                    valid.join(", ")
                ))
            }
        }
    }

    /// Infer a loader from a file extension, as the `default` loader does.
    pub fn for_extension(ext: &str) -> Loader {
        match ext {
            ".js" | ".mjs" | ".cjs" => Loader::Js,
            ".jsx" => Loader::Jsx,
            ".ts" | ".mts" | ".cts" => Loader::Ts,
            ".tsx" => Loader::Tsx,
            ".css" => Loader::Css,
            ".module.css" => Loader::LocalCss,
            ".json" => Loader::Json,
            ".txt" => Loader::Text,
            _ => Loader::Default,
        }
    }

    /// Does this loader feed the JS lexer?
    #[must_use]
    pub const fn is_script(self) -> bool {
        matches!(self, Loader::Js | Loader::Jsx | Loader::Ts | Loader::Tsx)
    }
}
