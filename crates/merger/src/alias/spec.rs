use std::path::Path;

const URL_SCHEMES: [&str; 2] = ["http://", "https://"];

/// One source as given on the command line: `path[:alias]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Argument as typed, without the alias suffix and before base/postfix expansion
    pub raw: String,
    /// Fully resolved location (local path or URL)
    pub path: String,
    pub alias: Option<String>,
    pub is_remote: bool,
}

impl SourceSpec {
    /// Split an argument into location and optional alias.
    ///
    /// Local paths are split on the last `:` and expanded with
    /// `log_base` and `log_postfix`. URLs are left untouched: the scheme
    /// separator never delimits an alias, and neither does a port.
    pub fn parse(arg: &str, log_base: &str, log_postfix: &str) -> Self {
        if let Some(scheme) = URL_SCHEMES.iter().find(|scheme| arg.starts_with(*scheme)) {
            return Self::parse_url(arg, scheme.len());
        }

        let (head, alias) = match arg.rsplit_once(':') {
            Some((head, alias)) => (head, non_empty(alias)),
            None => (arg, None),
        };

        Self {
            raw: head.to_string(),
            path: format!("{log_base}{head}{log_postfix}"),
            alias,
            is_remote: false,
        }
    }

    fn parse_url(arg: &str, scheme_len: usize) -> Self {
        // An alias colon must come after the first '/' of the URL path,
        // otherwise it is the host:port separator.
        let path_start = arg[scheme_len..].find('/').map(|i| i + scheme_len);
        let split = arg.rfind(':').filter(|&colon| {
            path_start.is_some_and(|start| colon > start) && !arg[colon + 1..].contains('/')
        });

        let (url, alias) = match split {
            Some(colon) => (&arg[..colon], non_empty(&arg[colon + 1..])),
            None => (arg, None),
        };

        Self {
            raw: url.to_string(),
            path: url.to_string(),
            alias,
            is_remote: true,
        }
    }

    /// The argument with any URL scheme removed, as used for derived aliases.
    pub fn display_name(&self) -> &str {
        if self.is_remote {
            if let Some((_, rest)) = self.raw.split_once("://") {
                return rest;
            }
        }
        &self.raw
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }
}

fn non_empty(alias: &str) -> Option<String> {
    (!alias.is_empty()).then(|| alias.to_string())
}
