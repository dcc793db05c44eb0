//! Conversion of loosely typed JS arguments into controller types.

use boutique_core::{ControllerConfig, Severity};

/// Build a configuration from the JSON text of the optional `config`
/// argument. `None` (JS `undefined`/`null`) yields the defaults.
pub fn config_from_json(json: Option<&str>) -> Result<ControllerConfig, String> {
    match json.map(str::trim) {
        None | Some("") | Some("null") => Ok(ControllerConfig::default()),
        Some(text) => {
            ControllerConfig::from_json(text).map_err(|err| format!("invalid config: {err}"))
        }
    }
}

/// Severity argument of `notify`; omitted means `info`.
#[must_use]
pub fn severity_from_arg(raw: Option<&str>) -> Severity {
    raw.map_or(Severity::Info, Severity::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boutique_core::CountOrdering;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_config_is_default() {
        assert_eq!(config_from_json(None), Ok(ControllerConfig::default()));
        assert_eq!(config_from_json(Some("null")), Ok(ControllerConfig::default()));
    }

    #[test]
    fn config_object_overrides_fields() {
        let config =
            config_from_json(Some(r#"{"count_ordering":"latest_request","reload_delay_ms":0}"#))
                .expect("valid config");
        assert_eq!(config.count_ordering, CountOrdering::LatestRequest);
        assert_eq!(config.reload_delay_ms, 0);
    }

    #[test]
    fn malformed_config_reports_reason() {
        let err = config_from_json(Some(r#"{"reload_delay_ms":"soon"}"#)).unwrap_err();
        assert!(err.starts_with("invalid config:"), "{err}");
    }

    #[test]
    fn severity_argument() {
        assert_eq!(severity_from_arg(None), Severity::Info);
        assert_eq!(severity_from_arg(Some("success")), Severity::Success);
        assert_eq!(severity_from_arg(Some("error")), Severity::Error);
        assert_eq!(severity_from_arg(Some("warn")), Severity::Info);
    }
}
