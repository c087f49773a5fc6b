use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Engine labels are not blank
/// - Export has at least one number field and unique, non-blank column keys
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let labels = [
        ("engine.default_note_type", &config.engine.default_note_type),
        (
            "engine.uncategorized_label",
            &config.engine.uncategorized_label,
        ),
        (
            "engine.unknown_authority_label",
            &config.engine.unknown_authority_label,
        ),
    ];
    for (name, value) in labels {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be blank",
                name
            )));
        }
    }

    if config.export.number_fields.is_empty() {
        return Err(ConfigError::ValidationError(
            "export.number_fields must name at least one field".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for column in &config.export.columns {
        let key = column.key.trim();
        if key.is_empty() {
            return Err(ConfigError::ValidationError(
                "export.columns entries need a key".to_string(),
            ));
        }
        if !seen.insert(key.to_string()) {
            return Err(ConfigError::ValidationError(format!(
                "export column '{}' is declared twice",
                key
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::export::ExportColumn;
    use std::net::IpAddr;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_blank_label_fails() {
        let mut config = Config::default();
        config.engine.uncategorized_label = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("engine.uncategorized_label"));
    }

    #[test]
    fn test_validate_duplicate_export_column_fails() {
        let mut config = Config::default();
        config.export.columns = vec![
            ExportColumn::mandatory("face_value", "Face Value"),
            ExportColumn::optional("face_value", "Denomination"),
        ];
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("face_value"));
    }

    #[test]
    fn test_validate_empty_number_fields_fails() {
        let mut config = Config::default();
        config.export.number_fields.clear();
        assert!(validate_config(&config).is_err());
    }
}
