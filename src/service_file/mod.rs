//! Service File Writer: renders unit-definition files.

use std::io::Write;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{Error, Result, ValidationErrorKind};

/// Unit-file name suffix.
pub const UNIT_FILE_SUFFIX: &str = ".service";

/// Unit-file template. Optional keys are omitted when their field is empty.
const UNIT_TEMPLATE: &str = "\
[Unit]
Description={{ description }}
{% if after %}After={{ after }}
{% endif %}
[Service]
ExecStart={{ exec_start }}
{% if working_directory %}WorkingDirectory={{ working_directory }}
{% endif %}
[Install]
WantedBy=multi-user.target
";

/// Caller-supplied fields of a unit definition.
///
/// Only `exec_start` is required; the other fields are left out of the
/// rendered file when empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceDefinition {
    /// Command executed when the service starts (`ExecStart=`).
    pub exec_start: String,

    /// Working directory for executed processes (`WorkingDirectory=`).
    pub working_directory: String,

    /// Human-readable description (`Description=`).
    pub description: String,

    /// Units after which this service should start (`After=`).
    pub after: String,
}

impl ServiceDefinition {
    /// Check that all required fields have values.
    pub fn validate(&self) -> Result<()> {
        if self.exec_start.is_empty() {
            return Err(Error::Validation {
                kind: ValidationErrorKind::MissingField {
                    field: "exec_start",
                },
            });
        }
        Ok(())
    }

    /// Validate, then render the unit-file text.
    pub fn render(&self) -> Result<String> {
        self.validate()?;

        let context = Context::from_serialize(self).map_err(|e| Error::Template {
            message: format!("invalid template context: {}", e),
        })?;

        Tera::one_off(UNIT_TEMPLATE, &context, false).map_err(|e| Error::Template {
            message: format!("failed to render unit file: {}", e),
        })
    }

    /// Render the unit-file text and write it to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let text = self.render()?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }
}

/// Append the unit-file suffix unless already present. Idempotent.
pub fn normalize_unit_name(name: &str) -> String {
    if name.ends_with(UNIT_FILE_SUFFIX) {
        name.to_string()
    } else {
        format!("{}{}", name, UNIT_FILE_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_name() {
        assert_eq!(normalize_unit_name("foo"), "foo.service");
        assert_eq!(normalize_unit_name("foo.service"), "foo.service");
    }

    #[test]
    fn test_validate_requires_exec_start() {
        let err = ServiceDefinition::default().validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                kind: ValidationErrorKind::MissingField {
                    field: "exec_start"
                }
            }
        ));
    }

    #[test]
    fn test_validate_other_fields_optional() {
        let definition = ServiceDefinition {
            exec_start: "/usr/bin/date".to_string(),
            ..Default::default()
        };
        assert!(definition.validate().is_ok());
    }

    #[test]
    fn test_render_minimal_definition() {
        let definition = ServiceDefinition {
            exec_start: "/usr/bin/date".to_string(),
            description: "Just a test".to_string(),
            ..Default::default()
        };
        let text = definition.render().unwrap();

        assert_eq!(
            text,
            "[Unit]\n\
             Description=Just a test\n\
             \n\
             [Service]\n\
             ExecStart=/usr/bin/date\n\
             \n\
             [Install]\n\
             WantedBy=multi-user.target\n"
        );
    }

    #[test]
    fn test_render_full_definition() {
        let definition = ServiceDefinition {
            exec_start: "/usr/bin/myapp --serve".to_string(),
            working_directory: "/var/lib/myapp".to_string(),
            description: "My app".to_string(),
            after: "network.target".to_string(),
        };
        let text = definition.render().unwrap();

        assert!(text.contains("After=network.target\n"));
        assert!(text.contains("ExecStart=/usr/bin/myapp --serve\n"));
        assert!(text.contains("WorkingDirectory=/var/lib/myapp\n"));
        assert!(text.ends_with("WantedBy=multi-user.target\n"));
    }

    #[test]
    fn test_render_fails_without_exec_start() {
        let definition = ServiceDefinition {
            description: "no command".to_string(),
            ..Default::default()
        };
        assert!(definition.render().is_err());
    }

    #[test]
    fn test_write_to_sink() {
        let definition = ServiceDefinition {
            exec_start: "/usr/bin/date".to_string(),
            ..Default::default()
        };
        let mut buf = Vec::new();
        definition.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("[Unit]\n"));
        assert!(text.contains("ExecStart=/usr/bin/date\n"));
    }
}
